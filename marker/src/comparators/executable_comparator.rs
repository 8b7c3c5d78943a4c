//! A comparator that grades an answer by **executing it** through an [`UntrustedEvaluator`].
//!
//! The evaluation runs on its own tokio task under a time bound:
//!
//! - an evaluator error keeps the checks it reported as passed (`Partial`) or is `Incorrect`;
//! - a panic inside the evaluator is contained by the task boundary and is `Incorrect`;
//! - exceeding the time bound aborts the task and is `Incorrect`.
//!
//! None of these failures reach the caller; a misbehaving submission cannot abort a grading run.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tracing::warn;

use crate::traits::evaluator::{EvaluationError, UntrustedEvaluator, Verification};
use crate::types::Comparison;

#[derive(Clone)]
pub struct ExecutableComparator {
    evaluator: Arc<dyn UntrustedEvaluator>,
    time_limit: Duration,
}

impl fmt::Debug for ExecutableComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutableComparator")
            .field("evaluator", &self.evaluator.describe())
            .field("time_limit", &self.time_limit)
            .finish()
    }
}

impl ExecutableComparator {
    /// `per_run` is scaled by the evaluator's number of runs.
    pub fn new(evaluator: Arc<dyn UntrustedEvaluator>, per_run: Duration) -> Self {
        let time_limit = per_run.saturating_mul(evaluator.runs().max(1));
        Self {
            evaluator,
            time_limit,
        }
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    pub fn describe(&self) -> String {
        self.evaluator.describe()
    }

    pub async fn compare(&self, submitted: &str) -> Comparison {
        let evaluator = Arc::clone(&self.evaluator);
        let code = submitted.to_string();
        let mut handle = tokio::spawn(async move { evaluator.evaluate(&code).await });

        let joined = match tokio::time::timeout(self.time_limit, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                handle.abort();
                return self.failed(EvaluationError::Timeout {
                    after: self.time_limit,
                    passed: 0,
                });
            }
        };

        match joined {
            Ok(Ok(verification)) => verified(verification),
            Ok(Err(err)) => self.failed(err),
            Err(join_err) => {
                let message = if join_err.is_panic() {
                    "evaluator panicked"
                } else {
                    "evaluation was cancelled"
                };
                self.failed(EvaluationError::execution(message))
            }
        }
    }

    fn failed(&self, err: EvaluationError) -> Comparison {
        warn!(
            evaluator = %self.evaluator.describe(),
            passed = err.passed(),
            error = %err,
            "evaluation failed; answer downgraded"
        );
        Comparison::new(err.outcome()).with_detail(err.to_string())
    }
}

fn verified(verification: Verification) -> Comparison {
    let summary = format!(
        "{}/{} checks passed",
        verification.passed, verification.total
    );
    let detail = if verification.details.is_empty() {
        summary
    } else {
        format!("{summary}: {}", verification.details.join("; "))
    };
    Comparison::new(verification.outcome()).with_detail(detail)
}
