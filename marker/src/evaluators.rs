//! In-process evaluators.
//!
//! [`FnEvaluator`] wraps a Rust closure as an [`UntrustedEvaluator`], for exams whose
//! executable checks are written directly in Rust instead of being delegated to an
//! external interpreter or database.

use async_trait::async_trait;

use crate::traits::evaluator::{EvaluationError, UntrustedEvaluator, Verification};

pub struct FnEvaluator<F> {
    name: String,
    check: F,
}

impl<F> FnEvaluator<F>
where
    F: Fn(&str) -> Result<Verification, EvaluationError> + Send + Sync,
{
    pub fn new(name: impl Into<String>, check: F) -> Self {
        Self {
            name: name.into(),
            check,
        }
    }
}

#[async_trait]
impl<F> UntrustedEvaluator for FnEvaluator<F>
where
    F: Fn(&str) -> Result<Verification, EvaluationError> + Send + Sync,
{
    async fn evaluate(&self, submitted: &str) -> Result<Verification, EvaluationError> {
        (self.check)(submitted)
    }

    fn describe(&self) -> String {
        self.name.clone()
    }
}
