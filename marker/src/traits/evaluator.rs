//! Untrusted Evaluator Trait
//!
//! Executable descriptors grade an answer by running it: a submitted program is executed
//! against fixture inputs, a submitted SQL query is executed against a reference database.
//! The marker never performs that execution itself. It calls an [`UntrustedEvaluator`]
//! under a time bound and consumes only the success/failure and the verification counts.
//!
//! Evaluators are built from the exam definition through an [`EvaluatorFactory`], which is
//! where fixtures are looked up. A missing fixture is reported by the factory, so it
//! surfaces while the marker is constructed and never during grading.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use util::exam_definition::CheckSpec;
use util::execution_config::EvaluationLimits;

use crate::error::MarkerError;
use crate::types::{Outcome, QuestionNumber};

/// Outcome of a completed evaluation: how many of the expected behaviors were verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verification {
    pub passed: usize,
    pub total: usize,
    pub details: Vec<String>,
}

impl Verification {
    pub fn new(passed: usize, total: usize) -> Self {
        Self {
            passed,
            total,
            details: Vec::new(),
        }
    }

    pub fn with_details(mut self, details: Vec<String>) -> Self {
        self.details = details;
        self
    }

    /// All checks -> `Correct`, some -> `Partial`, none -> `Incorrect`.
    pub fn outcome(&self) -> Outcome {
        if self.total > 0 && self.passed >= self.total {
            Outcome::Correct
        } else if self.passed > 0 {
            Outcome::Partial
        } else {
            Outcome::Incorrect
        }
    }
}

/// Why an evaluation did not complete. Each variant records the checks that had already
/// passed, which keeps partial credit earned before the failure.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EvaluationError {
    #[error("execution failed: {message}")]
    Execution { message: String, passed: usize },
    #[error("timed out after {after:?}")]
    Timeout { after: Duration, passed: usize },
    #[error("malformed result: {message}")]
    Malformed { message: String, passed: usize },
}

impl EvaluationError {
    pub fn execution(message: impl Into<String>) -> Self {
        EvaluationError::Execution {
            message: message.into(),
            passed: 0,
        }
    }

    /// Checks verified before the failure.
    pub fn passed(&self) -> usize {
        match self {
            EvaluationError::Execution { passed, .. }
            | EvaluationError::Timeout { passed, .. }
            | EvaluationError::Malformed { passed, .. } => *passed,
        }
    }

    /// `Partial` when some checks already passed, `Incorrect` otherwise.
    pub fn outcome(&self) -> Outcome {
        if self.passed() > 0 {
            Outcome::Partial
        } else {
            Outcome::Incorrect
        }
    }
}

/// Runs submitted code or a submitted query and reports how many checks it satisfied.
#[async_trait]
pub trait UntrustedEvaluator: Send + Sync {
    async fn evaluate(&self, submitted: &str) -> Result<Verification, EvaluationError>;

    /// Number of separate executions one evaluation performs. The marker scales its time
    /// bound by this count.
    fn runs(&self) -> u32 {
        1
    }

    /// Short human readable description used in logs.
    fn describe(&self) -> String {
        "executable check".to_string()
    }
}

/// Builds evaluators for the executable entries (`sql`, `command`) of an exam definition.
#[async_trait]
pub trait EvaluatorFactory: Send + Sync {
    async fn build(
        &self,
        question: QuestionNumber,
        spec: &CheckSpec,
        limits: &EvaluationLimits,
    ) -> Result<Arc<dyn UntrustedEvaluator>, MarkerError>;
}

/// Factory for exams without executable questions; any executable entry is a definition error.
pub struct StaticOnly;

#[async_trait]
impl EvaluatorFactory for StaticOnly {
    async fn build(
        &self,
        question: QuestionNumber,
        _spec: &CheckSpec,
        _limits: &EvaluationLimits,
    ) -> Result<Arc<dyn UntrustedEvaluator>, MarkerError> {
        Err(MarkerError::InvalidDefinition(format!(
            "question {question} needs an evaluator but none is configured"
        )))
    }
}
