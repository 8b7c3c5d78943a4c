use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Failures of the runner itself: spawning a process, opening a fixture, running a query.
///
/// Evaluators translate these into [`marker::traits::evaluator::EvaluationError`] so that a
/// failing submission is graded rather than aborting the run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("timed out after {0:?}")]
    Timeout(Duration),
    #[error("output exceeded {limit} bytes")]
    OutputTooLarge { limit: usize },
    #[error("fixture not found: {}", .0.display())]
    MissingFixture(PathBuf),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}
