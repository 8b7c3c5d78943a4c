//! Marker Error Types
//!
//! This module defines the [`MarkerError`] enum, which covers every failure that can surface
//! while building an exam marker or running a grading pass.
//!
//! Grading failures of individual answers are *not* errors: a submitted program that crashes
//! or times out is classified as `Incorrect`. `MarkerError` is reserved for configuration
//! defects (missing key entries, uncovered questions, unavailable fixtures) and malformed
//! submissions, and is raised before any grading begins whenever possible.
//!
//! # Example
//!
//! ```rust
//! use marker::error::MarkerError;
//!
//! fn require_question(question: u32) -> Result<u32, MarkerError> {
//!     if question == 0 {
//!         return Err(MarkerError::InvalidQuestion(question));
//!     }
//!     Ok(question)
//! }
//! ```

use thiserror::Error;

/// Represents all error types that can occur in the marker system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MarkerError {
    /// A question reachable from a submission has no answer key entry.
    #[error("question {0} has no answer key entry")]
    MissingKeyEntry(u32),
    /// A graded question is not covered by any score rule.
    #[error("question {0} is not covered by the score table")]
    MissingScoreRule(u32),
    /// A question was recorded in the summary twice.
    #[error("question {0} was already graded")]
    AlreadyGraded(u32),
    /// A question number was declared twice.
    #[error("question {0} is declared more than once")]
    DuplicateQuestion(u32),
    /// Question numbers start at 1.
    #[error("invalid question number {0}")]
    InvalidQuestion(u32),
    #[error("invalid layout: {0}")]
    InvalidLayout(String),
    #[error("invalid score rule: {0}")]
    InvalidScoreRule(String),
    #[error("raw index {index} is outside the exam layout ({capacity} slots)")]
    IndexOutOfLayout { index: usize, capacity: usize },
    #[error("submission has {len} answers but the exam layout has {capacity} slots")]
    SubmissionTooLong { len: usize, capacity: usize },
    /// An outcome was supplied for a question that is not graded manually.
    #[error("question {0} is not a manually graded question")]
    UnknownManualQuestion(u32),
    /// A reference dataset or database is unavailable.
    #[error("fixture '{0}' is not available")]
    MissingFixture(String),
    /// An executable check could not be prepared (e.g. the reference query fails).
    #[error("failed to prepare evaluator for question {question}: {message}")]
    EvaluatorSetup { question: u32, message: String },
    #[error("invalid exam definition: {0}")]
    InvalidDefinition(String),
    #[error("feedback generation failed: {0}")]
    Feedback(String),
}
