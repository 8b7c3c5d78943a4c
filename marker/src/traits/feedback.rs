//!
//! # Feedback Trait
//!
//! This module defines the [`Feedback`] trait and the [`FeedbackEntry`] struct, which are used to implement pluggable feedback strategies for the marker system.
//!
//! Each feedback strategy produces one feedback entry per graded question, allowing for flexible feedback generation (e.g., template-based or instructor-specified).
//!

use crate::error::MarkerError;
use crate::types::{QuestionNumber, QuestionResult};
use async_trait::async_trait;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedbackEntry {
    pub question: QuestionNumber,
    pub message: String,
}

/// A trait for pluggable feedback strategies in the marker system.
///
/// # Arguments
/// - `results`: The [`QuestionResult`]s of one grading run, ordered by question number.
///
/// # Returns
/// - `Ok(Vec<FeedbackEntry>)`: One entry per result, in the same order.
/// - `Err(MarkerError)`: If feedback generation fails.
#[async_trait]
pub trait Feedback {
    async fn assemble_feedback(
        &self,
        results: &[QuestionResult],
    ) -> Result<Vec<FeedbackEntry>, MarkerError>;
}
