//! Manual feedback strategy: instructors attach feedback to answer key entries.
//!
//! The instructor's text is shown for answered questions that are not fully correct.
//! Every other question falls back to the automatic message.

use crate::error::MarkerError;
use crate::feedback::auto_feedback::auto_message;
use crate::traits::feedback::{Feedback, FeedbackEntry};
use crate::types::{Outcome, QuestionResult};
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct ManualFeedback;

#[async_trait]
impl Feedback for ManualFeedback {
    async fn assemble_feedback(
        &self,
        results: &[QuestionResult],
    ) -> Result<Vec<FeedbackEntry>, MarkerError> {
        let mut feedback_entries = Vec::with_capacity(results.len());

        for result in results {
            let message = match (&result.manual_feedback, result.outcome) {
                (Some(manual), Outcome::Partial | Outcome::Incorrect) => manual.clone(),
                _ => auto_message(result),
            };
            feedback_entries.push(FeedbackEntry {
                question: result.question,
                message,
            });
        }

        Ok(feedback_entries)
    }
}
