//! # AutoFeedback Strategy
//!
//! This module provides the `AutoFeedback` strategy for the marker system.
//! It implements the [`Feedback`] trait to generate template-based feedback for each question
//! from its outcome and comparison details.
//!
//! ## Overview
//!
//! - Unanswered questions get "No answer submitted".
//! - Correct answers get "Correct".
//! - Partial and incorrect answers list the missing options, when the descriptor has any.
//! - Evaluation details ("2/3 checks passed", "timed out after 5s") are appended.

use crate::error::MarkerError;
use crate::traits::feedback::{Feedback, FeedbackEntry};
use crate::types::{Outcome, QuestionResult};
use async_trait::async_trait;

/// Automatic feedback strategy: one template message per question.
#[derive(Debug, Default)]
pub struct AutoFeedback;

/// The automatic message for one result.
pub fn auto_message(result: &QuestionResult) -> String {
    let mut message = match result.outcome {
        Outcome::NotSubmitted => return "No answer submitted".to_string(),
        Outcome::Correct => "Correct".to_string(),
        Outcome::Partial | Outcome::Incorrect => {
            let mut message = result.outcome.label().to_string();
            if !result.missed.is_empty() {
                message.push_str(&format!(". Missing: {}", result.missed.join(", ")));
            }
            message
        }
    };
    if let Some(detail) = &result.detail {
        message.push_str(&format!(" ({detail})"));
    }
    message
}

#[async_trait]
impl Feedback for AutoFeedback {
    async fn assemble_feedback(
        &self,
        results: &[QuestionResult],
    ) -> Result<Vec<FeedbackEntry>, MarkerError> {
        Ok(results
            .iter()
            .map(|result| FeedbackEntry {
                question: result.question,
                message: auto_message(result),
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_result(
        question: u32,
        outcome: Outcome,
        missed: &[&str],
        detail: Option<&str>,
    ) -> QuestionResult {
        QuestionResult {
            question,
            outcome,
            awarded: 0,
            possible: 4,
            matched: vec![],
            missed: missed.iter().map(|s| s.to_string()).collect(),
            detail: detail.map(str::to_string),
            manual_feedback: None,
        }
    }

    #[tokio::test]
    async fn test_correct_answer() {
        let result = make_result(1, Outcome::Correct, &[], None);
        let feedback = AutoFeedback.assemble_feedback(&[result]).await.unwrap();
        assert_eq!(
            feedback,
            vec![FeedbackEntry {
                question: 1,
                message: "Correct".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_partial_lists_missing_options() {
        let result = make_result(2, Outcome::Partial, &["C"], None);
        let feedback = AutoFeedback.assemble_feedback(&[result]).await.unwrap();
        assert_eq!(feedback[0].message, "Partial. Missing: C");
    }

    #[tokio::test]
    async fn test_not_submitted_ignores_details() {
        let result = make_result(3, Outcome::NotSubmitted, &["A"], Some("ignored"));
        let feedback = AutoFeedback.assemble_feedback(&[result]).await.unwrap();
        assert_eq!(feedback[0].message, "No answer submitted");
    }

    #[tokio::test]
    async fn test_evaluation_detail_is_appended() {
        let result = make_result(7, Outcome::Incorrect, &[], Some("timed out after 5s"));
        let feedback = AutoFeedback.assemble_feedback(&[result]).await.unwrap();
        assert_eq!(feedback[0].message, "Incorrect (timed out after 5s)");
    }

    #[tokio::test]
    async fn test_one_entry_per_result_in_order() {
        let results = vec![
            make_result(1, Outcome::Correct, &[], None),
            make_result(2, Outcome::Incorrect, &["B"], None),
            make_result(4, Outcome::NotSubmitted, &[], None),
        ];
        let feedback = AutoFeedback.assemble_feedback(&results).await.unwrap();
        let questions: Vec<_> = feedback.iter().map(|f| f.question).collect();
        assert_eq!(questions, vec![1, 2, 4]);
        assert_eq!(feedback[1].message, "Incorrect. Missing: B");
    }
}
