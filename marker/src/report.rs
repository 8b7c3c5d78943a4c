//! # Mark Report Module
//!
//! This module defines the data structures and response envelope for returning grading results
//! from the marker system. The report groups questions by outcome bucket, carries the earned and
//! available points of every question with its feedback, and the final mark.
//!
//! ## JSON Output Example
//!
//! ```json
//! {
//!   "success": true,
//!   "message": "Grading complete.",
//!   "data": {
//!     "exam": "M2.1",
//!     "run_id": "6f1c...",
//!     "created_at": "2025-09-01T10:00:00+00:00",
//!     "outcomes": [
//!       { "outcome": "not_submitted", "label": "Not submitted", "count": 0, "questions": [] },
//!       { "outcome": "partial", "label": "Partial", "count": 1,
//!         "questions": [{ "question": 2, "earned": 6, "total": 12, "feedback": "Partial. Missing: C" }] },
//!       ...
//!     ],
//!     "mark": { "earned": 10, "total": 16 }
//!   }
//! }
//! ```
//!
//! ## Design Notes
//!
//! - [`MarkReport`] is output only. It is built after scoring and never read back by the marker.
//! - [`From<MarkReport> for MarkReportResponse`] wraps a report in the response envelope.

use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::error::MarkerError;
use crate::summary::Summary;
use crate::traits::feedback::FeedbackEntry;
use crate::types::{Outcome, QuestionNumber, QuestionResult};

/// Final report of one grading run.
#[derive(Debug, Clone, Serialize)]
pub struct MarkReport {
    /// Name of the exam definition.
    pub exam: String,
    /// Unique identifier of this grading run.
    pub run_id: String,
    /// RFC 3339 timestamp.
    pub created_at: String,
    /// One bucket per outcome, always all four in report order.
    pub outcomes: Vec<ReportBucket>,
    pub mark: Score,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportBucket {
    pub outcome: Outcome,
    pub label: String,
    pub count: usize,
    pub questions: Vec<ReportQuestion>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportQuestion {
    pub question: QuestionNumber,
    pub earned: u32,
    pub total: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Score {
    pub earned: u32,
    pub total: u32,
}

/// The response envelope for grading results.
///
/// - `success`: Always true for successful grading.
/// - `message`: A human-readable message (e.g., "Grading complete.").
/// - `data`: The [`MarkReport`] containing all grading details.
#[derive(Debug, Clone, Serialize)]
pub struct MarkReportResponse {
    pub success: bool,
    pub message: String,
    pub data: MarkReport,
}

impl From<MarkReport> for MarkReportResponse {
    fn from(report: MarkReport) -> Self {
        MarkReportResponse {
            success: true,
            message: "Grading complete.".to_string(),
            data: report,
        }
    }
}

/// Builds the report of a grading run.
///
/// Every question in `summary` must have a result; feedback is optional per question.
pub fn generate_mark_report(
    exam: &str,
    summary: &Summary,
    results: &[QuestionResult],
    feedback: &[FeedbackEntry],
    mark: Score,
) -> Result<MarkReport, MarkerError> {
    let outcomes = Outcome::ALL
        .into_iter()
        .map(|outcome| {
            let questions = summary
                .bucket(outcome)
                .iter()
                .map(|question| {
                    let result = results
                        .iter()
                        .find(|r| r.question == *question)
                        .ok_or_else(|| {
                            MarkerError::Feedback(format!("question {question} has no result"))
                        })?;
                    Ok::<_, MarkerError>(ReportQuestion {
                        question: *question,
                        earned: result.awarded,
                        total: result.possible,
                        feedback: feedback
                            .iter()
                            .find(|f| f.question == *question)
                            .map(|f| f.message.clone()),
                    })
                })
                .collect::<Result<Vec<_>, MarkerError>>()?;
            Ok::<_, MarkerError>(ReportBucket {
                outcome,
                label: outcome.label().to_string(),
                count: questions.len(),
                questions,
            })
        })
        .collect::<Result<Vec<_>, MarkerError>>()?;

    Ok(MarkReport {
        exam: exam.to_string(),
        run_id: Uuid::new_v4().to_string(),
        created_at: Utc::now().to_rfc3339(),
        outcomes,
        mark,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn result(question: u32, outcome: Outcome, awarded: u32, possible: u32) -> QuestionResult {
        QuestionResult {
            question,
            outcome,
            awarded,
            possible,
            matched: vec![],
            missed: vec![],
            detail: None,
            manual_feedback: None,
        }
    }

    fn sample() -> (Summary, Vec<QuestionResult>, Vec<FeedbackEntry>) {
        let mut summary = Summary::new();
        summary.record(1, Outcome::Correct).unwrap();
        summary.record(2, Outcome::Partial).unwrap();
        let results = vec![result(1, Outcome::Correct, 4, 4), result(2, Outcome::Partial, 6, 12)];
        let feedback = vec![
            FeedbackEntry { question: 1, message: "Correct".to_string() },
            FeedbackEntry { question: 2, message: "Partial. Missing: C".to_string() },
        ];
        (summary, results, feedback)
    }

    #[test]
    fn test_mark_report_response_serialization() {
        let (summary, results, feedback) = sample();
        let report = generate_mark_report(
            "M2.1",
            &summary,
            &results,
            &feedback,
            Score { earned: 10, total: 16 },
        )
        .unwrap();
        let response: MarkReportResponse = report.into();
        let value: Value = serde_json::to_value(&response).unwrap();

        assert_eq!(value["success"], true);
        assert_eq!(value["message"], "Grading complete.");
        assert_eq!(value["data"]["exam"], "M2.1");
        assert_eq!(value["data"]["mark"]["earned"], 10);
        assert_eq!(value["data"]["mark"]["total"], 16);

        let outcomes = value["data"]["outcomes"].as_array().unwrap();
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[0]["outcome"], "not_submitted");
        assert_eq!(outcomes[0]["count"], 0);
        assert_eq!(outcomes[2]["label"], "Partial");
        assert_eq!(outcomes[2]["questions"][0]["question"], 2);
        assert_eq!(outcomes[2]["questions"][0]["earned"], 6);
        assert_eq!(outcomes[2]["questions"][0]["total"], 12);
        assert_eq!(outcomes[2]["questions"][0]["feedback"], "Partial. Missing: C");
        assert_eq!(outcomes[3]["questions"][0]["feedback"], "Correct");
    }

    #[test]
    fn test_run_metadata_is_filled() {
        let (summary, results, feedback) = sample();
        let report =
            generate_mark_report("M", &summary, &results, &feedback, Score { earned: 0, total: 0 })
                .unwrap();
        assert!(Uuid::parse_str(&report.run_id).is_ok());
        assert!(chrono::DateTime::parse_from_rfc3339(&report.created_at).is_ok());
    }

    #[test]
    fn test_feedback_is_optional() {
        let (summary, results, _) = sample();
        let report =
            generate_mark_report("M", &summary, &results, &[], Score { earned: 10, total: 16 })
                .unwrap();
        let value = serde_json::to_value(&report).unwrap();
        assert!(value["outcomes"][3]["questions"][0].get("feedback").is_none());
    }

    #[test]
    fn test_missing_result_is_an_error() {
        let (summary, results, feedback) = sample();
        let err = generate_mark_report(
            "M",
            &summary,
            &results[..1],
            &feedback,
            Score { earned: 4, total: 4 },
        )
        .unwrap_err();
        assert!(matches!(err, MarkerError::Feedback(msg) if msg.contains("question 2")));
    }
}
