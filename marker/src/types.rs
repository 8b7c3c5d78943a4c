//! # Types Module
//!
//! Core data structures shared across the marker: question outcomes, the result of comparing
//! one answer against its descriptor, and the per-question grading result consumed by
//! scoring, feedback and reporting.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Question numbers are positive integers as printed on the exam paper.
pub type QuestionNumber = u32;

/// Classification of one graded question. Assigned exactly once per grading run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    NotSubmitted,
    Incorrect,
    Partial,
    Correct,
}

impl Outcome {
    /// All outcomes in report order.
    pub const ALL: [Outcome; 4] = [
        Outcome::NotSubmitted,
        Outcome::Incorrect,
        Outcome::Partial,
        Outcome::Correct,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Outcome::NotSubmitted => "Not submitted",
            Outcome::Incorrect => "Incorrect",
            Outcome::Partial => "Partial",
            Outcome::Correct => "Correct",
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The result of comparing one submitted answer with its expected-answer descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Comparison {
    pub outcome: Outcome,
    /// Expected items found in the answer.
    pub matched: Vec<String>,
    /// Expected items absent from the answer.
    pub missed: Vec<String>,
    /// Free-form evaluation detail (e.g. "2/3 checks passed", "timed out after 5s").
    pub detail: Option<String>,
}

impl Comparison {
    pub fn new(outcome: Outcome) -> Self {
        Self {
            outcome,
            matched: Vec::new(),
            missed: Vec::new(),
            detail: None,
        }
    }

    pub fn not_submitted() -> Self {
        Self::new(Outcome::NotSubmitted)
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// Represents the graded result of a single question.
///
/// Holds the outcome, the points it earned under the score table and the comparison details
/// used to build feedback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionResult {
    pub question: QuestionNumber,
    pub outcome: Outcome,
    /// Points awarded for `outcome`.
    pub awarded: u32,
    /// Maximum points available for this question.
    pub possible: u32,
    pub matched: Vec<String>,
    pub missed: Vec<String>,
    pub detail: Option<String>,
    /// Instructor feedback attached to the answer key entry, if any.
    pub manual_feedback: Option<String>,
}
