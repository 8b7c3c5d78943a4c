//! # Marker Library
//!
//! This crate grades fixed-form exam submissions. A submission is an ordered list of answers;
//! each answer is mapped to a question number through the exam layout, compared with the
//! answer key and classified as not submitted, incorrect, partial or correct. The outcome
//! buckets are then scored through the score table and turned into a report with feedback.
//!
//! ## Key Concepts
//! - **ExamMarker**: One exam's answer key, layout, score table and manual questions. Built once,
//!   immutable afterwards, reusable for any number of submissions.
//! - **Comparators**: One per descriptor kind (exact, multi-select, one-of, executable).
//! - **Evaluators**: Untrusted execution of submitted code or queries behind a time bound.
//! - **Summary**: The outcome buckets of one grading run.
//! - **Feedback**: Per-question messages attached to the report.
//!
//! ## Example
//!
//! ```
//! use marker::ExamMarker;
//! use marker::answer_key::{AnswerKey, Expected};
//! use marker::score_table::{ScoreRule, ScoreTable};
//! use std::collections::BTreeMap;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let marker = ExamMarker::builder("quiz")
//!     .key(
//!         AnswerKey::new()
//!             .with(1, Expected::exact("B")).unwrap()
//!             .with(2, Expected::multi_select(["A", "C"])).unwrap(),
//!     )
//!     .scores(ScoreTable::new(vec![
//!         ScoreRule::single(1, 4),
//!         ScoreRule::single(2, 12).with_partial(6),
//!     ]).unwrap())
//!     .build()
//!     .unwrap();
//!
//! let run = marker.grade(&["B".to_string(), "A".to_string()], &BTreeMap::new()).await.unwrap();
//! assert_eq!(marker.score(&run.summary).unwrap(), 10);
//! # }
//! ```

pub mod answer_key;
pub mod classify;
pub mod comparators;
pub mod definition;
pub mod error;
pub mod evaluators;
pub mod feedback;
pub mod layout;
pub mod report;
pub mod score_table;
pub mod scorer;
pub mod summary;
pub mod traits;
pub mod types;
pub mod utilities;

use std::collections::{BTreeMap, BTreeSet};

use futures::future::join_all;
use tracing::{info, warn};

use crate::answer_key::AnswerKey;
use crate::classify::classify;
use crate::error::MarkerError;
use crate::feedback::auto_feedback::AutoFeedback;
use crate::layout::ExamLayout;
use crate::report::{MarkReportResponse, Score, generate_mark_report};
use crate::score_table::ScoreTable;
use crate::scorer::{compute_score, compute_total};
use crate::summary::Summary;
use crate::traits::feedback::Feedback;
use crate::types::{Comparison, Outcome, QuestionNumber, QuestionResult};

/// A fully validated exam.
///
/// Every question reachable through the layout has a key entry, no manual question is part of
/// the layout, and every graded question is covered by the score table.
pub struct ExamMarker {
    name: String,
    key: AnswerKey,
    layout: ExamLayout,
    table: ScoreTable,
    manual_questions: BTreeSet<QuestionNumber>,
    feedback: Box<dyn Feedback + Send + Sync>,
}

/// Result of one classification pass.
#[derive(Debug, Clone)]
pub struct GradingRun {
    pub summary: Summary,
    /// One result per graded question, ordered by question number.
    pub results: Vec<QuestionResult>,
}

#[derive(Default)]
pub struct ExamMarkerBuilder {
    name: String,
    key: AnswerKey,
    layout: Option<ExamLayout>,
    table: Option<ScoreTable>,
    manual_questions: BTreeSet<QuestionNumber>,
    feedback: Option<Box<dyn Feedback + Send + Sync>>,
}

impl ExamMarkerBuilder {
    pub fn key(mut self, key: AnswerKey) -> Self {
        self.key = key;
        self
    }

    /// Defaults to one slot per automatically graded key entry, in ascending question order.
    pub fn layout(mut self, layout: ExamLayout) -> Self {
        self.layout = Some(layout);
        self
    }

    pub fn scores(mut self, table: ScoreTable) -> Self {
        self.table = Some(table);
        self
    }

    /// Questions graded outside the automatic pass.
    pub fn manual_questions<I>(mut self, questions: I) -> Self
    where
        I: IntoIterator<Item = QuestionNumber>,
    {
        self.manual_questions.extend(questions);
        self
    }

    /// Defaults to [`AutoFeedback`].
    pub fn feedback(mut self, feedback: Box<dyn Feedback + Send + Sync>) -> Self {
        self.feedback = Some(feedback);
        self
    }

    pub fn build(self) -> Result<ExamMarker, MarkerError> {
        if let Some(&question) = self.manual_questions.iter().find(|q| **q == 0) {
            return Err(MarkerError::InvalidQuestion(question));
        }

        let layout = match self.layout {
            Some(layout) => layout,
            None => default_layout(&self.key, &self.manual_questions)?,
        };

        for question in layout.questions() {
            if self.manual_questions.contains(&question) {
                return Err(MarkerError::InvalidLayout(format!(
                    "question {question} is graded manually and cannot take a submission slot"
                )));
            }
            if !self.key.contains(question) {
                return Err(MarkerError::MissingKeyEntry(question));
            }
        }

        for question in self.key.questions() {
            if !layout.contains(question) && !self.manual_questions.contains(&question) {
                warn!(exam = %self.name, question, "answer key entry is not reachable from any submission slot");
            }
        }

        let table = self.table.ok_or_else(|| {
            MarkerError::InvalidScoreRule("no score table was provided".to_string())
        })?;
        table.ensure_covers(layout.questions().chain(self.manual_questions.iter().copied()))?;

        Ok(ExamMarker {
            name: self.name,
            key: self.key,
            layout,
            table,
            manual_questions: self.manual_questions,
            feedback: self.feedback.unwrap_or_else(|| Box::new(AutoFeedback)),
        })
    }
}

/// Contiguous runs of the automatically graded key questions.
fn default_layout(
    key: &AnswerKey,
    manual: &BTreeSet<QuestionNumber>,
) -> Result<ExamLayout, MarkerError> {
    let mut segments: Vec<(QuestionNumber, u32)> = Vec::new();
    for question in key.questions().filter(|q| !manual.contains(q)) {
        match segments.last_mut() {
            Some((first, count)) if first.checked_add(*count) == Some(question) => *count += 1,
            _ => segments.push((question, 1)),
        }
    }
    ExamLayout::from_segments(segments)
}

impl ExamMarker {
    pub fn builder(name: impl Into<String>) -> ExamMarkerBuilder {
        ExamMarkerBuilder {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn key(&self) -> &AnswerKey {
        &self.key
    }

    pub fn layout(&self) -> &ExamLayout {
        &self.layout
    }

    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    pub fn manual_questions(&self) -> &BTreeSet<QuestionNumber> {
        &self.manual_questions
    }

    /// Question number of the answer at `raw_index`.
    pub fn renumber(&self, raw_index: usize) -> Result<QuestionNumber, MarkerError> {
        self.layout.renumber(raw_index)
    }

    /// Classifies a single answer against the key entry of `question`.
    pub async fn classify(
        &self,
        question: QuestionNumber,
        submitted: Option<&str>,
    ) -> Result<Comparison, MarkerError> {
        let entry = self
            .key
            .get(question)
            .ok_or(MarkerError::MissingKeyEntry(question))?;
        Ok(classify(question, submitted, &entry.expected).await)
    }

    /// Classifies every slot of the layout and every manual question.
    ///
    /// Slots beyond the end of a short submission are not submitted. Manual questions take the
    /// supplied outcome, or are not submitted when none is given.
    pub async fn grade(
        &self,
        submission: &[String],
        manual: &BTreeMap<QuestionNumber, Outcome>,
    ) -> Result<GradingRun, MarkerError> {
        let capacity = self.layout.capacity();
        if submission.len() > capacity {
            return Err(MarkerError::SubmissionTooLong {
                len: submission.len(),
                capacity,
            });
        }
        if let Some(&question) = manual.keys().find(|q| !self.manual_questions.contains(*q)) {
            return Err(MarkerError::UnknownManualQuestion(question));
        }

        info!(exam = %self.name, answers = submission.len(), slots = capacity, "grading submission");

        let mut slots = Vec::with_capacity(capacity);
        for raw_index in 0..capacity {
            let question = self.layout.renumber(raw_index)?;
            let entry = self
                .key
                .get(question)
                .ok_or(MarkerError::MissingKeyEntry(question))?;
            slots.push((question, entry, submission.get(raw_index).map(String::as_str)));
        }

        let comparisons = join_all(
            slots
                .iter()
                .map(|(question, entry, submitted)| classify(*question, *submitted, &entry.expected)),
        )
        .await;

        let mut summary = Summary::new();
        let mut results = Vec::with_capacity(capacity + self.manual_questions.len());

        for ((question, entry, _), comparison) in slots.iter().zip(comparisons) {
            let result = self.record(&mut summary, *question, comparison, entry.feedback.clone())?;
            results.push(result);
        }

        for &question in &self.manual_questions {
            let outcome = manual.get(&question).copied().unwrap_or(Outcome::NotSubmitted);
            let feedback = self.key.get(question).and_then(|entry| entry.feedback.clone());
            let result = self.record(&mut summary, question, Comparison::new(outcome), feedback)?;
            results.push(result);
        }

        results.sort_by_key(|result| result.question);

        info!(
            exam = %self.name,
            correct = summary.bucket(Outcome::Correct).len(),
            partial = summary.bucket(Outcome::Partial).len(),
            incorrect = summary.bucket(Outcome::Incorrect).len(),
            not_submitted = summary.bucket(Outcome::NotSubmitted).len(),
            "grading complete"
        );

        Ok(GradingRun { summary, results })
    }

    fn record(
        &self,
        summary: &mut Summary,
        question: QuestionNumber,
        comparison: Comparison,
        manual_feedback: Option<String>,
    ) -> Result<QuestionResult, MarkerError> {
        summary.record(question, comparison.outcome)?;
        Ok(QuestionResult {
            question,
            outcome: comparison.outcome,
            awarded: self.table.award(question, comparison.outcome)?,
            possible: self.table.max_points(question)?,
            matched: comparison.matched,
            missed: comparison.missed,
            detail: comparison.detail,
            manual_feedback,
        })
    }

    pub fn score(&self, summary: &Summary) -> Result<u32, MarkerError> {
        compute_score(summary, &self.table)
    }

    /// Points available for the questions in `summary`.
    pub fn total(&self, summary: &Summary) -> Result<u32, MarkerError> {
        compute_total(summary, &self.table)
    }

    /// Grades, scores and reports one submission.
    pub async fn mark(
        &self,
        submission: &[String],
        manual: &BTreeMap<QuestionNumber, Outcome>,
    ) -> Result<MarkReportResponse, MarkerError> {
        let run = self.grade(submission, manual).await?;
        let mark = Score {
            earned: self.score(&run.summary)?,
            total: self.total(&run.summary)?,
        };
        let feedback = self.feedback.assemble_feedback(&run.results).await?;
        let report = generate_mark_report(&self.name, &run.summary, &run.results, &feedback, mark)?;

        info!(exam = %self.name, run_id = %report.run_id, earned = mark.earned, total = mark.total, "mark report generated");
        Ok(report.into())
    }
}
