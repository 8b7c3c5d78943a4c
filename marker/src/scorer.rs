//! # Scorer Module
//!
//! Turns a [`Summary`] into points. `compute_score` sums the award of every graded question
//! under the score table; `compute_total` sums the maximum points of the same questions.
//! Both are pure: the same summary and table always give the same integer.

use crate::error::MarkerError;
use crate::score_table::ScoreTable;
use crate::summary::Summary;

/// Computes the final score of a grading run.
///
/// `NotSubmitted` and `Incorrect` questions earn nothing, `Partial` questions earn the partial
/// award of their rule and `Correct` questions the full award.
///
/// # Errors
///
/// [`MarkerError::MissingScoreRule`] if a graded question is not covered by `table`.
///
/// # Example
///
/// ```
/// use marker::score_table::{ScoreRule, ScoreTable};
/// use marker::scorer::compute_score;
/// use marker::summary::Summary;
/// use marker::types::Outcome;
///
/// let table = ScoreTable::new(vec![
///     ScoreRule::single(1, 4),
///     ScoreRule::single(2, 12).with_partial(6),
/// ])
/// .unwrap();
///
/// let mut summary = Summary::new();
/// summary.record(1, Outcome::Correct).unwrap();
/// summary.record(2, Outcome::Partial).unwrap();
///
/// assert_eq!(compute_score(&summary, &table).unwrap(), 10);
/// ```
pub fn compute_score(summary: &Summary, table: &ScoreTable) -> Result<u32, MarkerError> {
    summary.iter().try_fold(0u32, |score, (question, outcome)| {
        Ok(score.saturating_add(table.award(question, outcome)?))
    })
}

/// Maximum points available for the questions in `summary`.
pub fn compute_total(summary: &Summary, table: &ScoreTable) -> Result<u32, MarkerError> {
    summary.iter().try_fold(0u32, |total, (question, _)| {
        Ok(total.saturating_add(table.max_points(question)?))
    })
}
