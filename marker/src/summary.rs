//! # Summary
//!
//! Outcome buckets of one grading run. Each graded question is recorded exactly once, so the
//! four buckets always partition the graded set.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::MarkerError;
use crate::types::{Outcome, QuestionNumber};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    not_submitted: BTreeSet<QuestionNumber>,
    incorrect: BTreeSet<QuestionNumber>,
    partial: BTreeSet<QuestionNumber>,
    correct: BTreeSet<QuestionNumber>,
}

impl Summary {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the single outcome of `question`.
    pub fn record(&mut self, question: QuestionNumber, outcome: Outcome) -> Result<(), MarkerError> {
        if self.outcome_of(question).is_some() {
            return Err(MarkerError::AlreadyGraded(question));
        }
        self.bucket_mut(outcome).insert(question);
        Ok(())
    }

    pub fn bucket(&self, outcome: Outcome) -> &BTreeSet<QuestionNumber> {
        match outcome {
            Outcome::NotSubmitted => &self.not_submitted,
            Outcome::Incorrect => &self.incorrect,
            Outcome::Partial => &self.partial,
            Outcome::Correct => &self.correct,
        }
    }

    fn bucket_mut(&mut self, outcome: Outcome) -> &mut BTreeSet<QuestionNumber> {
        match outcome {
            Outcome::NotSubmitted => &mut self.not_submitted,
            Outcome::Incorrect => &mut self.incorrect,
            Outcome::Partial => &mut self.partial,
            Outcome::Correct => &mut self.correct,
        }
    }

    pub fn outcome_of(&self, question: QuestionNumber) -> Option<Outcome> {
        Outcome::ALL
            .into_iter()
            .find(|outcome| self.bucket(*outcome).contains(&question))
    }

    /// Union of all buckets.
    pub fn graded(&self) -> BTreeSet<QuestionNumber> {
        Outcome::ALL
            .into_iter()
            .flat_map(|outcome| self.bucket(outcome).iter().copied())
            .collect()
    }

    pub fn len(&self) -> usize {
        Outcome::ALL.into_iter().map(|o| self.bucket(o).len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(question, outcome)` pairs, bucket by bucket in report order.
    pub fn iter(&self) -> impl Iterator<Item = (QuestionNumber, Outcome)> + '_ {
        Outcome::ALL
            .into_iter()
            .flat_map(move |outcome| self.bucket(outcome).iter().map(move |q| (*q, outcome)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_places_question_in_one_bucket() {
        let mut summary = Summary::new();
        summary.record(1, Outcome::Correct).unwrap();
        summary.record(2, Outcome::Partial).unwrap();
        summary.record(3, Outcome::NotSubmitted).unwrap();

        assert_eq!(summary.outcome_of(2), Some(Outcome::Partial));
        assert_eq!(summary.outcome_of(9), None);
        assert_eq!(summary.bucket(Outcome::Correct).iter().copied().collect::<Vec<_>>(), vec![1]);
        assert!(summary.bucket(Outcome::Incorrect).is_empty());
        assert_eq!(summary.len(), 3);
    }

    #[test]
    fn test_second_record_is_rejected() {
        let mut summary = Summary::new();
        summary.record(4, Outcome::Incorrect).unwrap();
        assert_eq!(
            summary.record(4, Outcome::Correct),
            Err(MarkerError::AlreadyGraded(4))
        );
        assert_eq!(summary.outcome_of(4), Some(Outcome::Incorrect));
    }

    #[test]
    fn test_iter_follows_report_order() {
        let mut summary = Summary::new();
        summary.record(5, Outcome::Correct).unwrap();
        summary.record(1, Outcome::NotSubmitted).unwrap();
        summary.record(3, Outcome::Correct).unwrap();
        let pairs: Vec<_> = summary.iter().collect();
        assert_eq!(
            pairs,
            vec![
                (1, Outcome::NotSubmitted),
                (3, Outcome::Correct),
                (5, Outcome::Correct)
            ]
        );
        assert_eq!(summary.graded().into_iter().collect::<Vec<_>>(), vec![1, 3, 5]);
    }

    #[test]
    fn test_serializes_bucket_names() {
        let mut summary = Summary::new();
        summary.record(2, Outcome::Partial).unwrap();
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["partial"], serde_json::json!([2]));
        assert_eq!(json["not_submitted"], serde_json::json!([]));
    }
}
