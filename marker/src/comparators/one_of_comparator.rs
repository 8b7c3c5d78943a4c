//! A comparator that accepts any answer from a set of acceptable values. No partial credit.

use std::collections::BTreeSet;

use crate::traits::comparator::AnswerComparator;
use crate::types::{Comparison, Outcome};
use crate::utilities::normalization::fold;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OneOfComparator {
    accepted: BTreeSet<String>,
}

impl OneOfComparator {
    pub fn new<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            accepted: accepted
                .into_iter()
                .map(|value| fold(value.as_ref()))
                .filter(|value| !value.is_empty())
                .collect(),
        }
    }

    pub fn accepted(&self) -> &BTreeSet<String> {
        &self.accepted
    }
}

impl AnswerComparator for OneOfComparator {
    fn compare(&self, submitted: &str) -> Comparison {
        let answer = fold(submitted);
        if self.accepted.contains(&answer) {
            Comparison {
                outcome: Outcome::Correct,
                matched: vec![answer],
                missed: Vec::new(),
                detail: None,
            }
        } else {
            Comparison {
                outcome: Outcome::Incorrect,
                matched: Vec::new(),
                missed: self.accepted.iter().cloned().collect(),
                detail: None,
            }
        }
    }
}
