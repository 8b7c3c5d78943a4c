//! A comparator for questions with several correct options, where **overlap earns partial credit**.
//!
//! The submitted answer is split on commas into a set of options (`"a, c"` -> `{A, C}`).
//! The same set as the expected options is `Correct`; any shared option is `Partial`;
//! no shared option is `Incorrect`. Options are compared case-insensitively and order
//! does not matter.

use std::collections::BTreeSet;

use crate::traits::comparator::AnswerComparator;
use crate::types::{Comparison, Outcome};
use crate::utilities::normalization::{fold, split_tokens};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiSelectComparator {
    expected: BTreeSet<String>,
}

impl MultiSelectComparator {
    pub fn new<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            expected: options
                .into_iter()
                .map(|option| fold(option.as_ref()))
                .filter(|option| !option.is_empty())
                .collect(),
        }
    }

    pub fn expected(&self) -> &BTreeSet<String> {
        &self.expected
    }
}

impl AnswerComparator for MultiSelectComparator {
    fn compare(&self, submitted: &str) -> Comparison {
        let chosen = split_tokens(submitted);

        let matched: Vec<String> = self.expected.intersection(&chosen).cloned().collect();
        let missed: Vec<String> = self.expected.difference(&chosen).cloned().collect();
        let unexpected: Vec<String> = chosen.difference(&self.expected).cloned().collect();

        let outcome = if chosen == self.expected {
            Outcome::Correct
        } else if !matched.is_empty() {
            Outcome::Partial
        } else {
            Outcome::Incorrect
        };

        Comparison {
            outcome,
            matched,
            missed,
            detail: (!unexpected.is_empty())
                .then(|| format!("Not expected: {}", unexpected.join(", "))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn a_c() -> MultiSelectComparator {
        MultiSelectComparator::new(["A", "C"])
    }

    #[test]
    fn test_full_set_is_correct() {
        let result = a_c().compare("A,C");
        assert_eq!(result.outcome, Outcome::Correct);
        assert_eq!(result.matched, vec!["A", "C"]);
        assert!(result.missed.is_empty());
        assert!(result.detail.is_none());
    }

    #[test]
    fn test_subset_is_partial() {
        let result = a_c().compare("A");
        assert_eq!(result.outcome, Outcome::Partial);
        assert_eq!(result.missed, vec!["C"]);
    }

    #[test]
    fn test_disjoint_is_incorrect() {
        let result = a_c().compare("B");
        assert_eq!(result.outcome, Outcome::Incorrect);
        assert!(result.matched.is_empty());
        assert_eq!(result.detail.as_deref(), Some("Not expected: B"));
    }

    #[test]
    fn test_case_and_order_variance_is_correct() {
        assert_eq!(a_c().compare("a,c").outcome, Outcome::Correct);
        assert_eq!(a_c().compare(" c , a ").outcome, Outcome::Correct);
    }

    #[test]
    fn test_superset_is_partial() {
        let result = MultiSelectComparator::new(["C", "D"]).compare("A,C,D");
        assert_eq!(result.outcome, Outcome::Partial);
        assert!(result.missed.is_empty());
        assert_eq!(result.detail.as_deref(), Some("Not expected: A"));
    }

    #[test]
    fn test_expected_options_are_normalized() {
        let comparator = MultiSelectComparator::new(["c", " e"]);
        let expected: Vec<&str> = comparator.expected().iter().map(String::as_str).collect();
        assert_eq!(expected, vec!["C", "E"]);
        assert_eq!(comparator.compare("C,E").outcome, Outcome::Correct);
    }

    #[test]
    fn test_only_separators_is_incorrect() {
        assert_eq!(a_c().compare(",,").outcome, Outcome::Incorrect);
    }
}
