//! A comparator that awards marks on an all-or-nothing basis for a single expected value.
//!
//! Both sides are trimmed. By default the comparison ignores case, so `"b"` matches `"B"`;
//! numeric or code answers that must match exactly can opt into case sensitivity.

use crate::traits::comparator::AnswerComparator;
use crate::types::{Comparison, Outcome};
use crate::utilities::normalization::fold;

/// Compares a submitted answer against one expected value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactComparator {
    expected: String,
    case_sensitive: bool,
}

impl ExactComparator {
    pub fn new(expected: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            expected: expected.into().trim().to_string(),
            case_sensitive,
        }
    }

    pub fn expected(&self) -> &str {
        &self.expected
    }

    fn matches(&self, submitted: &str) -> bool {
        if self.case_sensitive {
            submitted.trim() == self.expected
        } else {
            fold(submitted) == fold(&self.expected)
        }
    }
}

impl AnswerComparator for ExactComparator {
    fn compare(&self, submitted: &str) -> Comparison {
        if self.matches(submitted) {
            Comparison {
                outcome: Outcome::Correct,
                matched: vec![self.expected.clone()],
                missed: Vec::new(),
                detail: None,
            }
        } else {
            Comparison {
                outcome: Outcome::Incorrect,
                matched: Vec::new(),
                missed: vec![self.expected.clone()],
                detail: None,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        let comparator = ExactComparator::new("B", false);
        let result = comparator.compare("B");
        assert_eq!(result.outcome, Outcome::Correct);
        assert_eq!(result.matched, vec!["B"]);
        assert!(result.missed.is_empty());
    }

    #[test]
    fn test_case_and_whitespace_ignored_by_default() {
        let comparator = ExactComparator::new("B", false);
        assert_eq!(comparator.compare("  b ").outcome, Outcome::Correct);
    }

    #[test]
    fn test_case_sensitive_rejects_case_variance() {
        let comparator = ExactComparator::new("Northwind", true);
        assert_eq!(comparator.compare("northwind").outcome, Outcome::Incorrect);
        assert_eq!(comparator.compare(" Northwind\n").outcome, Outcome::Correct);
    }

    #[test]
    fn test_mismatch_reports_missed_value() {
        let comparator = ExactComparator::new("200", false);
        let result = comparator.compare("300");
        assert_eq!(result.outcome, Outcome::Incorrect);
        assert_eq!(result.missed, vec!["200"]);
    }

    #[test]
    fn test_expected_value_is_trimmed() {
        let comparator = ExactComparator::new(" D ", true);
        assert_eq!(comparator.expected(), "D");
        assert_eq!(comparator.compare("D").outcome, Outcome::Correct);
    }
}
