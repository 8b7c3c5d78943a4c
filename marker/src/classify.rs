//! Classification of one submitted answer.

use tracing::debug;

use crate::answer_key::Expected;
use crate::traits::comparator::AnswerComparator;
use crate::types::{Comparison, QuestionNumber};

/// Classifies `submitted` against `expected`.
///
/// An absent or blank answer is `NotSubmitted` whatever the descriptor; executable
/// descriptors are never invoked for it.
pub async fn classify(
    question: QuestionNumber,
    submitted: Option<&str>,
    expected: &Expected,
) -> Comparison {
    let answer = match submitted {
        Some(answer) if !answer.trim().is_empty() => answer,
        _ => {
            debug!(question, "no answer submitted");
            return Comparison::not_submitted();
        }
    };

    let comparison = match expected {
        Expected::Exact(comparator) => comparator.compare(answer),
        Expected::MultiSelect(comparator) => comparator.compare(answer),
        Expected::OneOf(comparator) => comparator.compare(answer),
        Expected::Executable(comparator) => comparator.compare(answer).await,
    };

    debug!(
        question,
        kind = expected.kind(),
        outcome = %comparison.outcome,
        "answer classified"
    );
    comparison
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::evaluators::FnEvaluator;
    use crate::traits::evaluator::{EvaluationError, Verification};
    use crate::types::Outcome;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    #[tokio::test]
    async fn test_blank_answer_is_not_submitted_for_every_descriptor() {
        let descriptors = [
            Expected::exact("B"),
            Expected::multi_select(["A", "C"]),
            Expected::one_of(["A", "B"]),
            Expected::executable(
                Arc::new(FnEvaluator::new("always", |_| Ok(Verification::new(1, 1)))),
                Duration::from_secs(1),
            ),
        ];
        for expected in &descriptors {
            for blank in [None, Some(""), Some("   "), Some("\n\t")] {
                let result = classify(1, blank, expected).await;
                assert_eq!(result.outcome, Outcome::NotSubmitted, "{}", expected.kind());
            }
        }
    }

    #[tokio::test]
    async fn test_exact_matches_itself() {
        let expected = Expected::exact("SELECT");
        assert_eq!(classify(1, Some("SELECT"), &expected).await.outcome, Outcome::Correct);
        assert_eq!(classify(1, Some(" select "), &expected).await.outcome, Outcome::Correct);
        assert_eq!(classify(1, Some("INSERT"), &expected).await.outcome, Outcome::Incorrect);

        let strict = Expected::exact_case_sensitive("SELECT");
        assert_eq!(classify(1, Some("select"), &strict).await.outcome, Outcome::Incorrect);
    }

    #[tokio::test]
    async fn test_multi_select_outcomes() {
        let expected = Expected::multi_select(["A", "C"]);
        assert_eq!(classify(2, Some("A,C"), &expected).await.outcome, Outcome::Correct);
        assert_eq!(classify(2, Some("A"), &expected).await.outcome, Outcome::Partial);
        assert_eq!(classify(2, Some("B"), &expected).await.outcome, Outcome::Incorrect);
        assert_eq!(classify(2, Some("a,c"), &expected).await.outcome, Outcome::Correct);
        assert_eq!(classify(2, Some("C , A"), &expected).await.outcome, Outcome::Correct);
    }

    #[tokio::test]
    async fn test_one_of_membership() {
        let expected = Expected::one_of(["A", "B"]);
        assert_eq!(classify(4, Some("b"), &expected).await.outcome, Outcome::Correct);
        assert_eq!(classify(4, Some("D"), &expected).await.outcome, Outcome::Incorrect);
    }

    #[tokio::test]
    async fn test_executable_skipped_for_blank_answer() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let expected = Expected::executable(
            Arc::new(FnEvaluator::new("counting", move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(Verification::new(1, 1))
            })),
            Duration::from_secs(1),
        );

        classify(7, Some(""), &expected).await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        let result = classify(7, Some("print(4)"), &expected).await;
        assert_eq!(result.outcome, Outcome::Correct);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failing_code_is_incorrect() {
        let expected = Expected::executable(
            Arc::new(FnEvaluator::new("fixture", |code| {
                if code.contains("undefined_name") {
                    Err(EvaluationError::execution("NameError: undefined_name"))
                } else {
                    Ok(Verification::new(3, 3))
                }
            })),
            Duration::from_secs(1),
        );
        let result = classify(7, Some("print(undefined_name)"), &expected).await;
        assert_eq!(result.outcome, Outcome::Incorrect);
        assert!(result.detail.unwrap().contains("NameError"));
    }
}
