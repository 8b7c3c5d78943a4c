use crate::types::Comparison;

/// AnswerComparator is a strategy trait for comparing static answers.
/// Each implementation owns its expected answer and classifies one submitted value.
///
/// Implementations may assume the submitted value is non-blank; blank answers are
/// classified as not submitted before any comparator runs.
pub trait AnswerComparator: Send + Sync {
    /// Compare one submitted answer, producing the outcome and matched/missed items.
    fn compare(&self, submitted: &str) -> Comparison;
}
