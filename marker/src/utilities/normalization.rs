use std::collections::BTreeSet;

/// Case-folded, trimmed form of an answer used by case-insensitive comparisons.
pub fn fold(answer: &str) -> String {
    answer.trim().to_uppercase()
}

/// Splits a multi-select answer such as `"a, c"` into `{"A", "C"}`.
///
/// Tokens are comma separated; surrounding whitespace and empty tokens are dropped.
pub fn split_tokens(answer: &str) -> BTreeSet<String> {
    answer
        .split(',')
        .map(fold)
        .filter(|token| !token.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_trims_and_uppercases() {
        assert_eq!(fold("  b "), "B");
        assert_eq!(fold("Select *"), "SELECT *");
    }

    #[test]
    fn test_split_tokens_drops_empty_and_duplicates() {
        let tokens = split_tokens(" a,, C ,a ,");
        assert_eq!(tokens, BTreeSet::from(["A".to_string(), "C".to_string()]));
    }

    #[test]
    fn test_split_tokens_of_blank_answer_is_empty() {
        assert!(split_tokens(" , ").is_empty());
    }
}
