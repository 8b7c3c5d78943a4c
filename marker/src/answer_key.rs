//! # Answer Key
//!
//! Maps question numbers to expected-answer descriptors. A descriptor is a tagged variant,
//! one per grading rule: exact value, multi-select, one-of, or executable check.
//! The key is built once per exam and is immutable while grading.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use crate::comparators::exact_comparator::ExactComparator;
use crate::comparators::executable_comparator::ExecutableComparator;
use crate::comparators::multi_select_comparator::MultiSelectComparator;
use crate::comparators::one_of_comparator::OneOfComparator;
use crate::error::MarkerError;
use crate::traits::evaluator::UntrustedEvaluator;
use crate::types::QuestionNumber;

/// Expected-answer descriptor of one question.
#[derive(Debug, Clone)]
pub enum Expected {
    Exact(ExactComparator),
    MultiSelect(MultiSelectComparator),
    OneOf(OneOfComparator),
    Executable(ExecutableComparator),
}

impl Expected {
    /// Case-insensitive exact value.
    pub fn exact(value: impl Into<String>) -> Self {
        Expected::Exact(ExactComparator::new(value, false))
    }

    pub fn exact_case_sensitive(value: impl Into<String>) -> Self {
        Expected::Exact(ExactComparator::new(value, true))
    }

    pub fn multi_select<I, S>(options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Expected::MultiSelect(MultiSelectComparator::new(options))
    }

    pub fn one_of<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Expected::OneOf(OneOfComparator::new(accepted))
    }

    pub fn executable(evaluator: Arc<dyn UntrustedEvaluator>, per_run: Duration) -> Self {
        Expected::Executable(ExecutableComparator::new(evaluator, per_run))
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Expected::Exact(_) => "exact",
            Expected::MultiSelect(_) => "multi_select",
            Expected::OneOf(_) => "one_of",
            Expected::Executable(_) => "executable",
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeyEntry {
    pub expected: Expected,
    pub feedback: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct AnswerKey {
    entries: BTreeMap<QuestionNumber, KeyEntry>,
}

impl AnswerKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the descriptor for `question`. Question numbers start at 1 and are unique.
    pub fn insert(&mut self, question: QuestionNumber, expected: Expected) -> Result<(), MarkerError> {
        if question == 0 {
            return Err(MarkerError::InvalidQuestion(question));
        }
        if self.entries.contains_key(&question) {
            return Err(MarkerError::DuplicateQuestion(question));
        }
        self.entries.insert(
            question,
            KeyEntry {
                expected,
                feedback: None,
            },
        );
        Ok(())
    }

    /// Chaining form of [`AnswerKey::insert`].
    pub fn with(mut self, question: QuestionNumber, expected: Expected) -> Result<Self, MarkerError> {
        self.insert(question, expected)?;
        Ok(self)
    }

    /// Attaches instructor feedback to an existing entry.
    pub fn set_feedback(
        &mut self,
        question: QuestionNumber,
        feedback: impl Into<String>,
    ) -> Result<(), MarkerError> {
        let entry = self
            .entries
            .get_mut(&question)
            .ok_or(MarkerError::MissingKeyEntry(question))?;
        entry.feedback = Some(feedback.into());
        Ok(())
    }

    pub fn get(&self, question: QuestionNumber) -> Option<&KeyEntry> {
        self.entries.get(&question)
    }

    pub fn contains(&self, question: QuestionNumber) -> bool {
        self.entries.contains_key(&question)
    }

    pub fn questions(&self) -> impl Iterator<Item = QuestionNumber> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
