//! # Comparators
//!
//! This module provides one comparator per expected-answer descriptor.
//! Static comparators implement the [`AnswerComparator`](crate::traits::comparator::AnswerComparator)
//! trait; the executable comparator is asynchronous because it drives an untrusted evaluator.
//!
//! The available comparators are:
//! - [`exact_comparator`]: Single expected value, trimmed, case-insensitive unless configured otherwise.
//! - [`multi_select_comparator`]: Set of expected options with partial credit on overlap.
//! - [`one_of_comparator`]: Answer must be one of a set of acceptable values.
//! - [`executable_comparator`]: Runs the answer through an evaluator with a time bound.

pub mod exact_comparator;
pub mod executable_comparator;
pub mod multi_select_comparator;
pub mod one_of_comparator;
