//!
//! Traits Module
//!
//! This module contains core traits used throughout the marker system for extensibility and abstraction.
//!
//! - [`comparator`]: Comparison of a submitted answer against a static descriptor.
//! - [`evaluator`]: The untrusted-evaluator interface behind executable descriptors.
//! - [`feedback`]: Pluggable feedback strategies.
//!
//! Implement these traits to extend or customize the marker's behavior for new question types.

pub mod comparator;
pub mod evaluator;
pub mod feedback;
