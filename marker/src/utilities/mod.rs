//! # Utilities
//!
//! Helpers shared by the comparators.
//!
//! - [`normalization`]: answer trimming, case folding and multi-select token splitting.

pub mod normalization;
