//! # Feedback Strategies Module
//!
//! This module provides pluggable feedback strategies for the marker system.
//! Each strategy implements the [`Feedback`](crate::traits::feedback::Feedback) trait and
//! produces one [`FeedbackEntry`](crate::traits::feedback::FeedbackEntry) per graded question.
//!
//! ## Available Strategies
//!
//! - [`auto_feedback`]: Outcome-based messages built from the comparison details.
//! - [`manual_feedback`]: Instructor-written feedback from the answer key, for answers that are not fully correct.

pub mod auto_feedback;
pub mod manual_feedback;
