//! Shared building blocks for the exam marker workspace.
//!
//! - [`config`]: global runtime configuration loaded from the environment.
//! - [`exam_definition`]: on-disk schema of an exam (answer key, layout, scoring, fixtures).
//! - [`execution_config`]: limits applied to untrusted evaluations.
//! - [`submission`]: decoding of submitted answer payloads.

pub mod config;
pub mod exam_definition;
pub mod execution_config;
pub mod submission;
