use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Bounds applied to every untrusted evaluation (submitted code or query).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct EvaluationLimits {
    /// Wall-clock budget for one evaluation, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Captured stdout beyond this many bytes makes the result malformed.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl Default for EvaluationLimits {
    fn default() -> Self {
        Self {
            timeout_ms: default_timeout_ms(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

impl EvaluationLimits {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Clamps values into a usable range; a zero timeout would fail every evaluation.
    pub fn sanitize(mut self) -> Self {
        if self.timeout_ms == 0 {
            self.timeout_ms = default_timeout_ms();
        }
        if self.max_output_bytes == 0 {
            self.max_output_bytes = default_max_output_bytes();
        }
        self
    }

    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self.sanitize()
    }
}

//Default Functions

fn default_timeout_ms() -> u64 {
    5_000
}

fn default_max_output_bytes() -> usize {
    64 * 1024
}
