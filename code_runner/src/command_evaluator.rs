//! Executes submitted source code through an interpreter.
//!
//! The source is written to a fresh temporary directory and run once per case with the case
//! input on stdin. Each case is one check. A non-zero exit, a timeout or oversized output ends
//! the evaluation; the cases verified before that keep their credit.

use async_trait::async_trait;
use tempfile::tempdir;
use tracing::debug;

use marker::traits::evaluator::{EvaluationError, UntrustedEvaluator, Verification};
use util::exam_definition::{CommandCheckSpec, OutputComparison};
use util::execution_config::EvaluationLimits;

use crate::error::RunError;
use crate::run_command;

#[derive(Debug, Clone)]
pub struct CommandEvaluator {
    spec: CommandCheckSpec,
    limits: EvaluationLimits,
}

impl CommandEvaluator {
    pub fn new(spec: CommandCheckSpec, limits: EvaluationLimits) -> Self {
        Self {
            spec,
            limits: limits.sanitize(),
        }
    }
}

/// Trailing whitespace of every line and blank lines around the output are ignored.
pub fn normalize_output(output: &str) -> String {
    let lines: Vec<&str> = output.lines().map(str::trim_end).collect();
    let start = lines.iter().position(|l| !l.is_empty()).unwrap_or(lines.len());
    let end = lines.iter().rposition(|l| !l.is_empty()).map_or(start, |i| i + 1);
    lines[start..end].join("\n")
}

pub fn count_lines(output: &str) -> usize {
    output.lines().filter(|l| !l.trim().is_empty()).count()
}

pub fn outputs_match(actual: &str, expected: &str, comparison: OutputComparison) -> bool {
    match comparison {
        OutputComparison::Structural => normalize_output(actual) == normalize_output(expected),
        OutputComparison::LineCount => count_lines(actual) == count_lines(expected),
    }
}

#[async_trait]
impl UntrustedEvaluator for CommandEvaluator {
    async fn evaluate(&self, submitted: &str) -> Result<Verification, EvaluationError> {
        let workdir = tempdir().map_err(|e| EvaluationError::execution(e.to_string()))?;
        let source = workdir.path().join(&self.spec.source_file);
        tokio::fs::write(&source, submitted)
            .await
            .map_err(|e| EvaluationError::execution(e.to_string()))?;

        let mut args = self.spec.args.clone();
        args.push(source.display().to_string());

        let total = self.spec.cases.len();
        let mut passed = 0;
        let mut details = Vec::new();

        for (index, case) in self.spec.cases.iter().enumerate() {
            let case_number = index + 1;
            let output = run_command(
                &self.spec.program,
                &args,
                workdir.path(),
                &case.stdin,
                self.limits.timeout(),
                self.limits.max_output_bytes,
            )
            .await
            .map_err(|err| match err {
                RunError::Timeout(after) => EvaluationError::Timeout { after, passed },
                RunError::OutputTooLarge { .. } => EvaluationError::Malformed {
                    message: format!("case {case_number}: {err}"),
                    passed,
                },
                other => EvaluationError::Execution {
                    message: format!("case {case_number}: {other}"),
                    passed,
                },
            })?;

            if !output.success() {
                let code = output
                    .exit_code
                    .map_or_else(|| "signal".to_string(), |c| c.to_string());
                return Err(EvaluationError::Execution {
                    message: format!(
                        "case {case_number} exited with {code}: {}",
                        output.stderr.trim()
                    ),
                    passed,
                });
            }

            if outputs_match(&output.stdout, &case.expected, self.spec.comparison) {
                passed += 1;
            } else {
                details.push(format!("case {case_number} output differs"));
            }
            debug!(program = %self.spec.program, case = case_number, passed, "case finished");
        }

        Ok(Verification::new(passed, total).with_details(details))
    }

    fn runs(&self) -> u32 {
        u32::try_from(self.spec.cases.len()).unwrap_or(u32::MAX).max(1)
    }

    fn describe(&self) -> String {
        format!("{} ({} cases)", self.spec.program, self.spec.cases.len())
    }
}
