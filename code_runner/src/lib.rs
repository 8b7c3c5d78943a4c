//! Untrusted evaluators for executable exam questions.
//!
//! - [`command_evaluator`]: runs submitted source through an interpreter, once per fixture case.
//! - [`sql_evaluator`]: compares the result of a submitted query with a reference query.
//! - [`fixtures`]: read-only SQLite fixtures and the [`fixtures::RunnerFactory`] that wires
//!   both evaluators into the marker.

use std::path::Path;
use std::process::Stdio;

use tokio::io::{self, AsyncReadExt, AsyncWriteExt};
use tokio::process::Command;
use tokio::time::{Duration, timeout};
use tracing::debug;

pub mod command_evaluator;
pub mod error;
pub mod fixtures;
pub mod sql_evaluator;

use crate::error::RunError;

/// Captured result of one process run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub exit_code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs `program args..` in `workdir`, feeding `stdin` and capturing stdout/stderr.
///
/// Feeding stdin, reading output and waiting for exit all share the `limit` budget; the child
/// is killed once it is exceeded. Stdout is read incrementally and the child is killed as
/// soon as it writes more than `max_output_bytes`. Stderr keeps its first `max_output_bytes`,
/// the rest is discarded.
pub async fn run_command(
    program: &str,
    args: &[String],
    workdir: &Path,
    stdin: &str,
    limit: Duration,
    max_output_bytes: usize,
) -> Result<CommandOutput, RunError> {
    let mut child = Command::new(program)
        .args(args)
        .current_dir(workdir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|source| RunError::Spawn {
            program: program.to_string(),
            source,
        })?;

    let input = child.stdin.take();
    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let cap = u64::try_from(max_output_bytes).unwrap_or(u64::MAX);

    let feed = async move {
        if let Some(mut input) = input {
            // The program may exit without reading its input.
            if let Err(err) = input.write_all(stdin.as_bytes()).await {
                debug!(program, error = %err, "stdin closed early");
            }
        }
        Ok::<_, RunError>(())
    };

    let read_stdout = async move {
        let mut buf = Vec::new();
        if let Some(out) = stdout {
            out.take(cap.saturating_add(1)).read_to_end(&mut buf).await?;
        }
        if buf.len() > max_output_bytes {
            return Err(RunError::OutputTooLarge {
                limit: max_output_bytes,
            });
        }
        Ok::<_, RunError>(buf)
    };

    let read_stderr = async move {
        let mut buf = Vec::new();
        if let Some(mut err) = stderr {
            (&mut err).take(cap).read_to_end(&mut buf).await?;
            io::copy(&mut err, &mut io::sink()).await?;
        }
        Ok::<_, RunError>(buf)
    };

    let run = async {
        let ((), out, err) = tokio::try_join!(feed, read_stdout, read_stderr)?;
        let status = child.wait().await?;
        Ok::<_, RunError>((status, out, err))
    };

    let finished = timeout(limit, run).await;
    let (status, out, err) = match finished {
        Ok(Ok(finished)) => finished,
        Ok(Err(err)) => {
            child.kill().await.ok();
            return Err(err);
        }
        Err(_) => {
            child.kill().await.ok();
            return Err(RunError::Timeout(limit));
        }
    };

    Ok(CommandOutput {
        exit_code: status.code(),
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
    })
}
