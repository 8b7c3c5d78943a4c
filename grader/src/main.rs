//! Command-line grader.
//!
//! ```text
//! grader [EXAM_DEFINITION] [SUBMISSION] [MANUAL_OUTCOMES]
//! ```
//!
//! The optional manual outcomes file maps question numbers to outcomes, e.g.
//! `{"10": "correct", "14": "partial"}`. The report is printed to stdout as JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use code_runner::fixtures::{Fixtures, RunnerFactory};
use marker::ExamMarker;
use marker::types::{Outcome, QuestionNumber};
use tracing::info;
use tracing_appender::rolling;
use util::config::AppConfig;
use util::exam_definition::load_definition;
use util::submission::decode_submission;

#[derive(Parser, Debug)]
#[command(version, about = "Grades one exam submission and prints the mark report as JSON")]
struct Args {
    /// Exam definition JSON file
    #[arg(env = "EXAM_DEFINITION")]
    definition: PathBuf,
    /// Submission JSON file (answer array or service payload)
    #[arg(env = "SUBMISSION_PATH")]
    submission: PathBuf,
    /// Outcomes for manually graded questions
    manual_outcomes: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Loads `.env` before the arguments read their environment fallbacks.
    let config = AppConfig::global().clone();
    let args = Args::parse();
    let _log_guard = init_logging(&config.log_file, &config.log_level, config.log_to_stdout);

    let manual = match &args.manual_outcomes {
        Some(path) => load_manual_outcomes(path)?,
        None => BTreeMap::new(),
    };

    let mut definition = load_definition(&args.definition).map_err(|e| anyhow!(e))?;
    if let Some(timeout_ms) = config.evaluation_timeout_ms {
        definition.limits = definition.limits.with_timeout_ms(timeout_ms);
    }

    let base_dir = args.definition.parent().unwrap_or_else(|| Path::new("."));
    let fixtures = Fixtures::open(&definition.fixture_paths(base_dir))
        .await
        .context("failed to open fixtures")?;
    let factory = RunnerFactory::new(fixtures);

    let marker = ExamMarker::from_definition(&definition, &factory)
        .await
        .with_context(|| format!("failed to build exam '{}'", definition.name))?;

    let raw = fs::read_to_string(&args.submission)
        .with_context(|| format!("failed to read submission {}", args.submission.display()))?;
    let submission = decode_submission(&raw).map_err(|e| anyhow!(e))?;

    info!(
        exam = %definition.name,
        submission = %args.submission.display(),
        env = %config.env,
        "marking submission"
    );
    let response = marker.mark(&submission, &manual).await?;

    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn load_manual_outcomes(path: &Path) -> Result<BTreeMap<QuestionNumber, Outcome>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read manual outcomes {}", path.display()))?;
    serde_json::from_str(&raw).context("invalid manual outcomes JSON")
}

fn init_logging(
    log_file: &str,
    log_level: &str,
    log_to_stdout: bool,
) -> tracing_appender::non_blocking::WorkerGuard {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    fs::create_dir_all("logs").ok();

    let file_appender = rolling::daily("logs", log_file);
    let (file_writer, guard) = tracing_appender::non_blocking(file_appender);

    let file_layer = fmt::layer()
        .with_writer(file_writer)
        .with_ansi(false)
        .with_target(true)
        .with_thread_ids(true);

    // stdout carries the report, so console logs go to stderr.
    let console_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_ansi(true)
        .with_target(true);

    let env_filter =
        EnvFilter::try_new(log_level).unwrap_or_else(|_| EnvFilter::new("grader=info"));

    let registry = tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer);

    if log_to_stdout {
        registry.with(console_layer).init();
    } else {
        registry.init();
    }

    guard
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_args_accept_positional_paths() {
        let args = Args::try_parse_from(["grader", "exam.json", "answers.json", "manual.json"])
            .unwrap();
        assert_eq!(args.definition, PathBuf::from("exam.json"));
        assert_eq!(args.submission, PathBuf::from("answers.json"));
        assert_eq!(args.manual_outcomes, Some(PathBuf::from("manual.json")));
    }

    #[test]
    fn test_load_manual_outcomes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"10": "correct", "14": "not_submitted"}}"#).unwrap();
        let manual = load_manual_outcomes(file.path()).unwrap();
        assert_eq!(manual.get(&10), Some(&Outcome::Correct));
        assert_eq!(manual.get(&14), Some(&Outcome::NotSubmitted));
    }

    #[test]
    fn test_load_manual_outcomes_rejects_unknown_outcome() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"10": "excellent"}}"#).unwrap();
        assert!(load_manual_outcomes(file.path()).is_err());
    }
}
