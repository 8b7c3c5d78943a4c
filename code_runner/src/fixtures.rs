//! Reference datasets and the evaluator factory built on top of them.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::info;

use marker::error::MarkerError;
use marker::traits::evaluator::{EvaluatorFactory, UntrustedEvaluator};
use util::exam_definition::CheckSpec;
use util::execution_config::EvaluationLimits;

use crate::command_evaluator::CommandEvaluator;
use crate::error::RunError;
use crate::sql_evaluator::SqlEquivalence;

/// Named SQLite databases. Files are opened read-only, so submitted queries cannot modify them.
#[derive(Debug, Clone, Default)]
pub struct Fixtures {
    pools: BTreeMap<String, SqlitePool>,
}

impl Fixtures {
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens every fixture. A missing file is an error.
    pub async fn open(paths: &BTreeMap<String, PathBuf>) -> Result<Self, RunError> {
        let mut fixtures = Self::new();
        for (name, path) in paths {
            if !path.is_file() {
                return Err(RunError::MissingFixture(path.clone()));
            }
            let options = SqliteConnectOptions::new()
                .filename(path)
                .read_only(true)
                .create_if_missing(false);
            let pool = SqlitePoolOptions::new()
                .max_connections(4)
                .connect_with(options)
                .await?;
            info!(fixture = %name, path = %path.display(), "fixture opened");
            fixtures.insert(name.clone(), pool);
        }
        Ok(fixtures)
    }

    pub fn insert(&mut self, name: impl Into<String>, pool: SqlitePool) {
        self.pools.insert(name.into(), pool);
    }

    pub fn get(&self, name: &str) -> Option<&SqlitePool> {
        self.pools.get(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.pools.keys().map(String::as_str)
    }
}

/// Builds command and SQL evaluators for the marker.
#[derive(Debug, Clone, Default)]
pub struct RunnerFactory {
    fixtures: Fixtures,
}

impl RunnerFactory {
    pub fn new(fixtures: Fixtures) -> Self {
        Self { fixtures }
    }
}

#[async_trait]
impl EvaluatorFactory for RunnerFactory {
    async fn build(
        &self,
        question: u32,
        spec: &CheckSpec,
        limits: &EvaluationLimits,
    ) -> Result<Arc<dyn UntrustedEvaluator>, MarkerError> {
        match spec {
            CheckSpec::Sql(sql) => {
                let pool = self
                    .fixtures
                    .get(&sql.fixture)
                    .ok_or_else(|| MarkerError::MissingFixture(sql.fixture.clone()))?;
                let evaluator = SqlEquivalence::prepare(pool.clone(), &sql.reference, sql.comparison)
                    .await
                    .map_err(|err| MarkerError::EvaluatorSetup {
                        question,
                        message: format!("reference query failed: {err}"),
                    })?
                    .with_time_limit(limits.timeout());
                Ok(Arc::new(evaluator))
            }
            CheckSpec::Command(command) => {
                if command.cases.is_empty() {
                    return Err(MarkerError::EvaluatorSetup {
                        question,
                        message: "command check has no cases".to_string(),
                    });
                }
                Ok(Arc::new(CommandEvaluator::new(command.clone(), limits.clone())))
            }
            _ => Err(MarkerError::InvalidDefinition(format!(
                "question {question} is not an executable check"
            ))),
        }
    }
}
