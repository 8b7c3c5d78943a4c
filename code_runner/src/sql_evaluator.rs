//! SQL query equivalence.
//!
//! A submitted query is equivalent to the reference query when both produce the same result
//! under the comparison declared for the question:
//!
//! - `row_set`: the same multiset of rows. Row order and column names are ignored, values are
//!   compared by position, so both results need the same number of columns. INTEGER and REAL
//!   values compare numerically (`1 = 1.0`); TEXT never equals a number; NULL equals NULL.
//! - `row_count`: the same number of rows.
//!
//! Submitted queries run under a SQLite progress handler that interrupts the statement once
//! the time limit has passed. Dropping the future alone would leave the statement running on
//! the connection's worker thread.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool, TypeInfo, ValueRef};
use tracing::debug;

use marker::traits::evaluator::{EvaluationError, UntrustedEvaluator, Verification};
use util::exam_definition::SqlComparison;
use util::execution_config::EvaluationLimits;

use crate::error::RunError;

/// One result value, normalized for comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Blob(Vec<u8>),
}

impl SqlValue {
    /// Integral REAL values fold into INTEGER so that `1` and `1.0` share one key.
    fn canonical(self) -> SqlValue {
        match self {
            SqlValue::Real(r) if r.fract() == 0.0 && r >= i64::MIN as f64 && r < i64::MAX as f64 => {
                SqlValue::Integer(r as i64)
            }
            other => other,
        }
    }

    fn rank(&self) -> u8 {
        match self {
            SqlValue::Null => 0,
            SqlValue::Integer(_) | SqlValue::Real(_) => 1,
            SqlValue::Text(_) => 2,
            SqlValue::Blob(_) => 3,
        }
    }

    fn total_cmp(&self, other: &SqlValue) -> Ordering {
        match (self, other) {
            (SqlValue::Integer(a), SqlValue::Integer(b)) => a.cmp(b),
            (SqlValue::Real(a), SqlValue::Real(b)) => a.total_cmp(b),
            (SqlValue::Integer(a), SqlValue::Real(b)) => (*a as f64).total_cmp(b),
            (SqlValue::Real(a), SqlValue::Integer(b)) => a.total_cmp(&(*b as f64)),
            (SqlValue::Text(a), SqlValue::Text(b)) => a.cmp(b),
            (SqlValue::Blob(a), SqlValue::Blob(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

pub type SqlRow = Vec<SqlValue>;

fn decode_row(row: &SqliteRow) -> Result<SqlRow, sqlx::Error> {
    (0..row.len())
        .map(|index| {
            let raw = row.try_get_raw(index)?;
            if raw.is_null() {
                return Ok(SqlValue::Null);
            }
            let type_name = raw.type_info().name().to_ascii_uppercase();
            let value = match type_name.as_str() {
                "REAL" | "FLOAT" | "DOUBLE" | "NUMERIC" => {
                    SqlValue::Real(row.try_get_unchecked::<f64, _>(index)?)
                }
                "TEXT" | "DATE" | "TIME" | "DATETIME" => {
                    SqlValue::Text(row.try_get_unchecked::<String, _>(index)?)
                }
                "BLOB" => SqlValue::Blob(row.try_get_unchecked::<Vec<u8>, _>(index)?),
                _ => SqlValue::Integer(row.try_get_unchecked::<i64, _>(index)?),
            };
            Ok(value.canonical())
        })
        .collect()
}

/// SQLite VM instructions between two deadline checks.
const PROGRESS_STEPS: i32 = 1_000;

/// Runs `query` and decodes every row.
pub async fn fetch_rows(pool: &SqlitePool, query: &str) -> Result<Vec<SqlRow>, RunError> {
    fetch_rows_on(pool, query, None).await
}

/// Runs `query`, interrupting it inside SQLite once `limit` has elapsed.
pub async fn fetch_rows_within(
    pool: &SqlitePool,
    query: &str,
    limit: Duration,
) -> Result<Vec<SqlRow>, RunError> {
    fetch_rows_on(pool, query, Some(limit)).await
}

async fn fetch_rows_on(
    pool: &SqlitePool,
    query: &str,
    limit: Option<Duration>,
) -> Result<Vec<SqlRow>, RunError> {
    let mut conn = pool.acquire().await?;
    {
        // Replaces any handler left behind by an abandoned query on this connection.
        let mut handle = conn.lock_handle().await?;
        match limit {
            Some(limit) => {
                let deadline = Instant::now().checked_add(limit);
                handle.set_progress_handler(PROGRESS_STEPS, move || {
                    deadline.is_none_or(|deadline| Instant::now() < deadline)
                });
            }
            None => handle.remove_progress_handler(),
        }
    }
    let rows = sqlx::query(query).fetch_all(&mut *conn).await?;
    Ok(rows.iter().map(decode_row).collect::<Result<Vec<_>, _>>()?)
}

/// Sorts rows into the canonical order used for row-set comparison.
pub fn sort_rows(mut rows: Vec<SqlRow>) -> Vec<SqlRow> {
    rows.sort_by(|a, b| {
        a.iter()
            .zip(b.iter())
            .map(|(x, y)| x.total_cmp(y))
            .find(|o| o.is_ne())
            .unwrap_or_else(|| a.len().cmp(&b.len()))
    });
    rows
}

fn rows_equal(left: &[SqlRow], right: &[SqlRow]) -> bool {
    left.len() == right.len()
        && left.iter().zip(right).all(|(a, b)| {
            a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.total_cmp(y).is_eq())
        })
}

/// Whether `candidate` is equivalent to `expected` under `comparison`.
///
/// `expected` must be in [`sort_rows`] order. Returns a reason when the results differ.
pub fn compare_results(
    candidate: Vec<SqlRow>,
    expected: &[SqlRow],
    comparison: SqlComparison,
) -> Result<(), String> {
    match comparison {
        SqlComparison::RowCount => {
            if candidate.len() == expected.len() {
                Ok(())
            } else {
                Err(format!("expected {} rows, got {}", expected.len(), candidate.len()))
            }
        }
        SqlComparison::RowSet => {
            let expected_width = expected.first().map(Vec::len);
            let candidate_width = candidate.first().map(Vec::len);
            if let (Some(want), Some(got)) = (expected_width, candidate_width) {
                if want != got {
                    return Err(format!("expected {want} columns, got {got}"));
                }
            }
            if candidate.len() != expected.len() {
                return Err(format!("expected {} rows, got {}", expected.len(), candidate.len()));
            }
            if rows_equal(&sort_rows(candidate), expected) {
                Ok(())
            } else {
                Err("row values differ".to_string())
            }
        }
    }
}

/// Runs both queries on `pool` and compares their results.
pub async fn check_sql(
    candidate: &str,
    reference: &str,
    pool: &SqlitePool,
    comparison: SqlComparison,
) -> Result<bool, RunError> {
    let expected = sort_rows(fetch_rows(pool, reference).await?);
    let actual = fetch_rows(pool, candidate).await?;
    Ok(compare_results(actual, &expected, comparison).is_ok())
}

/// Evaluator for one SQL question. The reference result is computed once, when the
/// evaluator is prepared.
pub struct SqlEquivalence {
    pool: SqlitePool,
    expected: Vec<SqlRow>,
    comparison: SqlComparison,
    time_limit: Duration,
}

impl SqlEquivalence {
    /// Fails when the reference query cannot be executed.
    pub async fn prepare(
        pool: SqlitePool,
        reference: &str,
        comparison: SqlComparison,
    ) -> Result<Self, RunError> {
        let expected = sort_rows(fetch_rows(&pool, reference).await?);
        debug!(rows = expected.len(), ?comparison, "reference result cached");
        Ok(Self {
            pool,
            expected,
            comparison,
            time_limit: EvaluationLimits::default().timeout(),
        })
    }

    /// Budget for one submitted query.
    pub fn with_time_limit(mut self, limit: Duration) -> Self {
        self.time_limit = limit;
        self
    }

    pub fn expected(&self) -> &[SqlRow] {
        &self.expected
    }
}

#[async_trait]
impl UntrustedEvaluator for SqlEquivalence {
    async fn evaluate(&self, submitted: &str) -> Result<Verification, EvaluationError> {
        let rows = fetch_rows_within(&self.pool, submitted, self.time_limit)
            .await
            .map_err(|err| EvaluationError::execution(err.to_string()))?;

        Ok(match compare_results(rows, &self.expected, self.comparison) {
            Ok(()) => Verification::new(1, 1),
            Err(reason) => Verification::new(0, 1).with_details(vec![reason]),
        })
    }

    fn describe(&self) -> String {
        format!("sql {:?}", self.comparison)
    }
}
