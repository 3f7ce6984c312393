//! Storage gateway: connection lifecycle and statement execution, no business logic.
//!
//! Every [`StorageGateway::execute`] call opens its own SQLite connection and closes it before
//! returning, whatever the outcome.

use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteRow};
use sqlx::{Connection, SqliteConnection};
use tracing::{debug, error, instrument, warn};

use crate::error::StorageError;

const DEFAULT_QUERY_TIMEOUT: Duration = Duration::from_secs(30);
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Externally supplied database settings.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// SQLite file path or `sqlite:` URL. Required.
    pub database_url: Option<String>,
    /// Upper bound for connecting plus running one statement.
    pub query_timeout: Duration,
}

impl DatabaseConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: Some(database_url.into()),
            query_timeout: DEFAULT_QUERY_TIMEOUT,
        }
    }

    pub fn with_query_timeout(mut self, query_timeout: Duration) -> Self {
        self.query_timeout = query_timeout;
        self
    }
}

/// Positional statement parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlParam {
    Int(i64),
    Text(Option<String>),
    Timestamp(DateTime<Utc>),
}

/// Result of [`StorageGateway::execute`]: fetched rows, or the affected row count.
pub enum QueryOutcome {
    Rows(Vec<SqliteRow>),
    Affected(u64),
}

impl QueryOutcome {
    pub fn into_rows(self) -> Vec<SqliteRow> {
        match self {
            QueryOutcome::Rows(rows) => rows,
            QueryOutcome::Affected(_) => Vec::new(),
        }
    }

    pub fn affected(&self) -> u64 {
        match self {
            QueryOutcome::Rows(rows) => rows.len() as u64,
            QueryOutcome::Affected(n) => *n,
        }
    }
}

/// Opens a fresh connection per call; see [`StorageGateway::execute`].
#[derive(Clone)]
pub struct StorageGateway {
    options: SqliteConnectOptions,
    query_timeout: Duration,
}

impl StorageGateway {
    /// Validates the settings. Fails with [`StorageError::Configuration`] if the database location is missing.
    pub fn new(config: &DatabaseConfig) -> Result<Self, StorageError> {
        let url = config
            .database_url
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| {
                StorageError::Configuration("database location (DATABASE_URL) is not set".to_string())
            })?;

        let options = if url.starts_with("sqlite:") {
            SqliteConnectOptions::from_str(url)
                .map_err(|e| StorageError::Configuration(format!("invalid database url {url}: {e}")))?
        } else {
            SqliteConnectOptions::new().filename(url)
        };
        let options = options
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(BUSY_TIMEOUT);

        Ok(Self {
            options,
            query_timeout: config.query_timeout,
        })
    }

    async fn connect(&self) -> Result<SqliteConnection, StorageError> {
        match tokio::time::timeout(self.query_timeout, SqliteConnection::connect_with(&self.options)).await {
            Ok(Ok(conn)) => Ok(conn),
            Ok(Err(e)) => {
                error!(error = %e, "Error creating connection to database");
                Err(StorageError::Connection(e.to_string()))
            }
            Err(_) => {
                error!(timeout = ?self.query_timeout, "Timed out connecting to database");
                Err(StorageError::Connection(format!(
                    "connect timed out after {:?}",
                    self.query_timeout
                )))
            }
        }
    }

    /// Runs one statement on a fresh connection. Rows are returned when `expect_rows`, otherwise the affected count.
    ///
    /// Connection failures are logged and returned as [`StorageError::Connection`]; statement failures
    /// as [`StorageError::Query`]. The connection is closed on every path.
    #[instrument(skip(self, params), fields(param_count = params.len()))]
    pub async fn execute(
        &self,
        statement: &str,
        params: &[SqlParam],
        expect_rows: bool,
    ) -> Result<QueryOutcome, StorageError> {
        let mut conn = self.connect().await?;

        let result = tokio::time::timeout(
            self.query_timeout,
            run_statement(&mut conn, statement, params, expect_rows),
        )
        .await;

        if let Err(e) = conn.close().await {
            warn!(error = %e, "Error closing database connection");
        }

        match result {
            Ok(Ok(outcome)) => {
                debug!(affected = outcome.affected(), "Statement executed");
                Ok(outcome)
            }
            Ok(Err(e)) => {
                error!(statement = %statement.trim(), error = %e, "Error executing query");
                Err(StorageError::Query(e.to_string()))
            }
            Err(_) => {
                error!(statement = %statement.trim(), timeout = ?self.query_timeout, "Query timed out");
                Err(StorageError::Timeout(self.query_timeout))
            }
        }
    }
}

async fn run_statement(
    conn: &mut SqliteConnection,
    statement: &str,
    params: &[SqlParam],
    expect_rows: bool,
) -> Result<QueryOutcome, sqlx::Error> {
    let mut query = sqlx::query(statement);
    for param in params {
        query = match param {
            SqlParam::Int(v) => query.bind(*v),
            SqlParam::Text(v) => query.bind(v.clone()),
            SqlParam::Timestamp(v) => query.bind(*v),
        };
    }

    if expect_rows {
        Ok(QueryOutcome::Rows(query.fetch_all(&mut *conn).await?))
    } else {
        Ok(QueryOutcome::Affected(query.execute(&mut *conn).await?.rows_affected()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::Row;

    fn temp_config(dir: &tempfile::TempDir) -> DatabaseConfig {
        DatabaseConfig::new(dir.path().join("gateway.db").to_string_lossy().to_string())
    }

    #[test]
    fn test_missing_database_url_is_configuration_error() {
        let config = DatabaseConfig {
            database_url: None,
            query_timeout: Duration::from_secs(1),
        };
        assert!(matches!(
            StorageGateway::new(&config),
            Err(StorageError::Configuration(_))
        ));

        let blank = DatabaseConfig::new("   ");
        assert!(matches!(
            StorageGateway::new(&blank),
            Err(StorageError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_execute_returns_rows_or_affected_count() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = StorageGateway::new(&temp_config(&dir)).unwrap();

        gateway
            .execute("CREATE TABLE t (id INTEGER, name TEXT)", &[], false)
            .await
            .unwrap();
        let inserted = gateway
            .execute(
                "INSERT INTO t (id, name) VALUES (?, ?)",
                &[SqlParam::Int(1), SqlParam::Text(Some("a".to_string()))],
                false,
            )
            .await
            .unwrap();
        assert_eq!(inserted.affected(), 1);

        // Written by a previous connection; visible to a new one.
        let rows = gateway
            .execute("SELECT id, name FROM t WHERE id = ?", &[SqlParam::Int(1)], true)
            .await
            .unwrap()
            .into_rows();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get::<String, _>("name"), "a");
    }

    #[tokio::test]
    async fn test_bad_statement_is_query_error() {
        let dir = tempfile::tempdir().unwrap();
        let gateway = StorageGateway::new(&temp_config(&dir)).unwrap();

        let result = gateway.execute("SELECT * FROM missing_table", &[], true).await;

        assert!(matches!(result, Err(StorageError::Query(_))));
    }

    #[tokio::test]
    async fn test_unreachable_database_is_connection_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("no_such_dir").join("db.sqlite");
        let gateway = StorageGateway::new(&DatabaseConfig::new(path.to_string_lossy().to_string())).unwrap();

        let result = gateway.execute("SELECT 1", &[], true).await;

        assert!(matches!(result, Err(StorageError::Connection(_))));
    }
}
