//! Connection wrapper, raw-query escape hatch, and transactions.

use std::future::Future;

use garnet_sql_core::builder::QueryBuilder;
use garnet_sql_core::SqlValue;
use sqlx::sqlite::{SqlitePoolOptions, SqliteRow};
use sqlx::SqlitePool;

use crate::error::Result;
use crate::execute::bind_value;

/// A long-lived handle to one SQLite database.
///
/// The pool is capped at a single connection so every statement — and in
/// particular every statement issued inside [`transaction`] — runs on the
/// same underlying connection, the way one shared handle would. The
/// `Database` outlives any builder; builders never own or close it.
///
/// [`transaction`]: Self::transaction
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Connects to the database at `url` (e.g. `sqlite::memory:` or
    /// `sqlite://app.db`).
    ///
    /// # Errors
    ///
    /// Any connection failure from the driver.
    pub async fn connect(url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(url)
            .await?;
        Ok(Self { pool })
    }

    /// Wraps an existing pool.
    ///
    /// Transactions require the pool to hold a single connection; see
    /// [`transaction`](Self::transaction).
    #[must_use]
    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// The underlying pool.
    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Starts a builder for `table`. Fluent entry point for the terminal
    /// operations in [`Execute`](crate::Execute).
    ///
    /// # Errors
    ///
    /// [`QueryError::InvalidTable`](garnet_sql_core::QueryError::InvalidTable)
    /// if the name fails the identifier whitelist.
    pub fn table(&self, table: &str) -> Result<QueryBuilder> {
        Ok(QueryBuilder::table(table)?)
    }

    /// Runs a raw statement and fetches all rows, bypassing the
    /// assembler. `params` bind positionally to `?` placeholders; with no
    /// params the statement runs as-is, which covers DDL.
    ///
    /// # Errors
    ///
    /// Any execution failure from the driver.
    pub async fn query(&self, sql: &str, params: &[SqlValue]) -> Result<Vec<SqliteRow>> {
        tracing::debug!(sql, params = params.len(), "raw query");
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_value(query, value.clone());
        }
        Ok(query.fetch_all(&self.pool).await?)
    }

    /// Runs a raw statement and returns the affected-row count.
    ///
    /// # Errors
    ///
    /// Any execution failure from the driver.
    pub async fn execute(&self, sql: &str, params: &[SqlValue]) -> Result<u64> {
        tracing::debug!(sql, params = params.len(), "raw execute");
        let mut query = sqlx::query(sql);
        for value in params {
            query = bind_value(query, value.clone());
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    /// Runs `work` inside a transaction: commits when it resolves to
    /// `Ok`, rolls back when it resolves to `Err` and returns that error
    /// unchanged. A rollback failure is logged, never substituted for
    /// the original error.
    ///
    /// ```ignore
    /// let db = Database::connect("sqlite://app.db").await?;
    /// db.transaction(async {
    ///     db.table("accounts")?
    ///         .filter_eq("id", 1)
    ///         .update(&db, &[("balance", 0_i64.to_sql_value())])
    ///         .await?;
    ///     Ok(())
    /// })
    /// .await?;
    /// ```
    ///
    /// Preconditions: the pool holds a single connection (as created by
    /// [`connect`](Self::connect)), and transactions do not nest —
    /// starting a second one before the first resolves is undefined
    /// behavior, not defended against.
    ///
    /// # Errors
    ///
    /// `work`'s error verbatim, or a driver error from BEGIN/COMMIT.
    pub async fn transaction<T>(&self, work: impl Future<Output = Result<T>>) -> Result<T> {
        sqlx::query("BEGIN").execute(&self.pool).await?;
        match work.await {
            Ok(value) => {
                sqlx::query("COMMIT").execute(&self.pool).await?;
                Ok(value)
            }
            Err(error) => {
                if let Err(rollback_error) = sqlx::query("ROLLBACK").execute(&self.pool).await {
                    tracing::error!(error = %rollback_error, "rollback failed");
                }
                Err(error)
            }
        }
    }
}
