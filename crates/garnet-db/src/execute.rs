//! Terminal operations: assembly, binding, and execution.
//!
//! The builder assembles SQL with named placeholders and a bind list in
//! placeholder occurrence order. The driver binds positionally, so just
//! before execution each named placeholder is rewritten to `?`; because
//! the bind list shares the occurrence order, a plain in-order bind loop
//! is then correct.

use garnet_sql_core::builder::{BindList, QueryBuilder};
use garnet_sql_core::SqlValue;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::{FromRow, Row};

use crate::database::Database;
use crate::error::Result;

/// Async terminal operations for [`QueryBuilder`].
///
/// This is the explicit seam a record-mapping layer builds on: row
/// hydration goes through `sqlx::FromRow` type parameters, and the method
/// set is checked at compile time.
#[allow(async_fn_in_trait)]
pub trait Execute {
    /// Assembles the SELECT statement, executes it, and returns all rows
    /// hydrated into `M`.
    async fn get<M>(&self, db: &Database) -> Result<Vec<M>>
    where
        M: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;

    /// [`get`](Self::get) with `LIMIT 1` forced; `None` when no row
    /// matches.
    async fn first<M>(&self, db: &Database) -> Result<Option<M>>
    where
        M: for<'r> FromRow<'r, SqliteRow> + Send + Unpin;

    /// Executes the COUNT statement and returns the single integer.
    async fn count(&self, db: &Database) -> Result<i64>;

    /// Inserts the given rows and returns the last insert id, or `None`
    /// when nothing was written.
    async fn insert(&self, db: &Database, rows: &[&[(&str, SqlValue)]]) -> Result<Option<i64>>;

    /// Applies the given assignments, bounded by any accumulated WHERE
    /// and LIMIT clauses, and returns the affected-row count.
    async fn update(&self, db: &Database, values: &[(&str, SqlValue)]) -> Result<u64>;

    /// Deletes matching rows and returns the affected-row count.
    async fn delete(&self, db: &Database) -> Result<u64>;
}

impl Execute for QueryBuilder {
    async fn get<M>(&self, db: &Database) -> Result<Vec<M>>
    where
        M: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let (sql, bind) = self.build_select();
        let sql = prepare_sql(self, &sql, &bind);
        let mut query = sqlx::query_as::<_, M>(&sql);
        for (_, value) in bind {
            query = bind_value_as(query, value);
        }
        Ok(query.fetch_all(db.pool()).await?)
    }

    async fn first<M>(&self, db: &Database) -> Result<Option<M>>
    where
        M: for<'r> FromRow<'r, SqliteRow> + Send + Unpin,
    {
        let limited = self.clone().limit(1);
        let (sql, bind) = limited.build_select();
        let sql = prepare_sql(&limited, &sql, &bind);
        let mut query = sqlx::query_as::<_, M>(&sql);
        for (_, value) in bind {
            query = bind_value_as(query, value);
        }
        Ok(query.fetch_optional(db.pool()).await?)
    }

    async fn count(&self, db: &Database) -> Result<i64> {
        let (sql, bind) = self.build_count();
        let sql = prepare_sql(self, &sql, &bind);
        let mut query = sqlx::query(&sql);
        for (_, value) in bind {
            query = bind_value(query, value);
        }
        let row = query.fetch_one(db.pool()).await?;
        Ok(row.get(0))
    }

    async fn insert(&self, db: &Database, rows: &[&[(&str, SqlValue)]]) -> Result<Option<i64>> {
        let (sql, bind) = self.build_insert(rows)?;
        let sql = prepare_sql(self, &sql, &bind);
        let mut query = sqlx::query(&sql);
        for (_, value) in bind {
            query = bind_value(query, value);
        }
        let result = query.execute(db.pool()).await?;
        if result.rows_affected() > 0 {
            Ok(Some(result.last_insert_rowid()))
        } else {
            Ok(None)
        }
    }

    async fn update(&self, db: &Database, values: &[(&str, SqlValue)]) -> Result<u64> {
        let (sql, bind) = self.build_update(values)?;
        let sql = prepare_sql(self, &sql, &bind);
        let mut query = sqlx::query(&sql);
        for (_, value) in bind {
            query = bind_value(query, value);
        }
        let result = query.execute(db.pool()).await?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, db: &Database) -> Result<u64> {
        let (sql, bind) = self.build_delete();
        let sql = prepare_sql(self, &sql, &bind);
        let mut query = sqlx::query(&sql);
        for (_, value) in bind {
            query = bind_value(query, value);
        }
        let result = query.execute(db.pool()).await?;
        Ok(result.rows_affected())
    }
}

/// Logs the statement, surfaces any clauses validation dropped, and
/// rewrites named placeholders for the positional driver.
fn prepare_sql(builder: &QueryBuilder, sql: &str, bind: &BindList) -> String {
    if !builder.rejected().is_empty() {
        let dropped = builder
            .rejected()
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        tracing::warn!(
            table = builder.table_name(),
            %dropped,
            "executing a query with clauses dropped by validation"
        );
    }
    tracing::debug!(sql, params = bind.len(), "executing statement");
    to_positional(sql)
}

/// Rewrites every `:name` placeholder to `?`.
///
/// The assembler never emits string literals (values are bound), so every
/// `:` followed by an identifier character is a placeholder.
fn to_positional(sql: &str) -> String {
    let mut out = String::with_capacity(sql.len());
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if c == ':'
            && chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphanumeric() || *next == '_')
        {
            while chars
                .peek()
                .is_some_and(|next| next.is_ascii_alphanumeric() || *next == '_')
            {
                chars.next();
            }
            out.push('?');
        } else {
            out.push(c);
        }
    }
    out
}

/// Binds one value with its inferred native type.
pub(crate) fn bind_value<'q>(
    query: sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>>,
    value: SqlValue,
) -> sqlx::query::Query<'q, sqlx::Sqlite, SqliteArguments<'q>> {
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Text(s) => query.bind(s),
    }
}

/// [`bind_value`] for typed `query_as` queries.
fn bind_value_as<'q, M>(
    query: sqlx::query::QueryAs<'q, sqlx::Sqlite, M, SqliteArguments<'q>>,
    value: SqlValue,
) -> sqlx::query::QueryAs<'q, sqlx::Sqlite, M, SqliteArguments<'q>>
where
    M: for<'r> FromRow<'r, SqliteRow>,
{
    match value {
        SqlValue::Null => query.bind(Option::<i64>::None),
        SqlValue::Bool(b) => query.bind(b),
        SqlValue::Int(i) => query.bind(i),
        SqlValue::Text(s) => query.bind(s),
    }
}
