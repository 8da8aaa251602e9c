//! # garnet-db
//!
//! Execution and transaction layer for `garnet-sql-core` over SQLite.
//!
//! This crate provides:
//! - [`Database`], a single-connection handle with a raw-query escape
//!   hatch and a commit/rollback transaction wrapper
//! - [`Execute`], the async terminal operations (`get`, `first`,
//!   `count`, `insert`, `update`, `delete`) for the builder
//!
//! ## Quick start
//!
//! ```ignore
//! use garnet_db::{Database, Execute};
//! use garnet_db::ToSqlValue;
//!
//! #[derive(sqlx::FromRow)]
//! struct User {
//!     id: i64,
//!     name: String,
//!     age: i64,
//! }
//!
//! async fn example() -> garnet_db::Result<()> {
//!     let db = Database::connect("sqlite://app.db").await?;
//!
//!     let adults: Vec<User> = db
//!         .table("users")?
//!         .select(&["id", "name", "age"])
//!         .filter("age", ">", 17)
//!         .order_by(&["name"], "asc")
//!         .limit(20)
//!         .get(&db)
//!         .await?;
//!
//!     let id = db
//!         .table("users")?
//!         .insert(&db, &[&[
//!             ("name", "alice".to_sql_value()),
//!             ("age", 30.to_sql_value()),
//!         ]])
//!         .await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Transactions
//!
//! ```ignore
//! db.transaction(async {
//!     db.table("accounts")?
//!         .filter_eq("id", from)
//!         .update(&db, &[("balance", (balance - amount).to_sql_value())])
//!         .await?;
//!     db.table("transfers")?
//!         .insert(&db, &[&[("amount", amount.to_sql_value())]])
//!         .await?;
//!     Ok(())
//! })
//! .await?;
//! ```
//!
//! Any `Err` from the block rolls the transaction back and is returned
//! unchanged.

mod database;
mod error;
mod execute;

pub use database::Database;
pub use error::{DbError, Result};
pub use execute::Execute;

// Re-export commonly used types from garnet-sql-core
pub use garnet_sql_core::builder::{QueryBuilder, Rejected};
pub use garnet_sql_core::{QueryError, SqlValue, ToSqlValue};
