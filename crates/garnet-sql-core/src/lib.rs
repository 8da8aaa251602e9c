//! # garnet-sql-core
//!
//! A dynamic SQL builder that assembles parameterized statements from
//! composable clauses while whitelisting the fragments that cannot be
//! parameter-bound.
//!
//! This crate provides:
//! - Identifier and operator whitelists for table names, column
//!   expressions, and comparison operators
//! - A placeholder allocator guaranteeing every bound value its own
//!   unambiguous named placeholder, even when a field is referenced many
//!   times across clauses
//! - A fluent [`QueryBuilder`] accumulating SELECT / WHERE / JOIN /
//!   ORDER BY / LIMIT / OFFSET state and assembling SELECT, COUNT,
//!   INSERT, UPDATE, and DELETE statements in a fixed clause order
//!
//! Execution lives in the `garnet-db` crate; everything here is pure and
//! dependency-free.
//!
//! ## Building a statement
//!
//! ```rust
//! use garnet_sql_core::builder::QueryBuilder;
//!
//! let (sql, params) = QueryBuilder::table("users")?
//!     .filter("age", ">", 18)
//!     .filter("age", "<", 65)
//!     .build_select();
//!
//! // The same field gets two distinct placeholders.
//! assert_eq!(sql, "SELECT * FROM users WHERE age > :age AND age < :age1");
//! assert_eq!(params[0].0, ":age");
//! assert_eq!(params[1].0, ":age1");
//! # Ok::<(), garnet_sql_core::QueryError>(())
//! ```
//!
//! ## Injection defense
//!
//! Values are always parameter-bound; identifiers and operators are
//! filtered through whitelists, and a clause that fails the filter is
//! dropped (and recorded) rather than concatenated:
//!
//! ```rust
//! use garnet_sql_core::builder::QueryBuilder;
//!
//! let builder = QueryBuilder::table("users")?
//!     .filter("name", "= '' OR 1=1 --", "x");
//!
//! let (sql, _) = builder.build_select();
//! assert_eq!(sql, "SELECT * FROM users");
//! assert_eq!(builder.rejected().len(), 1);
//! # Ok::<(), garnet_sql_core::QueryError>(())
//! ```

pub mod builder;
pub mod error;
pub mod guard;
pub mod params;
pub mod value;

pub use builder::{BindList, Connective, OrderDirection, QueryBuilder, Rejected};
pub use error::QueryError;
pub use params::Params;
pub use value::{SqlValue, ToSqlValue};
