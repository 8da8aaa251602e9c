//! Query construction errors.

/// An error raised while constructing or assembling a statement.
///
/// Rejected accumulator clauses are deliberately not errors (they no-op
/// and are reported through [`QueryBuilder::rejected`]); this type covers
/// the cases where no meaningful statement can be produced at all.
///
/// [`QueryBuilder::rejected`]: crate::builder::QueryBuilder::rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// The table name failed the identifier whitelist.
    InvalidTable(String),
    /// An INSERT or UPDATE column name failed the identifier whitelist.
    InvalidColumn(String),
    /// INSERT was given no rows.
    EmptyInsert,
    /// UPDATE was given no assignments.
    EmptyUpdate,
    /// An INSERT row's field set differs from the first row's.
    MismatchedRow(usize),
}

impl core::fmt::Display for QueryError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::InvalidTable(name) => write!(f, "invalid table name: {name:?}"),
            Self::InvalidColumn(name) => write!(f, "invalid column name: {name:?}"),
            Self::EmptyInsert => write!(f, "insert requires at least one row"),
            Self::EmptyUpdate => write!(f, "update requires at least one assignment"),
            Self::MismatchedRow(index) => {
                write!(f, "insert row {index} does not match the first row's fields")
            }
        }
    }
}

impl std::error::Error for QueryError {}
