//! Identifier and operator whitelisting.
//!
//! Table names, column expressions, and comparison operators cannot be
//! parameter-bound, so they are concatenated into SQL text. These filters
//! are the only defense on that path: anything that fails them must never
//! reach the assembler. There is no quoting or escaping fallback —
//! rejection is the whole policy.

/// Comparison operators accepted by WHERE clauses and join conditions.
///
/// Matching is case-insensitive; the canonical spelling is uppercase.
pub const VALID_OPERATORS: &[&str] = &[
    "=", "<", ">", "!=", "<>", "<=>", "IS", "IS NOT", "IS NULL", "IS NOT NULL", "LIKE", "NOT LIKE",
];

/// Returns whether `name` is acceptable as a table name.
///
/// Accepts only letters, underscores, and spaces. Empty input is rejected.
#[must_use]
pub fn is_valid_table(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphabetic() || c == '_' || c == ' ')
}

/// Returns whether `expr` is acceptable as a column expression.
///
/// On top of the table-name character set this permits `*`, `.`, `(` and
/// `)` so that qualified columns (`users.id`) and aggregate expressions
/// (`COUNT(*)`) pass. Empty input is rejected.
#[must_use]
pub fn is_valid_column(expr: &str) -> bool {
    !expr.is_empty()
        && expr.chars().all(|c| {
            c.is_ascii_alphabetic() || matches!(c, '_' | ' ' | '*' | '.' | '(' | ')')
        })
}

/// Returns whether every expression in `exprs` passes [`is_valid_column`].
#[must_use]
pub fn are_valid_columns<'a, I>(exprs: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    exprs.into_iter().all(is_valid_column)
}

/// Looks up `op` in the operator whitelist, ignoring case and surrounding
/// whitespace, and returns its canonical uppercase spelling.
#[must_use]
pub fn canonical_operator(op: &str) -> Option<&'static str> {
    let normalized = op.trim().to_ascii_uppercase();
    VALID_OPERATORS
        .iter()
        .find(|candidate| **candidate == normalized)
        .copied()
}
