//! Dynamic statement builder.
//!
//! A [`QueryBuilder`] is created bound to one table and accumulates
//! clauses through chainable calls; the `build_*` methods then assemble
//! the final SQL in a fixed clause order together with the bind list.
//! Assembly is pure — a builder can be built more than once and its
//! clause state survives across builds.
//!
//! Clause calls that fail identifier or operator validation leave the
//! builder unchanged instead of erroring, so malformed fragments can
//! never reach the assembler. Each dropped clause is recorded and
//! available through [`QueryBuilder::rejected`].
//!
//! # Example
//!
//! ```rust
//! use garnet_sql_core::builder::QueryBuilder;
//!
//! let builder = QueryBuilder::table("users")?
//!     .select(&["id", "name"])
//!     .filter("age", ">", 18)
//!     .order_by(&["name"], "asc")
//!     .limit(10);
//!
//! let (sql, params) = builder.build_select();
//! assert_eq!(
//!     sql,
//!     "SELECT id, name FROM users WHERE age > :age ORDER BY name ASC LIMIT :limit"
//! );
//! assert_eq!(params.len(), 2);
//! # Ok::<(), garnet_sql_core::QueryError>(())
//! ```

use crate::error::QueryError;
use crate::guard::{are_valid_columns, canonical_operator, is_valid_column, is_valid_table};
use crate::params::Params;
use crate::value::{SqlValue, ToSqlValue};

/// The boolean joiner preceding a WHERE clause.
///
/// The first clause's connective is never emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Connective {
    /// `AND`
    And,
    /// `OR`
    Or,
    /// `NOT`
    Not,
}

impl Connective {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
            Self::Not => "NOT",
        }
    }
}

/// Sort direction for ORDER BY.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderDirection {
    /// Ascending order (ASC)
    Asc,
    /// Descending order (DESC)
    Desc,
}

impl OrderDirection {
    /// Parses a direction string, ignoring case.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_ascii_uppercase().as_str() {
            "ASC" => Some(Self::Asc),
            "DESC" => Some(Self::Desc),
            _ => None,
        }
    }

    const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinKind {
    Inner,
    Left,
    Right,
}

impl JoinKind {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Inner => "INNER JOIN",
            Self::Left => "LEFT JOIN",
            Self::Right => "RIGHT JOIN",
        }
    }
}

#[derive(Debug, Clone)]
struct WhereClause {
    field: String,
    operator: &'static str,
    /// None for unary operators (IS NULL / IS NOT NULL), which bind
    /// nothing.
    placeholder: Option<String>,
    connective: Connective,
}

#[derive(Debug, Clone)]
struct JoinSpec {
    kind: JoinKind,
    table: String,
    left: String,
    operator: &'static str,
    right: String,
}

/// A clause that was dropped because it failed validation.
///
/// The offending call was a no-op on builder state; this records what was
/// rejected so callers (and the execution layer's logging) can diagnose a
/// query that came out smaller than expected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejected {
    /// A table or column expression failed the identifier whitelist.
    Column(String),
    /// An operator was not in the whitelist.
    Operator(String),
    /// An ORDER BY direction was not ASC/DESC.
    Direction(String),
}

impl core::fmt::Display for Rejected {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Column(name) => write!(f, "rejected column {name:?}"),
            Self::Operator(op) => write!(f, "rejected operator {op:?}"),
            Self::Direction(dir) => write!(f, "rejected order direction {dir:?}"),
        }
    }
}

/// An ordered bind list: `(placeholder, value)` pairs in the order the
/// placeholders occur in the assembled SQL.
pub type BindList = Vec<(String, SqlValue)>;

/// Accumulates clauses for one logical statement against one table.
///
/// Chainable methods consume and return the builder. A builder is not
/// meant to be shared between structurally different statements — clause
/// state is never auto-cleared between builds.
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    table: String,
    select: Vec<String>,
    wheres: Vec<WhereClause>,
    joins: Vec<JoinSpec>,
    order_columns: Vec<String>,
    order_direction: OrderDirection,
    limit: Option<String>,
    offset: Option<String>,
    params: Params,
    rejected: Vec<Rejected>,
}

impl QueryBuilder {
    /// Creates a builder for `table`.
    ///
    /// # Errors
    ///
    /// Returns [`QueryError::InvalidTable`] if the name fails the
    /// identifier whitelist. No statement is meaningful without a valid
    /// table, so this is the one validation failure that is fatal rather
    /// than a silent no-op.
    pub fn table(table: &str) -> Result<Self, QueryError> {
        if !is_valid_table(table) {
            return Err(QueryError::InvalidTable(table.to_string()));
        }
        Ok(Self {
            table: table.to_string(),
            select: vec![String::from("*")],
            wheres: Vec::new(),
            joins: Vec::new(),
            order_columns: Vec::new(),
            order_direction: OrderDirection::Asc,
            limit: None,
            offset: None,
            params: Params::new(),
            rejected: Vec::new(),
        })
    }

    /// The table this builder targets.
    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    /// The parameters bound so far, in allocation order.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Clauses dropped by validation, in call order.
    #[must_use]
    pub fn rejected(&self) -> &[Rejected] {
        &self.rejected
    }

    /// Replaces the projection. The whole call is ignored if any column
    /// expression fails validation; the previous selection (including the
    /// default `*`) is preserved.
    #[must_use]
    pub fn select(mut self, columns: &[&str]) -> Self {
        if !are_valid_columns(columns.iter().copied()) {
            self.rejected
                .push(Rejected::Column(columns.join(", ")));
            return self;
        }
        self.select = columns.iter().map(|c| String::from(*c)).collect();
        self
    }

    /// Adds an AND-connected WHERE clause.
    #[must_use]
    pub fn filter<V: ToSqlValue>(self, field: &str, operator: &str, value: V) -> Self {
        self.push_where(Connective::And, field, operator, value.to_sql_value())
    }

    /// Adds an AND-connected equality clause.
    #[must_use]
    pub fn filter_eq<V: ToSqlValue>(self, field: &str, value: V) -> Self {
        self.filter(field, "=", value)
    }

    /// Adds an OR-connected WHERE clause.
    #[must_use]
    pub fn or_filter<V: ToSqlValue>(self, field: &str, operator: &str, value: V) -> Self {
        self.push_where(Connective::Or, field, operator, value.to_sql_value())
    }

    /// Adds an OR-connected equality clause.
    #[must_use]
    pub fn or_filter_eq<V: ToSqlValue>(self, field: &str, value: V) -> Self {
        self.or_filter(field, "=", value)
    }

    /// Adds a NOT-connected WHERE clause.
    #[must_use]
    pub fn not_filter<V: ToSqlValue>(self, field: &str, operator: &str, value: V) -> Self {
        self.push_where(Connective::Not, field, operator, value.to_sql_value())
    }

    /// Adds a batch of AND-connected clauses.
    #[must_use]
    pub fn filter_all<'a, I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, SqlValue)>,
    {
        for (field, operator, value) in conditions {
            self = self.push_where(Connective::And, field, operator, value);
        }
        self
    }

    /// Adds a batch of OR-connected clauses.
    #[must_use]
    pub fn or_filter_all<'a, I>(mut self, conditions: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, SqlValue)>,
    {
        for (field, operator, value) in conditions {
            self = self.push_where(Connective::Or, field, operator, value);
        }
        self
    }

    fn push_where(
        mut self,
        connective: Connective,
        field: &str,
        operator: &str,
        value: SqlValue,
    ) -> Self {
        let Some(operator) = canonical_operator(operator) else {
            self.rejected.push(Rejected::Operator(operator.to_string()));
            return self;
        };

        // Unary operators take no operand; the value is discarded.
        let placeholder = if matches!(operator, "IS NULL" | "IS NOT NULL") {
            None
        } else {
            Some(self.params.allocate(field, value))
        };

        self.wheres.push(WhereClause {
            field: field.to_string(),
            operator,
            placeholder,
            connective,
        });
        self
    }

    /// Sets the ordering, replacing any previous one. The call is ignored
    /// if the direction is not ASC/DESC (case-insensitive) or any column
    /// fails validation.
    #[must_use]
    pub fn order_by(mut self, columns: &[&str], direction: &str) -> Self {
        let Some(direction) = OrderDirection::parse(direction) else {
            self.rejected
                .push(Rejected::Direction(direction.to_string()));
            return self;
        };
        if !are_valid_columns(columns.iter().copied()) {
            self.rejected
                .push(Rejected::Column(columns.join(", ")));
            return self;
        }
        self.order_columns = columns.iter().map(|c| String::from(*c)).collect();
        self.order_direction = direction;
        self
    }

    /// Adds an INNER JOIN.
    #[must_use]
    pub fn join(self, table: &str, left_column: &str, operator: &str, right_column: &str) -> Self {
        self.push_join(JoinKind::Inner, table, left_column, operator, right_column)
    }

    /// Adds a LEFT JOIN.
    #[must_use]
    pub fn left_join(
        self,
        table: &str,
        left_column: &str,
        operator: &str,
        right_column: &str,
    ) -> Self {
        self.push_join(JoinKind::Left, table, left_column, operator, right_column)
    }

    /// Adds a RIGHT JOIN.
    #[must_use]
    pub fn right_join(
        self,
        table: &str,
        left_column: &str,
        operator: &str,
        right_column: &str,
    ) -> Self {
        self.push_join(JoinKind::Right, table, left_column, operator, right_column)
    }

    fn push_join(
        mut self,
        kind: JoinKind,
        table: &str,
        left_column: &str,
        operator: &str,
        right_column: &str,
    ) -> Self {
        let Some(operator) = canonical_operator(operator) else {
            self.rejected.push(Rejected::Operator(operator.to_string()));
            return self;
        };
        if !are_valid_columns([table, left_column, right_column]) {
            self.rejected.push(Rejected::Column(format!(
                "{table}, {left_column}, {right_column}"
            )));
            return self;
        }
        self.joins.push(JoinSpec {
            kind,
            table: table.to_string(),
            left: left_column.to_string(),
            operator,
            right: right_column.to_string(),
        });
        self
    }

    /// Sets the LIMIT. The value is always parameter-bound; re-applying
    /// rebinds the existing placeholder instead of allocating another.
    #[must_use]
    pub fn limit(mut self, n: i64) -> Self {
        match &self.limit {
            Some(name) => self.params.set(name, SqlValue::Int(n)),
            None => self.limit = Some(self.params.allocate("limit", SqlValue::Int(n))),
        }
        self
    }

    /// Sets the OFFSET. Parameter-bound, with the same re-application
    /// behavior as [`limit`](Self::limit).
    #[must_use]
    pub fn offset(mut self, n: i64) -> Self {
        match &self.offset {
            Some(name) => self.params.set(name, SqlValue::Int(n)),
            None => self.offset = Some(self.params.allocate("offset", SqlValue::Int(n))),
        }
        self
    }

    /// Assembles a SELECT statement.
    ///
    /// Clause order is fixed: projection, FROM, joins, WHERE, ORDER BY,
    /// LIMIT, OFFSET. The bind list is ordered by placeholder occurrence
    /// in the SQL text.
    #[must_use]
    pub fn build_select(&self) -> (String, BindList) {
        let mut sql = format!("SELECT {} FROM {}", self.select.join(", "), self.table);
        let mut bind = BindList::new();
        self.render_joins(&mut sql);
        self.render_where(&self.params, &mut sql, &mut bind);
        self.render_order(&mut sql);
        self.render_limit_offset(&self.params, &mut sql, &mut bind);
        (sql, bind)
    }

    /// Assembles a COUNT statement: the SELECT shape with a forced
    /// `COUNT(*)` projection and no ordering.
    #[must_use]
    pub fn build_count(&self) -> (String, BindList) {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let mut bind = BindList::new();
        self.render_joins(&mut sql);
        self.render_where(&self.params, &mut sql, &mut bind);
        self.render_limit_offset(&self.params, &mut sql, &mut bind);
        (sql, bind)
    }

    /// Assembles a multi-row INSERT statement.
    ///
    /// Column names come from the first row, in order, and are validated
    /// through the identifier whitelist. Placeholders carry a per-row
    /// index suffix so the same field stays unique across rows.
    ///
    /// # Errors
    ///
    /// [`QueryError::EmptyInsert`] for no rows,
    /// [`QueryError::InvalidColumn`] for a rejected column name, and
    /// [`QueryError::MismatchedRow`] when a row's field set differs from
    /// the first row's.
    pub fn build_insert(
        &self,
        rows: &[&[(&str, SqlValue)]],
    ) -> Result<(String, BindList), QueryError> {
        let first = rows.first().ok_or(QueryError::EmptyInsert)?;
        let fields: Vec<&str> = first.iter().map(|(field, _)| *field).collect();
        for field in &fields {
            if !is_valid_column(field) {
                return Err(QueryError::InvalidColumn((*field).to_string()));
            }
        }

        let mut sql = format!("INSERT INTO {} ({}) VALUES ", self.table, fields.join(", "));
        let mut bound = Params::new();
        let mut bind = BindList::new();

        for (index, row) in rows.iter().enumerate() {
            if row.len() != fields.len() {
                return Err(QueryError::MismatchedRow(index));
            }
            let mut group = Vec::with_capacity(fields.len());
            for field in &fields {
                let value = row
                    .iter()
                    .find(|(f, _)| f == field)
                    .map(|(_, v)| v.clone())
                    .ok_or(QueryError::MismatchedRow(index))?;
                let name = bound.allocate(&format!("{field}{index}"), value.clone());
                group.push(name.clone());
                bind.push((name, value));
            }
            if index > 0 {
                sql.push_str(", ");
            }
            sql.push('(');
            sql.push_str(&group.join(", "));
            sql.push(')');
        }

        Ok((sql, bind))
    }

    /// Assembles an UPDATE statement: SET assignments followed by any
    /// accumulated WHERE clauses and LIMIT/OFFSET for a bounded update.
    ///
    /// SET placeholders are allocated against the already-bound WHERE
    /// parameters, so a field appearing in both gets two distinct names.
    ///
    /// # Errors
    ///
    /// [`QueryError::EmptyUpdate`] for no assignments and
    /// [`QueryError::InvalidColumn`] for a rejected column name.
    pub fn build_update(
        &self,
        values: &[(&str, SqlValue)],
    ) -> Result<(String, BindList), QueryError> {
        if values.is_empty() {
            return Err(QueryError::EmptyUpdate);
        }
        for (column, _) in values {
            if !is_valid_column(column) {
                return Err(QueryError::InvalidColumn((*column).to_string()));
            }
        }

        let mut params = self.params.clone();
        let mut bind = BindList::new();
        let mut assignments = Vec::with_capacity(values.len());
        for (column, value) in values {
            let name = params.allocate(column, value.clone());
            assignments.push(format!("{column} = {name}"));
            bind.push((name, value.clone()));
        }

        let mut sql = format!("UPDATE {} SET {}", self.table, assignments.join(", "));
        self.render_where(&params, &mut sql, &mut bind);
        self.render_limit_offset(&params, &mut sql, &mut bind);
        Ok((sql, bind))
    }

    /// Assembles a DELETE statement with any accumulated WHERE clauses
    /// and LIMIT/OFFSET.
    #[must_use]
    pub fn build_delete(&self) -> (String, BindList) {
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut bind = BindList::new();
        self.render_where(&self.params, &mut sql, &mut bind);
        self.render_limit_offset(&self.params, &mut sql, &mut bind);
        (sql, bind)
    }

    fn render_joins(&self, sql: &mut String) {
        for join in &self.joins {
            sql.push(' ');
            sql.push_str(join.kind.as_sql());
            sql.push(' ');
            sql.push_str(&join.table);
            sql.push_str(" ON ");
            sql.push_str(&join.left);
            sql.push(' ');
            sql.push_str(join.operator);
            sql.push(' ');
            sql.push_str(&join.right);
        }
    }

    /// Renders clauses strictly in insertion order, dropping the first
    /// clause's connective. Mixed AND/OR chains come out flat and
    /// left-associative; no precedence grouping is performed.
    fn render_where(&self, params: &Params, sql: &mut String, bind: &mut BindList) {
        if self.wheres.is_empty() {
            return;
        }
        sql.push_str(" WHERE ");
        for (index, clause) in self.wheres.iter().enumerate() {
            if index > 0 {
                sql.push(' ');
                sql.push_str(clause.connective.as_sql());
                sql.push(' ');
            }
            sql.push_str(&clause.field);
            sql.push(' ');
            sql.push_str(clause.operator);
            if let Some(name) = &clause.placeholder {
                sql.push(' ');
                sql.push_str(name);
                if let Some(value) = params.get(name) {
                    bind.push((name.clone(), value.clone()));
                }
            }
        }
    }

    fn render_order(&self, sql: &mut String) {
        if self.order_columns.is_empty() {
            return;
        }
        sql.push_str(" ORDER BY ");
        sql.push_str(&self.order_columns.join(", "));
        sql.push(' ');
        sql.push_str(self.order_direction.as_sql());
    }

    fn render_limit_offset(&self, params: &Params, sql: &mut String, bind: &mut BindList) {
        if let Some(name) = &self.limit {
            sql.push_str(" LIMIT ");
            sql.push_str(name);
            if let Some(value) = params.get(name) {
                bind.push((name.clone(), value.clone()));
            }
        }
        if let Some(name) = &self.offset {
            sql.push_str(" OFFSET ");
            sql.push_str(name);
            if let Some(value) = params.get(name) {
                bind.push((name.clone(), value.clone()));
            }
        }
    }
}
