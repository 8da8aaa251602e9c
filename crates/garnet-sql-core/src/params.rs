//! The placeholder allocator.
//!
//! Every bound value gets a named placeholder derived from the field it
//! belongs to. Two invariants hold for one builder lifetime: no two
//! allocations return the same name, and a name always maps to exactly
//! the value supplied when it was allocated — later allocations never
//! overwrite an earlier binding.

use crate::value::SqlValue;

/// An insertion-ordered set of named bind parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    entries: Vec<(String, SqlValue)>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a collision-free placeholder for `field`, records
    /// `value` under it, and returns the placeholder name.
    ///
    /// The name is the field prefixed with the `:` sentinel, with any
    /// qualifying dot replaced by an underscore (`users.id` becomes
    /// `:users_id`). If that name is already taken, a numeric suffix is
    /// appended and incremented until the name is unique.
    pub fn allocate(&mut self, field: &str, value: SqlValue) -> String {
        let name = self.unique_name(field);
        self.entries.push((name.clone(), value));
        name
    }

    /// Returns the placeholder name [`allocate`](Self::allocate) would
    /// produce for `field`, without recording anything.
    #[must_use]
    pub fn unique_name(&self, field: &str) -> String {
        let mut base = if field.starts_with(':') {
            field.to_string()
        } else {
            format!(":{field}")
        };
        base = base.replace('.', "_");

        if !self.contains(&base) {
            return base;
        }
        let mut suffix = 1_u32;
        loop {
            let candidate = format!("{base}{suffix}");
            if !self.contains(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Replaces the value bound under an existing placeholder, or records
    /// the pair if the name is new.
    ///
    /// Only re-applied clauses that own their placeholder (limit, offset)
    /// may use this; it is the one sanctioned way to rebind a name.
    pub fn set(&mut self, name: &str, value: SqlValue) {
        if let Some(entry) = self.entries.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value;
        } else {
            self.entries.push((name.to_string(), value));
        }
    }

    /// Looks up the value bound under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&SqlValue> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Returns whether a placeholder with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n == name)
    }

    /// Number of bound parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no parameters are bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &SqlValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }
}
