//! Partial UPDATE builder
//!
//! Collects `(column, value)` pairs for only the fields a caller supplied and
//! renders a parameterized statement:
//!
//! ```text
//! UPDATE faculty SET title = $1, bio = $2, updated_at = NOW()
//! WHERE faculty_id = $3 RETURNING faculty_id
//! ```
//!
//! Placeholders follow assignment order and the key is always last, so
//! `values[i]` binds to `$(i + 1)`. Table and column names are `'static`
//! identifiers chosen by the repositories, never request data.

use sqlx::postgres::{PgArguments, PgRow};
use sqlx::query::QueryAs;
use sqlx::{FromRow, Postgres};

use crate::models::ValidationError;

/// A bindable column value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlValue {
    Text(Option<String>),
    Int(Option<i32>),
}

impl From<String> for SqlValue {
    fn from(v: String) -> Self {
        Self::Text(Some(v))
    }
}

impl From<&str> for SqlValue {
    fn from(v: &str) -> Self {
        Self::Text(Some(v.to_owned()))
    }
}

impl From<Option<String>> for SqlValue {
    fn from(v: Option<String>) -> Self {
        Self::Text(v)
    }
}

impl From<i32> for SqlValue {
    fn from(v: i32) -> Self {
        Self::Int(Some(v))
    }
}

impl From<Option<i32>> for SqlValue {
    fn from(v: Option<i32>) -> Self {
        Self::Int(v)
    }
}

/// Ordered set of column assignments for one row
#[derive(Debug, Clone)]
pub struct PartialUpdate {
    table: &'static str,
    key_column: &'static str,
    assignments: Vec<(&'static str, SqlValue)>,
}

impl PartialUpdate {
    pub fn new(table: &'static str, key_column: &'static str) -> Self {
        Self {
            table,
            key_column,
            assignments: Vec::new(),
        }
    }

    /// Assign a column. Assigning the same column twice keeps its first
    /// position and the latest value.
    pub fn set(&mut self, column: &'static str, value: impl Into<SqlValue>) -> &mut Self {
        let value = value.into();
        match self.assignments.iter_mut().find(|(c, _)| *c == column) {
            Some(slot) => slot.1 = value,
            None => self.assignments.push((column, value)),
        }
        self
    }

    /// Assign a column only when the field was present in the request.
    pub fn set_present<T: Into<SqlValue>>(
        &mut self,
        column: &'static str,
        value: Option<T>,
    ) -> &mut Self {
        if let Some(v) = value {
            self.set(column, v);
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    /// Columns in assignment order.
    pub fn columns(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.assignments.iter().map(|(c, _)| *c)
    }

    /// Render the statement.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError::NothingToUpdate` when no column was assigned.
    pub fn build(&self, returning: &str) -> Result<BuiltUpdate, ValidationError> {
        if self.assignments.is_empty() {
            return Err(ValidationError::NothingToUpdate);
        }

        let set_clause = self
            .assignments
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ${}", column, i + 1))
            .collect::<Vec<_>>()
            .join(", ");

        let sql = format!(
            "UPDATE {} SET {}, updated_at = NOW() WHERE {} = ${} RETURNING {}",
            self.table,
            set_clause,
            self.key_column,
            self.assignments.len() + 1,
            returning,
        );

        Ok(BuiltUpdate {
            sql,
            values: self.assignments.iter().map(|(_, v)| v.clone()).collect(),
        })
    }
}

/// Rendered statement plus its positional arguments (key excluded)
#[derive(Debug, Clone)]
pub struct BuiltUpdate {
    pub sql: String,
    pub values: Vec<SqlValue>,
}

impl BuiltUpdate {
    /// Bind all values in order, then the key.
    pub fn query_as<O>(&self, key: i32) -> QueryAs<'_, Postgres, O, PgArguments>
    where
        O: for<'r> FromRow<'r, PgRow>,
    {
        let query = self
            .values
            .iter()
            .fold(sqlx::query_as::<_, O>(&self.sql), |q, value| match value {
                SqlValue::Text(v) => q.bind(v.as_deref()),
                SqlValue::Int(v) => q.bind(*v),
            });
        query.bind(key)
    }
}
