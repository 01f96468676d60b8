//! Static description of a monitoring query.

/// How a column is decoded from the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Nullable `float8`.
    Number,
    /// Nullable `text`.
    Text,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: &'static str,
    pub kind: ColumnKind,
}

impl ColumnSpec {
    pub const fn number(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Number,
        }
    }

    pub const fn text(name: &'static str) -> Self {
        Self {
            name,
            kind: ColumnKind::Text,
        }
    }
}

/// A named, parameterless SQL statement and the columns it returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySpec {
    pub name: &'static str,
    pub sql: &'static str,
    pub columns: &'static [ColumnSpec],
    /// Upper bound on rows the statement can return, if any.
    pub max_rows: Option<usize>,
}

impl QuerySpec {
    pub fn column(&self, name: &str) -> Option<&ColumnSpec> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// Connectivity probe used by the readiness endpoint.
pub const PING: QuerySpec = QuerySpec {
    name: "ping",
    sql: "SELECT 1::float8 AS ok",
    columns: &[ColumnSpec::number("ok")],
    max_rows: Some(1),
};
