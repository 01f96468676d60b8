//! Result rows returned by the monitoring queries.

/// Label value used whenever a label column is null, missing or empty.
pub const UNKNOWN_LABEL: &str = "unknown";

/// A nullable scalar read from one column.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Null,
    Number(f64),
    Text(String),
}

impl From<f64> for Scalar {
    fn from(value: f64) -> Self {
        Scalar::Number(value)
    }
}

impl From<i64> for Scalar {
    fn from(value: i64) -> Self {
        Scalar::Number(value as f64)
    }
}

impl From<i32> for Scalar {
    fn from(value: i32) -> Self {
        Scalar::Number(f64::from(value))
    }
}

impl From<&str> for Scalar {
    fn from(value: &str) -> Self {
        Scalar::Text(value.to_string())
    }
}

impl From<String> for Scalar {
    fn from(value: String) -> Self {
        Scalar::Text(value)
    }
}

impl<T: Into<Scalar>> From<Option<T>> for Scalar {
    fn from(value: Option<T>) -> Self {
        value.map_or(Scalar::Null, Into::into)
    }
}

/// One row of a result set: column name to nullable scalar, in select order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultRow {
    columns: Vec<(String, Scalar)>,
}

impl ResultRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, mostly for tests and fakes.
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Scalar>) -> Self {
        self.insert(column, value);
        self
    }

    /// Insert or replace a column value.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Scalar>) {
        let column = column.into();
        let value = value.into();
        match self.columns.iter_mut().find(|(name, _)| *name == column) {
            Some(slot) => slot.1 = value,
            None => self.columns.push((column, value)),
        }
    }

    pub fn get(&self, column: &str) -> Option<&Scalar> {
        self.columns
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Numeric value of a column. Null, missing, non-numeric and non-finite
    /// values all read as `0.0`.
    pub fn number(&self, column: &str) -> f64 {
        let value = match self.get(column) {
            Some(Scalar::Number(v)) => *v,
            Some(Scalar::Text(s)) => s.trim().parse::<f64>().unwrap_or(0.0),
            Some(Scalar::Null) | None => 0.0,
        };
        if value.is_finite() { value } else { 0.0 }
    }

    /// Label value of a column, [`UNKNOWN_LABEL`] when null, missing or empty.
    pub fn label(&self, column: &str) -> String {
        match self.get(column) {
            Some(Scalar::Text(s)) if !s.is_empty() => s.clone(),
            Some(Scalar::Number(v)) => v.to_string(),
            _ => UNKNOWN_LABEL.to_string(),
        }
    }
}
