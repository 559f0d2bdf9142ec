//! Typed column storage.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::temporal;

/// Declared scalar type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    /// Integer or floating-point values.
    Numeric,
    /// Free-form text values.
    Text,
    /// Dates and date-times.
    Temporal,
}

impl ColumnType {
    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            ColumnType::Numeric => "numeric",
            ColumnType::Text => "text",
            ColumnType::Temporal => "temporal",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Values of a column; `None` marks an absent value.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Numeric(Vec<Option<f64>>),
    Text(Vec<Option<String>>),
    Temporal(Vec<Option<NaiveDateTime>>),
}

/// A named, typed column.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a column from already-typed data.
    pub fn new(name: impl Into<String>, data: ColumnData) -> Self {
        let data = match data {
            ColumnData::Numeric(values) => ColumnData::Numeric(normalize_numeric(values)),
            other => other,
        };
        Self {
            name: name.into(),
            data,
        }
    }

    /// Create a numeric column. `NaN` is stored as absent.
    pub fn numeric(name: impl Into<String>, values: Vec<Option<f64>>) -> Self {
        Self::new(name, ColumnData::Numeric(values))
    }

    /// Create a text column.
    pub fn text<S: Into<String>>(name: impl Into<String>, values: Vec<Option<S>>) -> Self {
        let values = values.into_iter().map(|v| v.map(Into::into)).collect();
        Self::new(name, ColumnData::Text(values))
    }

    /// Create a temporal column.
    pub fn temporal(name: impl Into<String>, values: Vec<Option<NaiveDateTime>>) -> Self {
        Self::new(name, ColumnData::Temporal(values))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    /// Declared type of the column.
    pub fn column_type(&self) -> ColumnType {
        match self.data {
            ColumnData::Numeric(_) => ColumnType::Numeric,
            ColumnData::Text(_) => ColumnType::Text,
            ColumnData::Temporal(_) => ColumnType::Temporal,
        }
    }

    /// Number of rows, absent values included.
    pub fn len(&self) -> usize {
        match &self.data {
            ColumnData::Numeric(v) => v.len(),
            ColumnData::Text(v) => v.len(),
            ColumnData::Temporal(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether the value at `row` is absent.
    pub fn is_null(&self, row: usize) -> bool {
        match &self.data {
            ColumnData::Numeric(v) => v.get(row).is_some_and(Option::is_none),
            ColumnData::Text(v) => v.get(row).is_some_and(Option::is_none),
            ColumnData::Temporal(v) => v.get(row).is_some_and(Option::is_none),
        }
    }

    /// Row indices holding an absent value, ascending.
    pub fn null_rows(&self) -> Vec<usize> {
        (0..self.len()).filter(|&row| self.is_null(row)).collect()
    }

    /// Number of absent values.
    pub fn null_count(&self) -> usize {
        (0..self.len()).filter(|&row| self.is_null(row)).count()
    }

    /// Render the value at `row` for display; absent values render empty.
    pub fn display_value(&self, row: usize) -> String {
        match &self.data {
            ColumnData::Numeric(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|n| n.to_string())
                .unwrap_or_default(),
            ColumnData::Text(v) => v.get(row).cloned().flatten().unwrap_or_default(),
            ColumnData::Temporal(v) => v
                .get(row)
                .copied()
                .flatten()
                .map(|t| temporal::format_datetime(&t))
                .unwrap_or_default(),
        }
    }
}

/// Hashable identity of a float; `0.0` and `-0.0` compare equal.
pub(crate) fn numeric_key(value: f64) -> u64 {
    if value == 0.0 { 0.0f64.to_bits() } else { value.to_bits() }
}

fn normalize_numeric(values: Vec<Option<f64>>) -> Vec<Option<f64>> {
    values
        .into_iter()
        .map(|v| v.filter(|n| !n.is_nan()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_is_absent() {
        let col = Column::numeric("x", vec![Some(1.0), Some(f64::NAN), None]);
        assert_eq!(col.null_rows(), vec![1, 2]);
        assert_eq!(col.null_count(), 2);
    }

    #[test]
    fn test_column_type() {
        let col = Column::text("name", vec![Some("a"), None]);
        assert_eq!(col.column_type(), ColumnType::Text);
        assert_eq!(col.len(), 2);
        assert!(col.is_null(1));
        assert!(!col.is_null(0));
        assert!(!col.is_null(5));
    }

    #[test]
    fn test_display_value() {
        let col = Column::numeric("age", vec![Some(30.0), Some(2.5), None]);
        assert_eq!(col.display_value(0), "30");
        assert_eq!(col.display_value(1), "2.5");
        assert_eq!(col.display_value(2), "");
    }
}
