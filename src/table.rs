//! Loosely-typed sheet table used by the reconciler and the sheet merger.

use serde::{Deserialize, Serialize};

/// A single spreadsheet-shaped cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Numeric view of the cell. Text parses leniently; anything that does
    /// not parse coerces to `None`, mirroring a spreadsheet's "coerce to
    /// missing" behavior.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.trim().parse().ok(),
            Self::Empty => None,
        }
    }

    /// Whether the cell carries no value (empty or blank text).
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            Self::Number(_) => false,
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

/// Column-labeled table of cells. Rows are padded to the column count on
/// insertion so every row has the same width.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn push_row(&mut self, mut row: Vec<Cell>) {
        row.resize(self.width(), Cell::Empty);
        self.rows.push(row);
    }

    /// Case- and whitespace-insensitive column lookup.
    pub fn column_index(&self, label: &str) -> Option<usize> {
        let wanted = label.trim().to_lowercase();
        self.columns
            .iter()
            .position(|c| c.trim().to_lowercase() == wanted)
    }

    /// Column labels normalized for alignment (trimmed, lowercased).
    pub fn normalized_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .map(|c| c.trim().to_lowercase())
            .collect()
    }
}
