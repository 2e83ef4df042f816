//! Reconciler: row-wise comparison of two versions of the same entry table
//! (before and after a mapping pass) with numeric tolerance and string
//! normalization.

use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

use crate::model::Entry;
use crate::table::{Cell, Table};

/// Default absolute tolerance for numeric comparison.
pub const DEFAULT_FLOAT_TOLERANCE: f64 = 1e-8;

#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("columns do not match between tables: {left:?} vs {right:?}")]
    ColumnMismatch {
        left: Vec<String>,
        right: Vec<String>,
    },

    #[error("row counts do not match between tables: {left} vs {right}")]
    RowCountMismatch { left: usize, right: usize },
}

/// Per-row agreement verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowVerdict {
    Equal,
    NotEqual,
}

/// Result of comparing two entry tables.
#[derive(Debug, Clone)]
pub struct Reconciliation {
    pub verdicts: Vec<RowVerdict>,
    /// Rows changed by the mapping pass.
    pub mapped: usize,
    /// Rows the pass left untouched.
    pub unmapped: usize,
    /// Percentage of rows changed.
    pub mapping_rate: f64,
}

/// Snapshot of the columns the mapping pass may rewrite, used as the
/// before/after input to [`compare_tables`].
pub fn mapping_snapshot(entries: &[Entry]) -> Table {
    let mut table = Table::new(vec![
        "name".into(),
        "origin".into(),
        "unit".into(),
        "quantity".into(),
    ]);
    for entry in entries {
        table.push_row(vec![
            Cell::text(&entry.name),
            Cell::text(&entry.origin),
            Cell::text(&entry.unit),
            Cell::Number(entry.amount),
        ]);
    }
    table
}

/// Compare two tables representing the same logical rows. Columns are
/// aligned by normalized name; numeric columns compare with absolute
/// tolerance (NaN equals NaN), text columns compare trimmed and
/// NFKC-normalized (null equals null). A row is `Equal` only if every
/// column matches.
pub fn compare_tables(
    before: &Table,
    after: &Table,
    float_tolerance: f64,
) -> Result<Reconciliation, ReconcileError> {
    let left = aligned_columns(before);
    let right = aligned_columns(after);
    if left.iter().map(|(l, _)| l).ne(right.iter().map(|(l, _)| l)) {
        return Err(ReconcileError::ColumnMismatch {
            left: left.into_iter().map(|(l, _)| l).collect(),
            right: right.into_iter().map(|(l, _)| l).collect(),
        });
    }
    if before.n_rows() != after.n_rows() {
        return Err(ReconcileError::RowCountMismatch {
            left: before.n_rows(),
            right: after.n_rows(),
        });
    }

    let numeric: Vec<bool> = left
        .iter()
        .zip(&right)
        .map(|((_, i), (_, j))| column_is_numeric(before, *i) || column_is_numeric(after, *j))
        .collect();

    let verdicts: Vec<RowVerdict> = (0..before.n_rows())
        .map(|row| {
            let all_match = left.iter().zip(&right).zip(&numeric).all(
                |(((_, i), (_, j)), is_numeric)| {
                    let a = &before.rows[row][*i];
                    let b = &after.rows[row][*j];
                    if *is_numeric {
                        numbers_match(a, b, float_tolerance)
                    } else {
                        texts_match(a, b)
                    }
                },
            );
            if all_match {
                RowVerdict::Equal
            } else {
                RowVerdict::NotEqual
            }
        })
        .collect();

    let mapped = verdicts.iter().filter(|v| **v == RowVerdict::NotEqual).count();
    let unmapped = verdicts.len() - mapped;
    let mapping_rate = if verdicts.is_empty() {
        0.0
    } else {
        mapped as f64 / verdicts.len() as f64 * 100.0
    };

    tracing::info!(mapped, unmapped, mapping_rate, "reconciliation complete");

    Ok(Reconciliation {
        verdicts,
        mapped,
        unmapped,
        mapping_rate,
    })
}

/// Normalized column labels paired with their source index, sorted by label.
fn aligned_columns(table: &Table) -> Vec<(String, usize)> {
    let mut labeled: Vec<(String, usize)> = table
        .normalized_columns()
        .into_iter()
        .enumerate()
        .map(|(i, label)| (label, i))
        .collect();
    labeled.sort_by(|a, b| a.0.cmp(&b.0));
    labeled
}

/// A column is numeric when any of its cells carries a number.
fn column_is_numeric(table: &Table, index: usize) -> bool {
    table
        .rows
        .iter()
        .any(|row| matches!(row[index], Cell::Number(_)))
}

fn numbers_match(a: &Cell, b: &Cell, tolerance: f64) -> bool {
    match (a.as_number(), b.as_number()) {
        (Some(x), Some(y)) => {
            // NaN-vs-NaN counts as equal.
            (x.is_nan() && y.is_nan()) || (x - y).abs() <= tolerance
        }
        (None, None) => true,
        _ => false,
    }
}

fn texts_match(a: &Cell, b: &Cell) -> bool {
    match (normalized_text(a), normalized_text(b)) {
        (Some(x), Some(y)) => x == y,
        (None, None) => true,
        _ => false,
    }
}

/// Trimmed, NFKC-normalized text, or `None` for a null cell.
fn normalized_text(cell: &Cell) -> Option<String> {
    match cell {
        Cell::Empty => None,
        Cell::Text(s) if s.trim().is_empty() => None,
        Cell::Text(s) => Some(s.trim().nfkc().collect()),
        Cell::Number(n) => Some(n.to_string()),
    }
}
