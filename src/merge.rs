//! Template population and sheet merging: build the per-process activity
//! header block and combine all processed sheets into one composite table.

use thiserror::Error;

use crate::model::{Entry, ProcessDescription, ProcessSheet};
use crate::table::{Cell, Table};

/// Columns of the entry slice contributed by each sheet, from the canonical
/// name onward. Uncertainty-distribution fields stay unset in this core.
pub const ENTRY_COLUMNS: &[&str] = &[
    "name",
    "amount",
    "unit",
    "database",
    "categories",
    "location",
    "type",
    "uncertainty type",
    "loc",
    "scale",
    "shape",
    "minimum",
    "maximum",
];

/// Template rows dropped for every sheet after the first: the database
/// header block is declared once in the composite table.
pub const TEMPLATE_HEADER_ROWS: usize = 3;

#[derive(Error, Debug)]
pub enum MergeError {
    #[error("sheet {sheet} columns do not match the first sheet: {columns:?} vs {expected:?}")]
    ColumnMismatch {
        sheet: usize,
        columns: Vec<String>,
        expected: Vec<String>,
    },

    #[error("no sheets to merge")]
    NoSheets,

    #[error("sheet {0:?} has no product entry")]
    MissingProduct(String),
}

/// Build the activity header block for one sheet: database declaration,
/// activity metadata filled from the description block and the product
/// entry, and the exchange section marker.
pub fn activity_template(
    activity_database: &str,
    description: &ProcessDescription,
    product: &Entry,
) -> Table {
    let mut table = Table::new(ENTRY_COLUMNS.iter().map(|c| (*c).to_string()).collect());
    let code = format!("{activity_database}-{}", description.process_name);

    let rows: Vec<(&str, String)> = vec![
        ("Database", activity_database.to_string()),
        ("database", activity_database.to_string()),
        ("", String::new()),
        ("", String::new()),
        ("Activity", description.process_name.clone()),
        ("database", activity_database.to_string()),
        ("code", code),
        ("comment", description.description.clone()),
        ("classifications", String::new()),
        ("location", product.location.clone()),
        ("production amount", "1".to_string()),
        ("type", "process".to_string()),
        ("unit", product.unit.clone()),
        ("", String::new()),
        ("Exchanges", String::new()),
    ];
    for (label, value) in rows {
        let value_cell = if value.is_empty() {
            Cell::Empty
        } else {
            Cell::text(value)
        };
        table.push_row(vec![Cell::text(label), value_cell]);
    }
    table
}

/// Render a sheet's classified entries as its data-row slice.
pub fn entry_table(entries: &[Entry]) -> Table {
    let mut table = Table::new(ENTRY_COLUMNS.iter().map(|c| (*c).to_string()).collect());
    for entry in entries {
        table.push_row(vec![
            Cell::text(&entry.name),
            Cell::Number(entry.amount),
            Cell::text(&entry.unit),
            entry
                .database
                .as_deref()
                .map(Cell::text)
                .unwrap_or(Cell::Empty),
            entry
                .category
                .as_deref()
                .map(Cell::text)
                .unwrap_or(Cell::Empty),
            Cell::text(&entry.location),
            entry
                .entry_type
                .map(|t| Cell::text(t.as_str()))
                .unwrap_or(Cell::Empty),
            // Uncertainty placeholders: type, loc, scale, shape, min, max.
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
            Cell::Empty,
        ]);
    }
    table
}

/// Merge (template, data) table pairs into one composite table. The first
/// pair contributes its full template block; every subsequent pair drops the
/// first [`TEMPLATE_HEADER_ROWS`] template rows. The column set comes from
/// the first data table and must match across all pairs.
pub fn merge_tables(pairs: &[(Table, Table)]) -> Result<Table, MergeError> {
    let (_, first_data) = pairs.first().ok_or(MergeError::NoSheets)?;
    let expected = first_data.columns.clone();
    let mut merged = Table::new(expected.clone());

    for (index, (template, data)) in pairs.iter().enumerate() {
        if data.columns != expected {
            return Err(MergeError::ColumnMismatch {
                sheet: index,
                columns: data.columns.clone(),
                expected,
            });
        }
        let skip = if index == 0 { 0 } else { TEMPLATE_HEADER_ROWS };
        for row in template.rows.iter().skip(skip) {
            merged.push_row(row.clone());
        }
        for row in &data.rows {
            merged.push_row(row.clone());
        }
    }
    Ok(merged)
}

/// Merge fully classified process sheets into the composite output table.
pub fn merge_sheets(sheets: &[ProcessSheet], activity_database: &str) -> Result<Table, MergeError> {
    let pairs = sheets
        .iter()
        .map(|sheet| {
            let product = sheet
                .product()
                .ok_or_else(|| MergeError::MissingProduct(sheet.name.clone()))?;
            Ok((
                activity_template(activity_database, &sheet.description, product),
                entry_table(&sheet.entries),
            ))
        })
        .collect::<Result<Vec<_>, MergeError>>()?;

    let merged = merge_tables(&pairs)?;
    tracing::info!(
        sheets = sheets.len(),
        rows = merged.n_rows(),
        "merged sheets into composite table"
    );
    Ok(merged)
}
