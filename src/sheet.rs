//! Sheet-level ingest logic: data-sheet selection, by-product
//! consolidation, and product-registry construction.

use crate::model::{ProductRegistry, RawRow, RawSheet};

/// Sheet-name sentinel delimiting the data sheets from annex material.
pub const ANNEX_SENTINEL: &str = "ANNEX";

/// Marker-column value demoting a by-product to an input.
pub const INPUT_MARKER: &str = "INPUTS";

/// Description sentinel exempting a sheet's by-products from the avoided
/// burden approach.
pub const NO_AVOIDED_BURDEN: &str = "no avoided burden";

/// Select the data-sheet names from the sheet directory: everything up to
/// the `ANNEX` sentinel, minus the exclusion list.
pub fn data_sheet_names(candidates: &[String], excluded: &[&str]) -> Vec<String> {
    let mut selected = Vec::new();
    for name in candidates {
        if name == ANNEX_SENTINEL {
            break;
        }
        if !excluded.contains(&name.as_str()) {
            selected.push(name.clone());
        }
    }
    selected
}

/// Consolidate a sheet's by-products and register its product names.
///
/// The first `PRODUCTS` row stays the sheet's product. Every later one is
/// demoted to a negative-quantity input (the avoided burden approach) unless
/// any row of the sheet carries the [`NO_AVOIDED_BURDEN`] sentinel, in which
/// case the sentinel rows are dropped instead. All product flow names,
/// by-products included, go into the registry.
pub fn consolidate_by_products(mut rows: Vec<RawRow>, registry: &mut ProductRegistry) -> Vec<RawRow> {
    let exempt = rows
        .iter()
        .any(|row| row.description.trim() == NO_AVOIDED_BURDEN);

    let mut product_count = 0usize;
    for row in rows.iter_mut() {
        if !row.is_product_row() {
            continue;
        }
        product_count += 1;
        registry.add(&row.flow_name);
        if product_count > 1 && !exempt {
            row.marker = INPUT_MARKER.to_string();
            row.quantity = -row.quantity;
        }
    }

    if product_count > 1 {
        rows.retain(|row| row.description.trim() != NO_AVOIDED_BURDEN);
    }
    rows
}

/// First pass over all sheets: consolidate by-products and build the
/// complete product registry before any classification begins.
pub fn build_product_registry(sheets: Vec<RawSheet>) -> (Vec<RawSheet>, ProductRegistry) {
    let mut registry = ProductRegistry::new();
    let consolidated = sheets
        .into_iter()
        .map(|mut sheet| {
            sheet.rows = consolidate_by_products(sheet.rows, &mut registry);
            sheet
        })
        .collect();
    (consolidated, registry)
}

/// Warn about expected sheets the reader did not deliver. Missing sheets
/// are sheet-scoped diagnostics, not errors.
pub fn report_missing_sheets(expected: &[String], sheets: &[RawSheet]) {
    for name in expected {
        if !sheets.iter().any(|s| &s.name == name) {
            tracing::warn!(sheet = %name, "expected sheet not found, skipping");
        }
    }
}
