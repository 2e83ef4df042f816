//! Core data model: raw sheet rows, normalized inventory entries, and the
//! process-wide product registry.

use serde::{Deserialize, Serialize};

/// Classification of an inventory entry, selecting the target sub-database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// The sheet's own functional output.
    Production,
    /// Exchange with the natural environment (emission, resource extraction).
    Biosphere,
    /// Exchange with another human-made process or product.
    Technosphere,
}

impl EntryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Biosphere => "biosphere",
            Self::Technosphere => "technosphere",
        }
    }
}

/// One row of a process sheet as delivered by the spreadsheet reader.
///
/// The marker column carries the `PRODUCTS` flag for the product row; the
/// description column may carry the "no avoided burden" exemption sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawRow {
    pub flow_name: String,
    pub marker: String,
    pub origin: String,
    pub unit: String,
    pub quantity: f64,
    pub description: String,
}

impl RawRow {
    /// Whether the marker column flags this row as a product row.
    pub fn is_product_row(&self) -> bool {
        self.marker.to_lowercase().contains("products")
    }
}

/// One normalized row of the inventory table.
///
/// Created from a [`RawRow`], mutated through the classification and
/// conversion passes (each pass returns a new value), and immutable once
/// written into the merged output table.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Free-text or canonical flow/process name.
    pub name: String,
    /// Raw location or environmental-compartment hint from the source data.
    pub origin: String,
    /// Canonical unit name (kilogram, cubic meter, megajoule, ...).
    pub unit: String,
    /// Signed quantity; negative encodes an avoided burden.
    pub amount: f64,
    /// Environmental category, set only for biosphere exchanges.
    pub category: Option<String>,
    /// Resolved geographic code.
    pub location: String,
    /// Always `Some` in the final table.
    pub entry_type: Option<EntryType>,
    /// Target database identifier, a function of `entry_type`.
    pub database: Option<String>,
    /// Carried from the sheet's marker column.
    pub is_product: bool,
}

impl Entry {
    /// Build an entry from a raw sheet row. Units stay in their raw form
    /// here; the unit converter canonicalizes them later.
    pub fn from_raw(row: &RawRow) -> Self {
        Self {
            name: row.flow_name.clone(),
            origin: row.origin.clone(),
            unit: row.unit.clone(),
            amount: row.quantity,
            is_product: row.is_product_row(),
            ..Self::default()
        }
    }
}

/// Process metadata read from a sheet's description block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessDescription {
    pub process_name: String,
    pub description: String,
}

/// All rows of one process sheet before normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSheet {
    pub name: String,
    pub description: ProcessDescription,
    pub rows: Vec<RawRow>,
}

/// Fully classified entries for one process sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessSheet {
    pub name: String,
    pub description: ProcessDescription,
    pub entries: Vec<Entry>,
}

impl ProcessSheet {
    /// The sheet's designated product entry. Exactly one exists after
    /// by-product consolidation.
    pub fn product(&self) -> Option<&Entry> {
        self.entries.iter().find(|e| e.is_product)
    }
}

/// Set of canonical product names accumulated across all sheets.
///
/// Built in a dedicated first pass before any classification begins, then
/// read-only: internal-activity detection depends on it being complete.
#[derive(Debug, Clone, Default)]
pub struct ProductRegistry {
    names: Vec<String>,
}

impl ProductRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a product name. Duplicates are ignored.
    pub fn add(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_string());
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }
}
