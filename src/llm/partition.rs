//! Entry partitioning for the classification call, structuring of mapped
//! lines, and recombination of the sheet.

use crate::model::{Entry, ProductRegistry};

/// A sheet's entries split for classification: the designated product, the
/// internal activities (resolved by registry lookup, not by the external
/// classifier), and the remainder that actually goes to the service.
#[derive(Debug, Clone, Default)]
pub struct PartitionedSheet {
    pub product: Option<Entry>,
    pub internal: Vec<Entry>,
    pub unclassified: Vec<Entry>,
}

/// Partition a sheet's entries. The product entry is the first row flagged
/// as product; entries whose name matches a known product from another
/// sheet are internal activities.
pub fn partition_entries(entries: &[Entry], registry: &ProductRegistry) -> PartitionedSheet {
    let mut partitioned = PartitionedSheet::default();
    for entry in entries {
        if entry.is_product && partitioned.product.is_none() {
            partitioned.product = Some(entry.clone());
        } else if registry.contains(&entry.name) {
            partitioned.internal.push(entry.clone());
        } else {
            partitioned.unclassified.push(entry.clone());
        }
    }
    partitioned
}

/// Parse a mapped quantity field. Blank, `N/A`, and unparsable values
/// default to 0.0.
pub fn parse_quantity(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("n/a") {
        return 0.0;
    }
    trimmed.parse().unwrap_or(0.0)
}

/// Split one mapped line into a structured entry. Lines split on `" | "`
/// into up to four fields (name, origin, unit, quantity), missing fields
/// padding to empty; a literal `unknown` produces a sentinel record.
pub fn structure_result(line: &str) -> Entry {
    let trimmed = line.trim();
    if trimmed.eq_ignore_ascii_case("unknown") {
        return Entry {
            name: "unknown".to_string(),
            ..Entry::default()
        };
    }

    let mut fields = trimmed.split(" | ").map(str::trim);
    Entry {
        name: fields.next().unwrap_or_default().to_string(),
        origin: fields.next().unwrap_or_default().to_string(),
        unit: fields.next().unwrap_or_default().to_string(),
        amount: parse_quantity(fields.next().unwrap_or_default()),
        ..Entry::default()
    }
}

/// Structure every mapped line, in order.
pub fn structure_results(results: &[String]) -> Vec<Entry> {
    results.iter().map(|line| structure_result(line)).collect()
}

/// Reassemble the sheet: product entry first, then the structured entries,
/// then the internal activities. Exact duplicate rows are removed and the
/// ordering reset.
pub fn recombine(
    product: Option<Entry>,
    structured: Vec<Entry>,
    internal: Vec<Entry>,
) -> Vec<Entry> {
    let mut combined: Vec<Entry> = Vec::new();
    for entry in product
        .into_iter()
        .chain(structured)
        .chain(internal)
    {
        if !combined.contains(&entry) {
            combined.push(entry);
        }
    }
    combined
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> Entry {
        Entry {
            name: name.into(),
            ..Entry::default()
        }
    }

    fn product(name: &str) -> Entry {
        Entry {
            name: name.into(),
            is_product: true,
            ..Entry::default()
        }
    }

    #[test]
    fn partition_separates_product_internal_and_rest() {
        let mut registry = ProductRegistry::new();
        registry.add("intermediate, from sheet A");

        let entries = vec![
            product("final product"),
            entry("intermediate, from sheet A"),
            entry("toluene"),
            entry("process heat"),
        ];
        let partitioned = partition_entries(&entries, &registry);
        assert_eq!(partitioned.product.as_ref().unwrap().name, "final product");
        assert_eq!(partitioned.internal.len(), 1);
        assert_eq!(partitioned.internal[0].name, "intermediate, from sheet A");
        assert_eq!(partitioned.unclassified.len(), 2);
    }

    #[test]
    fn only_first_product_row_is_the_product() {
        let entries = vec![product("main"), product("by-product")];
        let partitioned = partition_entries(&entries, &ProductRegistry::new());
        assert_eq!(partitioned.product.as_ref().unwrap().name, "main");
        // The second product row falls through to unclassified.
        assert_eq!(partitioned.unclassified.len(), 1);
    }

    #[test]
    fn quantity_parsing_defaults_to_zero() {
        assert_eq!(parse_quantity("2.5"), 2.5);
        assert_eq!(parse_quantity(" -1.0 "), -1.0);
        assert_eq!(parse_quantity(""), 0.0);
        assert_eq!(parse_quantity("N/A"), 0.0);
        assert_eq!(parse_quantity("n/a"), 0.0);
        assert_eq!(parse_quantity("about three"), 0.0);
    }

    #[test]
    fn structure_splits_four_fields() {
        let entry = structure_result("market for toluene | RER | kilogram | 0.8669");
        assert_eq!(entry.name, "market for toluene");
        assert_eq!(entry.origin, "RER");
        assert_eq!(entry.unit, "kilogram");
        assert!((entry.amount - 0.8669).abs() < 1e-12);
    }

    #[test]
    fn structure_pads_missing_fields() {
        let entry = structure_result("market for toluene | RER");
        assert_eq!(entry.name, "market for toluene");
        assert_eq!(entry.origin, "RER");
        assert_eq!(entry.unit, "");
        assert_eq!(entry.amount, 0.0);
    }

    #[test]
    fn structure_unknown_is_a_sentinel() {
        let entry = structure_result("Unknown");
        assert_eq!(entry.name, "unknown");
        assert_eq!(entry.origin, "");
        assert_eq!(entry.unit, "");
        assert_eq!(entry.amount, 0.0);
    }

    #[test]
    fn recombine_orders_and_deduplicates() {
        let combined = recombine(
            Some(product("main")),
            vec![entry("a"), entry("b"), entry("a")],
            vec![entry("internal"), entry("b")],
        );
        let names: Vec<&str> = combined.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["main", "a", "b", "internal"]);
    }

    #[test]
    fn recombine_without_product() {
        let combined = recombine(None, vec![entry("a")], vec![]);
        assert_eq!(combined.len(), 1);
    }
}
