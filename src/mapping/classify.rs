//! Category, location, and type classification, plus the type → database
//! resolver.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::{Entry, EntryType};

/// Fallback region when the source data provides no location.
pub const DEFAULT_LOCATION: &str = "RER";

/// Fixed biosphere database identifier.
pub const BIOSPHERE_DATABASE: &str = "biosphere3";

/// Canonical activities that override the resolved location regardless of
/// origin, keyed by canonical name.
const LOCATION_OVERRIDES: &[(&str, &str)] = &[
    (
        "market group for natural gas, high pressure",
        "Europe without Switzerland",
    ),
    ("market for wastewater, average", "Europe without Switzerland"),
    ("market for cooling energy", "GLO"),
    ("market for chemical factory, organics", "GLO"),
];

/// Emission names whose category is always "air".
const AIR_EMISSIONS: &[&str] = &[
    "Carbon dioxide, fossil",
    "Carbon dioxide, from soil or biomass stock",
];

fn compartment_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:water|air|natural|soil|inventory|economic)\b")
            .expect("static compartment pattern must compile")
    })
}

fn biosphere_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)water|air|natural|soil")
            .expect("static biosphere pattern must compile")
    })
}

/// Set the environmental category: "air" for recognized CO₂ emissions,
/// otherwise the full origin string when the origin names an environmental
/// compartment (compartment plus optional sub-path).
pub fn assign_category(mut entry: Entry) -> Entry {
    if AIR_EMISSIONS
        .iter()
        .any(|e| entry.name.to_lowercase().contains(&e.to_lowercase()))
    {
        entry.category = Some("air".to_string());
    } else if compartment_pattern().is_match(&entry.origin) {
        entry.category = Some(entry.origin.clone());
    }
    entry
}

/// Resolve the geographic location code from the origin hint and the static
/// per-activity override table.
pub fn resolve_location(mut entry: Entry) -> Entry {
    let origin = entry.origin.trim();
    let location = match origin {
        "EUR" | "EU" => DEFAULT_LOCATION.to_string(),
        "" => DEFAULT_LOCATION.to_string(),
        other => other.to_string(),
    };
    entry.location = LOCATION_OVERRIDES
        .iter()
        .find(|(name, _)| *name == entry.name)
        .map(|(_, loc)| (*loc).to_string())
        .unwrap_or(location);
    entry
}

/// Classify the entry type. Precedence: product row → production; category
/// naming an environmental compartment → biosphere; else technosphere.
pub fn assign_type(mut entry: Entry) -> Entry {
    entry.entry_type = Some(if entry.is_product {
        EntryType::Production
    } else if entry
        .category
        .as_deref()
        .is_some_and(|c| biosphere_pattern().is_match(c))
    {
        EntryType::Biosphere
    } else {
        EntryType::Technosphere
    });
    entry
}

/// Map an entry type to its target database identifier.
pub fn resolve_database(
    entry_type: EntryType,
    background_database: &str,
    activity_database: &str,
) -> String {
    match entry_type {
        EntryType::Biosphere => BIOSPHERE_DATABASE.to_string(),
        EntryType::Technosphere => background_database.to_string(),
        EntryType::Production => activity_database.to_string(),
    }
}

/// Set the entry's database from its resolved type.
pub fn assign_database(
    mut entry: Entry,
    background_database: &str,
    activity_database: &str,
) -> Entry {
    entry.database = entry
        .entry_type
        .map(|t| resolve_database(t, background_database, activity_database));
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, origin: &str) -> Entry {
        Entry {
            name: name.into(),
            origin: origin.into(),
            ..Entry::default()
        }
    }

    #[test]
    fn fossil_co2_category_is_air() {
        let classified = assign_category(entry("Carbon dioxide, fossil", "EU"));
        assert_eq!(classified.category.as_deref(), Some("air"));
    }

    #[test]
    fn compartment_origin_becomes_full_category() {
        let classified = assign_category(entry("Ammonia", "air: urban air close to ground"));
        assert_eq!(
            classified.category.as_deref(),
            Some("air: urban air close to ground")
        );
    }

    #[test]
    fn plain_region_origin_sets_no_category() {
        let classified = assign_category(entry("toluene", "RER"));
        assert!(classified.category.is_none());
    }

    #[test]
    fn eu_origin_resolves_to_rer() {
        assert_eq!(resolve_location(entry("toluene", "EU")).location, "RER");
        assert_eq!(resolve_location(entry("toluene", "EUR")).location, "RER");
    }

    #[test]
    fn empty_origin_defaults_to_rer() {
        assert_eq!(resolve_location(entry("toluene", "")).location, "RER");
    }

    #[test]
    fn explicit_origin_is_kept() {
        assert_eq!(resolve_location(entry("toluene", "CH")).location, "CH");
    }

    #[test]
    fn override_table_beats_origin() {
        let located = resolve_location(entry("market group for natural gas, high pressure", "EU"));
        assert_eq!(located.location, "Europe without Switzerland");

        let located = resolve_location(entry("market for cooling energy", "CH"));
        assert_eq!(located.location, "GLO");

        let located = resolve_location(entry("market for chemical factory, organics", ""));
        assert_eq!(located.location, "GLO");
    }

    #[test]
    fn product_row_wins_type_precedence() {
        // Product flag beats a biosphere-looking category.
        let mut e = entry("Carbon dioxide, fossil", "air");
        e.category = Some("air".into());
        e.is_product = true;
        let typed = assign_type(e);
        assert_eq!(typed.entry_type, Some(EntryType::Production));
    }

    #[test]
    fn compartment_category_is_biosphere() {
        let mut e = entry("Carbon dioxide, fossil", "");
        e.category = Some("air".into());
        let typed = assign_type(e);
        assert_eq!(typed.entry_type, Some(EntryType::Biosphere));
    }

    #[test]
    fn no_category_defaults_to_technosphere() {
        let typed = assign_type(entry("toluene", "RER"));
        assert_eq!(typed.entry_type, Some(EntryType::Technosphere));
    }

    #[test]
    fn databases_follow_type() {
        assert_eq!(
            resolve_database(EntryType::Biosphere, "ecoinvent-3.10", "my-activities"),
            "biosphere3"
        );
        assert_eq!(
            resolve_database(EntryType::Technosphere, "ecoinvent-3.10", "my-activities"),
            "ecoinvent-3.10"
        );
        assert_eq!(
            resolve_database(EntryType::Production, "ecoinvent-3.10", "my-activities"),
            "my-activities"
        );
    }

    #[test]
    fn assign_database_requires_type() {
        let unassigned = assign_database(entry("toluene", ""), "bg", "fg");
        assert!(unassigned.database.is_none());

        let typed = assign_type(entry("toluene", ""));
        let assigned = assign_database(typed, "bg", "fg");
        assert_eq!(assigned.database.as_deref(), Some("bg"));
    }
}
