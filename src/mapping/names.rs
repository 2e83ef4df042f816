//! Name Normalizer: ordered pattern rules mapping free-text flow names to
//! canonical ecoinvent equivalents, plus ecoinvent-version substitutions.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::Entry;

/// One ordered name rule: the first rule whose pattern matches wins. A rule
/// with an `unless` pattern is suppressed when that pattern also matches.
struct NameRule {
    pattern: &'static str,
    unless: Option<&'static str>,
    canonical: &'static str,
}

/// Rules are evaluated top to bottom; precedence is the list order.
const NAME_RULES: &[NameRule] = &[
    NameRule {
        pattern: r"#electricity",
        unless: None,
        canonical: "market group for electricity, medium voltage",
    },
    NameRule {
        pattern: r"process heat|heating|industrial heat",
        unless: None,
        canonical: "market for heat, from steam, in chemical industry",
    },
    NameRule {
        pattern: r"#natural gas",
        unless: None,
        canonical: "market group for natural gas, high pressure",
    },
    NameRule {
        pattern: r"waste water",
        unless: None,
        canonical: "market for wastewater, average",
    },
    NameRule {
        pattern: r"CO2, fossil",
        unless: None,
        canonical: "Carbon dioxide, fossil",
    },
    NameRule {
        pattern: r"CO2, biogenic",
        unless: None,
        canonical: "Carbon dioxide, from soil or biomass stock",
    },
    NameRule {
        pattern: r"#cooling",
        unless: Some(r"Water, cooling, unspecified natural origin"),
        canonical: "market for cooling energy",
    },
];

fn compiled_rules() -> &'static Vec<(Regex, Option<Regex>, &'static str)> {
    static RULES: OnceLock<Vec<(Regex, Option<Regex>, &'static str)>> = OnceLock::new();
    RULES.get_or_init(|| {
        NAME_RULES
            .iter()
            .map(|rule| {
                let pattern = Regex::new(&format!("(?i){}", rule.pattern))
                    .expect("static name rule pattern must compile");
                let unless = rule.unless.map(|p| {
                    Regex::new(&format!("(?i){p}"))
                        .expect("static name rule pattern must compile")
                });
                (pattern, unless, rule.canonical)
            })
            .collect()
    })
}

/// Map a free-text flow name to its canonical equivalent. The first matching
/// rule wins; with no match the name passes through unchanged.
pub fn canonical_flow_name(name: &str) -> String {
    for (pattern, unless, canonical) in compiled_rules() {
        if pattern.is_match(name) {
            if let Some(unless) = unless {
                if unless.is_match(name) {
                    continue;
                }
            }
            return (*canonical).to_string();
        }
    }
    name.to_string()
}

/// Literal substitutions for ecoinvent 3.10 compatibility, applied when the
/// sheet input targets a newer naming scheme.
const VERSION_SUBSTITUTIONS: &[(&str, &str)] = &[
    ("waste steel", "scrap steel"),
    ("waste aluminium", "scrap aluminium"),
    ("waste copper", "scrap copper"),
    (
        "market for acetic acid",
        "market for acetic acid, without water, in 98% solution state",
    ),
];

/// Apply the ecoinvent 3.10 name substitutions to a flow name.
pub fn ecoinvent_3_10_name(name: &str) -> String {
    let mut name = name.to_string();
    for (from, to) in VERSION_SUBSTITUTIONS {
        name = name.replace(from, to);
    }
    name
}

/// Replace an entry's name with its canonical equivalent.
pub fn normalize_name(mut entry: Entry) -> Entry {
    entry.name = canonical_flow_name(&entry.name);
    entry
}

/// Apply the ecoinvent-version substitution pass to an entry.
pub fn apply_version_names(mut entry: Entry) -> Entry {
    entry.name = ecoinvent_3_10_name(&entry.name);
    entry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn electricity_hashtag_maps_to_market_group() {
        assert_eq!(
            canonical_flow_name("Xyz #electricity, local grid"),
            "market group for electricity, medium voltage"
        );
    }

    #[test]
    fn unmatched_name_passes_through() {
        assert_eq!(
            canonical_flow_name("sodium hydroxide, 50% solution"),
            "sodium hydroxide, 50% solution"
        );
    }

    #[test]
    fn first_matching_rule_wins() {
        // Matches both the heating rule (2nd) and the cooling rule (7th);
        // list order decides.
        assert_eq!(
            canonical_flow_name("district heating #cooling loop"),
            "market for heat, from steam, in chemical industry"
        );
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(
            canonical_flow_name("PROCESS HEAT from boiler"),
            "market for heat, from steam, in chemical industry"
        );
        assert_eq!(canonical_flow_name("co2, FOSSIL"), "Carbon dioxide, fossil");
    }

    #[test]
    fn cooling_rule_suppressed_by_natural_origin_water() {
        assert_eq!(
            canonical_flow_name("#cooling via Water, cooling, unspecified natural origin"),
            "#cooling via Water, cooling, unspecified natural origin"
        );
        assert_eq!(
            canonical_flow_name("site #cooling demand"),
            "market for cooling energy"
        );
    }

    #[test]
    fn biogenic_co2_maps_to_soil_or_biomass_stock() {
        assert_eq!(
            canonical_flow_name("CO2, biogenic from fermentation"),
            "Carbon dioxide, from soil or biomass stock"
        );
    }

    #[test]
    fn normalizer_is_idempotent() {
        let names = [
            "Xyz #electricity, local grid",
            "process heat for distillation",
            "waste water from scrubber",
            "already canonical name",
        ];
        for name in names {
            let once = canonical_flow_name(name);
            let twice = canonical_flow_name(&once);
            assert_eq!(once, twice, "not idempotent for {name:?}");
        }
    }

    #[test]
    fn version_substitutions_rewrite_waste_metals() {
        assert_eq!(ecoinvent_3_10_name("waste steel"), "scrap steel");
        assert_eq!(
            ecoinvent_3_10_name("waste aluminium, post-consumer"),
            "scrap aluminium, post-consumer"
        );
        assert_eq!(ecoinvent_3_10_name("waste copper"), "scrap copper");
    }

    #[test]
    fn version_substitution_expands_acetic_acid() {
        assert_eq!(
            ecoinvent_3_10_name("market for acetic acid"),
            "market for acetic acid, without water, in 98% solution state"
        );
    }
}
