//! Unit Converter: a chain of substance-scoped converters driven by a static
//! substance table. Substance detection (whole-word keyword match) and the
//! conversion itself are separate steps, so new substances are added by
//! table entry.

use std::sync::OnceLock;

use regex::Regex;

use crate::model::Entry;

/// Reference temperature for all densities, 20 °C.
pub const REFERENCE_TEMPERATURE_K: f64 = 293.15;

/// kWh → MJ.
const KWH_TO_MJ: f64 = 3.6;

// Densities in kg/m³ at 293.15 K.
const DENSITY_NATURAL_GAS: f64 = 0.735; // ecoinvent "market group for natural gas, high pressure"
const DENSITY_WASTE_WATER: f64 = 998.0;
const DENSITY_WATER: f64 = 998.21;
const DENSITY_ETHANOL: f64 = 789.3;
const DENSITY_METHANOL: f64 = 791.8;
const DENSITY_ARGON: f64 = 1.661;
const DENSITY_NITROGEN: f64 = 1.165;
const DENSITY_TOLUENE: f64 = 866.9;
const DENSITY_ACETONE: f64 = 784.5;
const DENSITY_HEXANE: f64 = 660.6;

/// Molar mass of water in g/mol.
const MOLAR_MASS_WATER: f64 = 18.015;

/// How a matched substance converts between units.
#[derive(Debug, Clone, Copy)]
enum Conversion {
    /// kilowatt hour → megajoule.
    EnergyKwhToMj,
    /// kilogram → cubic meter through a density in kg/m³.
    MassToVolume { density: f64 },
    /// milliliter or liter → kilogram through a density in kg/m³; an
    /// optional molar mass in g/mol additionally enables mmol → kilogram.
    VolumeToMass {
        density: f64,
        molar_mass: Option<f64>,
    },
}

struct SubstanceRule {
    /// Keywords matched whole-word and case-insensitively against the name.
    keywords: &'static [&'static str],
    conversion: Conversion,
}

/// Substance keywords are mutually exclusive in well-formed names, so at
/// most one rule fires per entry and chain order is irrelevant.
const SUBSTANCE_RULES: &[SubstanceRule] = &[
    SubstanceRule {
        keywords: &["heat", "heating", "cooling"],
        conversion: Conversion::EnergyKwhToMj,
    },
    SubstanceRule {
        keywords: &["natural gas"],
        conversion: Conversion::MassToVolume {
            density: DENSITY_NATURAL_GAS,
        },
    },
    SubstanceRule {
        keywords: &["waste water", "wastewater"],
        conversion: Conversion::MassToVolume {
            density: DENSITY_WASTE_WATER,
        },
    },
    SubstanceRule {
        keywords: &["market for water, ultrapure"],
        conversion: Conversion::VolumeToMass {
            density: DENSITY_WATER,
            molar_mass: Some(MOLAR_MASS_WATER),
        },
    },
    SubstanceRule {
        keywords: &["ethanol"],
        conversion: Conversion::VolumeToMass {
            density: DENSITY_ETHANOL,
            molar_mass: None,
        },
    },
    SubstanceRule {
        keywords: &["methanol"],
        conversion: Conversion::VolumeToMass {
            density: DENSITY_METHANOL,
            molar_mass: None,
        },
    },
    SubstanceRule {
        keywords: &["argon"],
        conversion: Conversion::VolumeToMass {
            density: DENSITY_ARGON,
            molar_mass: None,
        },
    },
    SubstanceRule {
        keywords: &["nitrogen"],
        conversion: Conversion::VolumeToMass {
            density: DENSITY_NITROGEN,
            molar_mass: None,
        },
    },
    SubstanceRule {
        keywords: &["toluene"],
        conversion: Conversion::VolumeToMass {
            density: DENSITY_TOLUENE,
            molar_mass: None,
        },
    },
    SubstanceRule {
        keywords: &["acetone"],
        conversion: Conversion::VolumeToMass {
            density: DENSITY_ACETONE,
            molar_mass: None,
        },
    },
    SubstanceRule {
        keywords: &["hexane"],
        conversion: Conversion::VolumeToMass {
            density: DENSITY_HEXANE,
            molar_mass: None,
        },
    },
];

fn keyword_patterns() -> &'static Vec<Vec<Regex>> {
    static PATTERNS: OnceLock<Vec<Vec<Regex>>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        SUBSTANCE_RULES
            .iter()
            .map(|rule| {
                rule.keywords
                    .iter()
                    .map(|kw| {
                        Regex::new(&format!(r"(?i)\b{}\b", regex::escape(kw)))
                            .expect("static substance keyword must compile")
                    })
                    .collect()
            })
            .collect()
    })
}

/// Map a raw unit abbreviation to its canonical full name. Unknown units
/// pass through unchanged.
pub fn canonical_unit_name(unit: &str) -> String {
    match unit.trim() {
        "kg" => "kilogram",
        "t" => "ton",
        "kWh" => "kilowatt hour",
        "m3" => "cubic meter",
        "m2" => "square meter",
        "MJ" => "megajoule",
        "ml" => "milliliter",
        "l" => "liter",
        "unit" => "unit",
        other => return other.to_string(),
    }
    .to_string()
}

/// Detect the substance named by an entry. Returns the index of the first
/// rule with a whole-word keyword match.
fn detect_substance(name: &str) -> Option<usize> {
    keyword_patterns()
        .iter()
        .position(|patterns| patterns.iter().any(|p| p.is_match(name)))
}

/// Apply one conversion to a unit/amount pair. A no-op unless the current
/// unit is one of the conversion's recognized source units; unit and amount
/// always change together.
fn apply_conversion(conversion: Conversion, unit: &str, amount: f64) -> Option<(String, f64)> {
    match conversion {
        Conversion::EnergyKwhToMj => match unit {
            "kilowatt hour" => Some(("megajoule".into(), amount * KWH_TO_MJ)),
            _ => None,
        },
        Conversion::MassToVolume { density } => match unit {
            "kilogram" => Some(("cubic meter".into(), amount / density)),
            _ => None,
        },
        Conversion::VolumeToMass { density, molar_mass } => match unit {
            // ml → m³ → kg
            "milliliter" => Some(("kilogram".into(), amount / 1e6 * density)),
            // l → m³ → kg
            "liter" => Some(("kilogram".into(), amount / 1e3 * density)),
            // mmol → mol → g → kg
            "mmol" => molar_mass.map(|mw| ("kilogram".into(), amount / 1e3 * mw / 1e3)),
            _ => None,
        },
    }
}

/// Run the substance conversion chain over one entry. A no-op unless a
/// substance keyword matches and the unit is in a convertible state.
pub fn convert_units(mut entry: Entry) -> Entry {
    let Some(idx) = detect_substance(&entry.name) else {
        return entry;
    };
    if let Some((unit, amount)) = apply_conversion(SUBSTANCE_RULES[idx].conversion, &entry.unit, entry.amount) {
        tracing::debug!(
            name = %entry.name,
            from = %entry.unit,
            to = %unit,
            "converted unit"
        );
        entry.unit = unit;
        entry.amount = amount;
    }
    entry
}

/// Generic factory/equipment entries carry a purely nominal unit. Assigns
/// the default unit "unit" to the chemical-factory activity when the sheet
/// provides none.
pub fn ensure_default_unit(mut entry: Entry) -> Entry {
    if entry.unit.trim().is_empty()
        && entry
            .name
            .to_lowercase()
            .contains("market for chemical factory, organics")
    {
        entry.unit = "unit".to_string();
    }
    entry
}
