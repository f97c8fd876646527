//! Fuzzy resolution of (year, make, model) against the bundled vehicle
//! reference database.
//!
//! Auction listings spell vehicles loosely ("F-150 SUPERCREW SXT"), so model
//! matching runs an ordered ladder of strategies, most precise first. Every
//! fallback narrows information: an exact record beats a nearby year, which
//! beats a class average, which beats the global default.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::composition::DEFAULT_VEHICLE_CLASS;
use super::entities::{resolve_with_default, Resolved, VehicleRecord, WeightSource};

/// Average curb weight of the default class.
pub const FALLBACK_WEIGHT_LBS: u32 = 3500;

/// Trim-level words stripped from listing model names before matching.
pub const TRIM_LEVELS: [&str; 18] = [
    "SXT", "GT", "SE", "LE", "LX", "EX", "LTD", "LIMITED", "SPORT", "PREMIUM", "PLUS", "BASE",
    "TOURING", "AWD", "4WD", "2WD", "FWD", "RWD",
];

/// One model-year entry in the reference database.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DbEntry {
    #[serde(rename = "vehicleType")]
    pub vehicle_class: String,
    /// Curb weight in lbs; absent entries fall back to the class average.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

/// make -> model -> year -> entry. BTreeMaps keep candidate iteration
/// deterministic.
pub type VehicleDatabase = BTreeMap<String, BTreeMap<String, BTreeMap<String, DbEntry>>>;

/// Lowercases and strips hyphens and whitespace for comparison.
pub fn normalize(text: &str) -> String {
    text.trim()
        .chars()
        .filter(|c| *c != '-' && !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Drops trim-level words ("CHARGER SXT" -> "CHARGER").
fn strip_trim_levels(model: &str) -> String {
    model
        .split_whitespace()
        .filter(|word| !TRIM_LEVELS.iter().any(|trim| trim.eq_ignore_ascii_case(word)))
        .collect::<Vec<_>>()
        .join(" ")
}

fn first_token(text: &str) -> &str {
    text.split_whitespace().next().unwrap_or(text)
}

/// Ordered model-match ladder; earlier strategies are more precise.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchStrategy {
    /// Normalized equality.
    Exact,
    /// Normalized equality after stripping trim-level words.
    TrimStripped,
    /// First token of the candidate against the first token of the
    /// trim-stripped search term.
    FirstToken,
    /// Search term appears as a whole word of the candidate; only attempted
    /// for terms of three or more characters.
    WordBoundary,
}

pub const MATCH_ORDER: [MatchStrategy; 4] = [
    MatchStrategy::Exact,
    MatchStrategy::TrimStripped,
    MatchStrategy::FirstToken,
    MatchStrategy::WordBoundary,
];

impl MatchStrategy {
    pub fn try_match(self, candidate: &str, search: &str) -> bool {
        match self {
            MatchStrategy::Exact => normalize(candidate) == normalize(search),
            MatchStrategy::TrimStripped => {
                normalize(candidate) == normalize(&strip_trim_levels(search))
            }
            MatchStrategy::FirstToken => {
                let base = strip_trim_levels(search);
                normalize(first_token(candidate)) == normalize(first_token(&base))
            }
            MatchStrategy::WordBoundary => {
                let needle = normalize(search);
                needle.len() >= 3
                    && candidate
                        .split(|c: char| c.is_whitespace() || c == '-')
                        .any(|word| normalize(word) == needle)
            }
        }
    }
}

fn find_make<'a>(
    db: &'a VehicleDatabase,
    make: &str,
) -> Option<&'a BTreeMap<String, BTreeMap<String, DbEntry>>> {
    let wanted = normalize(make);
    db.iter()
        .find(|(key, _)| normalize(key) == wanted)
        .map(|(_, models)| models)
}

fn find_model<'a>(
    models: &'a BTreeMap<String, BTreeMap<String, DbEntry>>,
    model: &str,
) -> Option<&'a BTreeMap<String, DbEntry>> {
    for strategy in MATCH_ORDER {
        if let Some((_, years)) = models
            .iter()
            .find(|(candidate, _)| strategy.try_match(candidate, model))
        {
            return Some(years);
        }
    }
    None
}

/// Exact year first, else the numerically closest year within +/-3.
fn find_closest_year<'a>(years: &'a BTreeMap<String, DbEntry>, year: &str) -> Option<&'a DbEntry> {
    if let Some(entry) = years.get(year.trim()) {
        return Some(entry);
    }
    let target: i32 = year.trim().parse().ok()?;
    years
        .iter()
        .filter_map(|(key, entry)| {
            key.parse::<i32>()
                .ok()
                .map(|value| ((value - target).abs(), entry))
        })
        .filter(|(distance, _)| *distance <= 3)
        .min_by_key(|(distance, _)| *distance)
        .map(|(_, entry)| entry)
}

/// Average curb weights per EPA vehicle class.
pub fn class_average_weight(vehicle_class: &str) -> Resolved<u32> {
    let weight = match vehicle_class {
        "Two Seaters" => 2900,
        "Minicompact Cars" => 2400,
        "Subcompact Cars" => 2700,
        "Compact Cars" => 3100,
        "Midsize Cars" => 3500,
        "Large Cars" => 4100,
        "Small Station Wagons" => 3300,
        "Midsize Station Wagons" => 3700,
        "Midsize-Large Station Wagons" => 4000,
        "Small Pickup Trucks" => 3600,
        "Small Pickup Trucks 2WD" => 3500,
        "Small Pickup Trucks 4WD" => 3700,
        "Standard Pickup Trucks" => 4800,
        "Standard Pickup Trucks 2WD" | "Standard Pickup Trucks/2wd" => 4600,
        "Standard Pickup Trucks 4WD" => 5000,
        "Vans" => 4800,
        "Vans Passenger" | "Vans, Passenger Type" => 5000,
        "Vans, Cargo Type" => 4600,
        "Minivan - 2WD" => 4200,
        "Minivan - 4WD" => 4400,
        "Small Sport Utility Vehicle 2WD" => 3600,
        "Small Sport Utility Vehicle 4WD" => 3800,
        "Sport Utility Vehicle - 2WD" | "Standard Sport Utility Vehicle 2WD" => 4300,
        "Sport Utility Vehicle - 4WD" | "Standard Sport Utility Vehicle 4WD" => 4500,
        "Special Purpose Vehicle" | "Special Purpose Vehicles" => 5200,
        "Special Purpose Vehicle 2WD" | "Special Purpose Vehicles/2wd" => 5000,
        "Special Purpose Vehicle 4WD" | "Special Purpose Vehicles/4wd" => 5400,
        _ => return Resolved::defaulted(FALLBACK_WEIGHT_LBS),
    };
    Resolved::exact(weight)
}

/// Record returned when nothing in the database matches.
pub fn fallback_record() -> VehicleRecord {
    VehicleRecord {
        vehicle_class: DEFAULT_VEHICLE_CLASS.to_string(),
        weight_lbs: FALLBACK_WEIGHT_LBS,
        source: WeightSource::GlobalFallback,
    }
}

fn record_from_entry(entry: &DbEntry) -> VehicleRecord {
    let weight = resolve_with_default(entry.weight, class_average_weight(&entry.vehicle_class).value);
    VehicleRecord {
        vehicle_class: entry.vehicle_class.clone(),
        weight_lbs: weight.value,
        source: if weight.is_defaulted() {
            WeightSource::ClassAverage
        } else {
            WeightSource::DatabaseRecord
        },
    }
}

/// Resolves a listing's (year, make, model) to a vehicle class and weight.
///
/// Total function: unmatched makes and models fall back to the default
/// class, and a model matched without a usable year still pins the class
/// through an arbitrary available year, which beats the global default.
pub fn resolve(db: &VehicleDatabase, year: &str, make: &str, model: &str) -> VehicleRecord {
    let Some(models) = find_make(db, make) else {
        return fallback_record();
    };
    let Some(years) = find_model(models, model) else {
        return fallback_record();
    };
    match find_closest_year(years, year) {
        Some(entry) => record_from_entry(entry),
        None => match years.values().next() {
            Some(entry) => record_from_entry(entry),
            None => fallback_record(),
        },
    }
}
