use std::time::SystemTime;

use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

/// The nine metals tracked in a vehicle's scrap composition.
///
/// The first six are base metals priced per pound; the catalytic-converter
/// metals (platinum, palladium, rhodium) are priced per troy ounce.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Metal {
    Steel,
    Aluminum,
    Copper,
    StainlessSteel,
    Brass,
    Lead,
    Platinum,
    Palladium,
    Rhodium,
}

impl Metal {
    pub const BASE: [Metal; 6] = [
        Metal::Steel,
        Metal::Aluminum,
        Metal::Copper,
        Metal::StainlessSteel,
        Metal::Brass,
        Metal::Lead,
    ];

    pub const PRECIOUS: [Metal; 3] = [Metal::Platinum, Metal::Palladium, Metal::Rhodium];

    pub const ALL: [Metal; 9] = [
        Metal::Steel,
        Metal::Aluminum,
        Metal::Copper,
        Metal::StainlessSteel,
        Metal::Brass,
        Metal::Lead,
        Metal::Platinum,
        Metal::Palladium,
        Metal::Rhodium,
    ];

    pub fn is_precious(self) -> bool {
        matches!(self, Metal::Platinum | Metal::Palladium | Metal::Rhodium)
    }

    pub fn label(self) -> &'static str {
        match self {
            Metal::Steel => "Steel",
            Metal::Aluminum => "Aluminum",
            Metal::Copper => "Copper",
            Metal::StainlessSteel => "Stainless Steel",
            Metal::Brass => "Brass",
            Metal::Lead => "Lead",
            Metal::Platinum => "Platinum",
            Metal::Palladium => "Palladium",
            Metal::Rhodium => "Rhodium",
        }
    }
}

/// Where a price quote came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceSource {
    LiveApi,
    Cached,
    Manual,
    Fallback,
}

impl PriceSource {
    pub fn label(self) -> &'static str {
        match self {
            PriceSource::LiveApi => "MetalPriceAPI",
            PriceSource::Cached => "Cached",
            PriceSource::Manual => "Manual (User Settings)",
            PriceSource::Fallback => "Fallback",
        }
    }
}

/// Current per-metal prices. Base metals in $/lb, precious metals in
/// $/troy oz.
///
/// A quote is always fully populated: metals the price feed does not carry
/// are backfilled from the fallback table before the quote is handed out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MetalPriceQuote {
    pub steel: f64,
    pub aluminum: f64,
    pub copper: f64,
    pub stainless_steel: f64,
    pub brass: f64,
    pub lead: f64,
    pub platinum: f64,
    pub palladium: f64,
    pub rhodium: f64,
    pub source: PriceSource,
    pub fetched_at: SystemTime,
}

impl MetalPriceQuote {
    /// Hardcoded scrap-yard prices, refreshed by hand when the feed is
    /// unreachable for long stretches. Last updated 2026-01-29.
    pub fn fallback() -> Self {
        Self {
            steel: 0.15,
            aluminum: 0.90,
            copper: 6.10,
            stainless_steel: 0.50,
            brass: 2.40,
            lead: 1.00,
            platinum: 2785.0,
            palladium: 1050.0,
            rhodium: 10000.0,
            source: PriceSource::Fallback,
            fetched_at: SystemTime::now(),
        }
    }

    pub fn price(&self, metal: Metal) -> f64 {
        match metal {
            Metal::Steel => self.steel,
            Metal::Aluminum => self.aluminum,
            Metal::Copper => self.copper,
            Metal::StainlessSteel => self.stainless_steel,
            Metal::Brass => self.brass,
            Metal::Lead => self.lead,
            Metal::Platinum => self.platinum,
            Metal::Palladium => self.palladium,
            Metal::Rhodium => self.rhodium,
        }
    }

    /// RFC 3339 rendering of the quote timestamp, for display and reports.
    pub fn fetched_at_rfc3339(&self) -> String {
        OffsetDateTime::from(self.fetched_at)
            .format(&Rfc3339)
            .unwrap_or_else(|_| "unknown".to_string())
    }
}

/// Weight fraction of each tracked metal for one vehicle class.
///
/// Fractions sum to well under 1; composition covers only the tracked
/// metals, not 100% of vehicle mass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetalComposition {
    pub steel: f64,
    pub aluminum: f64,
    pub copper: f64,
    pub stainless_steel: f64,
    pub brass: f64,
    pub lead: f64,
    pub platinum: f64,
    pub palladium: f64,
    pub rhodium: f64,
}

impl MetalComposition {
    pub fn fraction(&self, metal: Metal) -> f64 {
        match metal {
            Metal::Steel => self.steel,
            Metal::Aluminum => self.aluminum,
            Metal::Copper => self.copper,
            Metal::StainlessSteel => self.stainless_steel,
            Metal::Brass => self.brass,
            Metal::Lead => self.lead,
            Metal::Platinum => self.platinum,
            Metal::Palladium => self.palladium,
            Metal::Rhodium => self.rhodium,
        }
    }
}

/// Provenance of the weight carried by a [`VehicleRecord`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeightSource {
    /// Curb weight from the Auto.dev specs API.
    CurbWeightApi,
    /// Explicit weight stored in the bundled reference database.
    DatabaseRecord,
    /// Average weight for the matched vehicle class.
    ClassAverage,
    /// Nothing matched; global default class and weight.
    GlobalFallback,
}

impl WeightSource {
    pub fn label(self) -> &'static str {
        match self {
            WeightSource::CurbWeightApi => "Auto.dev Database",
            WeightSource::DatabaseRecord => "Reference Database",
            WeightSource::ClassAverage => "Class Average",
            WeightSource::GlobalFallback => "Fallback Estimate",
        }
    }
}

/// A resolved vehicle: EPA-style class plus a curb weight estimate.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VehicleRecord {
    pub vehicle_class: String,
    pub weight_lbs: u32,
    pub source: WeightSource,
}

/// Whether a looked-up value came from real data or from a default.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Provenance {
    Exact,
    Defaulted,
}

/// A value paired with its provenance, so callers and tests can tell real
/// data from silent fallbacks without re-deriving the lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Resolved<T> {
    pub value: T,
    pub provenance: Provenance,
}

impl<T> Resolved<T> {
    pub fn exact(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Exact,
        }
    }

    pub fn defaulted(value: T) -> Self {
        Self {
            value,
            provenance: Provenance::Defaulted,
        }
    }

    pub fn is_defaulted(&self) -> bool {
        self.provenance == Provenance::Defaulted
    }
}

/// Resolves an optional lookup result against a default, tagging which one
/// was taken.
pub fn resolve_with_default<T>(found: Option<T>, default: T) -> Resolved<T> {
    match found {
        Some(value) => Resolved::exact(value),
        None => Resolved::defaulted(default),
    }
}

/// User-entered scrap yard prices, used in place of API quotes when
/// `use_manual_prices` is set.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManualPrices {
    pub steel: f64,
    pub aluminum: f64,
    pub copper: f64,
    pub stainless_steel: f64,
    pub brass: f64,
    pub lead: f64,
    pub platinum: f64,
    pub palladium: f64,
    pub rhodium: f64,
}

impl ManualPrices {
    pub fn to_quote(&self) -> MetalPriceQuote {
        MetalPriceQuote {
            steel: self.steel,
            aluminum: self.aluminum,
            copper: self.copper,
            stainless_steel: self.stainless_steel,
            brass: self.brass,
            lead: self.lead,
            platinum: self.platinum,
            palladium: self.palladium,
            rhodium: self.rhodium,
            source: PriceSource::Manual,
            fetched_at: SystemTime::now(),
        }
    }
}

/// User cost assumptions and display/notification knobs.
///
/// Serde defaults keep partially persisted settings loadable across
/// versions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub target_profit: i64,
    pub fees: i64,
    pub transport_cost: i64,
    pub notifications_enabled: bool,
    /// Hours before auction close to raise a reminder.
    pub notify_before_auction: u32,
    pub notify_on_price_change: bool,
    /// Dollar drop that triggers a price-drop notification.
    pub notify_on_price_drop: i64,
    pub show_detailed_breakdown: bool,
    pub show_bidding_guidance: bool,
    pub use_manual_prices: bool,
    pub manual_prices: Option<ManualPrices>,
    /// MetalPriceAPI key; fallback prices are used when absent.
    pub metal_price_api_key: Option<String>,
    /// Kill switch for all price-feed calls.
    pub use_price_api: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            target_profit: 500,
            fees: 180,
            transport_cost: 100,
            notifications_enabled: true,
            notify_before_auction: 24,
            notify_on_price_change: true,
            notify_on_price_drop: 100,
            show_detailed_breakdown: true,
            show_bidding_guidance: true,
            use_manual_prices: false,
            manual_prices: None,
            metal_price_api_key: None,
            use_price_api: true,
        }
    }
}
