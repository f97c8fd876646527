//! Scrap value computation: weight x composition x price, per metal.

use serde::{Deserialize, Serialize};

use super::composition::composition_for;
use super::entities::{Metal, MetalPriceQuote};

/// Grams per pound, used to value trace precious-metal content.
pub const GRAMS_PER_LB: f64 = 453.592;
/// Grams per troy ounce.
pub const GRAMS_PER_TROY_OZ: f64 = 31.1035;

/// Per-metal dollar line items plus derived totals.
///
/// Line items are rounded to the nearest whole dollar before summation, so
/// the totals are exact sums of what a report displays.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrapBreakdown {
    pub steel: i64,
    pub aluminum: i64,
    pub copper: i64,
    pub stainless_steel: i64,
    pub brass: i64,
    pub lead: i64,
    pub platinum: i64,
    pub palladium: i64,
    pub rhodium: i64,
    pub base_metals_total: i64,
    pub precious_metals_total: i64,
    pub grand_total: i64,
}

impl ScrapBreakdown {
    pub fn line_item(&self, metal: Metal) -> i64 {
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

/// Computes the scrap-value breakdown for a vehicle.
///
/// Unknown vehicle classes silently use the "Midsize Cars" composition;
/// the provenance of that substitution is not carried into the breakdown.
/// Deterministic and total for any `weight_lbs > 0`.
pub fn compute_scrap_value(
    weight_lbs: f64,
    vehicle_class: &str,
    prices: &MetalPriceQuote,
) -> ScrapBreakdown {
    let composition = composition_for(vehicle_class).value;

    // Base metals: lbs x fraction x $/lb.
    let base = |metal: Metal| -> i64 {
        (weight_lbs * composition.fraction(metal) * prices.price(metal)).round() as i64
    };

    // Precious metals: trace mass fraction to grams, grams to troy ounces,
    // then $/troy oz.
    let precious = |metal: Metal| -> i64 {
        let grams = weight_lbs * composition.fraction(metal) * GRAMS_PER_LB;
        (grams / GRAMS_PER_TROY_OZ * prices.price(metal)).round() as i64
    };

    let mut breakdown = ScrapBreakdown {
        steel: base(Metal::Steel),
        aluminum: base(Metal::Aluminum),
        copper: base(Metal::Copper),
        stainless_steel: base(Metal::StainlessSteel),
        brass: base(Metal::Brass),
        lead: base(Metal::Lead),
        platinum: precious(Metal::Platinum),
        palladium: precious(Metal::Palladium),
        rhodium: precious(Metal::Rhodium),
        base_metals_total: 0,
        precious_metals_total: 0,
        grand_total: 0,
    };
    breakdown.base_metals_total = Metal::BASE
        .iter()
        .map(|&metal| breakdown.line_item(metal))
        .sum();
    breakdown.precious_metals_total = Metal::PRECIOUS
        .iter()
        .map(|&metal| breakdown.line_item(metal))
        .sum();
    breakdown.grand_total = breakdown.base_metals_total + breakdown.precious_metals_total;
    breakdown
}

/// Signed profit estimate; negative means a loss at the current bid.
pub fn profit(scrap_total: i64, fees: i64, transport_cost: i64, current_bid: i64) -> i64 {
    scrap_total - fees - transport_cost - current_bid
}
