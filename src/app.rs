//! Top-level lot analysis: wires the price and weight clients to the pure
//! valuation and guidance logic.

use thiserror::Error;

use crate::domain::entities::{MetalPriceQuote, Settings, VehicleRecord};
use crate::domain::guidance::{self, BidStatus, BiddingGuidance, BuyRecommendation};
use crate::domain::valuation::{self, ScrapBreakdown};
use crate::infra::metal_api::{PriceClient, PriceClientError};
use crate::infra::weights::{WeightClient, WeightClientError};

#[derive(Debug, Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Prices(#[from] PriceClientError),
    #[error(transparent)]
    Weights(#[from] WeightClientError),
}

/// A lot as scraped or typed in from an auction page.
#[derive(Clone, Debug, PartialEq)]
pub struct LotListing {
    pub year: String,
    pub make: String,
    pub model: String,
    pub current_bid: i64,
}

/// Full analysis of one lot.
#[derive(Clone, Debug, PartialEq)]
pub struct LotAnalysis {
    pub vehicle: VehicleRecord,
    pub prices: MetalPriceQuote,
    pub breakdown: ScrapBreakdown,
    pub profit: i64,
    pub recommendation: BuyRecommendation,
    pub guidance: BiddingGuidance,
    pub bid_status: BidStatus,
}

/// Holds the clients and settings; one instance serves the whole session.
pub struct LotAnalyzer {
    prices: PriceClient,
    weights: WeightClient,
    settings: Settings,
}

impl LotAnalyzer {
    pub fn new(settings: Settings) -> Result<Self, AnalyzerError> {
        let prices = PriceClient::new()?;
        let weights = WeightClient::new(None)?;
        Ok(Self {
            prices,
            weights,
            settings,
        })
    }

    pub fn with_clients(prices: PriceClient, weights: WeightClient, settings: Settings) -> Self {
        Self {
            prices,
            weights,
            settings,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
    }

    /// Analyzes one listing end to end. Vehicle resolution and price
    /// lookups never fail outright, so the only errors are client
    /// construction problems surfaced earlier.
    pub async fn analyze(&self, listing: &LotListing) -> LotAnalysis {
        let vehicle = self
            .weights
            .resolve_vehicle(&listing.year, &listing.make, &listing.model)
            .await;
        let prices = self.prices.get_prices(&self.settings).await;

        let breakdown = valuation::compute_scrap_value(
            f64::from(vehicle.weight_lbs),
            &vehicle.vehicle_class,
            &prices,
        );
        let profit = valuation::profit(
            breakdown.grand_total,
            self.settings.fees,
            self.settings.transport_cost,
            listing.current_bid,
        );
        let recommendation = guidance::buy_recommendation(profit);
        let guidance = guidance::guide(
            breakdown.grand_total,
            self.settings.fees,
            self.settings.transport_cost,
            self.settings.target_profit,
        );
        let bid_status = guidance::classify_current_bid(listing.current_bid, &guidance);

        println!(
            "[analyze] {} {} {}: {} lbs ({}), scrap ${}, profit ${} at bid ${}",
            listing.year,
            listing.make,
            listing.model,
            vehicle.weight_lbs,
            vehicle.source.label(),
            breakdown.grand_total,
            profit,
            listing.current_bid
        );

        LotAnalysis {
            vehicle,
            prices,
            breakdown,
            profit,
            recommendation,
            guidance,
            bid_status,
        }
    }
}
