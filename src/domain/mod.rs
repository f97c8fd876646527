//! Pure lot-analysis logic: no IO, no clocks beyond timestamping saves.

pub mod composition;
pub mod entities;
pub mod guidance;
pub mod lots;
pub mod resolver;
pub mod valuation;

pub use entities::{
    ManualPrices, Metal, MetalComposition, MetalPriceQuote, PriceSource, Provenance, Resolved,
    Settings, VehicleRecord, WeightSource,
};
pub use guidance::{BidStatus, BidStatusKind, BidZone, BiddingGuidance, BuyRecommendation};
pub use lots::{LotSeed, LotSort, LotStore, PersistedState, SavedLot};
pub use valuation::ScrapBreakdown;
