//! Scrap-value estimation and bidding guidance for salvage vehicle auction
//! lots.
//!
//! Given a listing's year, make, model and current bid, the crate resolves
//! the vehicle to a class and curb weight, values its recoverable metal
//! content against live or cached scrap prices, and derives tiered
//! maximum-bid guidance with a classification of the current bid.

pub mod app;
pub mod domain;
pub mod infra;
pub mod util;

pub use app::{AnalyzerError, LotAnalysis, LotAnalyzer, LotListing};
