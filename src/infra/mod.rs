pub mod cache;
pub mod metal_api;
pub mod weights;
