//! Persistent on-disk caching for metal prices and curb weights, with TTL.

use std::{
    collections::HashMap,
    fs,
    path::PathBuf,
    sync::OnceLock,
    time::{Duration, SystemTime, UNIX_EPOCH},
};

use serde::{Deserialize, Serialize};

use crate::domain::entities::{MetalPriceQuote, WeightSource};

const PRICES_CACHE_FILENAME: &str = "metal_prices_cache.json";
const WEIGHTS_CACHE_FILENAME: &str = "vehicle_weights_cache.json";

/// Price cache TTL: 24 hours. Scrap yards don't reprice faster than that.
pub const PRICE_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

/// Weight cache TTL: 24 hours.
pub const WEIGHT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

fn age_string(secs: u64) -> String {
    if secs < 60 {
        format!("{secs}s")
    } else if secs < 3600 {
        format!("{}m", secs / 60)
    } else if secs < 86400 {
        format!("{}h", secs / 3600)
    } else {
        format!("{}d", secs / 86400)
    }
}

/// Cached metal price quote with TTL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceCache {
    /// Unix timestamp (seconds) when this cache was created.
    pub cached_at: u64,
    pub quote: MetalPriceQuote,
}

impl PriceCache {
    pub fn new(quote: MetalPriceQuote) -> Self {
        Self {
            cached_at: now_secs(),
            quote,
        }
    }

    pub fn is_expired(&self) -> bool {
        self.age() > PRICE_CACHE_TTL
    }

    pub fn age(&self) -> Duration {
        Duration::from_secs(now_secs().saturating_sub(self.cached_at))
    }

    pub fn age_string(&self) -> String {
        age_string(self.age().as_secs())
    }
}

/// One cached curb-weight resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedWeight {
    pub cached_at: u64,
    pub weight_lbs: u32,
    pub vehicle_class: String,
    pub source: WeightSource,
}

impl CachedWeight {
    pub fn new(weight_lbs: u32, vehicle_class: String, source: WeightSource) -> Self {
        Self {
            cached_at: now_secs(),
            weight_lbs,
            vehicle_class,
            source,
        }
    }

    pub fn is_expired(&self) -> bool {
        let age = now_secs().saturating_sub(self.cached_at);
        Duration::from_secs(age) > WEIGHT_CACHE_TTL
    }
}

/// Curb weights keyed by `weight_{year}_{make}_{model}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightCache {
    pub entries: HashMap<String, CachedWeight>,
}

impl WeightCache {
    pub fn lookup_key(year: &str, make: &str, model: &str) -> String {
        format!(
            "weight_{}_{}_{}",
            year.trim().to_lowercase(),
            make.trim().to_lowercase(),
            model.trim().to_lowercase()
        )
    }

    /// Returns the entry only while it is still fresh.
    pub fn get_fresh(&self, key: &str) -> Option<&CachedWeight> {
        self.entries.get(key).filter(|entry| !entry.is_expired())
    }

    pub fn insert(&mut self, key: String, entry: CachedWeight) {
        self.entries.insert(key, entry);
    }
}

/// Get the price cache file path (in app data directory).
fn prices_cache_path() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| cache_dir().join(PRICES_CACHE_FILENAME)).clone()
}

fn weights_cache_path() -> PathBuf {
    static PATH: OnceLock<PathBuf> = OnceLock::new();
    PATH.get_or_init(|| cache_dir().join(WEIGHTS_CACHE_FILENAME)).clone()
}

fn cache_dir() -> PathBuf {
    let base = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("lot-value-scanner");
    let _ = fs::create_dir_all(&base);
    base
}

/// Load the price cache from disk, if it exists. Expiry is the caller's
/// concern; stale prices are still a useful last resort.
pub fn load_price_cache() -> Option<PriceCache> {
    let path = prices_cache_path();

    if !path.exists() {
        println!("[cache] No price cache found at {}", path.display());
        return None;
    }

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<PriceCache>(&content) {
            Ok(cache) => {
                println!("[cache] Loaded price cache (age: {})", cache.age_string());
                Some(cache)
            }
            Err(e) => {
                println!("[cache] Failed to parse price cache: {e}");
                None
            }
        },
        Err(e) => {
            println!("[cache] Failed to read price cache: {e}");
            None
        }
    }
}

/// Save the price cache to disk.
pub fn save_price_cache(cache: &PriceCache) -> Result<(), std::io::Error> {
    let path = prices_cache_path();
    let content = serde_json::to_string_pretty(cache)?;
    fs::write(&path, content)?;
    println!("[cache] Saved price cache to {}", path.display());
    Ok(())
}

/// Load the weight cache from disk. Individual entries carry their own
/// expiry, so the whole file is always loaded.
pub fn load_weight_cache() -> WeightCache {
    let path = weights_cache_path();

    if !path.exists() {
        return WeightCache::default();
    }

    match fs::read_to_string(&path) {
        Ok(content) => match serde_json::from_str::<WeightCache>(&content) {
            Ok(cache) => {
                println!(
                    "[cache] Loaded weight cache ({} entries)",
                    cache.entries.len()
                );
                cache
            }
            Err(e) => {
                println!("[cache] Failed to parse weight cache: {e}");
                WeightCache::default()
            }
        },
        Err(e) => {
            println!("[cache] Failed to read weight cache: {e}");
            WeightCache::default()
        }
    }
}

/// Save the weight cache to disk.
pub fn save_weight_cache(cache: &WeightCache) -> Result<(), std::io::Error> {
    let path = weights_cache_path();
    let content = serde_json::to_string(cache)?;
    fs::write(&path, content)?;
    println!(
        "[cache] Saved weight cache ({} entries) to {}",
        cache.entries.len(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::PriceSource;

    #[test]
    fn fresh_price_cache_is_not_expired() {
        let cache = PriceCache::new(MetalPriceQuote::fallback());
        assert!(!cache.is_expired());
        assert_eq!(cache.quote.source, PriceSource::Fallback);
    }

    #[test]
    fn stale_price_cache_expires() {
        let mut cache = PriceCache::new(MetalPriceQuote::fallback());
        cache.cached_at = now_secs() - 25 * 60 * 60;
        assert!(cache.is_expired());
    }

    #[test]
    fn weight_key_is_normalized() {
        assert_eq!(
            WeightCache::lookup_key("2018", " Ford ", "F150 Pickup 2WD"),
            "weight_2018_ford_f150 pickup 2wd"
        );
    }

    #[test]
    fn expired_weight_entries_are_skipped() {
        let mut cache = WeightCache::default();
        let key = WeightCache::lookup_key("2018", "FORD", "F150 PICKUP 2WD");
        let mut entry = CachedWeight::new(
            4464,
            "Standard Pickup Trucks 2WD".to_string(),
            WeightSource::CurbWeightApi,
        );
        entry.cached_at = now_secs() - 25 * 60 * 60;
        cache.insert(key.clone(), entry);
        assert!(cache.get_fresh(&key).is_none());

        cache.insert(
            key.clone(),
            CachedWeight::new(
                4464,
                "Standard Pickup Trucks 2WD".to_string(),
                WeightSource::CurbWeightApi,
            ),
        );
        assert_eq!(cache.get_fresh(&key).unwrap().weight_lbs, 4464);
    }

    #[test]
    fn age_string_buckets() {
        assert_eq!(age_string(45), "45s");
        assert_eq!(age_string(120), "2m");
        assert_eq!(age_string(7200), "2h");
        assert_eq!(age_string(172800), "2d");
    }
}
