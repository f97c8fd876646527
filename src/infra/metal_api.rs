//! Asynchronous client for MetalPriceAPI.
//!
//! - Fetches copper, aluminum, platinum and palladium spot rates.
//! - Maintains a 24-hour in-memory + on-disk cache with stale fallbacks.
//! - Always returns a usable quote; the resolution order is manual prices,
//!   fresh cache, live fetch, stale cache, hardcoded fallback.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, SystemTime},
};

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::entities::{MetalPriceQuote, PriceSource, Settings};
use crate::infra::cache::{load_price_cache, save_price_cache, PriceCache, PRICE_CACHE_TTL};

const DEFAULT_BASE_URL: &str = "https://api.metalpriceapi.com/v1/";
const USER_AGENT: &str = "lot-value-scanner/1.0.0";

/// Troy ounces per pound, to convert the feed's per-ounce quotes for the
/// industrial metals into $/lb.
const TROY_OZ_PER_LB: f64 = 14.5833;

/// Feed symbols, in request order: copper, aluminum, platinum, palladium.
const REQUESTED_SYMBOLS: &str = "XCU,XAL,XPT,XPD";

#[derive(Debug, Error)]
pub enum PriceClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct LatestRatesDto {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    rates: HashMap<String, f64>,
}

#[derive(Clone)]
pub struct PriceClient {
    http: Client,
    base_url: Url,
    cache: Arc<Mutex<Option<PriceCache>>>,
    ttl: Duration,
}

impl PriceClient {
    pub fn new() -> Result<Self, PriceClientError> {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    pub fn with_base_url(base: &str) -> Result<Self, PriceClientError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            cache: Arc::new(Mutex::new(None)),
            ttl: PRICE_CACHE_TTL,
        })
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Current per-metal prices. Never fails: every miss along the
    /// resolution chain falls through to the next source, ending at the
    /// hardcoded fallback table.
    pub async fn get_prices(&self, settings: &Settings) -> MetalPriceQuote {
        if settings.use_manual_prices {
            if let Some(manual) = &settings.manual_prices {
                println!("[prices] Using manual prices from settings");
                return manual.to_quote();
            }
        }

        // In-memory cache first (always consulted within a session).
        {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.as_ref() {
                if cached.age() <= self.ttl {
                    println!(
                        "[prices] Using in-memory cache (age: {})",
                        cached.age_string()
                    );
                    return cached.quote.clone();
                }
            }
        }

        if let Some(disk) = load_price_cache() {
            if !disk.is_expired() {
                println!("[prices] Using disk cache (age: {})", disk.age_string());
                let quote = disk.quote.clone();
                *self.cache.lock().await = Some(disk);
                return quote;
            }
            println!(
                "[prices] Disk cache expired (age: {}), refreshing...",
                disk.age_string()
            );
        }

        match self.fetch_live(settings).await {
            Ok(quote) => {
                let cache = PriceCache::new(quote.clone());
                if let Err(e) = save_price_cache(&cache) {
                    println!("[prices] Warning: failed to save cache: {e}");
                }
                *self.cache.lock().await = Some(cache);
                quote
            }
            Err(error) => {
                println!("[prices] Live fetch failed: {error}");

                // Stale data beats the hardcoded table.
                let stale = {
                    let cache = self.cache.lock().await;
                    cache.as_ref().map(|cached| cached.quote.clone())
                };
                if let Some(mut quote) = stale.or_else(|| load_price_cache().map(|c| c.quote)) {
                    println!("[prices] Falling back to stale cached prices");
                    quote.source = PriceSource::Cached;
                    return quote;
                }

                println!("[prices] No cache available, using fallback prices");
                MetalPriceQuote::fallback()
            }
        }
    }

    /// Drops the in-memory quote so the next call re-resolves.
    pub async fn clear_cache(&self) {
        *self.cache.lock().await = None;
    }

    async fn fetch_live(&self, settings: &Settings) -> Result<MetalPriceQuote, PriceClientError> {
        if !settings.use_price_api {
            return Err(PriceClientError::Api(
                "price API disabled in settings".to_string(),
            ));
        }
        let api_key = settings
            .metal_price_api_key
            .as_deref()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| PriceClientError::Api("no API key configured".to_string()))?;

        let mut url = self.base_url.join("latest")?;
        url.query_pairs_mut()
            .append_pair("api_key", api_key)
            .append_pair("base", "USD")
            .append_pair("currencies", REQUESTED_SYMBOLS);

        println!("[prices] Fetching live rates from MetalPriceAPI");
        let response = self.http.get(url).send().await?.error_for_status()?;
        let dto: LatestRatesDto = response.json().await?;
        if !dto.success {
            return Err(PriceClientError::Api(
                "MetalPriceAPI reported failure".to_string(),
            ));
        }

        let quote = quote_from_rates(&dto.rates);
        println!(
            "[prices] Live quote: copper ${:.3}/lb, aluminum ${:.3}/lb, platinum ${:.0}/ozt, palladium ${:.0}/ozt",
            quote.copper, quote.aluminum, quote.platinum, quote.palladium
        );
        Ok(quote)
    }
}

/// Builds a full quote from the feed's rates, backfilling every metal the
/// feed does not carry from the fallback table.
///
/// Rates come back as metal-per-USD, so price is the inverse. The feed
/// quotes everything per troy ounce; industrial metals are converted to
/// $/lb.
fn quote_from_rates(rates: &HashMap<String, f64>) -> MetalPriceQuote {
    let fallback = MetalPriceQuote::fallback();

    let per_ozt = |symbol: &str| -> Option<f64> {
        rates
            .get(symbol)
            .copied()
            .filter(|rate| *rate > 0.0)
            .map(|rate| 1.0 / rate)
    };
    let per_lb = |symbol: &str| per_ozt(symbol).map(|price| price * TROY_OZ_PER_LB);

    format_quote(MetalPriceQuote {
        steel: fallback.steel,
        aluminum: per_lb("XAL").unwrap_or(fallback.aluminum),
        copper: per_lb("XCU").unwrap_or(fallback.copper),
        stainless_steel: fallback.stainless_steel,
        brass: fallback.brass,
        lead: fallback.lead,
        platinum: per_ozt("XPT").unwrap_or(fallback.platinum),
        palladium: per_ozt("XPD").unwrap_or(fallback.palladium),
        rhodium: fallback.rhodium,
        source: PriceSource::LiveApi,
        fetched_at: SystemTime::now(),
    })
}

/// Rounds base metals to tenth-of-a-cent precision and precious metals to
/// whole dollars, matching how yards quote them.
fn format_quote(mut quote: MetalPriceQuote) -> MetalPriceQuote {
    let base = |value: f64| (value * 1000.0).round() / 1000.0;
    quote.steel = base(quote.steel);
    quote.aluminum = base(quote.aluminum);
    quote.copper = base(quote.copper);
    quote.stainless_steel = base(quote.stainless_steel);
    quote.brass = base(quote.brass);
    quote.lead = base(quote.lead);
    quote.platinum = quote.platinum.round();
    quote.palladium = quote.palladium.round();
    quote.rhodium = quote.rhodium.round();
    quote
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{ManualPrices, Metal};

    #[tokio::test]
    async fn manual_prices_short_circuit_the_resolution_chain() {
        let client = PriceClient::new().unwrap();
        let mut settings = Settings::default();
        settings.use_manual_prices = true;
        settings.manual_prices = Some(ManualPrices {
            steel: 0.22,
            aluminum: 0.85,
            copper: 5.75,
            stainless_steel: 0.45,
            brass: 2.10,
            lead: 0.95,
            platinum: 2600.0,
            palladium: 990.0,
            rhodium: 9500.0,
        });

        // No network, no disk: the override wins before any other source.
        let quote = client.get_prices(&settings).await;
        assert_eq!(quote.source, PriceSource::Manual);
        assert_eq!(quote.steel, 0.22);
        assert_eq!(quote.copper, 5.75);
        assert_eq!(quote.rhodium, 9500.0);
    }

    #[tokio::test]
    async fn manual_flag_without_prices_falls_through() {
        // A client pointed at an unroutable host with no key configured
        // cannot fetch live; with no manual table the chain must still end
        // in a fully populated quote.
        let client = PriceClient::with_base_url("http://127.0.0.1:1/").unwrap();
        let mut settings = Settings::default();
        settings.use_manual_prices = true;
        settings.manual_prices = None;
        settings.use_price_api = false;

        let quote = client.get_prices(&settings).await;
        assert_ne!(quote.source, PriceSource::Manual);
        for metal in Metal::ALL {
            assert!(quote.price(metal) > 0.0, "{metal:?}");
        }
    }

    #[test]
    fn rates_are_inverted_and_converted() {
        let mut rates = HashMap::new();
        // 1 USD buys 0.25 ozt of copper: $4/ozt, $58.333/lb.
        rates.insert("XCU".to_string(), 0.25);
        rates.insert("XPT".to_string(), 0.0005); // $2000/ozt

        let quote = quote_from_rates(&rates);
        assert_eq!(quote.source, PriceSource::LiveApi);
        assert!((quote.copper - 58.333).abs() < 0.001);
        assert_eq!(quote.platinum, 2000.0);
    }

    #[test]
    fn missing_symbols_are_backfilled() {
        let quote = quote_from_rates(&HashMap::new());
        let fallback = MetalPriceQuote::fallback();
        assert_eq!(quote.copper, fallback.copper);
        assert_eq!(quote.aluminum, fallback.aluminum);
        assert_eq!(quote.platinum, fallback.platinum);
        assert_eq!(quote.steel, fallback.steel);
        assert_eq!(quote.rhodium, fallback.rhodium);
    }

    #[test]
    fn zero_and_negative_rates_are_rejected() {
        let mut rates = HashMap::new();
        rates.insert("XCU".to_string(), 0.0);
        rates.insert("XPD".to_string(), -1.0);
        let quote = quote_from_rates(&rates);
        let fallback = MetalPriceQuote::fallback();
        assert_eq!(quote.copper, fallback.copper);
        assert_eq!(quote.palladium, fallback.palladium);
    }

    #[test]
    fn formatting_rounds_per_family() {
        let mut quote = MetalPriceQuote::fallback();
        quote.copper = 6.12345;
        quote.platinum = 2784.6;
        let formatted = format_quote(quote);
        assert_eq!(formatted.copper, 6.123);
        assert_eq!(formatted.platinum, 2785.0);
    }

    #[test]
    fn fallback_quote_covers_every_metal() {
        let quote = MetalPriceQuote::fallback();
        for metal in Metal::ALL {
            assert!(quote.price(metal) > 0.0, "{metal:?}");
        }
        assert_eq!(quote.source, PriceSource::Fallback);
    }
}
