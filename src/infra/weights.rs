//! Curb-weight resolution: Auto.dev specs API refined over the bundled
//! database, with a 24-hour on-disk cache.

use std::sync::Arc;

use reqwest::{Client, Url};
use serde::Deserialize;
use thiserror::Error;
use tokio::sync::Mutex;

use crate::domain::entities::{VehicleRecord, WeightSource};
use crate::domain::resolver;
use crate::infra::cache::{load_weight_cache, save_weight_cache, CachedWeight, WeightCache};
use crate::util::assets;

const DEFAULT_BASE_URL: &str = "https://auto.dev/api/";
const USER_AGENT: &str = "lot-value-scanner/1.0.0";

/// Curb weights outside this window are specs-sheet noise (kg values,
/// GVWR, unit typos) and are discarded.
const MIN_PLAUSIBLE_LBS: u32 = 1000;
const MAX_PLAUSIBLE_LBS: u32 = 10000;

#[derive(Debug, Error)]
pub enum WeightClientError {
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("http request error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("api error: {0}")]
    Api(String),
}

#[derive(Debug, Deserialize)]
struct VinSpecsDto {
    #[serde(default)]
    specs: Option<SpecsDto>,
}

/// Weight fields arrive as numbers or as strings like "4,464 lbs" depending
/// on the data source behind the API.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpecsDto {
    #[serde(default)]
    curb_weight: Option<serde_json::Value>,
    #[serde(default)]
    weight: Option<serde_json::Value>,
    #[serde(default)]
    vehicle_weight: Option<serde_json::Value>,
}

#[derive(Clone)]
pub struct WeightClient {
    http: Client,
    base_url: Url,
    api_key: Option<String>,
    cache: Arc<Mutex<WeightCache>>,
}

impl WeightClient {
    pub fn new(api_key: Option<String>) -> Result<Self, WeightClientError> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    pub fn with_base_url(base: &str, api_key: Option<String>) -> Result<Self, WeightClientError> {
        let base_url = Url::parse(base)?;
        let http = Client::builder().user_agent(USER_AGENT).build()?;
        Ok(Self {
            http,
            base_url,
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            cache: Arc::new(Mutex::new(load_weight_cache())),
        })
    }

    /// Resolves a listing to a vehicle class and curb weight.
    ///
    /// Never fails: cache, then the bundled database, then an API
    /// refinement on top of the database match. Every API problem just
    /// keeps the database answer.
    pub async fn resolve_vehicle(&self, year: &str, make: &str, model: &str) -> VehicleRecord {
        let key = WeightCache::lookup_key(year, make, model);

        {
            let cache = self.cache.lock().await;
            if let Some(cached) = cache.get_fresh(&key) {
                println!("[weights] Using cached weight for {year} {make} {model}");
                return VehicleRecord {
                    vehicle_class: cached.vehicle_class.clone(),
                    weight_lbs: cached.weight_lbs,
                    source: cached.source,
                };
            }
        }

        let mut record = resolver::resolve(assets::vehicle_database(), year, make, model);

        // The API only refines weight; the class always comes from the
        // database match.
        if self.api_key.is_some() {
            match self.lookup_curb_weight(year, make, model).await {
                Ok(Some(weight_lbs)) => {
                    println!("[weights] Auto.dev curb weight: {weight_lbs} lbs");
                    record.weight_lbs = weight_lbs;
                    record.source = WeightSource::CurbWeightApi;
                }
                Ok(None) => {
                    println!("[weights] Auto.dev had no usable weight for {year} {make} {model}");
                }
                Err(error) => {
                    println!("[weights] Auto.dev lookup failed: {error}");
                }
            }
        }

        let mut cache = self.cache.lock().await;
        cache.insert(
            key,
            CachedWeight::new(record.weight_lbs, record.vehicle_class.clone(), record.source),
        );
        if let Err(e) = save_weight_cache(&cache) {
            println!("[weights] Warning: failed to save cache: {e}");
        }

        record
    }

    async fn lookup_curb_weight(
        &self,
        year: &str,
        make: &str,
        model: &str,
    ) -> Result<Option<u32>, WeightClientError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| WeightClientError::Api("no API key configured".to_string()))?;

        let mut url = self.base_url.join("vin")?;
        url.query_pairs_mut()
            .append_pair("year", year)
            .append_pair("make", make)
            .append_pair("model", model);

        let response = self
            .http
            .get(url)
            .bearer_auth(api_key)
            .send()
            .await?
            .error_for_status()?;
        let dto: VinSpecsDto = response.json().await?;

        Ok(dto.specs.as_ref().and_then(extract_curb_weight))
    }
}

/// Field preference: explicit curb weight first, then the generic weight
/// fields some records carry instead.
fn extract_curb_weight(specs: &SpecsDto) -> Option<u32> {
    [&specs.curb_weight, &specs.weight, &specs.vehicle_weight]
        .into_iter()
        .flatten()
        .find_map(parse_weight)
}

/// Accepts numeric values or strings with unit suffixes and thousands
/// separators, rejecting anything outside the plausible curb-weight window.
fn parse_weight(value: &serde_json::Value) -> Option<u32> {
    let weight = match value {
        serde_json::Value::Number(number) => number.as_f64()?.round() as i64,
        serde_json::Value::String(text) => {
            let digits: String = text.chars().filter(char::is_ascii_digit).collect();
            digits.parse::<i64>().ok()?
        }
        _ => return None,
    };
    let weight = u32::try_from(weight).ok()?;
    (weight > MIN_PLAUSIBLE_LBS && weight < MAX_PLAUSIBLE_LBS).then_some(weight)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_weights_parse() {
        assert_eq!(parse_weight(&json!(4464)), Some(4464));
        assert_eq!(parse_weight(&json!(4464.4)), Some(4464));
    }

    #[test]
    fn string_weights_strip_units_and_separators() {
        assert_eq!(parse_weight(&json!("4,464 lbs")), Some(4464));
        assert_eq!(parse_weight(&json!("3917lbs")), Some(3917));
        assert_eq!(parse_weight(&json!("n/a")), None);
    }

    #[test]
    fn implausible_weights_are_rejected() {
        assert_eq!(parse_weight(&json!(150)), None); // parts weight
        assert_eq!(parse_weight(&json!(26000)), None); // GVWR or kg typo
        assert_eq!(parse_weight(&json!(-5)), None);
    }

    #[test]
    fn curb_weight_field_wins_over_generic_weight() {
        let specs = SpecsDto {
            curb_weight: Some(json!("3,500 lbs")),
            weight: Some(json!(9999)),
            vehicle_weight: None,
        };
        assert_eq!(extract_curb_weight(&specs), Some(3500));
    }

    #[test]
    fn falls_through_unusable_fields() {
        let specs = SpecsDto {
            curb_weight: Some(json!("unknown")),
            weight: None,
            vehicle_weight: Some(json!(4212)),
        };
        assert_eq!(extract_curb_weight(&specs), Some(4212));
    }
}
