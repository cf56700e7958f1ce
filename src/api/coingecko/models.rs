use crate::models::{PricePoint, VolumePoint};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Per-currency figures as returned by the API, e.g. `{"usd": 1.0, "inr": 83.2}`.
/// Values can be null for thinly traded currencies.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurrencyMap(pub HashMap<String, Option<f64>>);

impl CurrencyMap {
    pub fn get(&self, currency: &str) -> Option<f64> {
        self.0.get(currency).copied().flatten()
    }
}

/// Response from GET /coins/{id}
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinDetail {
    pub id: String,
    pub symbol: Option<String>,
    pub name: Option<String>,
    pub market_data: Option<MarketData>,
}

/// Nested `market_data` block of a coin detail
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketData {
    #[serde(default)]
    pub current_price: CurrencyMap,
    #[serde(default)]
    pub market_cap: CurrencyMap,
    #[serde(default)]
    pub total_volume: CurrencyMap,
    pub price_change_percentage_24h: Option<f64>,
}

/// Envelope of GET /global
#[derive(Debug, Clone, Deserialize)]
pub struct GlobalResponse {
    pub data: GlobalSnapshot,
}

/// Aggregate metrics for the whole market
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GlobalSnapshot {
    #[serde(default)]
    pub total_market_cap: CurrencyMap,
    #[serde(default)]
    pub total_volume: CurrencyMap,
    pub market_cap_change_percentage_24h_usd: Option<f64>,
}

/// Response from GET /coins/{id}/market_chart; each entry is `[millis, value]`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MarketChart {
    #[serde(default)]
    pub prices: Vec<(f64, f64)>,
    #[serde(default)]
    pub market_caps: Vec<(f64, f64)>,
    #[serde(default)]
    pub total_volumes: Vec<(f64, f64)>,
}

impl MarketChart {
    /// Price samples, ascending by time
    pub fn price_points(&self) -> Vec<PricePoint> {
        let mut points: Vec<PricePoint> = self.prices.iter().copied().filter_map(PricePoint::from_pair).collect();
        points.sort_by_key(|p| p.timestamp);
        points
    }

    /// Volume samples, ascending by time
    pub fn volume_points(&self) -> Vec<VolumePoint> {
        let mut points: Vec<VolumePoint> = self.total_volumes.iter().copied().filter_map(VolumePoint::from_pair).collect();
        points.sort_by_key(|p| p.timestamp);
        points
    }
}

/// One row of GET /coins/markets
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinMarket {
    pub id: String,
    pub symbol: String,
    pub name: String,
    pub current_price: Option<f64>,
    pub market_cap: Option<f64>,
    pub price_change_percentage_24h: Option<f64>,
    pub total_volume: Option<f64>,
}

/// Error type for market-data requests
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    #[error("Bad Request: {0}")]
    BadRequest(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Forbidden: {0}")]
    Forbidden(String),
    #[error("Not Found: {0}")]
    NotFound(String),
    #[error("Rate Limited. Retry after {retry_after_secs:?} s")]
    RateLimited { retry_after_secs: Option<u64> },
    #[error("Server Error ({0}): {1}")]
    ServerError(u16, String),
    #[error("HTTP Error ({0}): {1}")]
    HttpError(u16, String),
    #[error("Request Error: {0}")]
    RequestError(String),
    #[error("Deserialization Error: {0}")]
    DeserializationError(String),
}

/// Result of a single market-data fetch.
///
/// Callers that only care about "got something or not" use [`FetchOutcome::into_option`];
/// tests can still tell an empty payload apart from a failed request.
#[derive(Debug, Clone)]
pub enum FetchOutcome<T> {
    Data(T),
    Empty,
    Failed(ApiError),
}

impl<T> FetchOutcome<T> {
    pub fn into_option(self) -> Option<T> {
        match self {
            FetchOutcome::Data(data) => Some(data),
            FetchOutcome::Empty | FetchOutcome::Failed(_) => None,
        }
    }

}

impl<T> FetchOutcome<Vec<T>> {
    /// `Data` for a non-empty list, `Empty` otherwise
    pub fn from_list(items: Vec<T>) -> Self {
        if items.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Data(items)
        }
    }
}
