// Request/response contract of the public market-data API.
pub mod kraken;

#[cfg(test)]
pub mod fake;

use async_trait::async_trait;
use serde::Deserialize;
use shared::models::{OhlcInterval, RawOhlcBar, RawTrade};
use std::collections::BTreeMap;

use crate::error::Result;

pub use kraken::KrakenClient;

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServerTime {
    pub unixtime: i64,
    #[serde(default)]
    pub rfc1123: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SystemStatus {
    pub status: String,
    #[serde(default)]
    pub timestamp: String,
}

impl SystemStatus {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AssetInfo {
    pub altname: String,
    #[serde(default)]
    pub decimals: u32,
    #[serde(default)]
    pub display_decimals: u32,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AssetPair {
    pub altname: String,
    #[serde(default)]
    pub wsname: Option<String>,
    pub base: String,
    pub quote: String,
    #[serde(default)]
    pub status: Option<String>,
}

/// Public market-data endpoints the pipeline depends on. Every method maps a
/// non-empty API error list to `EngineError::UpstreamError`; nothing retries.
#[async_trait]
pub trait MarketDataClient: Send + Sync {
    async fn time(&self) -> Result<ServerTime>;

    async fn status(&self) -> Result<SystemStatus>;

    /// Asset metadata keyed by the API's asset code (e.g. `XXBT`).
    async fn assets(&self, codes: &[String]) -> Result<BTreeMap<String, AssetInfo>>;

    /// Every tradable pair keyed by pair name.
    async fn pairs(&self) -> Result<BTreeMap<String, AssetPair>>;

    /// One page of trades executed at or after `since` (epoch seconds).
    async fn trades(&self, pair: &str, since: i64) -> Result<Vec<RawTrade>>;

    async fn ohlc(&self, pair: &str, interval: OhlcInterval) -> Result<Vec<RawOhlcBar>>;
}
