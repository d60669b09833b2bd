// HTTP implementation of `MarketDataClient` for the Kraken public REST API.
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use shared::models::{OhlcInterval, RawOhlcBar, RawTrade};
use std::collections::BTreeMap;
use std::time::Duration;

use super::{AssetInfo, AssetPair, MarketDataClient, ServerTime, SystemStatus};
use crate::config::settings::ApiSettings;
use crate::error::{EngineError, Result};

/// Every Kraken response is wrapped in `{ "error": [...], "result": ... }`.
#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    #[serde(default)]
    error: Vec<String>,
    result: Option<T>,
}

impl<T> ApiEnvelope<T> {
    fn into_result(self, endpoint: &str) -> Result<T> {
        if !self.error.is_empty() {
            return Err(EngineError::UpstreamError {
                endpoint: endpoint.to_string(),
                messages: self.error,
            });
        }
        self.result
            .ok_or_else(|| EngineError::MalformedData(format!("'{}' response has neither error nor result", endpoint)))
    }
}

pub struct KrakenClient {
    base_url: String,
    client: reqwest::Client,
}

impl KrakenClient {
    pub fn new(settings: &ApiSettings) -> Result<Self> {
        let base_url = settings.base_url.trim().trim_end_matches('/').to_string();
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs.max(1)))
            .build()?;
        tracing::debug!(base_url = %base_url, "Created market data client");
        Ok(Self { base_url, client })
    }

    async fn get<T: DeserializeOwned>(&self, endpoint: &str, query: &[(&str, String)]) -> Result<T> {
        let url = format!("{}/{}", self.base_url, endpoint);
        tracing::debug!(url = %url, ?query, "Sending market data request");
        let envelope: ApiEnvelope<T> = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_result(endpoint)
    }
}

#[async_trait]
impl MarketDataClient for KrakenClient {
    async fn time(&self) -> Result<ServerTime> {
        self.get("Time", &[]).await
    }

    async fn status(&self) -> Result<SystemStatus> {
        self.get("SystemStatus", &[]).await
    }

    async fn assets(&self, codes: &[String]) -> Result<BTreeMap<String, AssetInfo>> {
        self.get("Assets", &[("asset", codes.join(","))]).await
    }

    async fn pairs(&self) -> Result<BTreeMap<String, AssetPair>> {
        self.get("AssetPairs", &[]).await
    }

    async fn trades(&self, pair: &str, since: i64) -> Result<Vec<RawTrade>> {
        let result: BTreeMap<String, Value> = self
            .get("Trades", &[("pair", pair.to_string()), ("since", since.to_string())])
            .await?;
        parse_trades_result(&result)
    }

    async fn ohlc(&self, pair: &str, interval: OhlcInterval) -> Result<Vec<RawOhlcBar>> {
        let result: BTreeMap<String, Value> = self
            .get("OHLC", &[("pair", pair.to_string()), ("interval", interval.minutes().to_string())])
            .await?;
        parse_ohlc_result(&result)
    }
}

/// The result object holds one entry keyed by the pair's canonical name plus a
/// `last` cursor.
fn pair_rows<'a>(result: &'a BTreeMap<String, Value>, endpoint: &str) -> Result<&'a [Value]> {
    let rows = result
        .iter()
        .find(|(key, _)| key.as_str() != "last")
        .map(|(_, rows)| rows)
        .ok_or_else(|| EngineError::MalformedData(format!("'{}' result holds no pair entry", endpoint)))?;
    rows.as_array()
        .map(Vec::as_slice)
        .ok_or_else(|| EngineError::MalformedData(format!("'{}' rows are not an array", endpoint)))
}

// Decimal fields come as strings, but tolerate bare numbers too.
fn text_field(row: &[Value], idx: usize) -> String {
    match row.get(idx) {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn number_field(row: &[Value], idx: usize) -> Option<f64> {
    match row.get(idx)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

pub(crate) fn parse_trades_result(result: &BTreeMap<String, Value>) -> Result<Vec<RawTrade>> {
    pair_rows(result, "Trades")?
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let row = row
                .as_array()
                .ok_or_else(|| EngineError::MalformedData(format!("trade row {} is not an array", idx)))?;
            let time = number_field(row, 2)
                .ok_or_else(|| EngineError::MalformedData(format!("trade row {} has no numeric time", idx)))?;
            Ok(RawTrade {
                price: text_field(row, 0),
                volume: text_field(row, 1),
                time,
                side: text_field(row, 3),
                order_type: text_field(row, 4),
                misc: text_field(row, 5),
                trade_id: row.get(6).and_then(Value::as_u64),
            })
        })
        .collect()
}

pub(crate) fn parse_ohlc_result(result: &BTreeMap<String, Value>) -> Result<Vec<RawOhlcBar>> {
    pair_rows(result, "OHLC")?
        .iter()
        .enumerate()
        .map(|(idx, row)| {
            let row = row
                .as_array()
                .ok_or_else(|| EngineError::MalformedData(format!("OHLC row {} is not an array", idx)))?;
            let time = row
                .first()
                .and_then(Value::as_i64)
                .ok_or_else(|| EngineError::MalformedData(format!("OHLC row {} has no integer time", idx)))?;
            Ok(RawOhlcBar {
                time,
                open: text_field(row, 1),
                high: text_field(row, 2),
                low: text_field(row, 3),
                close: text_field(row, 4),
                vwap: text_field(row, 5),
                volume: text_field(row, 6),
                trade_count: row.get(7).and_then(Value::as_u64).unwrap_or(0),
            })
        })
        .collect()
}
