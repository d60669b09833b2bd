// The run pipeline: resolve the window, fetch, clean, annotate.
use chrono::{DateTime, Utc};
use shared::models::{OhlcBar, OhlcInterval, TimeFrame, Trade};
use std::sync::Arc;

use crate::client::MarketDataClient;
use crate::config::EngineSettings;
use crate::data::{AssetDirectory, DataCleaner, MarketCatalog, Termination, TradeFetcher};
use crate::error::{EngineError, Result};
use crate::indicators::{AnnotatedTable, IndicatorEngine};
use crate::timeframe::TimeFrameResolver;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connection {
    Online,
    /// The API answered but reported anything other than `online`.
    Degraded(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionReport {
    pub server_time: DateTime<Utc>,
    pub connection: Connection,
}

/// Everything the presentation layer shows for one pair and time frame.
#[derive(Debug, Clone)]
pub struct TradeDashboard {
    pub pair: String,
    pub frame: TimeFrame,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub table: AnnotatedTable<Trade>,
    pub last_price: Option<f64>,
    pub pages: usize,
    pub termination: Termination,
}

pub struct Dashboard {
    client: Arc<dyn MarketDataClient>,
    assets: Vec<String>,
    fetcher: TradeFetcher,
    indicators: IndicatorEngine,
    resolver: TimeFrameResolver,
}

impl Dashboard {
    pub fn new(client: Arc<dyn MarketDataClient>, settings: &EngineSettings) -> Result<Self> {
        Ok(Dashboard {
            fetcher: TradeFetcher::new(client.clone(), &settings.fetch),
            indicators: IndicatorEngine::from_settings(&settings.indicators)?,
            resolver: TimeFrameResolver::new(client.clone(), settings.time_anchor),
            assets: settings.assets.clone(),
            client,
        })
    }

    pub async fn connection(&self) -> Result<ConnectionReport> {
        let time = self.client.time().await?;
        let server_time = DateTime::from_timestamp(time.unixtime, 0)
            .ok_or_else(|| EngineError::MalformedData(format!("server time {} is out of range", time.unixtime)))?;
        let status = self.client.status().await?;
        let connection = if status.is_online() {
            Connection::Online
        } else {
            tracing::warn!(status = %status.status, "Market API reports degraded service");
            Connection::Degraded(status.status)
        };
        Ok(ConnectionReport { server_time, connection })
    }

    /// The configured assets and their tradable quotes.
    pub async fn catalog(&self, directory: &AssetDirectory) -> Result<MarketCatalog> {
        MarketCatalog::load(self.client.as_ref(), directory, &self.assets).await
    }

    /// Trades for `pair` over `frame`, annotated with every configured
    /// indicator. An empty window is `EngineError::NoData`.
    pub async fn run(&self, pair: &str, frame: TimeFrame) -> Result<TradeDashboard> {
        let window = self.resolver.window(frame).await?;
        tracing::info!(pair = %pair, %frame, start = %window.start, end = %window.end, "Starting dashboard run");

        let fetched = self.fetcher.fetch(pair, window.start_epoch(), window.end_epoch()).await?;
        let pages = fetched.pages;
        let termination = fetched.termination;

        let trades = DataCleaner::clean(pair, fetched.trades)?;
        if trades.is_empty() {
            return Err(EngineError::NoData { pair: pair.to_string() });
        }

        let table = self.indicators.annotate(trades);
        let last_price = table.last_price();
        tracing::info!(pair = %pair, rows = table.len(), ?last_price, ?termination, "Dashboard run complete");

        Ok(TradeDashboard {
            pair: pair.to_string(),
            frame,
            start: window.start,
            end: window.end,
            table,
            last_price,
            pages,
            termination,
        })
    }

    /// OHLC bars for several pairs in one table, indicators computed per pair.
    pub async fn ohlc_overview(&self, pairs: &[String], interval: OhlcInterval) -> Result<AnnotatedTable<OhlcBar>> {
        if pairs.is_empty() {
            return Err(EngineError::InvalidRequest("at least one pair is required".to_string()));
        }
        let mut bars = Vec::new();
        for pair in pairs {
            let raw = self.client.ohlc(pair, interval).await?;
            tracing::debug!(pair = %pair, rows = raw.len(), "Fetched OHLC bars");
            bars.extend(DataCleaner::clean_bars(pair, raw)?);
        }
        if bars.is_empty() {
            return Err(EngineError::NoData { pair: pairs.join(",") });
        }
        Ok(self.indicators.annotate(bars))
    }
}
