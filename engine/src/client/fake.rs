// Scripted in-memory client for tests.
use async_trait::async_trait;
use shared::models::{OhlcInterval, RawOhlcBar, RawTrade};
use std::collections::{BTreeMap, HashMap, VecDeque};
use std::sync::Mutex;

use super::{AssetInfo, AssetPair, MarketDataClient, ServerTime, SystemStatus};
use crate::error::{EngineError, Result};

pub enum Scripted {
    Page(Vec<RawTrade>),
    Fail(Vec<String>),
}

pub struct FakeClient {
    pub server_time: i64,
    pub status: String,
    pub assets: BTreeMap<String, AssetInfo>,
    pub pairs: BTreeMap<String, AssetPair>,
    pub ohlc: HashMap<String, Vec<RawOhlcBar>>,
    pages: Mutex<VecDeque<Scripted>>,
    trade_calls: Mutex<Vec<(String, i64)>>,
}

impl FakeClient {
    pub fn new() -> Self {
        FakeClient {
            server_time: 1_678_881_600,
            status: "online".to_string(),
            assets: BTreeMap::new(),
            pairs: BTreeMap::new(),
            ohlc: HashMap::new(),
            pages: Mutex::new(VecDeque::new()),
            trade_calls: Mutex::new(Vec::new()),
        }
    }

    /// Pages are handed out in order; once exhausted every call returns an
    /// empty page.
    pub fn with_pages(pages: Vec<Vec<RawTrade>>) -> Self {
        let client = Self::new();
        client.push_all(pages.into_iter().map(Scripted::Page));
        client
    }

    pub fn push_all(&self, scripted: impl IntoIterator<Item = Scripted>) {
        self.pages.lock().unwrap().extend(scripted);
    }

    pub fn with_asset(mut self, code: &str, altname: &str) -> Self {
        self.assets.insert(
            code.to_string(),
            AssetInfo { altname: altname.to_string(), decimals: 10, display_decimals: 5 },
        );
        self
    }

    pub fn with_pair(mut self, name: &str, base: &str, quote: &str) -> Self {
        self.pairs.insert(
            name.to_string(),
            AssetPair {
                altname: name.to_string(),
                wsname: None,
                base: base.to_string(),
                quote: quote.to_string(),
                status: Some("online".to_string()),
            },
        );
        self
    }

    pub fn trade_calls(&self) -> Vec<(String, i64)> {
        self.trade_calls.lock().unwrap().clone()
    }
}

pub fn trade(price: &str, time: f64) -> RawTrade {
    RawTrade {
        price: price.to_string(),
        volume: "1.0".to_string(),
        time,
        side: "b".to_string(),
        order_type: "m".to_string(),
        misc: String::new(),
        trade_id: None,
    }
}

#[async_trait]
impl MarketDataClient for FakeClient {
    async fn time(&self) -> Result<ServerTime> {
        Ok(ServerTime { unixtime: self.server_time, rfc1123: String::new() })
    }

    async fn status(&self) -> Result<SystemStatus> {
        Ok(SystemStatus { status: self.status.clone(), timestamp: String::new() })
    }

    async fn assets(&self, codes: &[String]) -> Result<BTreeMap<String, AssetInfo>> {
        Ok(self
            .assets
            .iter()
            .filter(|(code, info)| codes.iter().any(|c| c == *code || *c == info.altname))
            .map(|(code, info)| (code.clone(), info.clone()))
            .collect())
    }

    async fn pairs(&self) -> Result<BTreeMap<String, AssetPair>> {
        Ok(self.pairs.clone())
    }

    async fn trades(&self, pair: &str, since: i64) -> Result<Vec<RawTrade>> {
        self.trade_calls.lock().unwrap().push((pair.to_string(), since));
        match self.pages.lock().unwrap().pop_front() {
            Some(Scripted::Page(rows)) => Ok(rows),
            Some(Scripted::Fail(messages)) => Err(EngineError::UpstreamError {
                endpoint: "Trades".to_string(),
                messages,
            }),
            None => Ok(Vec::new()),
        }
    }

    async fn ohlc(&self, pair: &str, _interval: OhlcInterval) -> Result<Vec<RawOhlcBar>> {
        self.ohlc.get(pair).cloned().ok_or_else(|| EngineError::UpstreamError {
            endpoint: "OHLC".to_string(),
            messages: vec!["EQuery:Unknown asset pair".to_string()],
        })
    }
}
