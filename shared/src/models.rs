use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A trade exactly as the market-data API delivers it. Price and volume stay
/// as decimal strings until the cleaner coerces them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawTrade {
    pub price: String,
    pub volume: String,
    /// Epoch seconds, fractional.
    pub time: f64,
    pub side: String,
    pub order_type: String,
    pub misc: String,
    pub trade_id: Option<u64>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "b" => Some(Side::Buy),
            "s" => Some(Side::Sell),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OrderType {
    Market,
    Limit,
}

impl OrderType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "m" => Some(OrderType::Market),
            "l" => Some(OrderType::Limit),
            _ => None,
        }
    }
}

/// A cleaned trade row. Numeric fields are `None` when the upstream value did
/// not parse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub pair: String,
    pub price: Option<f64>,
    pub volume: Option<f64>,
    pub time: DateTime<Utc>,
    pub side: Option<Side>,
    pub order_type: Option<OrderType>,
    pub misc: String,
}

/// An OHLC row as delivered by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawOhlcBar {
    pub time: i64,
    pub open: String,
    pub high: String,
    pub low: String,
    pub close: String,
    pub vwap: String,
    pub volume: String,
    pub trade_count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OhlcBar {
    pub pair_name: String,
    pub time: DateTime<Utc>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub vwap: Option<f64>,
    pub volume: Option<f64>,
    pub trade_count: u64,
}

/// Symbolic look-back window selected by the user.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    Hour,
    Day,
    Week,
    Month,
    Year,
}

impl TimeFrame {
    pub const ALL: [TimeFrame; 5] = [
        TimeFrame::Hour,
        TimeFrame::Day,
        TimeFrame::Week,
        TimeFrame::Month,
        TimeFrame::Year,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeFrame::Hour => "hour",
            TimeFrame::Day => "day",
            TimeFrame::Week => "week",
            TimeFrame::Month => "month",
            TimeFrame::Year => "year",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownTimeFrame(pub String);

impl fmt::Display for UnknownTimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown time frame '{}', expected one of hour, day, week, month, year", self.0)
    }
}

impl std::error::Error for UnknownTimeFrame {}

impl FromStr for TimeFrame {
    type Err = UnknownTimeFrame;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim().to_lowercase();
        TimeFrame::ALL
            .into_iter()
            .find(|frame| frame.as_str() == name)
            .ok_or_else(|| UnknownTimeFrame(s.to_string()))
    }
}

/// Bar sizes accepted by the OHLC endpoint.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum OhlcInterval {
    Minute1,
    Minute5,
    Minute15,
    Minute30,
    Hour1,
    Hour4,
    Day1,
    Week1,
    Day15,
}

impl OhlcInterval {
    /// Interval length in minutes, as the API expects it.
    pub fn minutes(&self) -> u32 {
        match self {
            OhlcInterval::Minute1 => 1,
            OhlcInterval::Minute5 => 5,
            OhlcInterval::Minute15 => 15,
            OhlcInterval::Minute30 => 30,
            OhlcInterval::Hour1 => 60,
            OhlcInterval::Hour4 => 240,
            OhlcInterval::Day1 => 1440,
            OhlcInterval::Week1 => 10080,
            OhlcInterval::Day15 => 21600,
        }
    }
}

impl FromStr for OhlcInterval {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1m" => Ok(OhlcInterval::Minute1),
            "5m" => Ok(OhlcInterval::Minute5),
            "15m" => Ok(OhlcInterval::Minute15),
            "30m" => Ok(OhlcInterval::Minute30),
            "1h" => Ok(OhlcInterval::Hour1),
            "4h" => Ok(OhlcInterval::Hour4),
            "1d" => Ok(OhlcInterval::Day1),
            "1w" => Ok(OhlcInterval::Week1),
            "15d" => Ok(OhlcInterval::Day15),
            other => Err(format!("unsupported OHLC interval '{}'", other)),
        }
    }
}

/// One derived column. `values` is aligned row-for-row with the table it
/// annotates; `None` marks rows without enough history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Indicator {
    pub name: String,
    pub parameters: serde_json::Value,
    pub values: Vec<Option<f64>>,
}
