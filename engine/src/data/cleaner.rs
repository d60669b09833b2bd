// Turns raw API rows into typed, time-ordered rows.
use shared::models::{OhlcBar, OrderType, RawOhlcBar, RawTrade, Side, Trade};
use shared::utils::epoch_seconds_to_datetime;

use crate::error::{EngineError, Result};

pub struct DataCleaner;

impl DataCleaner {
    /// Converts raw trades into `Trade` rows sorted by time. Unparseable
    /// numbers become `None` and the row is kept; a timestamp chrono cannot
    /// represent is a malformed-data error.
    pub fn clean(pair: &str, raw: Vec<RawTrade>) -> Result<Vec<Trade>> {
        let mut coerced = 0usize;
        let mut rows = raw
            .into_iter()
            .enumerate()
            .map(|(idx, r)| -> Result<Trade> {
                let time = epoch_seconds_to_datetime(r.time).ok_or_else(|| {
                    EngineError::MalformedData(format!("trade row {} has unrepresentable time {}", idx, r.time))
                })?;
                let price = coerce_decimal(&r.price);
                let volume = coerce_decimal(&r.volume);
                if price.is_none() || volume.is_none() {
                    coerced += 1;
                }
                Ok(Trade {
                    pair: pair.to_string(),
                    price,
                    volume,
                    time,
                    side: Side::from_code(&r.side),
                    order_type: OrderType::from_code(&r.order_type),
                    misc: r.misc,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        // Stable, so equal timestamps keep their page order.
        rows.sort_by_key(|t| t.time);

        if coerced > 0 {
            tracing::warn!(pair = %pair, coerced, "Trade rows with unparseable numbers kept as missing");
        }
        tracing::debug!(pair = %pair, rows = rows.len(), "Cleaned trade rows");
        Ok(rows)
    }

    pub fn clean_bars(pair_name: &str, raw: Vec<RawOhlcBar>) -> Result<Vec<OhlcBar>> {
        let mut bars = raw
            .into_iter()
            .map(|r| -> Result<OhlcBar> {
                let time = epoch_seconds_to_datetime(r.time as f64).ok_or_else(|| {
                    EngineError::MalformedData(format!("OHLC bar for '{}' has unrepresentable time {}", pair_name, r.time))
                })?;
                Ok(OhlcBar {
                    pair_name: pair_name.to_string(),
                    time,
                    open: coerce_decimal(&r.open),
                    high: coerce_decimal(&r.high),
                    low: coerce_decimal(&r.low),
                    close: coerce_decimal(&r.close),
                    vwap: coerce_decimal(&r.vwap),
                    volume: coerce_decimal(&r.volume),
                    trade_count: r.trade_count,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        bars.sort_by_key(|b| b.time);
        tracing::debug!(pair = %pair_name, rows = bars.len(), "Cleaned OHLC bars");
        Ok(bars)
    }
}

/// Parses a decimal string, mapping anything unparseable or non-finite to
/// missing.
pub fn coerce_decimal(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}
