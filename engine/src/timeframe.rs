// Resolves symbolic look-back windows to absolute timestamps.
use chrono::{DateTime, Duration, Months, Utc};
use shared::models::TimeFrame;
use std::sync::Arc;

use crate::client::MarketDataClient;
use crate::config::TimeAnchor;
use crate::error::{EngineError, Result};

/// An absolute `[start, end)` window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedWindow {
    pub frame: TimeFrame,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ResolvedWindow {
    pub fn start_epoch(&self) -> i64 {
        shared::utils::datetime_to_epoch_seconds(&self.start)
    }

    pub fn end_epoch(&self) -> i64 {
        shared::utils::datetime_to_epoch_seconds(&self.end)
    }
}

/// Start of `frame` measured back from `reference`. Month and year steps are
/// calendar steps that clamp to the last day of a shorter month, so
/// 2023-03-31 minus one month is 2023-02-28.
pub fn resolve(reference: DateTime<Utc>, frame: TimeFrame) -> Result<DateTime<Utc>> {
    let start = match frame {
        TimeFrame::Hour => reference.checked_sub_signed(Duration::hours(1)),
        TimeFrame::Day => reference.checked_sub_signed(Duration::days(1)),
        TimeFrame::Week => reference.checked_sub_signed(Duration::weeks(1)),
        TimeFrame::Month => reference.checked_sub_months(Months::new(1)),
        TimeFrame::Year => reference.checked_sub_months(Months::new(12)),
    };
    start.ok_or_else(|| EngineError::InvalidRequest(format!("cannot step back one {} from {}", frame, reference)))
}

/// `resolve` for a frame given by name (`"day"`, `"Month"`, ...).
pub fn resolve_named(reference: DateTime<Utc>, frame_name: &str) -> Result<DateTime<Utc>> {
    resolve(reference, frame_name.parse::<TimeFrame>()?)
}

pub struct TimeFrameResolver {
    client: Arc<dyn MarketDataClient>,
    anchor: TimeAnchor,
}

impl TimeFrameResolver {
    pub fn new(client: Arc<dyn MarketDataClient>, anchor: TimeAnchor) -> Self {
        TimeFrameResolver { client, anchor }
    }

    /// "Now" according to the configured anchor.
    pub async fn reference_time(&self) -> Result<DateTime<Utc>> {
        match self.anchor {
            TimeAnchor::Local => Ok(Utc::now()),
            TimeAnchor::Server => {
                let server = self.client.time().await?;
                DateTime::from_timestamp(server.unixtime, 0).ok_or_else(|| {
                    EngineError::MalformedData(format!("server time {} is out of range", server.unixtime))
                })
            }
        }
    }

    pub async fn window(&self, frame: TimeFrame) -> Result<ResolvedWindow> {
        let end = self.reference_time().await?;
        let start = resolve(end, frame)?;
        tracing::debug!(%frame, %start, %end, "Resolved time frame");
        Ok(ResolvedWindow { frame, start, end })
    }
}
