// Paginated trade retrieval over a [start, end) window.
use shared::models::RawTrade;
use std::sync::Arc;
use std::time::Duration;

use crate::client::MarketDataClient;
use crate::config::settings::{FetchSettings, MIN_PAGE_DELAY_MS};
use crate::error::{EngineError, Result};

/// Why pagination stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    /// The last accumulated trade is at or past the requested end.
    ReachedEnd,
    /// The upstream returned an empty page.
    EmptyPage,
    /// A page brought nothing new, so the cursor cannot advance.
    NoProgress,
    /// The configured page budget ran out before the window was covered.
    PageBudget,
}

#[derive(Debug, Clone)]
pub struct TradeWindow {
    pub pair: String,
    pub start_time: i64,
    pub end_time: i64,
    pub trades: Vec<RawTrade>,
    pub pages: usize,
    pub termination: Termination,
}

impl TradeWindow {
    pub fn is_complete(&self) -> bool {
        self.termination == Termination::ReachedEnd
    }
}

pub struct TradeFetcher {
    client: Arc<dyn MarketDataClient>,
    page_delay: Duration,
    max_pages: usize,
}

impl TradeFetcher {
    pub fn new(client: Arc<dyn MarketDataClient>, settings: &FetchSettings) -> Self {
        let floor = Duration::from_millis(MIN_PAGE_DELAY_MS);
        TradeFetcher {
            client,
            page_delay: settings.page_delay().max(floor),
            max_pages: settings.max_pages.max(1),
        }
    }

    /// Pulls trade pages for `pair` until `end_time` is covered. An upstream
    /// error aborts the whole fetch; nothing accumulated so far is returned.
    pub async fn fetch(&self, pair: &str, start_time: i64, end_time: i64) -> Result<TradeWindow> {
        if pair.trim().is_empty() {
            return Err(EngineError::InvalidRequest("pair cannot be empty".to_string()));
        }
        if start_time > end_time {
            return Err(EngineError::InvalidRequest(format!(
                "start_time {} is after end_time {}",
                start_time, end_time
            )));
        }

        let mut trades: Vec<RawTrade> = Vec::new();
        let mut since = start_time;
        let mut pages = 0usize;

        let termination = loop {
            if pages == self.max_pages {
                tracing::warn!(pair = %pair, pages, since, end_time, "Page budget exhausted before the window was covered");
                break Termination::PageBudget;
            }
            if pages > 0 {
                tokio::time::sleep(self.page_delay).await;
            }

            let page = self.client.trades(pair, since).await?;
            pages += 1;
            if page.is_empty() {
                tracing::debug!(pair = %pair, pages, since, "Empty trade page, stopping");
                break Termination::EmptyPage;
            }

            let received = page.len();
            let appended = append_page(&mut trades, page);
            let Some(cursor) = trades.last().map(|t| t.time) else {
                break Termination::EmptyPage;
            };
            tracing::debug!(pair = %pair, page = pages, received, appended, cursor, "Fetched trade page");

            if cursor >= end_time as f64 {
                break Termination::ReachedEnd;
            }
            if appended == 0 {
                tracing::warn!(pair = %pair, cursor, "Trade page added no new rows, stopping");
                break Termination::NoProgress;
            }
            since = cursor.floor() as i64;
        };

        tracing::info!(
            pair = %pair,
            rows = trades.len(),
            pages,
            ?termination,
            "Trade window fetched"
        );

        Ok(TradeWindow {
            pair: pair.to_string(),
            start_time,
            end_time,
            trades,
            pages,
            termination,
        })
    }
}

/// Appends `page` to `acc`, dropping rows already held at or before the
/// cursor. The API re-delivers those because `since` is truncated to whole
/// seconds. Returns the number of rows added.
fn append_page(acc: &mut Vec<RawTrade>, page: Vec<RawTrade>) -> usize {
    let before = acc.len();
    let last_time = acc.last().map(|t| t.time);
    for row in page {
        let repeated = last_time.is_some_and(|last| row.time <= last) && acc[..before].contains(&row);
        if !repeated {
            acc.push(row);
        }
    }
    acc.len() - before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::fake::{trade, FakeClient, Scripted};

    fn fetcher(client: Arc<FakeClient>, max_pages: usize) -> TradeFetcher {
        TradeFetcher::new(client, &FetchSettings { page_delay_ms: 1800, max_pages })
    }

    fn times(window: &TradeWindow) -> Vec<f64> {
        window.trades.iter().map(|t| t.time).collect()
    }

    #[tokio::test(start_paused = true)]
    async fn two_pages_cover_the_window() {
        let client = Arc::new(FakeClient::with_pages(vec![
            vec![trade("100", 1000.0), trade("102", 1005.0)],
            vec![trade("101", 1010.0)],
        ]));
        let window = fetcher(client.clone(), 10).fetch("XETHZUSD", 1000, 1010).await.unwrap();

        assert_eq!(times(&window), vec![1000.0, 1005.0, 1010.0]);
        assert_eq!(window.pages, 2);
        assert_eq!(window.termination, Termination::ReachedEnd);
        assert!(window.is_complete());
        assert_eq!(
            client.trade_calls(),
            vec![("XETHZUSD".to_string(), 1000), ("XETHZUSD".to_string(), 1005)]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn boundary_row_repeated_by_the_api_is_dropped() {
        let client = Arc::new(FakeClient::with_pages(vec![
            vec![trade("100", 1000.0), trade("102", 1005.0)],
            vec![trade("102", 1005.0), trade("101", 1010.0)],
        ]));
        let window = fetcher(client, 10).fetch("XETHZUSD", 1000, 1010).await.unwrap();
        assert_eq!(times(&window), vec![1000.0, 1005.0, 1010.0]);
    }

    #[tokio::test(start_paused = true)]
    async fn same_second_trades_that_differ_are_kept() {
        let client = Arc::new(FakeClient::with_pages(vec![
            vec![trade("100", 1000.2), trade("102", 1005.4)],
            vec![trade("102", 1005.4), trade("103", 1005.9), trade("101", 1010.0)],
        ]));
        let window = fetcher(client.clone(), 10).fetch("XETHZUSD", 1000, 1010).await.unwrap();
        assert_eq!(times(&window), vec![1000.2, 1005.4, 1005.9, 1010.0]);
        assert_eq!(client.trade_calls()[1].1, 1005);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_page_terminates() {
        let client = Arc::new(FakeClient::with_pages(vec![vec![trade("100", 1000.0)]]));
        let window = fetcher(client.clone(), 10).fetch("XETHZUSD", 1000, 5000).await.unwrap();
        assert_eq!(window.trades.len(), 1);
        assert_eq!(window.termination, Termination::EmptyPage);
        assert_eq!(client.trade_calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn empty_first_page_returns_empty_window() {
        let client = Arc::new(FakeClient::new());
        let window = fetcher(client, 10).fetch("XETHZUSD", 1000, 5000).await.unwrap();
        assert!(window.trades.is_empty());
        assert_eq!(window.pages, 1);
        assert_eq!(window.termination, Termination::EmptyPage);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_page_stops_with_no_progress() {
        let page = vec![trade("100", 1000.0), trade("101", 1001.0)];
        let client = Arc::new(FakeClient::with_pages(vec![page.clone(), page.clone(), page]));
        let window = fetcher(client.clone(), 10).fetch("XETHZUSD", 1000, 5000).await.unwrap();
        assert_eq!(window.trades.len(), 2);
        assert_eq!(window.termination, Termination::NoProgress);
        assert_eq!(client.trade_calls().len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn page_budget_bounds_the_loop() {
        let pages = (0..10).map(|i| vec![trade("100", 1000.0 + i as f64 * 10.0)]).collect();
        let client = Arc::new(FakeClient::with_pages(pages));
        let window = fetcher(client.clone(), 3).fetch("XETHZUSD", 1000, 100_000).await.unwrap();
        assert_eq!(window.pages, 3);
        assert_eq!(window.termination, Termination::PageBudget);
        assert!(!window.is_complete());
        assert_eq!(client.trade_calls().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn upstream_error_discards_partial_result() {
        let client = Arc::new(FakeClient::new());
        client.push_all(vec![
            Scripted::Page(vec![trade("100", 1000.0)]),
            Scripted::Fail(vec!["EGeneral:Too many requests".to_string()]),
        ]);
        let err = fetcher(client, 10).fetch("XETHZUSD", 1000, 5000).await.unwrap_err();
        assert!(matches!(err, EngineError::UpstreamError { .. }));
        assert!(err.to_string().contains("Too many requests"));
    }

    #[tokio::test(start_paused = true)]
    async fn waits_between_pages() {
        let client = Arc::new(FakeClient::with_pages(vec![
            vec![trade("100", 1000.0)],
            vec![trade("101", 1001.0)],
            vec![trade("102", 1002.0)],
        ]));
        let started = tokio::time::Instant::now();
        let window = fetcher(client, 10).fetch("XETHZUSD", 1000, 1002).await.unwrap();
        assert_eq!(window.pages, 3);
        assert!(started.elapsed() >= Duration::from_millis(2 * 1800));
    }

    #[tokio::test(start_paused = true)]
    async fn page_delay_is_never_below_the_rate_limit() {
        let client = Arc::new(FakeClient::new());
        let fetcher = TradeFetcher::new(client, &FetchSettings { page_delay_ms: 10, max_pages: 0 });
        assert_eq!(fetcher.page_delay, Duration::from_millis(1800));
        assert_eq!(fetcher.max_pages, 1);
    }

    #[tokio::test]
    async fn rejects_invalid_arguments() {
        let client = Arc::new(FakeClient::new());
        let fetcher = fetcher(client.clone(), 10);
        assert!(matches!(fetcher.fetch("  ", 0, 10).await, Err(EngineError::InvalidRequest(_))));
        assert!(matches!(fetcher.fetch("XETHZUSD", 10, 0).await, Err(EngineError::InvalidRequest(_))));
        assert!(client.trade_calls().is_empty());
    }

    #[test]
    fn append_page_without_history_takes_everything() {
        let mut acc = Vec::new();
        assert_eq!(append_page(&mut acc, vec![trade("1", 1.0), trade("1", 1.0)]), 2);
    }
}
