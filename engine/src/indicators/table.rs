// Applies indicator calculators to a table, one pair group at a time.
use shared::models::{Indicator, OhlcBar, Trade};
use std::collections::HashMap;

use super::{IndicatorCalculator, Rsi, Sma};
use crate::config::IndicatorSettings;
use crate::error::Result;

/// A row an indicator can be computed over.
pub trait PricedRow {
    /// Rows sharing a key form one independent series.
    fn group_key(&self) -> &str;
    fn price(&self) -> Option<f64>;
}

impl PricedRow for Trade {
    fn group_key(&self) -> &str {
        &self.pair
    }

    fn price(&self) -> Option<f64> {
        self.price
    }
}

impl PricedRow for OhlcBar {
    fn group_key(&self) -> &str {
        &self.pair_name
    }

    fn price(&self) -> Option<f64> {
        self.close
    }
}

#[derive(Debug, Clone)]
pub struct AnnotatedTable<R> {
    pub rows: Vec<R>,
    /// Each column has exactly `rows.len()` values.
    pub indicators: Vec<Indicator>,
}

impl<R> AnnotatedTable<R> {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column(&self, name: &str) -> Option<&Indicator> {
        self.indicators.iter().find(|i| i.name == name)
    }

    /// The column's value at `row`, if the column exists and is defined there.
    pub fn value(&self, name: &str, row: usize) -> Option<f64> {
        self.column(name)?.values.get(row).copied().flatten()
    }
}

impl<R: PricedRow> AnnotatedTable<R> {
    /// Row indices belonging to `key`, in table order.
    pub fn group_rows(&self, key: &str) -> Vec<usize> {
        (0..self.rows.len()).filter(|&i| self.rows[i].group_key() == key).collect()
    }

    /// The most recent defined price in the table.
    pub fn last_price(&self) -> Option<f64> {
        self.rows.iter().rev().find_map(|r| r.price())
    }
}

pub struct IndicatorEngine {
    calculators: Vec<Box<dyn IndicatorCalculator>>,
}

impl IndicatorEngine {
    pub fn new(calculators: Vec<Box<dyn IndicatorCalculator>>) -> Self {
        IndicatorEngine { calculators }
    }

    /// One SMA per configured window followed by the RSI.
    pub fn from_settings(settings: &IndicatorSettings) -> Result<Self> {
        let mut calculators: Vec<Box<dyn IndicatorCalculator>> = Vec::new();
        for window in &settings.sma_windows {
            calculators.push(Box::new(Sma::new(*window)?));
        }
        calculators.push(Box::new(Rsi::new(settings.rsi_period, settings.rsi_smoothing)?));
        Ok(Self::new(calculators))
    }

    pub fn names(&self) -> Vec<&str> {
        self.calculators.iter().map(|c| c.name()).collect()
    }

    /// Groups rows by pair (groups ordered by first appearance, each keeping
    /// its internal order) and computes every indicator independently per
    /// group. The output has the same rows as the input; only columns are
    /// added.
    pub fn annotate<R: PricedRow>(&self, rows: Vec<R>) -> AnnotatedTable<R> {
        let mut ranks: HashMap<String, usize> = HashMap::new();
        let mut keyed: Vec<(usize, R)> = rows
            .into_iter()
            .map(|row| {
                let next = ranks.len();
                let rank = *ranks.entry(row.group_key().to_string()).or_insert(next);
                (rank, row)
            })
            .collect();
        // Stable, so each group keeps its chronological order.
        keyed.sort_by_key(|(rank, _)| *rank);

        let mut spans: Vec<(usize, usize)> = Vec::with_capacity(ranks.len());
        let mut start = 0;
        for i in 1..=keyed.len() {
            if i == keyed.len() || keyed[i].0 != keyed[start].0 {
                spans.push((start, i));
                start = i;
            }
        }

        let rows: Vec<R> = keyed.into_iter().map(|(_, row)| row).collect();
        let prices: Vec<Option<f64>> = rows.iter().map(|r| r.price()).collect();

        let indicators = self
            .calculators
            .iter()
            .map(|calculator| {
                let mut values = Vec::with_capacity(rows.len());
                for &(from, to) in &spans {
                    values.extend(calculator.calculate(&prices[from..to]));
                }
                debug_assert_eq!(values.len(), rows.len());
                Indicator {
                    name: calculator.name().to_string(),
                    parameters: calculator.parameters(),
                    values,
                }
            })
            .collect();

        tracing::debug!(rows = rows.len(), groups = spans.len(), "Annotated table with indicators");
        AnnotatedTable { rows, indicators }
    }
}
