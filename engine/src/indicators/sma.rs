// Simple Moving Average (SMA) indicator implementation
use super::IndicatorCalculator;
use crate::error::{EngineError, Result};
use serde_json::Value;

pub struct Sma {
    name: String,
    period: usize,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self> {
        if period == 0 {
            return Err(EngineError::IndicatorError("SMA period must be greater than 0".to_string()));
        }
        Ok(Self {
            name: format!("SMA({})", period),
            period,
        })
    }
}

impl IndicatorCalculator for Sma {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        serde_json::json!({ "period": self.period })
    }

    fn calculate(&self, prices: &[Option<f64>]) -> Vec<Option<f64>> {
        rolling_mean(prices, self.period)
    }
}

/// Unweighted mean over the trailing `window` values. A position is defined
/// only when all `window` values ending there are present.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    if window == 0 {
        return vec![None; values.len()];
    }

    let mut results = Vec::with_capacity(values.len());
    let mut sum = 0.0;
    let mut present = 0usize;

    // Slide the window
    for i in 0..values.len() {
        if let Some(v) = values[i] {
            sum += v;
            present += 1;
        }
        if i >= window {
            if let Some(v) = values[i - window] {
                sum -= v;
                present -= 1;
            }
        }
        if present == window {
            results.push(Some(sum / window as f64));
        } else {
            results.push(None);
        }
    }
    results
}
