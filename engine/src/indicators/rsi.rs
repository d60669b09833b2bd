// Relative Strength Index (RSI) indicator implementation
use super::ema::{alpha_from_com, ewm_mean};
use super::sma::rolling_mean;
use super::IndicatorCalculator;
use crate::config::RsiSmoothing;
use crate::error::{EngineError, Result};
use serde_json::Value;

pub struct Rsi {
    name: String,
    period: usize,
    smoothing: RsiSmoothing,
}

impl Rsi {
    pub fn new(period: usize, smoothing: RsiSmoothing) -> Result<Self> {
        if period == 0 {
            return Err(EngineError::IndicatorError("RSI period must be greater than 0".to_string()));
        }
        Ok(Self {
            name: format!("RSI({})", period),
            period,
            smoothing,
        })
    }
}

impl IndicatorCalculator for Rsi {
    fn name(&self) -> &str {
        &self.name
    }

    fn parameters(&self) -> Value {
        let smoothing = match self.smoothing {
            RsiSmoothing::Exponential => "exponential",
            RsiSmoothing::Simple => "simple",
        };
        serde_json::json!({ "period": self.period, "smoothing": smoothing })
    }

    fn calculate(&self, prices: &[Option<f64>]) -> Vec<Option<f64>> {
        let mut gains = vec![None; prices.len()];
        let mut losses = vec![None; prices.len()];
        for i in 1..prices.len() {
            if let (Some(prev), Some(current)) = (prices[i - 1], prices[i]) {
                let change = current - prev;
                gains[i] = Some(change.max(0.0));
                losses[i] = Some((-change).max(0.0));
            }
        }

        let (avg_gain, avg_loss) = match self.smoothing {
            RsiSmoothing::Exponential => {
                // Center of mass period-1, i.e. alpha = 1/period.
                let alpha = alpha_from_com(self.period as f64 - 1.0);
                (ewm_mean(&gains, alpha, self.period), ewm_mean(&losses, alpha, self.period))
            }
            RsiSmoothing::Simple => (rolling_mean(&gains, self.period), rolling_mean(&losses, self.period)),
        };

        avg_gain
            .into_iter()
            .zip(avg_loss)
            .map(|(gain, loss)| Some(rsi_value(gain?, loss?)))
            .collect()
    }
}

/// Bounded to [0, 100]; no losses at all saturates to 100.
fn rsi_value(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn prices(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    fn assert_close(actual: Option<f64>, expected: f64) {
        let value = actual.unwrap_or_else(|| panic!("expected {}, got None", expected));
        assert!((value - expected).abs() < 1e-6, "expected {}, got {}", expected, value);
    }

    #[test]
    fn test_rsi_exponential_small_period() {
        // gains: -, 1, 0, 2   losses: -, 0, 1, 0   alpha = 1/2
        let rsi = Rsi::new(2, RsiSmoothing::Exponential).unwrap();
        let results = rsi.calculate(&prices(&[1.0, 2.0, 1.0, 3.0]));
        assert_eq!(results[0], None);
        assert_eq!(results[1], None);
        // avg gain 1/3, avg loss 2/3
        assert_close(results[2], 100.0 - 100.0 / 1.5);
        // avg gain 2.25/1.75, avg loss 0.5/1.75 -> rs 4.5
        assert_close(results[3], 100.0 - 100.0 / 5.5);
    }

    #[test]
    fn test_rsi_simple_small_period() {
        let rsi = Rsi::new(2, RsiSmoothing::Simple).unwrap();
        let results = rsi.calculate(&prices(&[1.0, 2.0, 1.0, 3.0]));
        assert_eq!(results[..2], [None, None]);
        assert_close(results[2], 50.0);
        assert_close(results[3], 100.0 - 100.0 / 3.0);
    }

    #[test]
    fn test_rsi_reference_series_stays_in_band() {
        let series = [
            44.34, 44.09, 44.15, 43.61, 44.33, 44.83, 45.10, 45.42, 45.84, 46.08, 45.89, 46.03, 45.61, 46.28, 46.28,
            46.00, 46.03, 46.41, 46.22, 45.64, 46.25,
        ];
        let rsi = Rsi::new(14, RsiSmoothing::Exponential).unwrap();
        let results = rsi.calculate(&prices(&series));

        // We expect 14 `None` values, then the first RSI.
        for (i, value) in results.iter().enumerate().take(14) {
            assert_eq!(*value, None, "Expected None at index {}", i);
        }
        for value in &results[14..] {
            let v = value.unwrap();
            assert!(v > 50.0 && v < 80.0, "RSI out of expected range: {}", v);
        }
    }

    #[test]
    fn test_rsi_insufficient_data() {
        let rsi = Rsi::new(14, RsiSmoothing::Exponential).unwrap();
        assert_eq!(rsi.calculate(&prices(&[1.0; 10])), vec![None; 10]);
    }

    #[test]
    fn test_rsi_all_gains() {
        let series: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        for smoothing in [RsiSmoothing::Exponential, RsiSmoothing::Simple] {
            let results = Rsi::new(14, smoothing).unwrap().calculate(&prices(&series));
            assert!(results[..14].iter().all(Option::is_none));
            assert!(results[14..].iter().all(|v| *v == Some(100.0)));
        }
    }

    #[test]
    fn test_rsi_all_losses() {
        let series: Vec<f64> = (1..=20).map(|i| 20.0 - i as f64).collect();
        let results = Rsi::new(14, RsiSmoothing::Exponential).unwrap().calculate(&prices(&series));
        assert!(results[14..].iter().all(|v| *v == Some(0.0)));
    }

    #[test]
    fn test_rsi_flat_prices_saturate() {
        let results = Rsi::new(3, RsiSmoothing::Exponential).unwrap().calculate(&prices(&[5.0; 6]));
        assert_eq!(results[3..], [Some(100.0), Some(100.0), Some(100.0)]);
    }

    #[test]
    fn test_rsi_bounds_on_noisy_series() {
        let series: Vec<f64> = (0..500)
            .map(|i| 100.0 + ((i * 7919) % 113) as f64 * 0.37 - ((i * 104729) % 89) as f64 * 0.41)
            .collect();
        for smoothing in [RsiSmoothing::Exponential, RsiSmoothing::Simple] {
            let results = Rsi::new(14, smoothing).unwrap().calculate(&prices(&series));
            assert_eq!(results.len(), series.len());
            for v in results.into_iter().flatten() {
                assert!((0.0..=100.0).contains(&v), "RSI out of bounds: {}", v);
            }
        }
    }

    #[test]
    fn test_rsi_missing_price_breaks_two_deltas() {
        let mut series = prices(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        series[2] = None;
        let results = Rsi::new(1, RsiSmoothing::Simple).unwrap().calculate(&series);
        assert_eq!(results, vec![None, Some(100.0), None, None, Some(100.0), Some(100.0)]);
    }

    #[test]
    fn test_rsi_period_zero_rejected() {
        assert!(Rsi::new(0, RsiSmoothing::Simple).is_err());
    }
}
