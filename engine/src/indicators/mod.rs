// Technical indicators module
pub mod ema;
pub mod rsi;
pub mod sma;
pub mod table;

pub use rsi::Rsi;
pub use sma::Sma;
pub use table::{AnnotatedTable, IndicatorEngine, PricedRow};

use serde_json::Value;

// Common trait for all indicators
pub trait IndicatorCalculator: Send + Sync {
    fn name(&self) -> &str;
    fn parameters(&self) -> Value; // Parameters used for this indicator instance
    /// One output per input price; `None` where the indicator is undefined.
    fn calculate(&self, prices: &[Option<f64>]) -> Vec<Option<f64>>;
}
