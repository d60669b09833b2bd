// Market data acquisition and normalization.
pub mod catalog;
pub mod cleaner;
pub mod fetcher;
pub mod reference;

pub use catalog::{MarketCatalog, SelectableAsset};
pub use cleaner::DataCleaner;
pub use fetcher::{Termination, TradeFetcher, TradeWindow};
pub use reference::AssetDirectory;
