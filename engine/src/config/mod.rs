pub mod settings;

pub use settings::{EngineSettings, FetchSettings, IndicatorSettings, RsiSmoothing, TimeAnchor};
