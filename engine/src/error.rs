use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("CSV parsing system error: {source}")]
    CsvSystemError {
        #[from]
        source: csv::Error,
    },

    #[error("I/O error: {source}")]
    IoError {
        #[from]
        source: std::io::Error,
    },

    #[error("Upstream error from '{endpoint}': {}", .messages.join("; "))]
    UpstreamError { endpoint: String, messages: Vec<String> },

    #[error("Transport error: {source}")]
    TransportError {
        #[from]
        source: reqwest::Error,
    },

    #[error("JSON decoding error: {source}")]
    JsonError {
        #[from]
        source: serde_json::Error,
    },

    #[error("No data for '{pair}' in the selected window")]
    NoData { pair: String },

    #[error("Malformed market data: {0}")]
    MalformedData(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Indicator calculation error: {0}")]
    IndicatorError(String),
}

/// Coarse classification used by front ends to decide how to react to a
/// failed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The market API or the network failed. The run aborts, nothing is shown.
    Upstream,
    /// The window was empty or the payload did not have the expected shape.
    DataShape,
    /// Startup configuration is unusable. Fatal.
    Configuration,
    /// The caller asked for something invalid.
    Request,
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::UpstreamError { .. }
            | EngineError::TransportError { .. }
            | EngineError::JsonError { .. } => ErrorKind::Upstream,
            EngineError::NoData { .. } | EngineError::MalformedData(_) => ErrorKind::DataShape,
            EngineError::ConfigError(_)
            | EngineError::CsvSystemError { .. }
            | EngineError::IoError { .. } => ErrorKind::Configuration,
            EngineError::InvalidRequest(_) | EngineError::IndicatorError(_) => ErrorKind::Request,
        }
    }

    /// True for the "nothing to show" case, as opposed to broken data.
    pub fn is_no_data(&self) -> bool {
        matches!(self, EngineError::NoData { .. })
    }
}

impl From<shared::models::UnknownTimeFrame> for EngineError {
    fn from(err: shared::models::UnknownTimeFrame) -> Self {
        EngineError::InvalidRequest(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
