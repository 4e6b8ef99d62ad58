//! Error types used by the crate.

use thiserror::Error;

/// Bikemap error type.
#[derive(Debug, Error)]
pub enum BikemapError {
    /// The place resource is malformed. This is fatal at startup: the map cannot be shown without
    /// its places.
    #[error("malformed place data: {0}")]
    DataFormat(String),
    /// Error reading the place resource from the file system.
    #[error("failed to read place data")]
    Io(#[from] std::io::Error),
    /// The host dropped a lifecycle signal before delivering it.
    #[error("map lifecycle signal was dropped before delivery")]
    SignalDropped,
}

impl From<serde_json::Error> for BikemapError {
    fn from(value: serde_json::Error) -> Self {
        Self::DataFormat(value.to_string())
    }
}
