// error.rs - Error taxonomy for the distance engine and its I/O adapters

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A marker name that the layout does not know.
    #[error("Unknown marker name '{0}'")]
    UnknownMarker(String),

    #[error("Invalid marker layout: {0}")]
    InvalidLayout(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// A reduction left fewer than two persons.
    #[error("Insufficient data: {reason} ({remaining} remain, at least 2 required)")]
    InsufficientData { reason: String, remaining: usize },

    /// Two marker vectors share no marker that can be compared under the given rates.
    #[error("No comparable markers between the two marker vectors")]
    NoComparableMarkers,

    #[error("Marker vector has {found} slots but the layout expects {expected}")]
    LayoutMismatch { expected: usize, found: usize },

    #[error("Failed to access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Parse error in {location}: {message}")]
    Parse { location: String, message: String },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    pub fn insufficient(reason: impl Into<String>, remaining: usize) -> Self {
        Error::InsufficientData {
            reason: reason.into(),
            remaining,
        }
    }

    pub fn parse(location: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Parse {
            location: location.into(),
            message: message.into(),
        }
    }

    /// Insufficient-data failures are reported to the caller, who decides whether to abort.
    pub fn is_insufficient_data(&self) -> bool {
        matches!(self, Error::InsufficientData { .. })
    }
}
