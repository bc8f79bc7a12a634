use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while importing isotherms, running the BET analysis or
/// exporting its results.
#[derive(Debug, Error)]
pub enum BetError {
    /// The input table or list does not describe a usable isotherm.
    #[error("invalid isotherm input: {0}")]
    InputFormat(String),

    /// The adsorbate cross-sectional area is missing, zero or not finite.
    #[error("invalid cross-sectional area {0} (square angstrom, must be > 0)")]
    CrossSection(f64),

    /// No candidate range passes every enabled Rouquerol criterion.
    #[error("no valid relative pressure ranges; specific surface area not calculated")]
    NoValidRange,

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),
}

pub type Result<T> = std::result::Result<T, BetError>;

impl BetError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        BetError::Io {
            path: path.into(),
            source,
        }
    }
}
