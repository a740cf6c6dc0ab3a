use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GridError {
    #[error("num_grid_lines must be at least 1")]
    NoGridLines,
    #[error("num_vert_lines must be at least 1")]
    NoVertLines,
    #[error("minor_tick must be at least 1")]
    NoMinorTick,
    #[error("{field} must be at most {max}, got {value}")]
    TooDense {
        field: &'static str,
        value: u32,
        max: u32,
    },
    #[error("price_extreme must be a positive number, got {0}")]
    PriceExtreme(f64),
    #[error("market price must be a finite, non-negative number, got {0}")]
    MarketPrice(f64),
    #[error("grid container has no drawable area ({width}x{height})")]
    EmptyContainer { width: f32, height: f32 },
    #[error("invalid live endpoint '{url}': {source}")]
    ServerUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse settings file '{path}': {source}")]
    Settings {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to parse error-code table '{path}': {source}")]
    ErrorCodes {
        path: PathBuf,
        #[source]
        source: shared::error::ProtocolError,
    },
}
