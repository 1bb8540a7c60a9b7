//! Error types for Noise Chart.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for chart operations.
pub type Result<T> = std::result::Result<T, ChartError>;

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to read config: {path}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config JSON: {0}")]
    ConfigParse(#[from] serde_json::Error),
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
    #[error("Render error: {0}")]
    Render(String),
    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ChartError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig(reason.into())
    }

    pub fn render(reason: impl ToString) -> Self {
        Self::Render(reason.to_string())
    }
}
