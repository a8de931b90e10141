pub mod config;
pub use config::{ApiConfig, Config, DisplayConfig, ExportConfig};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CricketLensError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("API returned HTTP {status} for {url}")]
    Api { status: u16, url: String },
    #[error("invalid game id {0}: must be positive")]
    InvalidGameId(i64),
    #[error("score range {min}..={max} is too wide to chart")]
    ScoreRangeTooWide { min: i64, max: i64 },
    #[error("Config error: {0}")]
    Config(String),
    #[error("{0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, CricketLensError>;
