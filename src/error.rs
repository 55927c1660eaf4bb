use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Message {0} not found")]
    NotFound(u64),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Randomness error: {0}")]
    Randomness(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("Scraper has been shut down")]
    Closed,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Config error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, AppError>;
