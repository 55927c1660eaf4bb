pub mod auth;
pub mod config;
pub mod error;
pub mod models;
pub mod source;
pub mod store;
pub mod transcript;

pub use config::Config;
pub use error::{AppError, Result};
pub use models::{Message, ScrapeState, Settings};
pub use transcript::Scraper;
