mod http;

pub use http::HttpSource;

use async_trait::async_trait;

use crate::error::Result;

/// Where transcript pages come from.
///
/// Returns the raw markup; the page scanner does the parsing so parsed
/// documents never have to cross an await point.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
