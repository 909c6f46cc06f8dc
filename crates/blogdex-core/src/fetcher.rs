use crate::{Error, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Something that can return the body of a URL as text.
///
/// The production implementation is [`Fetcher`]; tests substitute in-memory
/// sources. Implementations must report a non-success response as
/// [`Error::Fetch`].
#[async_trait]
pub trait PageSource: Send + Sync {
    /// GET `url` and return its body.
    async fn fetch_text(&self, url: &str) -> Result<String>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for std::sync::Arc<T> {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        (**self).fetch_text(url).await
    }
}

/// HTTP client for fetching manifests and post sources
pub struct Fetcher {
    client: Client,
}

impl Fetcher {
    /// Creates a new fetcher with the default 30 second timeout
    pub fn new() -> Result<Self> {
        Self::with_timeout(Duration::from_secs(30))
    }

    /// Creates a new fetcher with a custom request timeout
    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("blogdex/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .brotli(true)
            .build()
            .map_err(Error::Client)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageSource for Fetcher {
    async fn fetch_text(&self, url: &str) -> Result<String> {
        let network = |source| Error::Network {
            url: url.to_string(),
            source,
        };

        let response = self.client.get(url).send().await.map_err(network)?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Fetch {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let content = response.text().await.map_err(network)?;
        debug!("Fetched {} bytes from {}", content.len(), url);
        Ok(content)
    }
}

// Note: Default is not implemented as Fetcher::new() can fail.
