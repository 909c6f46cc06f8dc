//! Per-post fetching and normalization.

use chrono::NaiveDate;
use serde::Serialize;
use tracing::debug;

use crate::config::SiteConfig;
use crate::fetcher::PageSource;
use crate::frontmatter::{PostFrontMatter, parse_front_matter};
use crate::{Error, Result};

/// A post ready for the index: validated front matter plus where it lives.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BlogPost {
    /// Post title.
    pub title: String,
    /// One-line summary (emitted as `subtitle`).
    pub description: String,
    /// Publication date.
    pub published: NaiveDate,
    /// Fully-qualified cover image URL.
    pub image: String,
    /// Top-level category the post was listed under.
    pub category: String,
    /// Public permalink.
    pub url: String,
}

impl BlogPost {
    /// Attach category and permalink to front matter whose image has already
    /// been made absolute.
    #[must_use]
    pub fn new(front_matter: PostFrontMatter, category: &str, url: String) -> Self {
        let PostFrontMatter {
            title,
            description,
            published,
            image,
        } = front_matter;
        Self {
            title,
            description,
            published,
            image,
            category: category.to_string(),
            url,
        }
    }
}

/// Fetches post sources and turns them into [`BlogPost`]s.
pub struct PostFetcher<S> {
    source: S,
    config: SiteConfig,
}

impl<S: PageSource> PostFetcher<S> {
    /// Create a fetcher reading through `source` with the endpoints in `config`.
    pub const fn new(source: S, config: SiteConfig) -> Self {
        Self { source, config }
    }

    /// Endpoints in use.
    pub const fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Underlying page source.
    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Fetch `url` and parse its front matter.
    ///
    /// Fails with [`Error::Fetch`] on a non-success response, [`Error::Parse`]
    /// on an unreadable block and [`Error::Validation`] on missing fields.
    pub async fn fetch_front_matter(&self, url: &str) -> Result<PostFrontMatter> {
        let text = self.source.fetch_text(url).await?;
        parse_front_matter(&text, url)
    }

    /// Fetch one post listed under `category` at `source_path` (relative to
    /// the docs directory) and normalize it.
    ///
    /// The image is rewritten from a docs-relative path to an absolute URL and
    /// the permalink is derived from the source path without its extension.
    pub async fn fetch_and_process(&self, category: &str, source_path: &str) -> Result<BlogPost> {
        if source_path.trim().is_empty() {
            return Err(Error::InvalidPath(format!(
                "empty source path in category '{category}'"
            )));
        }

        let metadata_url = self.config.source_url(source_path);
        let post_url = self.config.post_url(source_path);

        let mut front_matter = self.fetch_front_matter(&metadata_url).await?;
        front_matter.image = self.config.source_url(&front_matter.image);

        debug!("Processed {} -> {}", source_path, post_url);
        Ok(BlogPost::new(front_matter, category, post_url))
    }
}
