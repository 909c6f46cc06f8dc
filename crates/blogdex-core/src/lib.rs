//! # blogdex-core
//!
//! Core functionality for blogdex: builds a sorted index of blog posts from a
//! documentation site's navigation manifest.
//!
//! ## Architecture
//!
//! The pipeline runs in four stages:
//!
//! - **Manifest**: fetch the site manifest and flatten its `nav` tree into a
//!   table of contents ([`manifest`])
//! - **Posts**: fetch each post source, validate its front matter and make its
//!   image and permalink absolute ([`post`], [`frontmatter`])
//! - **Aggregation**: run every post fetch concurrently, collecting successes
//!   and failures as they complete ([`aggregate`])
//! - **Emission**: sort newest first and write the index document ([`emit`])
//!
//! A single failed post voids the whole batch: nothing is written unless every
//! post succeeded.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blogdex_core::{Aggregator, Fetcher, PostFetcher, SiteConfig, emit, fetch_toc};
//!
//! # async fn run() -> blogdex_core::Result<()> {
//! let config = SiteConfig::load(None)?;
//! let fetcher = PostFetcher::new(Fetcher::new()?, config.clone());
//! let toc = fetch_toc(fetcher.source(), &config).await?;
//!
//! let results = Aggregator::new(fetcher).run_all(&toc).await;
//! let index = results.into_index()?;
//! emit(&index, &config.output.label, &config.output.path)?;
//! # Ok(())
//! # }
//! ```

/// Concurrent fetching and the all-or-nothing batch gate
pub mod aggregate;
/// Site configuration and endpoint derivation
pub mod config;
/// Ordering and writing of the index document
pub mod emit;
/// Error types and result aliases
pub mod error;
/// HTTP transport
pub mod fetcher;
/// Front matter extraction and validation
pub mod frontmatter;
/// Navigation manifest parsing and flattening
pub mod manifest;
/// Per-post fetching and normalization
pub mod post;

// Re-export commonly used types
pub use aggregate::{Aggregator, FailedPost, Progress, ProgressCallback, ResultSet};
pub use config::SiteConfig;
pub use emit::{PostIndex, emit, render};
pub use error::{Error, FieldIssue, FieldProblem, Result, ValidationError};
pub use fetcher::{Fetcher, PageSource};
pub use frontmatter::{PostFrontMatter, parse_front_matter};
pub use manifest::{NavNode, NavigationManifest, Toc, fetch_toc, flatten, parse_manifest};
pub use post::{BlogPost, PostFetcher};
