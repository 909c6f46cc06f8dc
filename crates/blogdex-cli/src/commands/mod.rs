//! Command implementations for the blogdex CLI

mod build;
mod toc;

pub use build::execute as build_index;
pub use toc::execute as show_toc;

use std::time::Duration;

use anyhow::Result;
use blogdex_core::{Fetcher, SiteConfig};

/// HTTP client honoring the configured timeout.
fn fetcher_for(site: &SiteConfig) -> Result<Fetcher> {
    Ok(Fetcher::with_timeout(Duration::from_secs(
        site.fetch.timeout_secs,
    ))?)
}
