use std::fmt::Write as _;

use anyhow::Result;
use blogdex_core::{SiteConfig, Toc, fetch_toc};
use colored::Colorize;

/// Print the flattened table of contents, as text or JSON.
pub async fn execute(site: &SiteConfig, json: bool) -> Result<()> {
    let fetcher = super::fetcher_for(site)?;
    let toc = fetch_toc(&fetcher, site).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&toc)?);
    } else {
        print!("{}", format_toc(&toc));
    }
    Ok(())
}

fn format_toc(toc: &Toc) -> String {
    let mut out = String::new();
    for category in toc.categories() {
        let _ = writeln!(out, "{} ({})", category.name.bold(), category.paths.len());
        for path in &category.paths {
            let _ = writeln!(out, "  {path}");
        }
    }
    if toc.is_empty() {
        out.push_str("No posts listed in the manifest\n");
    }
    out
}
