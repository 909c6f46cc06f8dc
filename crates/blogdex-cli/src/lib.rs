//! blogdex CLI - builds a sorted blog post index from a docs site
//!
//! This is the library behind the `blogdex` binary. Argument parsing lives in
//! [`cli`], command implementations in `commands`, and exit code mapping in
//! [`error`].
use anyhow::Result;
use blogdex_core::SiteConfig;
use clap::Parser;

pub mod cli;
mod commands;
pub mod error;
mod utils;

use crate::cli::{BuildArgs, Cli, Commands};
use crate::error::CliError;
use crate::utils::initialize_logging;

/// Execute the blogdex CLI with the currently configured environment.
///
/// # Errors
///
/// Returns an error if configuration is invalid or the command fails.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();

    initialize_logging(&cli)?;

    let site = resolve_config(&cli)?;
    execute_command(cli, site).await
}

async fn execute_command(cli: Cli, site: SiteConfig) -> Result<()> {
    let quiet = cli.quiet;
    match cli.command {
        Some(Commands::Build(args)) => commands::build_index(site, &args, quiet).await,
        Some(Commands::Toc { json }) => commands::show_toc(&site, json).await,
        None => commands::build_index(site, &BuildArgs::default(), quiet).await,
    }
}

/// Layer CLI endpoint flags over file and environment configuration.
fn resolve_config(cli: &Cli) -> Result<SiteConfig> {
    let mut site = SiteConfig::load(cli.config.as_deref()).map_err(CliError::usage)?;

    let mut overridden = false;
    if let Some(url) = &cli.blog_url {
        site.site.blog_url.clone_from(url);
        overridden = true;
    }
    if let Some(url) = &cli.raw_base_url {
        site.site.raw_base_url.clone_from(url);
        overridden = true;
    }
    if overridden {
        site.validate().map_err(CliError::usage)?;
    }
    Ok(site)
}
