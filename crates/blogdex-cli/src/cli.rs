//! # CLI Structure and Argument Parsing
//!
//! `blogdex` builds the blog post index of a docs site. With no subcommand it
//! runs `build`.
//!
//! ```bash
//! # Fetch every post and write config/blog.yml
//! blogdex
//! blogdex build --output site/config/blog.yml
//!
//! # Render to stdout instead of writing
//! blogdex build --dry-run
//!
//! # Inspect the flattened table of contents
//! blogdex toc
//! blogdex toc --json
//! ```
//!
//! Global options select the configuration file and override the endpoints it
//! defines, which is how tests point the tool at a mock server.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Main CLI structure for the `blogdex` command
#[derive(Parser, Clone, Debug)]
#[command(name = "blogdex")]
#[command(version)]
#[command(about = "blogdex - Build a sorted blog post index from a docs site", long_about = None)]
#[allow(clippy::struct_excessive_bools)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Path to a configuration file (defaults to ./blogdex.toml when present)
    #[arg(long, global = true, env = "BLOGDEX_CONFIG", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Public base URL of the blog
    #[arg(long, global = true, value_name = "URL")]
    pub blog_url: Option<String>,

    /// Base URL serving the raw repository content
    #[arg(long, global = true, value_name = "URL")]
    pub raw_base_url: Option<String>,

    /// Enable debug logging
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress informational messages (only show errors)
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,
}

/// Available subcommands
#[derive(Subcommand, Clone, Debug)]
pub enum Commands {
    /// Fetch every post and write the index (default)
    Build(BuildArgs),

    /// Print the flattened table of contents
    Toc {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Arguments for `blogdex build`
#[derive(Args, Clone, Debug, Default)]
pub struct BuildArgs {
    /// Where to write the index (overrides `output.path`)
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Maximum posts fetched at once (0 = unlimited)
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Print the rendered index to stdout instead of writing it
    #[arg(long)]
    pub dry_run: bool,
}
