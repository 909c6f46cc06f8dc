//! blogdex - builds a sorted blog post index from a docs site
//!
//! Thin entry point: all behavior lives in the `blogdex_cli` library.

use std::process::ExitCode;

use blogdex_cli::error::exit_code_from_error;
use colored::Colorize;

#[tokio::main]
async fn main() -> ExitCode {
    match blogdex_cli::run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "Error:".red().bold());
            ExitCode::from(exit_code_from_error(&err))
        },
    }
}
