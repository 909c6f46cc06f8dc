use anyhow::Result;
use blogdex_core::{Aggregator, PostFetcher, SiteConfig, emit, fetch_toc, render};
use colored::Colorize;
use tracing::debug;

use crate::cli::BuildArgs;

/// Fetch every post listed in the manifest and write the index.
///
/// Progress lines go to stdout, or to stderr with `--dry-run` so the rendered
/// document is the only thing on stdout. If any post fails, every failure is
/// printed and the command returns the batch error without touching the
/// output file.
pub async fn execute(mut site: SiteConfig, args: &BuildArgs, quiet: bool) -> Result<()> {
    if let Some(output) = &args.output {
        site.output.path.clone_from(output);
    }
    if args.concurrency.is_some() {
        site.fetch.concurrency = args.concurrency;
    }

    let fetcher = PostFetcher::new(super::fetcher_for(&site)?, site.clone());
    let toc = fetch_toc(fetcher.source(), &site).await?;
    debug!(
        "Manifest lists {} posts in {} categories",
        toc.total_paths(),
        toc.categories().len()
    );

    let to_stderr = args.dry_run;
    let aggregator = Aggregator::new(fetcher)
        .with_concurrency(site.concurrency_limit())
        .with_progress(move |progress| {
            if quiet {
                return;
            }
            let line = progress.to_string().green();
            if to_stderr {
                eprintln!("{line}");
            } else {
                println!("{line}");
            }
        });

    let results = aggregator.run_all(&toc).await;
    for failure in results.failures() {
        eprintln!("{}", format!("Error: {failure}").red());
    }
    let index = results.into_index()?;

    if args.dry_run {
        print!("{}", render(&index, &site.output.label));
        return Ok(());
    }

    emit(&index, &site.output.label, &site.output.path)?;
    if !quiet {
        println!(
            "{} {} posts to {}",
            "Wrote".green().bold(),
            index.len(),
            site.output.path.display()
        );
    }
    Ok(())
}
