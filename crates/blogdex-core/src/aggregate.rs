//! Concurrent fetching of every post in a table of contents.
//!
//! [`Aggregator::run_all`] creates one task per `(category, path)` pair of a
//! [`Toc`], runs them concurrently and files each outcome into a [`ResultSet`]
//! as it completes. A failing post never cancels its siblings; all errors are
//! collected and the batch is judged only once every task has finished.
//!
//! The batch is all-or-nothing: [`ResultSet::into_index`] refuses to produce a
//! [`PostIndex`] when any task failed, so a partial index can never be emitted.

use std::fmt;
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::emit::PostIndex;
use crate::fetcher::PageSource;
use crate::manifest::Toc;
use crate::post::{BlogPost, PostFetcher};
use crate::{Error, Result};

/// Progress notification sent after each successful post.
#[derive(Debug, Clone, Copy)]
pub struct Progress<'a> {
    /// Successes so far, including this one.
    pub completed: usize,
    /// Number of tasks in the batch.
    pub total: usize,
    /// Title of the post that just completed.
    pub title: &'a str,
}

impl fmt::Display for Progress<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} / {}] {}", self.completed, self.total, self.title)
    }
}

/// Progress callback type for reporting batch progress.
pub type ProgressCallback = Arc<dyn Fn(&Progress<'_>) + Send + Sync>;

/// One unit of work: fetch the post at `source_path` filed under `category`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostTask {
    /// Position in submission order (category order, then path order).
    pub index: usize,
    /// Top-level category.
    pub category: String,
    /// Source path relative to the docs directory.
    pub source_path: String,
}

/// Build the task list for `toc` in submission order.
#[must_use]
pub fn plan_tasks(toc: &Toc) -> Vec<PostTask> {
    toc.entries()
        .enumerate()
        .map(|(index, (category, path))| PostTask {
            index,
            category: category.to_string(),
            source_path: path.to_string(),
        })
        .collect()
}

/// A successfully fetched post and the task it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectedPost {
    /// Submission index of the task.
    pub task_index: usize,
    /// The fetched post.
    pub post: BlogPost,
}

/// A post that could not be fetched or validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedPost {
    /// Submission index of the task.
    pub task_index: usize,
    /// Category the post was listed under.
    pub category: String,
    /// Source path of the post.
    pub source_path: String,
    /// Error category (see [`Error::category`]).
    pub kind: &'static str,
    /// Flattened error description.
    pub message: String,
}

impl FailedPost {
    fn from_error(task: &PostTask, err: &Error) -> Self {
        Self {
            task_index: task.index,
            category: task.category.clone(),
            source_path: task.source_path.clone(),
            kind: err.category(),
            message: err.to_string(),
        }
    }
}

impl fmt::Display for FailedPost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Outcome of a batch, in completion order.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    successes: Vec<CollectedPost>,
    failures: Vec<FailedPost>,
    total: usize,
}

impl ResultSet {
    /// Create an empty result set for a batch of `total` tasks.
    #[must_use]
    pub const fn new(total: usize) -> Self {
        Self {
            successes: Vec::new(),
            failures: Vec::new(),
            total,
        }
    }

    /// Record a completed post; returns the running success count.
    pub fn record_success(&mut self, task_index: usize, post: BlogPost) -> usize {
        self.successes.push(CollectedPost { task_index, post });
        self.successes.len()
    }

    /// Record a failed task.
    pub fn record_failure(&mut self, failure: FailedPost) {
        self.failures.push(failure);
    }

    /// Successful posts in completion order.
    #[must_use]
    pub fn successes(&self) -> &[CollectedPost] {
        &self.successes
    }

    /// Failures in completion order.
    #[must_use]
    pub fn failures(&self) -> &[FailedPost] {
        &self.failures
    }

    /// Number of tasks in the batch.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }

    /// True when any task failed.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Pass the all-or-nothing gate and hand the posts to emission.
    ///
    /// Fails with [`Error::BatchFailed`] when any task failed; inspect
    /// [`ResultSet::failures`] first to report them.
    pub fn into_index(self) -> Result<PostIndex> {
        if self.is_failed() {
            return Err(Error::BatchFailed {
                failed: self.failures.len(),
                total: self.total,
            });
        }
        Ok(PostIndex::from_collected(self.successes))
    }
}

/// Runs one fetch task per table-of-contents entry.
///
/// ## Example
///
/// ```rust,no_run
/// use blogdex_core::{Aggregator, Fetcher, PostFetcher, SiteConfig, fetch_toc};
///
/// # async fn example() -> blogdex_core::Result<()> {
/// let config = SiteConfig::default();
/// let fetcher = PostFetcher::new(Fetcher::new()?, config.clone());
/// let toc = fetch_toc(fetcher.source(), &config).await?;
///
/// let aggregator = Aggregator::new(fetcher).with_progress(|p| println!("{p}"));
/// let results = aggregator.run_all(&toc).await;
/// for failure in results.failures() {
///     eprintln!("Error: {failure}");
/// }
/// let index = results.into_index()?;
/// # Ok(())
/// # }
/// ```
pub struct Aggregator<S> {
    fetcher: PostFetcher<S>,
    concurrency: Option<usize>,
    progress_callback: Option<ProgressCallback>,
}

impl<S: PageSource> Aggregator<S> {
    /// Create an aggregator with no concurrency limit.
    pub const fn new(fetcher: PostFetcher<S>) -> Self {
        Self {
            fetcher,
            concurrency: None,
            progress_callback: None,
        }
    }

    /// Cap the number of posts in flight. `None` or `Some(0)` means unbounded.
    #[must_use]
    pub fn with_concurrency(mut self, concurrency: Option<usize>) -> Self {
        self.concurrency = concurrency.filter(|&n| n > 0);
        self
    }

    /// Set progress callback, called after each successful post.
    #[must_use]
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&Progress<'_>) + Send + Sync + 'static,
    {
        self.progress_callback = Some(Arc::new(callback));
        self
    }

    /// Configured concurrency limit.
    pub const fn concurrency(&self) -> Option<usize> {
        self.concurrency
    }

    /// The post fetcher in use.
    pub const fn fetcher(&self) -> &PostFetcher<S> {
        &self.fetcher
    }

    /// Fetch every post in `toc` concurrently and collect the outcomes.
    ///
    /// Outcomes are recorded in completion order. Every task runs to
    /// completion regardless of failures elsewhere in the batch.
    pub async fn run_all(&self, toc: &Toc) -> ResultSet {
        let tasks = plan_tasks(toc);
        let total = tasks.len();
        let mut results = ResultSet::new(total);
        if total == 0 {
            return results;
        }

        let limit = self.concurrency.map_or(total, |n| n.min(total));
        debug!("Fetching {} posts with up to {} in flight", total, limit);

        let mut completions = stream::iter(tasks)
            .map(|task| async move {
                let outcome = self
                    .fetcher
                    .fetch_and_process(&task.category, &task.source_path)
                    .await;
                (task, outcome)
            })
            .buffer_unordered(limit);

        while let Some((task, outcome)) = completions.next().await {
            match outcome {
                Ok(post) => {
                    let title = post.title.clone();
                    let completed = results.record_success(task.index, post);
                    if let Some(cb) = &self.progress_callback {
                        cb(&Progress {
                            completed,
                            total,
                            title: &title,
                        });
                    }
                },
                Err(err) => {
                    warn!("Failed to process {}: {}", task.source_path, err);
                    results.record_failure(FailedPost::from_error(&task, &err));
                },
            }
        }

        info!(
            "Batch finished: {} succeeded, {} failed",
            results.successes().len(),
            results.failures().len()
        );
        results
    }
}
