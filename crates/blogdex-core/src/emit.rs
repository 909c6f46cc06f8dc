//! Ordering and emission of the post index.
//!
//! The generated document has a fixed shape:
//!
//! ```yaml
//! HEADER:
//!   label: "Blog"
//!
//! POSTS:
//!   - title: "How to sort arrays in Swift"
//!     category: "swift"
//!     subtitle: "Sorting made easy"
//!     published: "2024-06-01"
//!     image: "https://raw.githubusercontent.com/ivansaul/blog/master/docs/swift/cover.png"
//!     url: "https://ivansaul.github.io/blog/swift/sort-arrays"
//!
//! ```
//!
//! Posts are ordered most recent first. Posts sharing a date keep the order in
//! which their tasks were submitted (manifest order).

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::aggregate::CollectedPost;
use crate::post::BlogPost;
use crate::{Error, Result};

/// Posts sorted for emission, newest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostIndex {
    posts: Vec<BlogPost>,
}

impl PostIndex {
    /// Sort posts collected by the aggregator.
    ///
    /// Ties on the publication date are broken by submission index, so the
    /// result never depends on completion order.
    #[must_use]
    pub(crate) fn from_collected(mut collected: Vec<CollectedPost>) -> Self {
        collected.sort_by(|a, b| {
            b.post
                .published
                .cmp(&a.post.published)
                .then(a.task_index.cmp(&b.task_index))
        });
        Self {
            posts: collected.into_iter().map(|c| c.post).collect(),
        }
    }

    /// Posts in emission order.
    #[must_use]
    pub fn posts(&self) -> &[BlogPost] {
        &self.posts
    }

    /// Number of posts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.posts.len()
    }

    /// True when the index holds no posts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }
}

/// Render `index` as the index document with `label` in its header.
#[must_use]
pub fn render(index: &PostIndex, label: &str) -> String {
    let mut out = String::with_capacity(64 + index.len() * 320);
    out.push_str("HEADER:\n");
    let _ = writeln!(out, "  label: {}", quote(label));
    out.push('\n');
    out.push_str("POSTS:\n");

    for post in index.posts() {
        let _ = writeln!(out, "  - title: {}", quote(&post.title));
        let _ = writeln!(out, "    category: {}", quote(&post.category));
        let _ = writeln!(out, "    subtitle: {}", quote(&post.description));
        let _ = writeln!(
            out,
            "    published: {}",
            quote(&post.published.format("%Y-%m-%d").to_string())
        );
        let _ = writeln!(out, "    image: {}", quote(&post.image));
        let _ = writeln!(out, "    url: {}", quote(&post.url));
        out.push('\n');
    }
    out
}

/// Double-quoted YAML scalar.
fn quote(value: &str) -> String {
    let mut quoted = String::with_capacity(value.len() + 2);
    quoted.push('"');
    for c in value.chars() {
        match c {
            '"' => quoted.push_str("\\\""),
            '\\' => quoted.push_str("\\\\"),
            '\n' => quoted.push_str("\\n"),
            '\t' => quoted.push_str("\\t"),
            '\r' => quoted.push_str("\\r"),
            c => quoted.push(c),
        }
    }
    quoted.push('"');
    quoted
}

/// Render `index` and replace `destination` with it.
///
/// The document is written to a sibling `.tmp` file and renamed into place,
/// so a failed write never leaves a truncated index behind. Missing parent
/// directories are created.
pub fn emit(index: &PostIndex, label: &str, destination: &Path) -> Result<()> {
    let document = render(index, label);

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            Error::Storage(format!(
                "Failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut tmp_name = destination.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp_path = Path::new(&tmp_name);

    fs::write(tmp_path, &document)
        .map_err(|e| Error::Storage(format!("Failed to write index: {e}")))?;

    if let Err(e) = commit(tmp_path, destination) {
        let _ = fs::remove_file(tmp_path);
        return Err(e);
    }

    debug!("Wrote {} bytes to {}", document.len(), destination.display());
    info!("Wrote {} posts to {}", index.len(), destination.display());
    Ok(())
}

/// Move the rendered temp file over `destination`.
fn commit(tmp_path: &Path, destination: &Path) -> Result<()> {
    #[cfg(target_os = "windows")]
    if destination.exists() {
        fs::remove_file(destination)
            .map_err(|e| Error::Storage(format!("Failed to remove existing index: {e}")))?;
    }

    fs::rename(tmp_path, destination)
        .map_err(|e| Error::Storage(format!("Failed to commit index: {e}")))
}
