//! Navigation manifest parsing and flattening.
//!
//! A docs site describes its table of contents as a nested `nav` tree in its
//! manifest (an mkdocs-style YAML file):
//!
//! ```yaml
//! nav:
//!   - swift:
//!       - swift/index.md
//!       - Basics:
//!           - swift/basics/optionals.md
//!       - swift/sort-arrays.md
//!   - swiftui:
//!       - swiftui/text.md
//! ```
//!
//! [`parse_manifest`] turns that YAML into a typed [`NavigationManifest`] and
//! [`flatten`] collapses it into a [`Toc`]: one ordered list of post sources
//! per top-level category. Nested groups are inlined under their top-level
//! category and category landing pages (`index.md`) are dropped.
//!
//! ```rust
//! use blogdex_core::manifest::{flatten, parse_manifest};
//!
//! let manifest = parse_manifest(
//!     "nav:\n  - swift:\n      - a.md\n      - swift/index.md\n      - b.md\n",
//!     "mkdocs.yaml",
//! )?;
//! let toc = flatten(&manifest);
//! assert_eq!(toc.get("swift"), Some(&["a.md".to_string(), "b.md".to_string()][..]));
//! # Ok::<(), blogdex_core::Error>(())
//! ```

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_yaml::{Mapping, Value};
use tracing::{debug, info};

use crate::config::SiteConfig;
use crate::fetcher::PageSource;
use crate::{Error, Result};

/// Suffix marking a category landing page rather than a post.
pub const INDEX_MARKER: &str = "index.md";

/// A node of the navigation tree below a top-level category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavNode {
    /// Reference to a content source (`swift/sort-arrays.md`).
    Leaf(String),
    /// A named sub-group. Its name is presentational only.
    Group {
        /// Display name of the group.
        name: String,
        /// Children in manifest order.
        children: Vec<NavNode>,
    },
}

/// A top-level manifest entry: a category and the tree below it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavSection {
    /// Category name; becomes the key in the flattened table of contents.
    pub category: String,
    /// Nodes below the category in manifest order.
    pub children: Vec<NavNode>,
}

/// The typed `nav` tree of a site manifest.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NavigationManifest {
    /// Top-level sections in manifest order.
    pub sections: Vec<NavSection>,
}

/// One category of the flattened table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TocCategory {
    /// Category name.
    pub name: String,
    /// Source paths in traversal order. Duplicates are kept.
    pub paths: Vec<String>,
}

/// Flattened table of contents: category name to ordered source paths.
///
/// Categories keep first-seen order and are unique.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Toc {
    categories: Vec<TocCategory>,
}

impl Toc {
    /// Create an empty table of contents.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get or create the category named `name`.
    pub fn category_mut(&mut self, name: &str) -> &mut TocCategory {
        let position = match self.categories.iter().position(|c| c.name == name) {
            Some(position) => position,
            None => {
                self.categories.push(TocCategory {
                    name: name.to_string(),
                    paths: Vec::new(),
                });
                self.categories.len() - 1
            },
        };
        &mut self.categories[position]
    }

    /// Append `path` to `category`, creating the category if needed.
    pub fn push(&mut self, category: &str, path: impl Into<String>) {
        self.category_mut(category).paths.push(path.into());
    }

    /// Paths of `category`, if present.
    #[must_use]
    pub fn get(&self, category: &str) -> Option<&[String]> {
        self.categories
            .iter()
            .find(|c| c.name == category)
            .map(|c| c.paths.as_slice())
    }

    /// Categories in first-seen order.
    #[must_use]
    pub fn categories(&self) -> &[TocCategory] {
        &self.categories
    }

    /// Every `(category, path)` pair, category order then path order.
    pub fn entries(&self) -> impl Iterator<Item = (&str, &str)> {
        self.categories.iter().flat_map(|c| {
            c.paths
                .iter()
                .map(move |path| (c.name.as_str(), path.as_str()))
        })
    }

    /// Total number of paths across all categories.
    #[must_use]
    pub fn total_paths(&self) -> usize {
        self.categories.iter().map(|c| c.paths.len()).sum()
    }

    /// True when there are no categories at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

impl Serialize for Toc {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.categories.len()))?;
        for category in &self.categories {
            map.serialize_entry(&category.name, &category.paths)?;
        }
        map.end()
    }
}

/// Collapse the navigation tree into a [`Toc`].
///
/// Every leaf is filed under the top-level category it was reached from;
/// leaves ending in [`INDEX_MARKER`] are skipped. A category whose only
/// entries are landing pages still appears, with no paths.
#[must_use]
pub fn flatten(manifest: &NavigationManifest) -> Toc {
    let mut toc = Toc::new();
    for section in &manifest.sections {
        let entry = toc.category_mut(&section.category);
        collect_leaves(&section.children, &mut entry.paths);
    }
    toc
}

fn collect_leaves(nodes: &[NavNode], out: &mut Vec<String>) {
    for node in nodes {
        match node {
            NavNode::Leaf(path) => {
                if !path.ends_with(INDEX_MARKER) {
                    out.push(path.clone());
                }
            },
            NavNode::Group { children, .. } => collect_leaves(children, out),
        }
    }
}

/// Parse a raw manifest document into its typed `nav` tree.
///
/// Every `!` is removed before parsing: manifests carry custom YAML tags
/// (`!!python/name:...`) that a plain YAML parser rejects. This is lossy for
/// any `!` inside nav entries.
///
/// `origin` names the document in error messages.
pub fn parse_manifest(raw: &str, origin: &str) -> Result<NavigationManifest> {
    let cleaned = raw.replace('!', "");
    let document: Value = serde_yaml::from_str(&cleaned).map_err(|e| Error::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;

    let nav = document
        .get("nav")
        .ok_or_else(|| Error::Manifest(format!("'{origin}' has no `nav` key")))?;
    let Value::Sequence(entries) = nav else {
        return Err(Error::Manifest(format!(
            "`nav` must be a list, found {}",
            describe(nav)
        )));
    };

    let mut sections = Vec::new();
    for entry in entries {
        let Value::Mapping(mapping) = entry else {
            return Err(Error::Manifest(format!(
                "top-level nav entries must be `category: [...]` mappings, found {}",
                describe(entry)
            )));
        };
        for (key, value) in mapping {
            let category = key_name(key)?;
            let children = section_children(&category, value)?;
            sections.push(NavSection { category, children });
        }
    }

    debug!("Parsed {} nav sections from {}", sections.len(), origin);
    Ok(NavigationManifest { sections })
}

fn section_children(category: &str, value: &Value) -> Result<Vec<NavNode>> {
    match value {
        Value::Sequence(items) => parse_nodes(items, category),
        Value::String(path) => Ok(vec![NavNode::Leaf(path.clone())]),
        other => Err(Error::Manifest(format!(
            "category '{category}' must map to a list, found {}",
            describe(other)
        ))),
    }
}

fn parse_nodes(items: &[Value], context: &str) -> Result<Vec<NavNode>> {
    let mut nodes = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(path) => nodes.push(NavNode::Leaf(path.clone())),
            Value::Mapping(mapping) => parse_group_mapping(mapping, context, &mut nodes)?,
            other => {
                return Err(Error::Manifest(format!(
                    "unsupported nav node under '{context}': {}",
                    describe(other)
                )));
            },
        }
    }
    Ok(nodes)
}

fn parse_group_mapping(mapping: &Mapping, context: &str, nodes: &mut Vec<NavNode>) -> Result<()> {
    for (key, value) in mapping {
        let name = key_name(key)?;
        match value {
            // `- Title: path.md` names a single page.
            Value::String(path) => nodes.push(NavNode::Leaf(path.clone())),
            Value::Sequence(items) => {
                let children = parse_nodes(items, &name)?;
                nodes.push(NavNode::Group { name, children });
            },
            other => {
                return Err(Error::Manifest(format!(
                    "nav entry '{name}' under '{context}' must be a path or a list, found {}",
                    describe(other)
                )));
            },
        }
    }
    Ok(())
}

fn key_name(key: &Value) -> Result<String> {
    match key {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Bool(b) => Ok(b.to_string()),
        other => Err(Error::Manifest(format!(
            "nav keys must be scalars, found {}",
            describe(other)
        ))),
    }
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => format!("boolean `{b}`"),
        Value::Number(n) => format!("number `{n}`"),
        Value::String(s) => format!("string `{s}`"),
        Value::Sequence(_) => "a list".to_string(),
        Value::Mapping(_) => "a mapping".to_string(),
        Value::Tagged(tagged) => format!("tagged value `{}`", tagged.tag),
    }
}

/// Fetch the site manifest and flatten its navigation into a [`Toc`].
pub async fn fetch_toc<S>(source: &S, config: &SiteConfig) -> Result<Toc>
where
    S: PageSource + ?Sized,
{
    let url = config.manifest_url();
    let raw = source.fetch_text(&url).await?;
    let manifest = parse_manifest(&raw, &url)?;
    let toc = flatten(&manifest);
    info!(
        "Table of contents: {} categories, {} posts",
        toc.categories().len(),
        toc.total_paths()
    );
    Ok(toc)
}
