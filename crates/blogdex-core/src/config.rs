//! Site configuration for the index builder.
//!
//! All endpoints the pipeline talks to are carried in one [`SiteConfig`] value
//! that is passed explicitly to every component. Nothing reads process-wide
//! globals, so tests can point the whole pipeline at a mock server.
//!
//! ## Configuration Hierarchy
//!
//! 1. **Defaults**: [`SiteConfig::default`]
//! 2. **File**: `blogdex.toml` in the working directory, or an explicit path
//! 3. **Environment variables**: `BLOGDEX_*` prefix (see [`SiteConfig::apply_env`])
//!
//! Command-line flags are applied on top by the CLI.
//!
//! ## Example Configuration File
//!
//! ```toml
//! [site]
//! blog_url = "https://ivansaul.github.io/blog"
//! raw_base_url = "https://raw.githubusercontent.com/ivansaul/blog/master"
//! manifest = "mkdocs.yaml"
//! docs_dir = "docs"
//!
//! [output]
//! path = "config/blog.yml"
//! label = "Blog"
//!
//! [fetch]
//! timeout_secs = 30
//! concurrency = 16
//! ```

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use url::Url;

/// File name looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "blogdex.toml";

/// Environment variable overriding [`SiteSection::blog_url`].
pub const ENV_BLOG_URL: &str = "BLOGDEX_BLOG_URL";
/// Environment variable overriding [`SiteSection::raw_base_url`].
pub const ENV_RAW_BASE_URL: &str = "BLOGDEX_RAW_BASE_URL";
/// Environment variable overriding [`OutputSection::path`].
pub const ENV_OUTPUT: &str = "BLOGDEX_OUTPUT";

/// Complete configuration for one index build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SiteConfig {
    /// Where the site lives.
    pub site: SiteSection,
    /// Where and how the index is written.
    pub output: OutputSection,
    /// Transport settings.
    pub fetch: FetchSection,
}

/// Endpoints of the documentation site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    /// Public base URL of the blog; post permalinks hang off it.
    pub blog_url: String,

    /// Base URL serving the raw repository content.
    ///
    /// Markdown sources and images are fetched from `{raw_base_url}/{docs_dir}/...`.
    pub raw_base_url: String,

    /// Path of the navigation manifest relative to `raw_base_url`.
    pub manifest: String,

    /// Directory holding content sources, relative to `raw_base_url`.
    pub docs_dir: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            blog_url: "https://ivansaul.github.io/blog".to_string(),
            raw_base_url: "https://raw.githubusercontent.com/ivansaul/blog/master".to_string(),
            manifest: "mkdocs.yaml".to_string(),
            docs_dir: "docs".to_string(),
        }
    }
}

/// Output document settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputSection {
    /// Destination of the generated index. Overwritten in full on success.
    pub path: PathBuf,
    /// Label written into the `HEADER` section.
    pub label: String,
}

impl Default for OutputSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("config/blog.yml"),
            label: "Blog".to_string(),
        }
    }
}

/// HTTP transport settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchSection {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,

    /// Maximum number of posts fetched at once.
    ///
    /// `None` (or `0`) means every post is in flight at the same time.
    pub concurrency: Option<usize>,
}

impl Default for FetchSection {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            concurrency: None,
        }
    }
}

impl SiteConfig {
    /// Load configuration from `path`, or from `./blogdex.toml` when present.
    ///
    /// Missing default file yields [`SiteConfig::default`]; an explicit path
    /// that does not exist is an error. Environment overrides are applied and
    /// the result is validated.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::from_file(default_path)?
                } else {
                    Self::default()
                }
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML configuration file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read config '{}': {e}", path.display()))
        })?;
        toml::from_str(&content).map_err(|e| {
            Error::Config(format!("Failed to parse config '{}': {e}", path.display()))
        })
    }

    /// Serialize the configuration to `path` as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {e}")))?;
        fs::write(path, content)
            .map_err(|e| Error::Config(format!("Failed to write config: {e}")))?;
        Ok(())
    }

    /// Apply `BLOGDEX_*` overrides using `lookup` to read variables.
    ///
    /// Empty values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_empty(ENV_BLOG_URL) {
            self.site.blog_url = v;
        }
        if let Some(v) = non_empty(ENV_RAW_BASE_URL) {
            self.site.raw_base_url = v;
        }
        if let Some(v) = non_empty(ENV_OUTPUT) {
            self.output.path = PathBuf::from(v);
        }
    }

    /// Check that endpoints are absolute http(s) URLs and required names are set.
    pub fn validate(&self) -> Result<()> {
        validate_base_url("site.blog_url", &self.site.blog_url)?;
        validate_base_url("site.raw_base_url", &self.site.raw_base_url)?;

        if self.site.manifest.trim().is_empty() {
            return Err(Error::Config("site.manifest must not be empty".into()));
        }
        if self.site.docs_dir.trim_matches('/').is_empty() {
            return Err(Error::Config("site.docs_dir must not be empty".into()));
        }
        if self.output.label.is_empty() {
            return Err(Error::Config("output.label must not be empty".into()));
        }
        if self.output.path.as_os_str().is_empty() {
            return Err(Error::Config("output.path must not be empty".into()));
        }
        if self.fetch.timeout_secs == 0 {
            return Err(Error::Config("fetch.timeout_secs must be positive".into()));
        }
        Ok(())
    }

    /// Concurrency limit, with `0` normalized to unbounded.
    #[must_use]
    pub fn concurrency_limit(&self) -> Option<usize> {
        self.fetch.concurrency.filter(|&n| n > 0)
    }

    /// URL of the navigation manifest.
    #[must_use]
    pub fn manifest_url(&self) -> String {
        format!(
            "{}/{}",
            trim_base(&self.site.raw_base_url),
            self.site.manifest.trim_start_matches('/')
        )
    }

    /// URL of a raw content file under the docs directory.
    ///
    /// Used for both markdown sources and the assets they reference:
    /// `img/cover.png` becomes `{raw_base_url}/docs/img/cover.png`.
    #[must_use]
    pub fn source_url(&self, relative: &str) -> String {
        format!(
            "{}/{}/{}",
            trim_base(&self.site.raw_base_url),
            self.site.docs_dir.trim_matches('/'),
            relative
        )
    }

    /// Public permalink of a post: the blog base plus the source path without
    /// its file extension.
    #[must_use]
    pub fn post_url(&self, source_path: &str) -> String {
        format!(
            "{}/{}",
            trim_base(&self.site.blog_url),
            strip_extension(source_path)
        )
    }
}

fn trim_base(base: &str) -> &str {
    base.trim_end_matches('/')
}

fn validate_base_url(field: &str, value: &str) -> Result<()> {
    let parsed =
        Url::parse(value).map_err(|e| Error::Config(format!("{field} '{value}' is invalid: {e}")))?;
    match parsed.scheme() {
        "http" | "https" => Ok(()),
        other => Err(Error::Config(format!(
            "{field} must use http or https, found '{other}'"
        ))),
    }
}

/// Remove the final extension from the last path segment.
///
/// A leading dot does not start an extension (`.hidden` stays as is), which
/// matches how path libraries define a suffix.
#[must_use]
pub fn strip_extension(path: &str) -> &str {
    let name_start = path.rfind('/').map_or(0, |i| i + 1);
    let name = &path[name_start..];
    match name.rfind('.') {
        Some(dot) if dot > 0 => &path[..name_start + dot],
        _ => path,
    }
}
