//! CLI error handling with semantic exit codes.
//!
//! Errors are categorized so scripts and CI pipelines can tell a network
//! outage from a malformed post without parsing messages.
//!
//! # Exit Code Categories
//!
//! | Code | Category | Description |
//! |------|----------|-------------|
//! | 0 | Success | Index written (or rendered with `--dry-run`) |
//! | 1 | `Internal` | Unexpected/internal error |
//! | 2 | `Usage` | Invalid arguments or configuration |
//! | 3 | `Network` | Manifest or page could not be fetched |
//! | 4 | `Content` | Manifest or front matter is malformed |
//! | 5 | `BatchFailed` | At least one post failed; nothing was written |
//! | 6 | `Storage` | The index could not be written |
//!
//! # Usage
//!
//! ```bash
//! blogdex build
//! case $? in
//!     0) echo "index updated" ;;
//!     5) echo "some posts are broken, index left untouched" ;;
//!     *) echo "other error" ;;
//! esac
//! ```

use std::fmt;
use std::process::ExitCode;

/// Semantic error category determining the exit code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ErrorCategory {
    /// Unexpected or internal error (exit code 1).
    Internal = 1,

    /// Invalid arguments or configuration (exit code 2).
    Usage = 2,

    /// Network or fetch failure (exit code 3).
    ///
    /// Covers transport errors and non-success HTTP statuses.
    Network = 3,

    /// Malformed manifest or post content (exit code 4).
    Content = 4,

    /// One or more posts failed during a build (exit code 5).
    BatchFailed = 5,

    /// Local filesystem failure (exit code 6).
    Storage = 6,
}

impl ErrorCategory {
    /// Get the exit code for this category.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        self as u8
    }

    /// Create an `ExitCode` from this category.
    #[must_use]
    pub fn as_exit_code(self) -> ExitCode {
        ExitCode::from(self.exit_code())
    }

    /// Get a short description of this error category.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Internal => "internal error",
            Self::Usage => "usage error",
            Self::Network => "network error",
            Self::Content => "content error",
            Self::BatchFailed => "batch failed",
            Self::Storage => "storage error",
        }
    }

    /// Map a core error onto its exit category.
    #[must_use]
    pub fn from_core(err: &blogdex_core::Error) -> Self {
        match err.category() {
            "network" | "fetch" => Self::Network,
            "parse" | "validation" | "manifest" | "invalid_path" => Self::Content,
            "config" => Self::Usage,
            "batch" => Self::BatchFailed,
            "io" | "storage" => Self::Storage,
            _ => Self::Internal,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// A CLI error with a semantic category for exit code mapping.
///
/// Wraps an `anyhow::Error` so context chains survive while the exit code
/// stays explicit.
#[derive(Debug)]
pub struct CliError {
    /// The semantic category of this error.
    pub category: ErrorCategory,
    /// The underlying error with full context.
    pub source: anyhow::Error,
}

impl CliError {
    /// Create a new CLI error with explicit category.
    pub fn new(category: ErrorCategory, source: impl Into<anyhow::Error>) -> Self {
        Self {
            category,
            source: source.into(),
        }
    }

    /// Create a usage error.
    pub fn usage(source: impl Into<anyhow::Error>) -> Self {
        Self::new(ErrorCategory::Usage, source)
    }

    /// Get the exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.category.exit_code()
    }

    /// Create an `ExitCode` from this error.
    #[must_use]
    pub fn as_exit_code(&self) -> ExitCode {
        self.category.as_exit_code()
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.source)
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

/// Determine the exit code from an `anyhow::Error`.
///
/// Explicit `CliError`s win; otherwise the first core error in the chain
/// decides, and anything else is internal.
#[must_use]
pub fn exit_code_from_error(err: &anyhow::Error) -> u8 {
    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        return cli_err.exit_code();
    }

    err.chain()
        .find_map(|cause| cause.downcast_ref::<blogdex_core::Error>())
        .map_or(ErrorCategory::Internal, ErrorCategory::from_core)
        .exit_code()
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use blogdex_core::Error;

    mod error_category {
        use super::*;

        #[test]
        fn test_exit_codes() {
            assert_eq!(ErrorCategory::Internal.exit_code(), 1);
            assert_eq!(ErrorCategory::Usage.exit_code(), 2);
            assert_eq!(ErrorCategory::Network.exit_code(), 3);
            assert_eq!(ErrorCategory::Content.exit_code(), 4);
            assert_eq!(ErrorCategory::BatchFailed.exit_code(), 5);
            assert_eq!(ErrorCategory::Storage.exit_code(), 6);
        }

        #[test]
        fn test_from_core() {
            assert_eq!(
                ErrorCategory::from_core(&Error::Fetch {
                    url: "https://x/y".into(),
                    status: 404,
                }),
                ErrorCategory::Network
            );
            assert_eq!(
                ErrorCategory::from_core(&Error::Manifest("no nav".into())),
                ErrorCategory::Content
            );
            assert_eq!(
                ErrorCategory::from_core(&Error::Config("bad url".into())),
                ErrorCategory::Usage
            );
            assert_eq!(
                ErrorCategory::from_core(&Error::BatchFailed {
                    failed: 1,
                    total: 2,
                }),
                ErrorCategory::BatchFailed
            );
            assert_eq!(
                ErrorCategory::from_core(&Error::Storage("disk full".into())),
                ErrorCategory::Storage
            );
        }
    }

    mod exit_code_from_error {
        use super::*;

        #[test]
        fn test_cli_error() {
            let err: anyhow::Error = CliError::usage(anyhow!("bad flag")).into();
            assert_eq!(exit_code_from_error(&err), 2);
        }

        #[test]
        fn test_core_error_with_context() {
            let err = anyhow::Error::new(Error::BatchFailed {
                failed: 2,
                total: 9,
            })
            .context("build aborted");
            assert_eq!(exit_code_from_error(&err), 5);
        }

        #[test]
        fn test_unknown_error_is_internal() {
            assert_eq!(exit_code_from_error(&anyhow!("something odd")), 1);
        }
    }

    #[test]
    fn test_display_is_source_message() {
        let err = CliError::usage(anyhow!("--concurrency expects a number"));
        assert_eq!(err.to_string(), "--concurrency expects a number");
    }
}
