//! Error types and handling for blogdex-core operations.
//!
//! Every fallible operation in the crate returns [`Result<T>`]. Errors are
//! split along the stages of the pipeline so callers can tell a transport
//! failure from a bad post:
//!
//! - **Transport**: [`Error::Network`] (request never completed) and
//!   [`Error::Fetch`] (server answered with a non-success status)
//! - **Content**: [`Error::Parse`] (metadata block is not valid YAML) and
//!   [`Error::Validation`] (required fields missing or mistyped)
//! - **Structure**: [`Error::Manifest`] and [`Error::InvalidPath`]
//! - **Environment**: [`Error::Io`], [`Error::Client`], [`Error::Config`],
//!   [`Error::Storage`]
//! - **Batch**: [`Error::BatchFailed`], raised when the all-or-nothing gate trips
//!
//! Per-post errors carry the URL they came from, so a flattened description is
//! enough to tell the user which post is broken:
//!
//! ```rust
//! use blogdex_core::Error;
//!
//! let err = Error::Fetch {
//!     url: "https://host/repo/master/docs/a.md".to_string(),
//!     status: 404,
//! };
//! assert_eq!(err.category(), "fetch");
//! assert!(err.to_string().contains("docs/a.md"));
//! ```

use std::fmt;

use thiserror::Error;

/// The main error type for blogdex-core operations.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP request could not be completed (DNS, connect, body read).
    #[error("Network error for '{url}': {source}")]
    Network {
        /// URL that was being requested.
        url: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },

    /// The HTTP client itself could not be constructed (TLS backend, proxy setup).
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The server answered with a non-success status code.
    #[error("Fetch failed for '{url}': HTTP {status}")]
    Fetch {
        /// URL that was requested.
        url: String,
        /// HTTP status code returned by the server.
        status: u16,
    },

    /// A YAML document or front matter block could not be parsed.
    #[error("Parse error in '{origin}': {message}")]
    Parse {
        /// Where the text came from (usually a URL).
        origin: String,
        /// Parser message.
        message: String,
    },

    /// Front matter parsed but does not satisfy the required shape.
    #[error("Invalid front matter in '{origin}': {source}")]
    Validation {
        /// Where the front matter came from (usually a URL).
        origin: String,
        /// Every field that failed validation.
        #[source]
        source: ValidationError,
    },

    /// The navigation manifest has a shape this tool does not accept.
    #[error("Invalid navigation manifest: {0}")]
    Manifest(String),

    /// A content source path is unusable (e.g. empty).
    #[error("Invalid source path: {0}")]
    InvalidPath(String),

    /// Configuration is invalid or inaccessible.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing the generated index failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// At least one post in the batch failed, so nothing was emitted.
    #[error("{failed} of {total} posts failed; no index was written")]
    BatchFailed {
        /// Number of failed posts.
        failed: usize,
        /// Number of posts in the batch.
        total: usize,
    },
}

impl Error {
    /// Get the error category as a string identifier.
    ///
    /// Used for structured logging and by the CLI to pick an exit code.
    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Io(_) => "io",
            Self::Network { .. } => "network",
            Self::Client(_) => "client",
            Self::Fetch { .. } => "fetch",
            Self::Parse { .. } => "parse",
            Self::Validation { .. } => "validation",
            Self::Manifest(_) => "manifest",
            Self::InvalidPath(_) => "invalid_path",
            Self::Config(_) => "config",
            Self::Storage(_) => "storage",
            Self::BatchFailed { .. } => "batch",
        }
    }
}

/// What is wrong with a single front matter field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldProblem {
    /// The field is absent (or null).
    Missing,
    /// The field is present but has the wrong type or format.
    WrongType {
        /// Human-readable description of what was expected.
        expected: &'static str,
    },
}

/// A single failed field check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    /// Name of the field as it appears in the front matter.
    pub field: &'static str,
    /// What is wrong with it.
    pub problem: FieldProblem,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.problem {
            FieldProblem::Missing => write!(f, "`{}` is missing", self.field),
            FieldProblem::WrongType { expected } => {
                write!(f, "`{}` must be {expected}", self.field)
            },
        }
    }
}

/// Structured validation failure listing every offending field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Offending fields, in declaration order of the record.
    pub issues: Vec<FieldIssue>,
}

impl ValidationError {
    /// Names of all offending fields.
    #[must_use]
    pub fn fields(&self) -> Vec<&'static str> {
        self.issues.iter().map(|issue| issue.field).collect()
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, issue) in self.issues.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{issue}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Convenience type alias for `std::result::Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
