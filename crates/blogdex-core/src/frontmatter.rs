//! Front matter extraction and validation.
//!
//! A post source starts with a YAML block fenced by `---` lines:
//!
//! ```text
//! ---
//! title: How to sort arrays in Swift
//! description: Sorting with sort(), sorted() and custom comparators
//! date: 2024-06-01
//! image: swift/assets/sort-arrays/cover.png
//! ---
//!
//! # How to sort arrays in Swift
//! ```
//!
//! [`parse_front_matter`] extracts and parses the block, then
//! [`PostFrontMatter::from_metadata`] checks that `title`, `description`,
//! `date` and `image` are all present and well typed. A document without a
//! block is treated as having empty metadata, so it fails validation with all
//! four fields reported missing.

use chrono::NaiveDate;
use serde::Serialize;
use serde_yaml::{Mapping, Value};

use crate::error::{FieldIssue, FieldProblem, ValidationError};
use crate::{Error, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Validated metadata of a single post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostFrontMatter {
    /// Post title.
    pub title: String,
    /// One-line summary.
    pub description: String,
    /// Publication date (`date` in the source).
    pub published: NaiveDate,
    /// Cover image path relative to the docs directory.
    pub image: String,
}

impl PostFrontMatter {
    /// Validate a parsed metadata mapping.
    ///
    /// Every field is checked before returning, so the error lists all
    /// problems at once.
    pub fn from_metadata(metadata: &Mapping) -> std::result::Result<Self, ValidationError> {
        let mut issues = Vec::new();

        let title = string_field(metadata, "title", &mut issues);
        let description = string_field(metadata, "description", &mut issues);
        let published = date_field(metadata, "date", &mut issues);
        let image = string_field(metadata, "image", &mut issues);

        match (title, description, published, image) {
            (Some(title), Some(description), Some(published), Some(image)) if issues.is_empty() => {
                Ok(Self {
                    title,
                    description,
                    published,
                    image,
                })
            },
            _ => Err(ValidationError { issues }),
        }
    }
}

fn lookup<'a>(metadata: &'a Mapping, field: &str) -> Option<&'a Value> {
    metadata.get(field).filter(|value| !value.is_null())
}

fn string_field(
    metadata: &Mapping,
    field: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<String> {
    match lookup(metadata, field) {
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => {
            issues.push(FieldIssue {
                field,
                problem: FieldProblem::WrongType {
                    expected: "a string",
                },
            });
            None
        },
        None => {
            issues.push(FieldIssue {
                field,
                problem: FieldProblem::Missing,
            });
            None
        },
    }
}

fn date_field(
    metadata: &Mapping,
    field: &'static str,
    issues: &mut Vec<FieldIssue>,
) -> Option<NaiveDate> {
    let wrong_type = FieldIssue {
        field,
        problem: FieldProblem::WrongType {
            expected: "a YYYY-MM-DD date",
        },
    };
    match lookup(metadata, field) {
        Some(Value::String(s)) => {
            let parsed = is_iso_date_shape(s)
                .then(|| NaiveDate::parse_from_str(s, DATE_FORMAT).ok())
                .flatten();
            if parsed.is_none() {
                issues.push(wrong_type);
            }
            parsed
        },
        Some(_) => {
            issues.push(wrong_type);
            None
        },
        None => {
            issues.push(FieldIssue {
                field,
                problem: FieldProblem::Missing,
            });
            None
        },
    }
}

/// `YYYY-MM-DD` exactly: zero padded, no surrounding whitespace.
fn is_iso_date_shape(s: &str) -> bool {
    let bytes = s.as_bytes();
    bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        })
}

fn is_fence(line: &str) -> bool {
    let trimmed = line.trim_end();
    trimmed.len() >= 3 && trimmed.bytes().all(|b| b == b'-')
}

/// Split a document into its front matter block and body.
///
/// Returns `Ok(None)` when the document does not open with a fence, and an
/// error when an opening fence is never closed.
pub fn split_front_matter<'a>(text: &'a str, origin: &str) -> Result<Option<(&'a str, &'a str)>> {
    let text = text.trim_start_matches('\u{feff}').trim_start();

    let mut lines = text.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return Ok(None);
    };
    if !is_fence(first) {
        return Ok(None);
    }

    let block_start = first.len();
    let mut offset = block_start;
    for line in lines {
        if is_fence(line) {
            let block = &text[block_start..offset];
            let body = &text[offset + line.len()..];
            return Ok(Some((block, body)));
        }
        offset += line.len();
    }

    Err(Error::Parse {
        origin: origin.to_string(),
        message: "front matter block is not closed by a `---` line".to_string(),
    })
}

/// Extract the raw metadata mapping of a document.
pub fn parse_metadata(text: &str, origin: &str) -> Result<Mapping> {
    let Some((block, _body)) = split_front_matter(text, origin)? else {
        return Ok(Mapping::new());
    };
    if block.trim().is_empty() {
        return Ok(Mapping::new());
    }

    let value: Value = serde_yaml::from_str(block).map_err(|e| Error::Parse {
        origin: origin.to_string(),
        message: e.to_string(),
    })?;

    match value {
        Value::Mapping(mapping) => Ok(mapping),
        Value::Null => Ok(Mapping::new()),
        _ => Err(Error::Parse {
            origin: origin.to_string(),
            message: "front matter must be a key/value mapping".to_string(),
        }),
    }
}

/// Parse and validate the front matter of a post source.
pub fn parse_front_matter(text: &str, origin: &str) -> Result<PostFrontMatter> {
    let metadata = parse_metadata(text, origin)?;
    PostFrontMatter::from_metadata(&metadata).map_err(|source| Error::Validation {
        origin: origin.to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic, clippy::disallowed_macros)]
mod tests {
    use super::*;

    const VALID: &str = "---\n\
title: How to sort arrays in Swift\n\
description: Sorting made easy\n\
date: 2024-06-01\n\
image: swift/assets/cover.png\n\
---\n\
\n\
# Body\n";

    #[test]
    fn test_parse_valid_front_matter() {
        let fm = parse_front_matter(VALID, "a.md").unwrap();
        assert_eq!(fm.title, "How to sort arrays in Swift");
        assert_eq!(fm.description, "Sorting made easy");
        assert_eq!(fm.published, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(fm.image, "swift/assets/cover.png");
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let text = "---\ntitle: T\ndescription: D\ndate: '2023-01-02'\nimage: i.png\ntags: [swift]\nauthors:\n  - ivan\n---\n";
        let fm = parse_front_matter(text, "a.md").unwrap();
        assert_eq!(fm.published, NaiveDate::from_ymd_opt(2023, 1, 2).unwrap());
    }

    #[test]
    fn test_split_returns_block_and_body() {
        let (block, body) = split_front_matter("---\na: 1\n---\nbody\n", "x").unwrap().unwrap();
        assert_eq!(block, "a: 1\n");
        assert_eq!(body, "body\n");
    }

    #[test]
    fn test_split_tolerates_bom_leading_blank_lines_and_crlf() {
        let text = "\u{feff}\n\n---\r\ntitle: T\r\n----  \r\nrest";
        let (block, body) = split_front_matter(text, "x").unwrap().unwrap();
        assert_eq!(block, "title: T\r\n");
        assert_eq!(body, "rest");
    }

    #[test]
    fn test_missing_block_reports_every_field() {
        let err = parse_front_matter("# Just markdown\n", "https://x/docs/a.md").unwrap_err();
        match err {
            Error::Validation { origin, source } => {
                assert_eq!(origin, "https://x/docs/a.md");
                assert_eq!(source.fields(), vec!["title", "description", "date", "image"]);
                assert!(
                    source
                        .issues
                        .iter()
                        .all(|issue| issue.problem == FieldProblem::Missing)
                );
            },
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_block_is_parse_error() {
        let err = parse_front_matter("---\ntitle: T\n", "a.md").unwrap_err();
        assert_eq!(err.category(), "parse");
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = parse_front_matter("---\ntitle: [unclosed\n---\n", "a.md").unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }

    #[test]
    fn test_non_mapping_block_is_parse_error() {
        let err = parse_front_matter("---\n- a\n- b\n---\n", "a.md").unwrap_err();
        assert!(err.to_string().contains("key/value mapping"));
    }

    #[test]
    fn test_empty_block_is_all_missing() {
        let err = parse_front_matter("---\n---\nbody", "a.md").unwrap_err();
        let Error::Validation { source, .. } = err else {
            panic!("expected validation error");
        };
        assert_eq!(source.issues.len(), 4);
    }

    #[test]
    fn test_mistyped_fields_are_reported() {
        let text = "---\ntitle: 42\ndescription: D\ndate: last tuesday\nimage: null\n---\n";
        let Error::Validation { source, .. } = parse_front_matter(text, "a.md").unwrap_err()
        else {
            panic!("expected validation error");
        };
        assert_eq!(
            source.issues,
            vec![
                FieldIssue {
                    field: "title",
                    problem: FieldProblem::WrongType {
                        expected: "a string"
                    },
                },
                FieldIssue {
                    field: "date",
                    problem: FieldProblem::WrongType {
                        expected: "a YYYY-MM-DD date"
                    },
                },
                FieldIssue {
                    field: "image",
                    problem: FieldProblem::Missing,
                },
            ]
        );
    }

    #[test]
    fn test_unpadded_or_padded_dates_are_rejected() {
        for date in ["2024-6-1", "' 2024-06-01 '", "'2024-06-01 '", "20240-6-01"] {
            let text = format!("---\ntitle: T\ndescription: D\ndate: {date}\nimage: i.png\n---\n");
            match parse_front_matter(&text, "a.md") {
                Err(Error::Validation { source, .. }) => {
                    assert_eq!(
                        source.issues,
                        vec![FieldIssue {
                            field: "date",
                            problem: FieldProblem::WrongType {
                                expected: "a YYYY-MM-DD date"
                            },
                        }],
                        "date {date} must be rejected"
                    );
                },
                other => panic!("expected validation error for {date}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_impossible_date_is_rejected() {
        let text = "---\ntitle: T\ndescription: D\ndate: 2024-02-30\nimage: i.png\n---\n";
        let Error::Validation { source, .. } = parse_front_matter(text, "a.md").unwrap_err()
        else {
            panic!("expected validation error");
        };
        assert_eq!(source.fields(), vec!["date"]);
    }
}
