//! Path patterns for route rules.

use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    /// `[id]` or `:id`: exactly one non-empty segment.
    Param,
    /// Trailing `**`: zero or more segments.
    Rest,
}

/// A route pattern such as `/dashboard/books/[id]/edit` or `/dashboard/**`.
///
/// Literal segments match exactly. A `[name]` or `:name` segment matches any
/// single non-empty segment. A final `**` matches the remainder of the path,
/// including nothing at all. A `**` anywhere else is an ordinary literal.
///
/// # Example
///
/// ```
/// use libris::guard::RoutePattern;
///
/// let edit = RoutePattern::parse("/dashboard/books/:id/edit");
/// assert!(edit.matches("/dashboard/books/42/edit"));
/// assert!(!edit.matches("/dashboard/books//edit"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    source: String,
    segments: Vec<Segment>,
}

impl RoutePattern {
    pub fn parse(pattern: &str) -> Self {
        let parts = split(pattern);
        let last = parts.len().saturating_sub(1);

        let segments = parts
            .iter()
            .enumerate()
            .map(|(i, part)| {
                if *part == "**" && i == last {
                    Segment::Rest
                } else if is_param(part) {
                    Segment::Param
                } else {
                    Segment::Literal((*part).to_string())
                }
            })
            .collect();

        Self {
            source: pattern.to_string(),
            segments,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Whether `path` matches this pattern. Query strings, fragments and a
    /// trailing slash on `path` are ignored.
    pub fn matches(&self, path: &str) -> bool {
        let parts = split(normalize(path));
        let mut parts = parts.iter();

        for segment in &self.segments {
            match segment {
                Segment::Rest => return true,
                Segment::Literal(literal) => match parts.next() {
                    Some(part) if part == literal => {}
                    _ => return false,
                },
                Segment::Param => match parts.next() {
                    Some(part) if !part.is_empty() => {}
                    _ => return false,
                },
            }
        }

        parts.next().is_none()
    }
}

impl fmt::Display for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Strip query, fragment and trailing slashes. The root path stays `/`.
pub(crate) fn normalize(path: &str) -> &str {
    let end = path.find(['?', '#']).unwrap_or(path.len());
    let path = path[..end].trim_end_matches('/');
    if path.is_empty() { "/" } else { path }
}

fn is_param(part: &str) -> bool {
    let bracketed = part.len() > 2 && part.starts_with('[') && part.ends_with(']');
    let prefixed = part.len() > 1 && part.starts_with(':');
    bracketed || prefixed
}

fn split(path: &str) -> Vec<&str> {
    let trimmed = path.trim_start_matches('/').trim_end_matches('/');
    if trimmed.is_empty() {
        Vec::new()
    } else {
        trimmed.split('/').collect()
    }
}
