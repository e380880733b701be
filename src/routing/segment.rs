//! Path segmentation.
//!
//! # Responsibilities
//! - Split a request path on `/` into non-empty segments
//! - Percent-decode each segment
//!
//! # Design Decisions
//! - Never fails: an empty path is the root
//! - A segment that does not decode to UTF-8 is kept verbatim

use std::borrow::Cow;
use std::fmt;

/// Ordered, non-empty path segments of a request path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoutePath {
    segments: Vec<String>,
}

impl RoutePath {
    /// Split a raw request path into segments.
    ///
    /// Leading, trailing and repeated separators produce no segments:
    /// `"//sub///another/"` yields `["sub", "another"]`.
    pub fn parse(path: &str) -> Self {
        path.split('/')
            .filter(|segment| !segment.is_empty())
            .map(decode_segment)
            .collect()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Re-join the segments as an absolute path. The root is `/`.
    pub fn to_canonical(&self) -> String {
        format!("/{}", self.segments.join("/"))
    }
}

impl FromIterator<String> for RoutePath {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_canonical())
    }
}

fn decode_segment(raw: &str) -> String {
    match urlencoding::decode(raw) {
        Ok(Cow::Borrowed(s)) => s.to_string(),
        Ok(Cow::Owned(s)) => s,
        Err(_) => raw.to_string(),
    }
}
