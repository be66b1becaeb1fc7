//! Paths into a value tree.

use std::fmt;

pub use jschema_parse::PathSegment;

/// A sequence of keys and indices leading from a root value to a node.
///
/// Parsed from `/`- or `.`-delimited text (a leading separator is optional)
/// and displayed dot-delimited, so `"/items/0"`, `"items.0"` and `"items/0"`
/// all name the same node and all print as `items.0`. The empty path is the
/// root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The root path.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a path. Segments made only of digits become indices.
    pub fn parse(text: &str) -> Self {
        let text = text
            .strip_prefix('/')
            .or_else(|| text.strip_prefix('.'))
            .unwrap_or(text);
        if text.is_empty() {
            return Self::root();
        }
        let segments = text
            .split(['/', '.'])
            .map(|segment| {
                if !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit()) {
                    segment
                        .parse()
                        .map(PathSegment::Index)
                        .unwrap_or_else(|_| PathSegment::Key(segment.to_string()))
                } else {
                    PathSegment::Key(segment.to_string())
                }
            })
            .collect();
        JsonPath { segments }
    }

    /// The segments of this path.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }

    /// Whether this is the root path.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Whether the path has no segments.
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// A new path with one more segment.
    pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        JsonPath { segments }
    }

    /// The enclosing path, or `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        let (_, parent) = self.segments.split_last()?;
        Some(JsonPath {
            segments: parent.to_vec(),
        })
    }

    /// Whether `prefix` is this path or one of its ancestors.
    ///
    /// Index and key segments spelled with the same digits are treated as
    /// equal, since the text form cannot tell them apart.
    pub fn starts_with(&self, prefix: &JsonPath) -> bool {
        prefix.segments.len() <= self.segments.len()
            && prefix
                .segments
                .iter()
                .zip(&self.segments)
                .all(|(a, b)| same_segment(a, b))
    }
}

fn same_segment(a: &PathSegment, b: &PathSegment) -> bool {
    match (a, b) {
        (PathSegment::Key(x), PathSegment::Key(y)) => x == y,
        (PathSegment::Index(x), PathSegment::Index(y)) => x == y,
        (PathSegment::Key(k), PathSegment::Index(i)) | (PathSegment::Index(i), PathSegment::Key(k)) => {
            *k == i.to_string()
        }
    }
}

impl From<Vec<PathSegment>> for JsonPath {
    fn from(segments: Vec<PathSegment>) -> Self {
        JsonPath { segments }
    }
}

impl From<&[PathSegment]> for JsonPath {
    fn from(segments: &[PathSegment]) -> Self {
        JsonPath {
            segments: segments.to_vec(),
        }
    }
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}
