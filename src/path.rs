//! Structural addresses into a [`crate::value::Value`] tree.
//!
//! A [`Path`] is an ordered list of [`Segment`]s. A segment is always stored
//! as text; whether it acts as a map key or a list index is inferred from the
//! text (anything that parses as an integer can be an index) and from the
//! node it is applied to.
//!
//! Paths render as JSON pointers (`/users/0/name`, with `~0` and `~1`
//! escaping `~` and `/`) and parse back from that form.

// custom made ordering for segments
use std::cmp::Ordering;
// used for the JSON pointer form of a path
use std::fmt;
use std::str::FromStr;

use crate::error::{AldbError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Segment(String);

impl Segment {
    pub fn key(key: impl Into<String>) -> Self {
        Self(key.into())
    }
    pub fn index(index: i64) -> Self {
        Self(index.to_string())
    }
    pub fn as_key(&self) -> &str {
        &self.0
    }
    /// The integer this segment denotes, if its text parses as one.
    pub fn as_index(&self) -> Option<i64> {
        self.0.parse::<i64>().ok()
    }
    pub fn is_index(&self) -> bool {
        self.as_index().is_some()
    }
}

// Indexes sort before keys, numerically; keys sort lexicographically. Equal
// numbers with different spellings ("1", "01") fall back to the text so the
// order stays consistent with equality.
impl Ord for Segment {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.as_index(), other.as_index()) {
            (Some(l), Some(r)) => l.cmp(&r).then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}
impl PartialOrd for Segment {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
impl From<&str> for Segment {
    fn from(s: &str) -> Self {
        Self::key(s)
    }
}
impl From<String> for Segment {
    fn from(s: String) -> Self {
        Self(s)
    }
}
impl From<i64> for Segment {
    fn from(i: i64) -> Self {
        Self::index(i)
    }
}
impl From<usize> for Segment {
    fn from(i: usize) -> Self {
        Self(i.to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn empty() -> Self {
        Self::default()
    }
    pub fn new<S: Into<Segment>>(segments: impl IntoIterator<Item = S>) -> Self {
        Self { segments: segments.into_iter().map(Into::into).collect() }
    }
    pub fn len(&self) -> usize {
        self.segments.len()
    }
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
    /// Splits off the first segment. Returns `None` for the empty path.
    pub fn head_tail(&self) -> Option<(&Segment, Path)> {
        let (head, tail) = self.segments.split_first()?;
        Some((head, Path { segments: tail.to_vec() }))
    }
    /// A new path with `segment` added at the end.
    pub fn append(&self, segment: impl Into<Segment>) -> Path {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment.into());
        Path { segments }
    }
    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }
    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for segment in &self.segments {
            write!(f, "/{}", segment.0.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = AldbError;
    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Ok(Path::empty());
        }
        let rest = s.strip_prefix('/').ok_or_else(|| {
            AldbError::Format(format!("path '{s}' must be empty or start with '/'"))
        })?;
        let segments = rest
            .split('/')
            .map(|raw| Segment(raw.replace("~1", "/").replace("~0", "~")))
            .collect();
        Ok(Path { segments })
    }
}

impl<S: Into<Segment>> FromIterator<S> for Path {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Path::new(iter)
    }
}
