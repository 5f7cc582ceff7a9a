//! Property paths into the navigable property tree.
//!
//! Pointer lists such as `createOnlyProperties` name properties with
//! pointer-shaped strings: `/properties/Parent/Nested`. The navigation form of
//! that path is `["Parent", "Nested"]`.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pointer::{Namespace, POINTER_ANCHOR, POINTER_SEPARATOR};

/// Segment addressing every element of an array.
pub const ARRAY_ITEMS_SEGMENT: &str = "*";

/// A pointer-shaped path to a property, e.g. `/properties/Parent/Nested`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyPath(String);

impl PropertyPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Build the pointer form from navigation segments.
    pub fn from_segments<S: AsRef<str>>(segments: &[S]) -> Self {
        let mut path = format!("{}{}", POINTER_SEPARATOR, Namespace::Properties);
        for segment in segments {
            path.push(POINTER_SEPARATOR);
            path.push_str(segment.as_ref());
        }
        Self(path)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Navigation segments with the leading `/properties` marker removed.
    ///
    /// A path that is empty, has no name after the marker, or points
    /// anywhere other than `properties` yields a single empty segment,
    /// which never matches a real path.
    pub fn segments(&self) -> Vec<&str> {
        let trimmed = self.0.strip_prefix(POINTER_ANCHOR).unwrap_or(self.0.as_str());
        let mut parts = trimmed.split(POINTER_SEPARATOR);

        let leading = parts.next();
        let marker = parts.next();
        let rest: Vec<&str> = parts.collect();

        if leading != Some("") || marker != Some(Namespace::Properties.as_str()) || rest.is_empty()
        {
            return vec![""];
        }

        rest
    }

    /// True if this path has no usable segments.
    pub fn is_degenerate(&self) -> bool {
        self.segments() == [""]
    }

    /// Exact, full-length comparison against navigation segments.
    pub fn equals<S: AsRef<str>>(&self, path: &[S]) -> bool {
        if self.is_degenerate() {
            return false;
        }

        let path: Vec<&str> = path.iter().map(AsRef::as_ref).collect();
        self.segments() == path
    }

    /// Compare against a slash-joined navigation path such as `/Parent/Nested`.
    pub fn equals_string(&self, path: &str) -> bool {
        let path = path.strip_prefix(POINTER_SEPARATOR).unwrap_or(path);
        let segments: Vec<&str> = path.split(POINTER_SEPARATOR).collect();
        self.equals(&segments)
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PropertyPath {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// True if any path in `paths` equals the navigation path exactly.
pub fn contains_path<'a, I, S>(paths: I, path: &[S]) -> bool
where
    I: IntoIterator<Item = &'a PropertyPath>,
    S: AsRef<str>,
{
    paths.into_iter().any(|candidate| candidate.equals(path))
}

/// Transform expressions keyed by the property they apply to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PropertyTransform(BTreeMap<PropertyPath, String>);

impl PropertyTransform {
    /// The expression registered for exactly this navigation path.
    pub fn value<S: AsRef<str>>(&self, path: &[S]) -> Option<&str> {
        self.0
            .iter()
            .find(|(candidate, _)| candidate.equals(path))
            .map(|(_, expression)| expression.as_str())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(PropertyPath, String)> for PropertyTransform {
    fn from_iter<T: IntoIterator<Item = (PropertyPath, String)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
