//! Include path representation and prefix completion

use crate::{Error, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;

/// A dot-separated navigation chain such as `Orders.Items.Product`.
///
/// The empty path is the root: it stands for "no include" and owns the
/// initial state. Paths order by segment count first, then lexicographically,
/// so a sorted collection always lists a path after all of its prefixes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct IncludePath(String);

impl IncludePath {
    pub fn root() -> Self {
        Self(String::new())
    }

    /// Parse a raw directive path, rejecting anything that is not a chain of identifiers
    pub fn parse(entity: &str, raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Self::root());
        }

        for segment in trimmed.split('.') {
            if segment.is_empty() {
                return Err(Error::invalid_path(entity, raw, "empty segment"));
            }
            if !is_identifier(segment) {
                return Err(Error::invalid_path(
                    entity,
                    raw,
                    format!("segment {:?} is not an identifier", segment),
                ));
            }
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Segments in order; the root has none
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('.').filter(|s| !s.is_empty())
    }

    pub fn depth(&self) -> usize {
        self.segments().count()
    }

    pub fn first_segment(&self) -> Option<&str> {
        self.segments().next()
    }

    pub fn last_segment(&self) -> Option<&str> {
        self.segments().last()
    }

    /// The path without its last segment. Top-level paths have the root as
    /// parent; the root has none.
    pub fn parent(&self) -> Option<IncludePath> {
        if self.is_root() {
            return None;
        }
        Some(match self.0.rfind('.') {
            Some(idx) => Self(self.0[..idx].to_string()),
            None => Self::root(),
        })
    }

    /// Every strict, non-empty prefix, shortest first
    pub fn prefixes(&self) -> Vec<IncludePath> {
        let segments: Vec<&str> = self.segments().collect();
        (1..segments.len())
            .map(|len| Self(segments[..len].join(".")))
            .collect()
    }

    /// True when `self` is exactly one level below `other`
    pub fn is_child_of(&self, other: &IncludePath) -> bool {
        if other.is_root() {
            return self.depth() == 1;
        }
        self.depth() == other.depth() + 1
            && self
                .0
                .strip_prefix(other.as_str())
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

fn is_identifier(segment: &str) -> bool {
    let mut chars = segment.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_')
}

impl Ord for IncludePath {
    fn cmp(&self, other: &Self) -> Ordering {
        self.depth()
            .cmp(&other.depth())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for IncludePath {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for IncludePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An entity paired with its prefix-closed, sorted path set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedPaths {
    pub entity: String,
    pub paths: Vec<IncludePath>,
}

impl CompletedPaths {
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn contains(&self, path: &str) -> bool {
        self.paths.iter().any(|p| p.as_str() == path)
    }
}

/// True when the directive list declares no includes at all (`['']`)
pub fn declares_no_includes(raw_paths: &[String]) -> bool {
    raw_paths.iter().all(|p| p.trim().is_empty())
}

/// Close the raw paths under prefix completion and add the root path.
///
/// Returns `None` when the entity explicitly declares no includes; nothing
/// is generated for it.
pub fn complete_paths(entity: &str, raw_paths: &[String]) -> Result<Option<CompletedPaths>> {
    if declares_no_includes(raw_paths) {
        return Ok(None);
    }

    let mut known = BTreeSet::new();
    known.insert(IncludePath::root());

    for raw in raw_paths {
        let path = IncludePath::parse(entity, raw)?;
        known.extend(path.prefixes());
        known.insert(path);
    }

    Ok(Some(CompletedPaths {
        entity: entity.to_string(),
        paths: known.into_iter().collect(),
    }))
}
