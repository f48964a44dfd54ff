//! Input and output terms of an index expression.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::symbol::{IndexId, symbol_of};
use crate::error::{EinsumError, EinsumResult};

/// A single entry of a term.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Index {
    /// A concrete axis.
    Id(IndexId),
    /// Unexpanded broadcast run.
    Ellipsis,
}

impl Index {
    /// Returns true if this is an ellipsis.
    #[inline]
    pub fn is_ellipsis(&self) -> bool {
        matches!(self, Index::Ellipsis)
    }

    /// Returns the id if this is a concrete axis.
    #[inline]
    pub fn as_id(&self) -> Option<IndexId> {
        match self {
            Index::Id(id) => Some(*id),
            Index::Ellipsis => None,
        }
    }
}

impl fmt::Display for Index {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Index::Id(id) => match symbol_of(*id) {
                Some(c) => write!(f, "{}", c),
                None => write!(f, "<{}>", id),
            },
            Index::Ellipsis => write!(f, "..."),
        }
    }
}

/// Index storage of a term; most tensors have few axes.
pub type Indices = SmallVec<[Index; 8]>;

/// Half-open range `[start, end)` of output positions collapsed into one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FusingGroup {
    pub start: usize,
    pub end: usize,
}

impl FusingGroup {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Number of positions covered by the group.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Read access shared by input and output terms.
pub trait Term {
    /// The ordered entries of the term.
    fn as_slice(&self) -> &[Index];

    /// Number of entries, counting an unexpanded ellipsis as one.
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }

    /// Concrete ids in order, skipping an unexpanded ellipsis.
    fn ids(&self) -> impl Iterator<Item = IndexId> + '_ {
        self.as_slice().iter().filter_map(Index::as_id)
    }

    fn has_ellipsis(&self) -> bool {
        self.ellipsis_position().is_some()
    }

    fn ellipsis_position(&self) -> Option<usize> {
        self.as_slice().iter().position(Index::is_ellipsis)
    }

    /// Number of concrete (non-ellipsis) entries.
    fn explicit_count(&self) -> usize {
        self.ids().count()
    }

    fn contains(&self, id: IndexId) -> bool {
        self.ids().any(|x| x == id)
    }

    /// Position of the first occurrence of `id`.
    fn find(&self, id: IndexId) -> Option<usize> {
        self.as_slice().iter().position(|i| *i == Index::Id(id))
    }

    /// Canonical symbol string of the term, without fusing parentheses.
    fn indices_string(&self) -> String {
        let mut s = String::with_capacity(self.len());
        for idx in self.as_slice() {
            match idx {
                Index::Id(id) => match symbol_of(*id) {
                    Some(c) => s.push(c),
                    None => s.push_str(&alloc::format!("<{}>", id)),
                },
                Index::Ellipsis => s.push_str("..."),
            }
        }
        s
    }
}

/// Indices of one operand. Input terms never carry fusing groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputTerm {
    indices: Indices,
    /// Subscript text the term was parsed from.
    source: String,
}

impl InputTerm {
    pub fn new(indices: impl IntoIterator<Item = Index>, source: impl Into<String>) -> Self {
        Self {
            indices: indices.into_iter().collect(),
            source: source.into(),
        }
    }

    /// Builds a term of concrete ids; its source is the canonical rendering.
    pub fn from_ids(ids: impl IntoIterator<Item = IndexId>) -> Self {
        let mut term = Self::new(ids.into_iter().map(Index::Id), String::new());
        term.source = term.indices_string();
        term
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl Term for InputTerm {
    #[inline]
    fn as_slice(&self) -> &[Index] {
        &self.indices
    }
}

impl fmt::Display for InputTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for idx in &self.indices {
            write!(f, "{}", idx)?;
        }
        Ok(())
    }
}

/// Indices of one result, with optional fusing groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutputTerm {
    indices: Indices,
    /// Strictly increasing, non-overlapping ranges over `indices`.
    fusing: SmallVec<[FusingGroup; 2]>,
    source: String,
}

impl OutputTerm {
    pub fn new(
        indices: impl IntoIterator<Item = Index>,
        fusing: impl IntoIterator<Item = FusingGroup>,
        source: impl Into<String>,
    ) -> Self {
        let term = Self {
            indices: indices.into_iter().collect(),
            fusing: fusing.into_iter().collect(),
            source: source.into(),
        };
        debug_assert!(
            fusing_error(&term.indices, &term.fusing).is_none(),
            "fusing groups must be ordered and within the term"
        );
        term
    }

    /// Builds a term, rejecting fusing groups that are unordered, overlap or
    /// run past the indices.
    pub fn try_new(
        indices: impl IntoIterator<Item = Index>,
        fusing: impl IntoIterator<Item = FusingGroup>,
        source: impl Into<String>,
    ) -> EinsumResult<Self> {
        let indices: Indices = indices.into_iter().collect();
        let fusing: SmallVec<[FusingGroup; 2]> = fusing.into_iter().collect();
        let source = source.into();
        if let Some(message) = fusing_error(&indices, &fusing) {
            return Err(EinsumError::syntax(source, message));
        }
        Ok(Self {
            indices,
            fusing,
            source,
        })
    }

    /// Builds an unfused term of concrete ids; its source is the canonical rendering.
    pub fn from_ids(ids: impl IntoIterator<Item = IndexId>) -> Self {
        let mut term = Self::new(ids.into_iter().map(Index::Id), core::iter::empty(), String::new());
        term.source = term.indices_string();
        term
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn fusing(&self) -> &[FusingGroup] {
        &self.fusing
    }

    /// Returns true if any axes are collapsed on output.
    #[inline]
    pub fn is_fused(&self) -> bool {
        !self.fusing.is_empty()
    }

    /// Collapses each fusing group of `shape` into the product of its extents.
    ///
    /// `shape` holds the physical extents of the term's expanded indices.
    /// Axes outside every group pass through unchanged.
    pub fn resolve_shape(&self, shape: &[usize]) -> EinsumResult<Vec<usize>> {
        let mismatch = || EinsumError::ShapeMismatch {
            term: self.to_string_lossy(),
            shape: shape.to_vec(),
        };
        if shape.len() != self.indices.len() {
            return Err(mismatch());
        }

        let mut resolved = Vec::with_capacity(shape.len());
        let mut i = 0;
        for group in &self.fusing {
            let passthrough = shape.get(i..group.start).ok_or_else(mismatch)?;
            let fused = shape.get(group.start..group.end).ok_or_else(mismatch)?;
            resolved.extend_from_slice(passthrough);
            resolved.push(fused.iter().product());
            i = group.end;
        }
        resolved.extend_from_slice(shape.get(i..).ok_or_else(mismatch)?);
        Ok(resolved)
    }

    fn to_string_lossy(&self) -> String {
        alloc::format!("{}", self)
    }
}

fn fusing_error(indices: &[Index], fusing: &[FusingGroup]) -> Option<String> {
    let mut end = 0;
    for group in fusing {
        if group.start < end || group.start > group.end || group.end > indices.len() {
            return Some(alloc::format!(
                "invalid fusing group {}..{} over {} indices",
                group.start,
                group.end,
                indices.len()
            ));
        }
        end = group.end;
    }
    None
}

/// Wire form of [`OutputTerm`]; groups are checked before a term is built.
#[derive(Deserialize)]
#[serde(rename = "OutputTerm")]
struct RawOutputTerm {
    indices: Indices,
    fusing: SmallVec<[FusingGroup; 2]>,
    source: String,
}

impl<'de> Deserialize<'de> for OutputTerm {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawOutputTerm::deserialize(deserializer)?;
        if let Some(message) = fusing_error(&raw.indices, &raw.fusing) {
            return Err(serde::de::Error::custom(message));
        }
        Ok(Self {
            indices: raw.indices,
            fusing: raw.fusing,
            source: raw.source,
        })
    }
}

impl Term for OutputTerm {
    #[inline]
    fn as_slice(&self) -> &[Index] {
        &self.indices
    }
}

impl fmt::Display for OutputTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let span = |start: usize, end: usize| self.indices.get(start..end).unwrap_or_default();
        let mut i = 0;
        for group in &self.fusing {
            for idx in span(i, group.start) {
                write!(f, "{}", idx)?;
            }
            write!(f, "(")?;
            for idx in span(group.start, group.end) {
                write!(f, "{}", idx)?;
            }
            write!(f, ")")?;
            i = i.max(group.end);
        }
        for idx in span(i, self.indices.len()) {
            write!(f, "{}", idx)?;
        }
        Ok(())
    }
}
