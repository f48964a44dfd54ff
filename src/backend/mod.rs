//! Backend capability interface and the operation drivers built on it.
//!
//! A backend owns tensor storage and numeric routines; the drivers turn
//! subscript strings into canonical subscripts for those routines and
//! reshape the raw results through the output fusing groups.

mod config;
mod executor;

pub use config::{DEFAULT_NITER, DEFAULT_OVERSAMP, DecompositionConfig, SvdMethod};
pub use executor::{contract_expression, decompose_expression, einsum, einsumsvd, einsvd};

use alloc::vec::Vec;

use crate::error::{EinsumError, EinsumResult, Operation};

/// Value shapes a numeric routine can hand back.
#[derive(Debug, Clone, PartialEq)]
pub enum NumericOutput<T> {
    /// A single tensor.
    Single(T),
    /// A fixed-arity tuple of tensors, e.g. `(u, s, vh)`.
    Tuple(Vec<T>),
    /// An ordered sequence of tensors of routine-defined length.
    Sequence(Vec<T>),
}

impl<T> NumericOutput<T> {
    /// Number of tensors carried.
    pub fn len(&self) -> usize {
        match self {
            NumericOutput::Single(_) => 1,
            NumericOutput::Tuple(v) | NumericOutput::Sequence(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolves a single tensor.
    pub fn into_single(self) -> EinsumResult<T> {
        match self {
            NumericOutput::Single(t) => Ok(t),
            NumericOutput::Tuple(v) | NumericOutput::Sequence(v) if v.len() == 1 => {
                v.into_iter().next().ok_or_else(|| EinsumError::backend("empty output"))
            }
            other => Err(EinsumError::backend(alloc::format!(
                "expect a single tensor, got {}",
                other.len()
            ))),
        }
    }

    /// Resolves a triple of tensors, such as singular value factors.
    pub fn into_triple(self) -> EinsumResult<(T, T, T)> {
        let len = self.len();
        match self {
            NumericOutput::Tuple(v) | NumericOutput::Sequence(v) if len == 3 => {
                let mut it = v.into_iter();
                match (it.next(), it.next(), it.next()) {
                    (Some(a), Some(b), Some(c)) => Ok((a, b, c)),
                    _ => Err(EinsumError::backend("expect three tensors")),
                }
            }
            _ => Err(EinsumError::backend(alloc::format!("expect three tensors, got {}", len))),
        }
    }
}

/// Factors of a decomposition: `a = u * diag(s) * vh` over the new index.
#[derive(Debug, Clone, PartialEq)]
pub struct Factors<T> {
    pub u: T,
    pub s: T,
    pub vh: T,
}

/// Canonical subscripts of one decomposition call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvdRequest<'a> {
    /// Indices of the decomposed tensor.
    pub input: &'a str,
    /// Indices of `u`, including the new index.
    pub left: &'a str,
    /// Indices of `vh`, including the new index.
    pub right: &'a str,
    /// Truncation rank.
    pub rank: Option<usize>,
}

/// Numeric capabilities a tensor backend provides.
///
/// Subscripts passed in are canonical: plain symbols, no ellipsis, no fusing
/// groups. Optional capabilities default to [`EinsumError::Unsupported`].
pub trait TensorBackend {
    type Tensor;

    /// Short backend name for diagnostics.
    fn name(&self) -> &'static str;

    /// Per-axis extents of a tensor.
    fn shape(&self, tensor: &Self::Tensor) -> Vec<usize>;

    fn ndim(&self, tensor: &Self::Tensor) -> usize {
        self.shape(tensor).len()
    }

    /// Contracts operands following `subscripts` (one output term).
    fn contract(
        &self,
        subscripts: &str,
        operands: &[&Self::Tensor],
    ) -> EinsumResult<NumericOutput<Self::Tensor>>;

    /// Reshapes a tensor to `shape` without moving data.
    fn reshape(&self, tensor: Self::Tensor, shape: &[usize]) -> EinsumResult<Self::Tensor>;

    /// Reduced singular value decomposition, returning `(u, s, vh)`.
    fn svd(
        &self,
        _tensor: &Self::Tensor,
        _request: &SvdRequest<'_>,
    ) -> EinsumResult<NumericOutput<Self::Tensor>> {
        Err(EinsumError::unsupported(self.name(), Operation::Svd))
    }

    /// Randomized singular value decomposition, returning `(u, s, vh)`.
    fn randomized_svd(
        &self,
        _tensor: &Self::Tensor,
        _request: &SvdRequest<'_>,
        _niter: usize,
        _oversamp: usize,
    ) -> EinsumResult<NumericOutput<Self::Tensor>> {
        Err(EinsumError::unsupported(self.name(), Operation::RandomizedSvd))
    }
}
