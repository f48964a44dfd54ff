//! # Tensor backend einsum
//!
//! Index-notation expression engine behind the `einsum`, `einsvd` and
//! `einsumsvd` operations of tensor backends.
//!
//! ## Features
//!
//! - Extended subscript parsing with ellipsis and output fusing groups
//! - Ellipsis binding against operand ranks
//! - Structural validation for contraction, decomposition and fused operations
//! - Splitting of fused operations into a contraction and a decomposition
//! - Output reshaping through fusing groups
//! - A backend capability trait with generic operation drivers
//!
//! ## Example
//!
//! ```
//! use tensorbackend_einsum::notation::{parse_einsumsvd, split_einsumsvd};
//!
//! let expr = parse_einsumsvd("ijk,kl->(ij)a,al", &[3, 2]).unwrap();
//! let (contraction, decomposition) = split_einsumsvd(&expr).unwrap();
//! assert_eq!(contraction.indices_string(), "abc,cd->abd");
//! assert_eq!(decomposition.to_string(), "abd->(ab)e,ed");
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

pub mod backend;
pub mod error;
pub mod notation;

pub use backend::{DecompositionConfig, Factors, NumericOutput, SvdMethod, TensorBackend};
pub use backend::{einsum, einsumsvd, einsvd};
pub use error::{EinsumError, EinsumResult, Operation, Violation};
pub use notation::{Expression, parse, parse_einsum, parse_einsumsvd, parse_einsvd, split_einsumsvd};
