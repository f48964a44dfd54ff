//! Index-notation expressions for contraction and decomposition.
//!
//! Supports the extended subscript grammar:
//! - Contraction: `ij,jk->ik`
//! - Decomposition: `ij->ia,ja` (`a` is the new rank index)
//! - Fused contraction and decomposition: `ij,jk->ia,ka`
//! - Ellipsis: `...ij,...jk->...ik`
//! - Output fusing groups: `ijk->(ij)k`

mod expression;
mod matcher;
mod parser;
mod split;
mod symbol;
mod term;
pub mod validation;

pub use expression::Expression;
pub use parser::parse;
pub use split::split_einsumsvd;
pub use symbol::{ALPHABET, IndexId, MAX_INDICES, SymbolTable, symbol_of};
pub use term::{FusingGroup, Index, Indices, InputTerm, OutputTerm, Term};
pub use validation::{
    new_index, parse_einsum, parse_einsumsvd, parse_einsvd, validate_einsum, validate_einsumsvd,
    validate_einsvd,
};
