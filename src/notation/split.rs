//! Splitting of a fused contraction and decomposition into two primitives.

use alloc::vec;
use alloc::vec::Vec;

use super::expression::Expression;
use super::symbol::IndexId;
use super::term::{InputTerm, OutputTerm, Term};
use super::validation::new_index;
use crate::error::{EinsumResult, Operation};

/// Splits a validated `einsumsvd` expression into a contraction producing one
/// intermediate term and a decomposition consuming it.
///
/// The intermediate term lists every output index except the new one, in
/// order of first appearance across the two outputs. Fusing groups stay on
/// the decomposition half. The contraction half must run first since its
/// result is the operand of the decomposition half.
///
/// # Examples
///
/// ```
/// use tensorbackend_einsum::notation::{parse_einsumsvd, split_einsumsvd};
///
/// let expr = parse_einsumsvd("ij,jk->ia,ka", &[2, 2]).unwrap();
/// let (contraction, decomposition) = split_einsumsvd(&expr).unwrap();
/// assert_eq!(contraction.to_string(), "ab,bc->ac");
/// assert_eq!(decomposition.to_string(), "ac->ad,cd");
/// ```
pub fn split_einsumsvd(expr: &Expression) -> EinsumResult<(Expression, Expression)> {
    let new = new_index(Operation::Einsumsvd, expr)?;

    let mut intermediate: Vec<IndexId> = Vec::new();
    for id in expr.outputs().iter().flat_map(|t| t.ids()) {
        if id != new && !intermediate.contains(&id) {
            intermediate.push(id);
        }
    }

    let contraction = Expression::new(
        expr.inputs().to_vec(),
        vec![OutputTerm::from_ids(intermediate.iter().copied())],
        expr.source(),
    );
    let decomposition = Expression::new(
        vec![InputTerm::from_ids(intermediate.iter().copied())],
        expr.outputs().to_vec(),
        expr.source(),
    );

    tracing::debug!(
        subscripts = expr.source(),
        contraction = %contraction,
        decomposition = %decomposition,
        "split einsumsvd expression"
    );
    Ok((contraction, decomposition))
}
