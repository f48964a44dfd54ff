//! Structural rules of the three operation families.
//!
//! Each validator expects an expression already bound by
//! [`Expression::match_ranks`], so no ellipsis is left.

use alloc::collections::BTreeSet;

use super::expression::Expression;
use super::parser::parse;
use super::symbol::IndexId;
use super::term::Term;
use crate::error::{EinsumError, EinsumResult, Operation, Violation};

fn fail(operation: Operation, expr: &Expression, violation: Violation) -> EinsumError {
    EinsumError::invalid(operation, expr.source(), violation)
}

/// Validates a contraction: one output, every output index bound by an input.
///
/// Repeated indices are allowed anywhere (`ii->i` extracts a diagonal).
pub fn validate_einsum(expr: &Expression) -> EinsumResult<()> {
    const OP: Operation = Operation::Einsum;

    if expr.num_outputs() != 1 {
        return Err(fail(OP, expr, Violation::OutputCount { expected: 1, got: expr.num_outputs() }));
    }

    let inputs = expr.input_indices();
    if let Some(free) = expr.outputs()[0].ids().find(|id| !inputs.contains(id)) {
        return Err(fail(OP, expr, Violation::FreeIndex(expr.display_symbol(free))));
    }

    tracing::debug!(subscripts = expr.source(), "validated einsum expression");
    Ok(())
}

/// Validates a decomposition of one operand into two factors.
pub fn validate_einsvd(expr: &Expression) -> EinsumResult<()> {
    const OP: Operation = Operation::Einsvd;

    if expr.num_inputs() != 1 {
        return Err(fail(OP, expr, Violation::InputCount { expected: "one", got: expr.num_inputs() }));
    }
    if expr.num_outputs() != 2 {
        return Err(fail(OP, expr, Violation::OutputCount { expected: 2, got: expr.num_outputs() }));
    }

    let mut seen = BTreeSet::new();
    if let Some(repeated) = expr.inputs()[0].ids().find(|id| !seen.insert(*id)) {
        return Err(fail(OP, expr, Violation::RepeatedInputIndex(expr.display_symbol(repeated))));
    }

    let outputs = expr.output_indices();
    if let Some(dropped) = expr.input_indices().into_iter().find(|id| !outputs.contains(id)) {
        return Err(fail(OP, expr, Violation::InputIndexDropped(expr.display_symbol(dropped))));
    }

    check_factors(OP, expr)?;

    // Factors share exactly one axis, the new index.
    let positions: usize = expr.outputs().iter().map(|t| t.len()).sum();
    if outputs.len() + 1 != positions {
        return Err(fail(OP, expr, Violation::IllegalRepeat));
    }

    tracing::debug!(subscripts = expr.source(), "validated einsvd expression");
    Ok(())
}

/// Validates a contraction followed by a decomposition of its result.
///
/// Indices may repeat across inputs; the contraction half sums them.
pub fn validate_einsumsvd(expr: &Expression) -> EinsumResult<()> {
    const OP: Operation = Operation::Einsumsvd;

    if expr.num_inputs() < 1 {
        return Err(fail(OP, expr, Violation::InputCount { expected: "at least one", got: 0 }));
    }
    if expr.num_outputs() != 2 {
        return Err(fail(OP, expr, Violation::OutputCount { expected: 2, got: expr.num_outputs() }));
    }

    check_factors(OP, expr)?;

    tracing::debug!(subscripts = expr.source(), "validated einsumsvd expression");
    Ok(())
}

/// Returns the single index the outputs introduce.
pub fn new_index(operation: Operation, expr: &Expression) -> EinsumResult<IndexId> {
    let new = expr.new_indices();
    match new.first() {
        Some(&id) if new.len() == 1 => Ok(id),
        _ => Err(fail(operation, expr, Violation::NewIndexCount(new.len()))),
    }
}

/// Rules shared by both decomposition families: exactly one new index,
/// present in both outputs, and two-dimensional factors.
fn check_factors(operation: Operation, expr: &Expression) -> EinsumResult<()> {
    let new = new_index(operation, expr)?;
    if expr.outputs().iter().any(|t| !t.contains(new)) {
        return Err(fail(operation, expr, Violation::NewIndexMissing(expr.display_symbol(new))));
    }
    if expr.outputs().iter().any(|t| t.len() < 2) {
        return Err(fail(operation, expr, Violation::RankOneFactor));
    }
    Ok(())
}

/// Parses, binds and validates a contraction.
pub fn parse_einsum(subscripts: &str, ranks: &[usize]) -> EinsumResult<Expression> {
    let expr = parse(subscripts)?.match_ranks(ranks)?;
    validate_einsum(&expr)?;
    Ok(expr)
}

/// Parses, binds and validates a decomposition of one operand of rank `rank`.
pub fn parse_einsvd(subscripts: &str, rank: usize) -> EinsumResult<Expression> {
    let expr = parse(subscripts)?.match_ranks(&[rank])?;
    validate_einsvd(&expr)?;
    Ok(expr)
}

/// Parses, binds and validates a fused contraction and decomposition.
pub fn parse_einsumsvd(subscripts: &str, ranks: &[usize]) -> EinsumResult<Expression> {
    let expr = parse(subscripts)?.match_ranks(ranks)?;
    validate_einsumsvd(&expr)?;
    Ok(expr)
}
