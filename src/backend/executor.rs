//! Operation drivers.
//!
//! Orchestrates parsing, rank matching, validation, numeric dispatch and
//! output reshaping.

use alloc::vec::Vec;

use super::config::{DecompositionConfig, SvdMethod};
use super::{Factors, SvdRequest, TensorBackend};
use crate::error::{EinsumError, EinsumResult};
use crate::notation::{
    Expression, OutputTerm, Term, parse_einsum, parse_einsumsvd, parse_einsvd, split_einsumsvd,
};

/// Executes a contraction.
///
/// # Example
///
/// ```ignore
/// let c = einsum(&backend, "ij,jk->ik", &[&a, &b])?;
/// let fused = einsum(&backend, "ijk,kl->(ij)l", &[&a, &b])?;
/// ```
pub fn einsum<B: TensorBackend>(
    backend: &B,
    subscripts: &str,
    operands: &[&B::Tensor],
) -> EinsumResult<B::Tensor> {
    let ranks = ranks(backend, operands);
    let expr = parse_einsum(subscripts, &ranks)?;
    contract_expression(backend, &expr, operands)
}

/// Decomposes one tensor into two factors sharing the new index.
///
/// # Example
///
/// ```ignore
/// let Factors { u, s, vh } = einsvd(&backend, "ijk->(ij)a,ak", &a, &DecompositionConfig::new())?;
/// ```
pub fn einsvd<B: TensorBackend>(
    backend: &B,
    subscripts: &str,
    a: &B::Tensor,
    config: &DecompositionConfig,
) -> EinsumResult<Factors<B::Tensor>> {
    let expr = parse_einsvd(subscripts, backend.ndim(a))?;
    decompose_expression(backend, &expr, a, config)
}

/// Contracts the operands, then decomposes the result.
///
/// The contraction half runs first; its result is the operand of the
/// decomposition half.
pub fn einsumsvd<B: TensorBackend>(
    backend: &B,
    subscripts: &str,
    operands: &[&B::Tensor],
    config: &DecompositionConfig,
) -> EinsumResult<Factors<B::Tensor>> {
    let ranks = ranks(backend, operands);
    let expr = parse_einsumsvd(subscripts, &ranks)?;
    let (contraction, decomposition) = split_einsumsvd(&expr)?;

    let intermediate = contract_expression(backend, &contraction, operands)?;
    decompose_expression(backend, &decomposition, &intermediate, config)
}

/// Executes an already matched and validated contraction expression.
///
/// Useful when the same expression is executed multiple times.
pub fn contract_expression<B: TensorBackend>(
    backend: &B,
    expr: &Expression,
    operands: &[&B::Tensor],
) -> EinsumResult<B::Tensor> {
    let [output] = expr.outputs() else {
        return Err(EinsumError::backend(alloc::format!(
            "contraction expects one output term: \"{}\"",
            expr.source()
        )));
    };

    let subscripts = expr.indices_string();
    tracing::debug!(backend = backend.name(), subscripts = %subscripts, "contract");

    let result = backend.contract(&subscripts, operands)?.into_single()?;
    reshape_output(backend, output, result)
}

/// Executes an already matched and validated decomposition expression.
pub fn decompose_expression<B: TensorBackend>(
    backend: &B,
    expr: &Expression,
    a: &B::Tensor,
    config: &DecompositionConfig,
) -> EinsumResult<Factors<B::Tensor>> {
    let ([input], [left, right]) = (expr.inputs(), expr.outputs()) else {
        return Err(EinsumError::backend(alloc::format!(
            "decomposition expects one input and two output terms: \"{}\"",
            expr.source()
        )));
    };

    let input = input.indices_string();
    let left_str = left.indices_string();
    let right_str = right.indices_string();
    let request = SvdRequest {
        input: &input,
        left: &left_str,
        right: &right_str,
        rank: config.rank,
    };
    tracing::debug!(
        backend = backend.name(),
        input = request.input,
        left = request.left,
        right = request.right,
        rank = ?request.rank,
        method = ?config.method,
        "decompose"
    );

    let factors = match config.method {
        SvdMethod::Reduced => backend.svd(a, &request)?,
        SvdMethod::Randomized { niter, oversamp } => {
            if request.rank.is_none() {
                return Err(EinsumError::backend(
                    "randomized decomposition requires a rank",
                ));
            }
            backend.randomized_svd(a, &request, niter, oversamp)?
        }
    };

    let (u, s, vh) = factors.into_triple()?;
    let u = reshape_output(backend, left, u)?;
    let vh = reshape_output(backend, right, vh)?;
    Ok(Factors { u, s, vh })
}

fn ranks<B: TensorBackend>(backend: &B, operands: &[&B::Tensor]) -> Vec<usize> {
    operands.iter().map(|t| backend.ndim(t)).collect()
}

/// Collapses fusing groups of a raw numeric result; no-op when unfused.
fn reshape_output<B: TensorBackend>(
    backend: &B,
    term: &OutputTerm,
    tensor: B::Tensor,
) -> EinsumResult<B::Tensor> {
    let shape = backend.shape(&tensor);
    let resolved = term.resolve_shape(&shape)?;
    if resolved == shape {
        return Ok(tensor);
    }
    tracing::trace!(
        term = %term,
        from = ?shape,
        to = ?resolved,
        "reshape output"
    );
    backend.reshape(tensor, &resolved)
}
