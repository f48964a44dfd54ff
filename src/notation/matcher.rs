//! Binding of an expression to operand ranks.
//!
//! Expands each input ellipsis into fresh ids and propagates the broadcast
//! run into every output ellipsis.

use alloc::vec::Vec;

use super::expression::Expression;
use super::symbol::{IndexId, MAX_INDICES};
use super::term::{FusingGroup, Index, Indices, InputTerm, OutputTerm, Term};
use crate::error::{EinsumError, EinsumResult};

/// Allocator of ids above every symbol-derived id of an expression.
///
/// One allocator serves all input terms so broadcast runs of different
/// operands never alias.
struct FreshIds {
    next: IndexId,
}

impl FreshIds {
    fn new(start: IndexId) -> Self {
        Self { next: start }
    }

    fn take(&mut self, count: usize) -> EinsumResult<Vec<IndexId>> {
        let end = match self.next.checked_add(count) {
            Some(end) if end <= MAX_INDICES => end,
            _ => {
                return Err(EinsumError::TooManyIndices {
                    count: self.next.saturating_add(count),
                    limit: MAX_INDICES,
                });
            }
        };
        let run = (self.next..end).collect();
        self.next = end;
        Ok(run)
    }
}

impl Expression {
    /// Binds the expression to the ranks of its operands, one per input term.
    ///
    /// Every input ellipsis becomes a run of fresh ids so that the term length
    /// equals the operand rank. The longest run (the first one on ties) is the
    /// broadcast run substituted for every output ellipsis; fusing groups
    /// behind an output ellipsis are shifted to stay on the same indices.
    ///
    /// Broadcast axes of different operands stay distinct ids and are never
    /// aligned: in `...ij,...jk->...ik` the output carries the first
    /// operand's batch axes and the second operand's are summed.
    ///
    /// # Examples
    ///
    /// ```
    /// use tensorbackend_einsum::notation::parse;
    ///
    /// let expr = parse("...ij->...(ij)").unwrap().match_ranks(&[4]).unwrap();
    /// assert_eq!(expr.to_string(), "cdab->cd(ab)");
    /// ```
    pub fn match_ranks(&self, ranks: &[usize]) -> EinsumResult<Expression> {
        if ranks.len() != self.num_inputs() {
            return Err(EinsumError::OperandCountMismatch {
                subscripts: self.source().into(),
                expected: self.num_inputs(),
                got: ranks.len(),
            });
        }

        let mut fresh = FreshIds::new(self.nindices());
        let mut broadcast: Vec<IndexId> = Vec::new();
        let mut inputs = Vec::with_capacity(self.num_inputs());

        for (term, &ndim) in self.inputs().iter().zip(ranks) {
            let (matched, run) = match_input(term, ndim, &mut fresh)?;
            if let Some(run) = run {
                if run.len() > broadcast.len() {
                    broadcast = run;
                }
            }
            inputs.push(matched);
        }

        let outputs: Vec<OutputTerm> = self
            .outputs()
            .iter()
            .map(|term| expand_output(term, &broadcast))
            .collect();

        let expr = Expression::new(inputs, outputs, self.source());
        tracing::debug!(
            subscripts = expr.source(),
            ranks = ?ranks,
            broadcast = broadcast.len(),
            nindices = expr.nindices(),
            "matched expression"
        );
        Ok(expr)
    }
}

/// Expands the ellipsis of one input term against its operand rank.
///
/// Returns the expanded term and, if the term had an ellipsis, its run.
fn match_input(
    term: &InputTerm,
    ndim: usize,
    fresh: &mut FreshIds,
) -> EinsumResult<(InputTerm, Option<Vec<IndexId>>)> {
    let mismatch = || EinsumError::RankMismatch {
        term: term.source().into(),
        ndim,
    };

    let Some(pos) = term.ellipsis_position() else {
        if term.len() != ndim {
            return Err(mismatch());
        }
        return Ok((term.clone(), None));
    };

    let count = ndim.checked_sub(term.explicit_count()).ok_or_else(mismatch)?;
    let run = fresh.take(count)?;

    let slice = term.as_slice();
    let mut indices = Indices::with_capacity(ndim);
    indices.extend_from_slice(&slice[..pos]);
    indices.extend(run.iter().copied().map(Index::Id));
    indices.extend_from_slice(&slice[pos + 1..]);

    Ok((InputTerm::new(indices, term.source()), Some(run)))
}

/// Substitutes the broadcast run for the ellipsis of an output term.
fn expand_output(term: &OutputTerm, broadcast: &[IndexId]) -> OutputTerm {
    let Some(pos) = term.ellipsis_position() else {
        return term.clone();
    };

    let slice = term.as_slice();
    let mut indices = Indices::with_capacity(slice.len() - 1 + broadcast.len());
    indices.extend_from_slice(&slice[..pos]);
    indices.extend(broadcast.iter().copied().map(Index::Id));
    indices.extend_from_slice(&slice[pos + 1..]);

    // Boundaries up to the ellipsis slot stay; later ones move with the run.
    let shift = |j: usize| if j > pos { j + broadcast.len() - 1 } else { j };
    let fusing = term
        .fusing()
        .iter()
        .map(|g| FusingGroup::new(shift(g.start), shift(g.end)));

    OutputTerm::new(indices, fusing, term.source())
}
