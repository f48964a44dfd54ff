//! Complete index expression: input terms, output terms and source text.

use alloc::collections::BTreeSet;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use serde::{Deserialize, Serialize};

use super::symbol::{IndexId, is_symbol, symbol_of};
use super::term::{InputTerm, OutputTerm, Term};

/// Parsed index expression.
///
/// Ids are dense and shared by every term: the same id names the same axis
/// wherever it appears. An expression straight out of the parser may still
/// hold ellipses; [`Expression::match_ranks`] binds them to operand ranks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Expression {
    inputs: Vec<InputTerm>,
    outputs: Vec<OutputTerm>,
    /// Original subscript string, kept for diagnostics.
    source: String,
}

impl Expression {
    pub fn new(inputs: Vec<InputTerm>, outputs: Vec<OutputTerm>, source: impl Into<String>) -> Self {
        Self {
            inputs,
            outputs,
            source: source.into(),
        }
    }

    #[inline]
    pub fn inputs(&self) -> &[InputTerm] {
        &self.inputs
    }

    #[inline]
    pub fn outputs(&self) -> &[OutputTerm] {
        &self.outputs
    }

    #[inline]
    pub fn source(&self) -> &str {
        &self.source
    }

    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    #[inline]
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Union of the ids of all input terms.
    pub fn input_indices(&self) -> BTreeSet<IndexId> {
        self.inputs.iter().flat_map(|t| t.ids()).collect()
    }

    /// Union of the ids of all output terms.
    pub fn output_indices(&self) -> BTreeSet<IndexId> {
        self.outputs.iter().flat_map(|t| t.ids()).collect()
    }

    /// Ids introduced by the outputs, i.e. absent from every input.
    pub fn new_indices(&self) -> BTreeSet<IndexId> {
        let inputs = self.input_indices();
        self.output_indices()
            .into_iter()
            .filter(|id| !inputs.contains(id))
            .collect()
    }

    /// One more than the largest id in use, or 0 when no id is in use.
    pub fn nindices(&self) -> usize {
        self.inputs
            .iter()
            .flat_map(|t| t.ids())
            .chain(self.outputs.iter().flat_map(|t| t.ids()))
            .max()
            .map_or(0, |max| max + 1)
    }

    /// Returns true if any term still holds an unexpanded ellipsis.
    pub fn has_ellipsis(&self) -> bool {
        self.inputs.iter().any(|t| t.has_ellipsis()) || self.outputs.iter().any(|t| t.has_ellipsis())
    }

    /// Symbol naming `id` in the source text, for diagnostics.
    ///
    /// Ids were handed out in first-seen order, so the n-th distinct symbol
    /// of the source is id n. Broadcast ids fall back to their canonical symbol.
    pub fn display_symbol(&self, id: IndexId) -> char {
        let mut seen: Vec<char> = Vec::new();
        for c in self.source.chars().filter(|c| is_symbol(*c)) {
            if !seen.contains(&c) {
                if seen.len() == id {
                    return c;
                }
                seen.push(c);
            }
        }
        symbol_of(id).unwrap_or('?')
    }

    /// Canonical subscripts without fusing parentheses, as numeric routines expect them.
    pub fn indices_string(&self) -> String {
        let inputs: Vec<String> = self.inputs.iter().map(|t| t.indices_string()).collect();
        let outputs: Vec<String> = self.outputs.iter().map(|t| t.indices_string()).collect();
        alloc::format!("{}->{}", inputs.join(","), outputs.join(","))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, input) in self.inputs.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", input)?;
        }
        write!(f, "->")?;
        for (i, output) in self.outputs.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            write!(f, "{}", output)?;
        }
        Ok(())
    }
}
