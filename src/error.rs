//! Error types for index-notation expressions and backend calls.

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// Operation families and numeric capabilities an error can be attributed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Plain contraction (`einsum`).
    Einsum,
    /// Decomposition of a single operand (`einsvd`).
    Einsvd,
    /// Contraction followed by decomposition (`einsumsvd`).
    Einsumsvd,
    /// Reduced singular value decomposition of a backend.
    Svd,
    /// Randomized singular value decomposition of a backend.
    RandomizedSvd,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Operation::Einsum => "einsum",
            Operation::Einsvd => "einsvd",
            Operation::Einsumsvd => "einsumsvd",
            Operation::Svd => "svd",
            Operation::RandomizedSvd => "randomized svd",
        };
        f.write_str(name)
    }
}

/// A structural rule of an operation family that an expression broke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// Wrong number of input terms.
    InputCount { expected: &'static str, got: usize },
    /// Wrong number of output terms.
    OutputCount { expected: usize, got: usize },
    /// Output index not bound by any input.
    FreeIndex(char),
    /// Input index repeated inside the decomposed term.
    RepeatedInputIndex(char),
    /// Input index missing from every output term.
    InputIndexDropped(char),
    /// Outputs introduce zero or several new indices.
    NewIndexCount(usize),
    /// The new index is absent from one of the output terms.
    NewIndexMissing(char),
    /// An output term has fewer than two indices.
    RankOneFactor,
    /// An index other than the new one repeats across the outputs.
    IllegalRepeat,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::InputCount { expected, got } => {
                write!(f, "expect {expected} input(s), got {got}")
            }
            Violation::OutputCount { expected, got } => {
                write!(f, "expect {expected} output(s), got {got}")
            }
            Violation::FreeIndex(c) => {
                write!(f, "free index '{c}' not bound by any input")
            }
            Violation::RepeatedInputIndex(c) => write!(f, "repeated input index '{c}'"),
            Violation::InputIndexDropped(c) => {
                write!(f, "not all input indices preserved, '{c}' is missing from the outputs")
            }
            Violation::NewIndexCount(n) => {
                write!(f, "expect exactly one new index in the outputs, found {n}")
            }
            Violation::NewIndexMissing(c) => {
                write!(f, "new index '{c}' must appear in both outputs")
            }
            Violation::RankOneFactor => {
                write!(f, "expect outputs to be at least two dimensional")
            }
            Violation::IllegalRepeat => write!(f, "only the new index may repeat in the outputs"),
        }
    }
}

/// Errors that can occur while parsing, matching, validating or executing expressions.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(thiserror::Error))]
pub enum EinsumError {
    /// Malformed subscript string.
    #[cfg_attr(feature = "std", error("invalid subscripts \"{subscripts}\": {message}"))]
    Syntax { subscripts: String, message: String },

    /// More distinct indices than the symbol alphabet can name.
    #[cfg_attr(feature = "std", error("too many indices: {count} (maximum {limit})"))]
    TooManyIndices { count: usize, limit: usize },

    /// Number of operands differs from the number of input terms.
    #[cfg_attr(
        feature = "std",
        error("number of operands does not match subscripts \"{subscripts}\": expected {expected}, got {got}")
    )]
    OperandCountMismatch {
        subscripts: String,
        expected: usize,
        got: usize,
    },

    /// An input term cannot be bound to an operand of the given rank.
    #[cfg_attr(feature = "std", error("indices \"{term}\" do not match ndim: {ndim}"))]
    RankMismatch { term: String, ndim: usize },

    /// The expression breaks a structural rule of its operation family.
    #[cfg_attr(feature = "std", error("{violation} for {operation}: \"{subscripts}\""))]
    Invalid {
        operation: Operation,
        subscripts: String,
        violation: Violation,
    },

    /// Physical shape length differs from the output term length.
    #[cfg_attr(feature = "std", error("shape/indices length mismatch: indices \"{term}\", shape {shape:?}"))]
    ShapeMismatch { term: String, shape: Vec<usize> },

    /// Backend does not implement the requested capability.
    #[cfg_attr(feature = "std", error("backend '{backend}' does not support {operation}"))]
    Unsupported {
        backend: &'static str,
        operation: Operation,
    },

    /// Numeric routine failure reported by a backend.
    #[cfg_attr(feature = "std", error("backend error: {message}"))]
    Backend { message: String },
}

impl EinsumError {
    pub fn syntax(subscripts: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Syntax {
            subscripts: subscripts.into(),
            message: message.into(),
        }
    }

    pub fn invalid(operation: Operation, subscripts: impl Into<String>, violation: Violation) -> Self {
        Self::Invalid {
            operation,
            subscripts: subscripts.into(),
            violation,
        }
    }

    pub fn unsupported(backend: &'static str, operation: Operation) -> Self {
        Self::Unsupported { backend, operation }
    }

    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }

    /// Returns the violated rule for structural errors.
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Invalid { violation, .. } => Some(violation),
            _ => None,
        }
    }
}

/// Result type for expression and backend operations.
pub type EinsumResult<T> = core::result::Result<T, EinsumError>;
