//! Subscript string parser.
//!
//! Parses strings like "ij,jk->ia,ka" or "i...j->(i...)j" into an [`Expression`].

use alloc::string::String;
use alloc::vec::Vec;
use smallvec::SmallVec;

use super::expression::Expression;
use super::symbol::{SymbolTable, is_symbol};
use super::term::{FusingGroup, Index, Indices, InputTerm, OutputTerm};
use crate::error::{EinsumError, EinsumResult};

const ELLIPSIS: &str = "...";
const ARROW: &str = "->";

/// Parses a subscript string.
///
/// # Grammar
///
/// ```text
/// expression  ::= inputs '->' outputs
/// inputs      ::= input (',' input)*
/// outputs     ::= output (',' output)*
/// input       ::= (index | '...')*
/// output      ::= (index | '...' | '(' (index | '...')* ')')*
/// index       ::= [a-zA-Z]
/// ```
///
/// Whitespace is ignored. Each term holds at most one ellipsis, groups never
/// nest, and symbols get ids in first-seen order across the whole string.
///
/// # Examples
///
/// ```
/// use tensorbackend_einsum::notation::parse;
///
/// let expr = parse("ij,jk->ia,ka").unwrap();
/// assert_eq!(expr.num_inputs(), 2);
/// assert_eq!(expr.num_outputs(), 2);
/// ```
pub fn parse(subscripts: &str) -> EinsumResult<Expression> {
    let source: String = subscripts.chars().filter(|c| !c.is_whitespace()).collect();

    let sides: Vec<&str> = source.split(ARROW).collect();
    let [inputs_str, outputs_str] = sides.as_slice() else {
        return Err(EinsumError::syntax(
            &source,
            alloc::format!("expect exactly one '{}' separator", ARROW),
        ));
    };

    let mut table = SymbolTable::new();

    let mut inputs = Vec::new();
    for term in inputs_str.split(',') {
        inputs.push(parse_input_term(&source, term, &mut table)?);
    }

    let mut outputs = Vec::new();
    for term in outputs_str.split(',') {
        outputs.push(parse_output_term(&source, term, &mut table)?);
    }

    let expr = Expression::new(inputs, outputs, source);
    tracing::debug!(
        subscripts = expr.source(),
        inputs = expr.num_inputs(),
        outputs = expr.num_outputs(),
        symbols = table.len(),
        "parsed expression"
    );
    Ok(expr)
}

/// Token of a single term.
enum Token {
    Symbol(char),
    Ellipsis,
    Open,
    Close,
}

/// Splits a term into tokens, rejecting anything outside the alphabet.
fn tokenize(source: &str, term: &str) -> EinsumResult<Vec<Token>> {
    let mut tokens = Vec::with_capacity(term.len());
    let mut rest = term;
    while let Some(c) = rest.chars().next() {
        if rest.starts_with(ELLIPSIS) {
            tokens.push(Token::Ellipsis);
            rest = &rest[ELLIPSIS.len()..];
            continue;
        }
        let token = match c {
            '(' => Token::Open,
            ')' => Token::Close,
            '.' => {
                return Err(EinsumError::syntax(
                    source,
                    alloc::format!("incomplete ellipsis in \"{}\", expected '...'", term),
                ));
            }
            c if is_symbol(c) => Token::Symbol(c),
            c => {
                return Err(EinsumError::syntax(
                    source,
                    alloc::format!("invalid character '{}' in \"{}\"", c, term),
                ));
            }
        };
        tokens.push(token);
        rest = &rest[c.len_utf8()..];
    }
    Ok(tokens)
}

fn push_ellipsis(source: &str, term: &str, indices: &mut Indices) -> EinsumResult<()> {
    if indices.iter().any(Index::is_ellipsis) {
        return Err(EinsumError::syntax(
            source,
            alloc::format!("each term can contain at most one ellipsis: \"{}\"", term),
        ));
    }
    indices.push(Index::Ellipsis);
    Ok(())
}

fn parse_input_term(source: &str, term: &str, table: &mut SymbolTable) -> EinsumResult<InputTerm> {
    let mut indices = Indices::new();
    for token in tokenize(source, term)? {
        match token {
            Token::Symbol(c) => indices.push(Index::Id(table.intern(c)?)),
            Token::Ellipsis => push_ellipsis(source, term, &mut indices)?,
            Token::Open | Token::Close => {
                return Err(EinsumError::syntax(
                    source,
                    alloc::format!("indices fusing is not allowed in input subscripts: \"{}\"", term),
                ));
            }
        }
    }
    Ok(InputTerm::new(indices, term))
}

fn parse_output_term(source: &str, term: &str, table: &mut SymbolTable) -> EinsumResult<OutputTerm> {
    let mut indices = Indices::new();
    let mut fusing: SmallVec<[FusingGroup; 2]> = SmallVec::new();
    let mut open: Option<usize> = None;

    for token in tokenize(source, term)? {
        match token {
            Token::Symbol(c) => indices.push(Index::Id(table.intern(c)?)),
            Token::Ellipsis => push_ellipsis(source, term, &mut indices)?,
            Token::Open => {
                if open.is_some() {
                    return Err(EinsumError::syntax(
                        source,
                        alloc::format!("nested parentheses are not allowed: \"{}\"", term),
                    ));
                }
                open = Some(indices.len());
            }
            Token::Close => {
                let Some(start) = open.take() else {
                    return Err(EinsumError::syntax(
                        source,
                        alloc::format!("unmatched parentheses: \"{}\"", term),
                    ));
                };
                fusing.push(FusingGroup::new(start, indices.len()));
            }
        }
    }

    if open.is_some() {
        return Err(EinsumError::syntax(
            source,
            alloc::format!("unmatched parentheses: \"{}\"", term),
        ));
    }

    Ok(OutputTerm::new(indices, fusing, term))
}
