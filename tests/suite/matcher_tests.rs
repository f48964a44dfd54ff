//! Tests for binding expressions to operand ranks.

use pretty_assertions::assert_eq;

use tensorbackend_einsum::EinsumError;
use tensorbackend_einsum::notation::{Term, parse};

fn ids<T: Term>(term: &T) -> Vec<usize> {
    term.ids().collect()
}

#[test]
fn test_term_length_equals_rank() {
    let expr = parse("i...j,k...->ik...").unwrap();
    let matched = expr.match_ranks(&[5, 1]).unwrap();
    assert_eq!(matched.inputs()[0].len(), 5);
    assert_eq!(matched.inputs()[1].len(), 1);
    assert_eq!(matched.outputs()[0].len(), 5);
}

#[test]
fn test_fresh_ids_above_symbols() {
    let matched = parse("...ij->...ji").unwrap().match_ranks(&[4]).unwrap();
    assert_eq!(ids(&matched.inputs()[0]), vec![2, 3, 0, 1]);
    assert_eq!(ids(&matched.outputs()[0]), vec![2, 3, 1, 0]);
    assert_eq!(matched.nindices(), 4);
}

#[test]
fn test_mismatched_runs_take_longest() {
    // ranks 3 and 2 give runs of 2 and 1; outputs carry the longer run
    let matched = parse("i...,j...->i...,j...").unwrap().match_ranks(&[3, 2]).unwrap();
    assert_eq!(matched.to_string(), "acd,be->acd,bcd");
}

#[test]
fn test_scalar_operand() {
    let matched = parse("->").unwrap().match_ranks(&[0]).unwrap();
    assert_eq!(matched.to_string(), "->");
    assert!(matches!(
        parse("->").unwrap().match_ranks(&[1]),
        Err(EinsumError::RankMismatch { ndim: 1, .. })
    ));
}

#[test]
fn test_source_is_kept() {
    let matched = parse("xy...->y...x").unwrap().match_ranks(&[3]).unwrap();
    assert_eq!(matched.source(), "xy...->y...x");
    assert_eq!(matched.inputs()[0].source(), "xy...");
}

#[test]
fn test_rank_error_names_term() {
    let err = parse("ij,jkl->il").unwrap().match_ranks(&[2, 2]).unwrap_err();
    assert_eq!(err, EinsumError::RankMismatch { term: "jkl".into(), ndim: 2 });
    assert_eq!(err.to_string(), "indices \"jkl\" do not match ndim: 2");
}
