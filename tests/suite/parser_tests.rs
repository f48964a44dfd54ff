//! Parser tests for the subscript grammar.

use pretty_assertions::assert_eq;

use tensorbackend_einsum::EinsumError;
use tensorbackend_einsum::notation::{FusingGroup, Term, parse};

fn ids<T: Term>(term: &T) -> Vec<usize> {
    term.ids().collect()
}

#[test]
fn test_parse_contraction() {
    let expr = parse("ij,jk->ik").unwrap();
    assert_eq!(expr.num_inputs(), 2);
    assert_eq!(expr.num_outputs(), 1);
    assert!(!expr.has_ellipsis());
}

#[test]
fn test_parse_decomposition() {
    let expr = parse("ij->ia,ja").unwrap();
    assert_eq!(expr.num_inputs(), 1);
    assert_eq!(expr.num_outputs(), 2);
    assert_eq!(ids(&expr.outputs()[0]), vec![0, 2]);
    assert_eq!(ids(&expr.outputs()[1]), vec![1, 2]);
}

#[test]
fn test_symbol_table_is_shared_across_terms() {
    let expr = parse("ab,bc,ca->abc").unwrap();
    assert_eq!(ids(&expr.inputs()[0]), vec![0, 1]);
    assert_eq!(ids(&expr.inputs()[1]), vec![1, 2]);
    assert_eq!(ids(&expr.inputs()[2]), vec![2, 0]);
    assert_eq!(ids(&expr.outputs()[0]), vec![0, 1, 2]);
}

#[test]
fn test_output_first_symbols_get_later_ids() {
    let expr = parse("i->iz").unwrap();
    assert_eq!(ids(&expr.outputs()[0]), vec![0, 1]);
}

#[test]
fn test_parse_multiple_groups() {
    let expr = parse("ijkl->(ij)(kl)").unwrap();
    assert_eq!(
        expr.outputs()[0].fusing(),
        &[FusingGroup::new(0, 2), FusingGroup::new(2, 4)]
    );
}

#[test]
fn test_parse_group_positions_count_ellipsis_once() {
    let expr = parse("...ij->...(ij)").unwrap();
    assert_eq!(expr.outputs()[0].fusing(), &[FusingGroup::new(1, 3)]);
}

#[test]
fn test_roundtrip_display() {
    let expr = parse("ab,bc->a(bc),c...").unwrap();
    assert_eq!(expr.to_string(), "ab,bc->a(bc),c...");
}

#[test]
fn test_group_in_input_rejected() {
    let err = parse("(ij)->ij").unwrap_err();
    assert!(matches!(err, EinsumError::Syntax { .. }));
    assert!(err.to_string().contains("(ij)->ij"));
}

#[test]
fn test_unbalanced_group_in_input_rejected() {
    assert!(matches!(parse("i)j->ij"), Err(EinsumError::Syntax { .. })));
}

#[test]
fn test_missing_or_extra_separator() {
    assert!(matches!(parse("ij"), Err(EinsumError::Syntax { .. })));
    assert!(matches!(parse("i->j->k"), Err(EinsumError::Syntax { .. })));
    assert!(matches!(parse("i-j"), Err(EinsumError::Syntax { .. })));
}

#[test]
fn test_two_ellipses_in_term() {
    let err = parse("......->").unwrap_err();
    assert!(err.to_string().contains("at most one ellipsis"));
}

#[test]
fn test_ellipsis_in_several_terms_is_fine() {
    assert!(parse("...i,...j->...ij").is_ok());
}

#[test]
fn test_expression_serializes() {
    let expr = parse("...ij->...(ij)").unwrap().match_ranks(&[3]).unwrap();
    let json = serde_json::to_string(&expr).unwrap();
    let back: tensorbackend_einsum::Expression = serde_json::from_str(&json).unwrap();
    assert_eq!(back, expr);
    assert_eq!(back.outputs()[0].fusing(), &[FusingGroup::new(1, 3)]);
}

#[test]
fn test_malformed_fusing_group_is_rejected_on_load() {
    let expr = parse("ijk->(ij)k").unwrap().match_ranks(&[3]).unwrap();
    let mut value = serde_json::to_value(&expr).unwrap();
    value["outputs"][0]["fusing"][0] = serde_json::json!({ "start": 2, "end": 1 });
    assert!(serde_json::from_value::<tensorbackend_einsum::Expression>(value.clone()).is_err());

    value["outputs"][0]["fusing"][0] = serde_json::json!({ "start": 1, "end": 4 });
    assert!(serde_json::from_value::<tensorbackend_einsum::Expression>(value).is_err());
}
