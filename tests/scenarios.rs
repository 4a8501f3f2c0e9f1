//! End-to-end scenarios from the worked examples, run through the full
//! parse → synthesize → pack → emit pipeline.

use pretty_assertions::assert_eq;

#[test]
fn empty_slice() {
    assert_eq!(hex::encode(dhdl::compile("slice foo {}").unwrap()), "561e0000");
}

#[test]
fn two_luts_driving_both_output_pairs() {
    assert_eq!(
        hex::encode(dhdl::compile("slice foo { l0 -> r0 -> r1; l0 -> d0 -> d1; }").unwrap()),
        "2e20aaaa"
    );
}

#[test]
fn single_lut_selecting_first_input_pair_member() {
    assert_eq!(
        hex::encode(dhdl::compile("slice foo { l1 -> r0; }").unwrap()),
        "761caa00"
    );
}

#[test]
fn single_lut_selecting_second_input_pair_member() {
    assert_eq!(
        hex::encode(dhdl::compile("slice foo { r1 -> r0; }").unwrap()),
        "761cf000"
    );
}

#[test]
fn explicit_switch_disconnections() {
    assert_eq!(
        hex::encode(dhdl::compile("slice foo { l0 </> r0; u1 </> d1; }").unwrap()),
        "56140000"
    );
}

#[test]
fn synchronous_luts() {
    assert_eq!(
        hex::encode(dhdl::compile("slice foo { l0 sync -> r0; u0 sync -> d0; }").unwrap()),
        "602caacc"
    );
}

#[test]
fn boustrophedon_grid() {
    assert_eq!(
        hex::encode(dhdl::compile("slice a {} slice b { l0 </> r0; } a b, a b").unwrap()),
        "561e0000561c0000561c0000561e0000"
    );
}

#[test]
fn expression_precedence_matches_and_loosest_not_tightest() {
    use dhdl::ast::Expr;
    use dhdl::parser::parse;

    let program = parse("slice foo { a | b & c ^ d ^ e -> r0; } foo").unwrap();
    let stmt = &program.slices[0].statements[0];
    let dhdl::ast::Statement::Assignment(assignment) = stmt else {
        panic!("expected an assignment statement");
    };
    match &assignment.expr {
        Expr::And(terms) => {
            assert_eq!(terms.len(), 2);
            assert!(matches!(&terms[0], Expr::Or(or_terms) if or_terms.len() == 2));
            assert!(matches!(&terms[1], Expr::Xor(xor_terms) if xor_terms.len() == 3));
        }
        other => panic!("expected AND at the top, got {other:?}"),
    }
}

#[test]
fn sync_assignment_reports_async_false_and_output_list() {
    use dhdl::parser::parse;

    let program = parse("slice foo { a sync -> b -> c; } foo bar").unwrap();
    let dhdl::ast::Statement::Assignment(assignment) = &program.slices[0].statements[0] else {
        panic!("expected an assignment statement");
    };
    assert!(!assignment.mode.is_async());
    assert_eq!(assignment.outputs, vec!["b".to_string(), "c".to_string()]);
}

#[test]
fn bus_switch_connect_is_true() {
    use dhdl::parser::parse;

    let program = parse("slice foo { a <-> b; } foo").unwrap();
    let dhdl::ast::Statement::BusSwitch(switch) = &program.slices[0].statements[0] else {
        panic!("expected a bus-switch statement");
    };
    assert!(switch.connected);
}

#[test]
fn unknown_invocation_slice_fails() {
    assert!(dhdl::compile("slice foo {} bar").is_err());
}

#[test]
fn ragged_invocation_grid_fails() {
    assert!(dhdl::compile("slice foo {} foo foo, foo").is_err());
}
