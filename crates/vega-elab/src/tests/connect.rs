use super::*;
use crate::connect::{PortConnection, resolve_connections};
use crate::instance::create_instance;
use crate::types::Ty;

/// A leaf module `leaf(input logic a, output logic b)` plus a scope to
/// instantiate it from.
fn leaf_in_out(comp: &mut Compilation) -> (DefinitionId, ScopeId) {
    let (def, _, _) = module_with_ports(
        comp,
        "leaf",
        vec![
            implicit_port(var_header(dir(PortDirection::Input), logic_ty()), decl("a")),
            implicit_port(var_header(dir(PortDirection::Output), logic_ty()), decl("b")),
        ],
    );
    let top = module_body(comp);
    (def, top)
}

fn expr_of(conn: &PortConnection) -> Option<&crate::expr::Expression> {
    match conn {
        PortConnection::Value { expr, .. } => expr.as_ref(),
        PortConnection::Interface { .. } => None,
    }
}

#[test]
fn ordered_connections_bind_positionally() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));
    comp.declare_variable(top, "y", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[ordered(name_of("x")), ordered(name_of("y"))]);

    assert_no_diags(&comp);
    assert_eq!(map.len(), 2);
    assert!(map.iter().all(|c| expr_of(c).is_some()));
}

#[test]
fn connection_map_is_total_over_ports() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[]);

    let ports = comp.definition(leaf).ports.clone();
    assert_eq!(map.len(), ports.len());
    for port in ports {
        assert!(map.get(port).is_some(), "map covers every formal port");
    }
}

#[test]
fn ordered_too_many_connections() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    resolve_connections(
        &mut comp,
        inst,
        &[
            ordered(name_of("x")),
            ordered(name_of("x")),
            ordered(name_of("x")),
        ],
    );

    let diags = diags_with(&comp, DiagnosticCode::TOO_MANY_PORT_CONNECTIONS);
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].render_message(),
        "too many port connections to `leaf`: 3 given, 2 expected"
    );
}

#[test]
fn ordered_missing_warns_named_port() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    resolve_connections(&mut comp, inst, &[ordered(name_of("x"))]);

    let missing = diags_with(&comp, DiagnosticCode::UNCONNECTED_NAMED_PORT);
    assert_eq!(missing.len(), 1);
    assert_eq!(missing[0].severity, vega_diag::Severity::Warning);
}

#[test]
fn ordered_missing_uses_default() {
    let mut comp = Compilation::new();
    let mut d = decl("a");
    d.initializer = Some(lit(1));
    let (leaf, _, _) = module_with_ports(
        &mut comp,
        "leaf",
        vec![implicit_port(var_header(dir(PortDirection::Input), logic_ty()), d)],
    );
    let top = module_body(&mut comp);

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[]);

    assert_no_diags(&comp);
    assert!(expr_of(map.iter().next().unwrap()).is_some(), "default used");
}

#[test]
fn empty_ordered_slot_takes_default() {
    let mut comp = Compilation::new();
    let mut d = decl("a");
    d.initializer = Some(lit(1));
    let (leaf, _, _) = module_with_ports(
        &mut comp,
        "leaf",
        vec![implicit_port(var_header(dir(PortDirection::Input), logic_ty()), d)],
    );
    let top = module_body(&mut comp);

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[ordered_empty()]);

    assert_no_diags(&comp);
    assert!(expr_of(map.iter().next().unwrap()).is_some());
}

#[test]
fn named_connections_bind_by_name() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));
    comp.declare_variable(top, "y", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(
        &mut comp,
        inst,
        &[named("b", name_of("y")), named("a", name_of("x"))],
    );

    assert_no_diags(&comp);
    assert_eq!(map.len(), 2);
    assert!(map.iter().all(|c| expr_of(c).is_some()));
}

#[test]
fn explicit_empty_overrides_default() {
    // `.a()` means intentionally unconnected even when a default exists.
    let mut comp = Compilation::new();
    let mut d = decl("a");
    d.initializer = Some(lit(1));
    let (leaf, _, _) = module_with_ports(
        &mut comp,
        "leaf",
        vec![implicit_port(var_header(dir(PortDirection::Input), logic_ty()), d)],
    );
    let top = module_body(&mut comp);

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[named_empty("a")]);

    assert_no_diags(&comp);
    assert!(expr_of(map.iter().next().unwrap()).is_none());
}

#[test]
fn missing_named_falls_back_to_default() {
    let mut comp = Compilation::new();
    let mut d = decl("a");
    d.initializer = Some(lit(1));
    let (leaf, _, _) = module_with_ports(
        &mut comp,
        "leaf",
        vec![
            implicit_port(var_header(dir(PortDirection::Input), logic_ty()), d),
            implicit_port(var_header(dir(PortDirection::Input), logic_ty()), decl("b")),
        ],
    );
    let top = module_body(&mut comp);
    comp.declare_variable(top, "y", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[named("b", name_of("y"))]);

    assert_no_diags(&comp);
    assert!(map.iter().all(|c| expr_of(c).is_some()));
}

#[test]
fn missing_named_no_default_diagnosed() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    resolve_connections(&mut comp, inst, &[named("a", name_of("x"))]);

    assert_eq!(diag_count(&comp, DiagnosticCode::UNCONNECTED_NAMED_PORT), 1);
}

#[test]
fn implicit_named_binds_same_named_symbol() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "a", Ty::logic(), sp(1));
    comp.declare_variable(top, "b", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[named_implicit("a"), named_implicit("b")]);

    assert_no_diags(&comp);
    assert!(map.iter().all(|c| expr_of(c).is_some()));
}

#[test]
fn implicit_named_requires_equivalent_type() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "a", Ty::concat(8, true), sp(1));
    comp.declare_variable(top, "b", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[named_implicit("a"), named_implicit("b")]);

    assert_eq!(
        diag_count(&comp, DiagnosticCode::IMPLICIT_NAMED_PORT_TYPE_MISMATCH),
        1
    );
    assert!(expr_of(map.iter().next().unwrap()).is_none(), "mismatch yields no binding");
}

#[test]
fn implicit_named_not_found_diagnosed() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "b", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    resolve_connections(&mut comp, inst, &[named_implicit("a"), named_implicit("b")]);

    assert_eq!(
        diag_count(&comp, DiagnosticCode::IMPLICIT_NAMED_PORT_NOT_FOUND),
        1
    );
}

#[test]
fn implicit_named_never_creates_nets() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "b", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    resolve_connections(&mut comp, inst, &[named_implicit("a"), named_implicit("b")]);
    assert!(comp.find(top, "a").is_none(), "no implicit net for `.a`");
}

#[test]
fn explicit_expression_creates_implicit_net() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "y", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    resolve_connections(
        &mut comp,
        inst,
        &[named("a", name_of("z")), named("b", name_of("y"))],
    );

    let z = comp.find(top, "z").expect("implicit net declared for `.a(z)`");
    assert!(is_net(&comp, z));
}

#[test]
fn used_before_declared_warns() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "b", Ty::logic(), sp(2));
    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    // `a` is declared after the instance.
    comp.declare_variable(top, "a", Ty::logic(), sp(50));

    resolve_connections(&mut comp, inst, &[named_implicit("a"), named_implicit("b")]);
    assert_eq!(diag_count(&comp, DiagnosticCode::USED_BEFORE_DECLARED), 1);
}

#[test]
fn wildcard_connects_unmatched_ports() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "a", Ty::logic(), sp(1));
    comp.declare_variable(top, "x", Ty::logic(), sp(2));
    comp.declare_variable(top, "b", Ty::logic(), sp(3));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[named("a", name_of("x")), wildcard()]);

    assert_no_diags(&comp);
    assert!(map.iter().all(|c| expr_of(c).is_some()));
}

#[test]
fn wildcard_falls_back_to_default() {
    let mut comp = Compilation::new();
    let mut d = decl("a");
    d.initializer = Some(lit(1));
    let (leaf, _, _) = module_with_ports(
        &mut comp,
        "leaf",
        vec![implicit_port(var_header(dir(PortDirection::Input), logic_ty()), d)],
    );
    let top = module_body(&mut comp);

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[wildcard()]);

    assert_no_diags(&comp);
    assert!(expr_of(map.iter().next().unwrap()).is_some());
}

#[test]
fn duplicate_wildcard_diagnosed() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "a", Ty::logic(), sp(1));
    comp.declare_variable(top, "b", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    resolve_connections(&mut comp, inst, &[wildcard(), wildcard()]);

    let dups = diags_with(&comp, DiagnosticCode::DUPLICATE_WILDCARD_PORT_CONNECTION);
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].labels.len(), 2, "carries a previous-usage note");
}

#[test]
fn duplicate_named_connection_diagnosed() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));
    comp.declare_variable(top, "y", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    resolve_connections(
        &mut comp,
        inst,
        &[
            named("a", name_of("x")),
            named("a", name_of("y")),
            named("b", name_of("y")),
        ],
    );

    assert_eq!(diag_count(&comp, DiagnosticCode::DUPLICATE_PORT_CONNECTION), 1);
}

#[test]
fn mixing_ordered_and_named_diagnosed_once() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(
        &mut comp,
        inst,
        &[ordered(name_of("x")), named("b", name_of("x"))],
    );

    assert_eq!(
        diag_count(&comp, DiagnosticCode::MIXING_ORDERED_AND_NAMED_PORTS),
        1
    );

    // Processing continues in the style of the first connection: `a`
    // still binds positionally, the discarded `.b(x)` leaves `b`
    // unconnected and warned about.
    let ports = comp.definition(leaf).ports.clone();
    assert_eq!(map.len(), ports.len());
    assert!(expr_of(map.get(ports[0]).unwrap()).is_some(), "`a` bound from the ordered conn");
    assert!(expr_of(map.get(ports[1]).unwrap()).is_none(), "`b` left unconnected");
    assert_eq!(diag_count(&comp, DiagnosticCode::UNCONNECTED_NAMED_PORT), 1);
}

#[test]
fn connection_to_nonexistent_port() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));
    comp.declare_variable(top, "y", Ty::logic(), sp(2));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    resolve_connections(
        &mut comp,
        inst,
        &[
            named("a", name_of("x")),
            named("b", name_of("y")),
            named("bogus", name_of("x")),
        ],
    );

    let diags = diags_with(&comp, DiagnosticCode::PORT_DOES_NOT_EXIST);
    assert_eq!(diags.len(), 1);
    assert_eq!(
        diags[0].render_message(),
        "port `bogus` does not exist in module `leaf`"
    );
}

#[test]
fn expression_on_empty_port_rejected() {
    // module leaf(, ); instantiated with an actual expression.
    let mut comp = Compilation::new();
    let body = module_body(&mut comp);
    let (leaf, _) = nonansi_module(
        &mut comp,
        "leaf",
        body,
        vec![NonAnsiPortSyntax::Empty { span: sp(0) }],
        &[],
    );
    let top = module_body(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[ordered(name_of("x"))]);

    assert_eq!(diag_count(&comp, DiagnosticCode::NULL_PORT_EXPRESSION), 1);
    assert!(expr_of(map.iter().next().unwrap()).is_none());
}

#[test]
fn empty_formal_without_actual_gets_empty_binding() {
    // The empty port itself: no expression regardless of anything else.
    let mut comp = Compilation::new();
    let body = module_body(&mut comp);
    let (leaf, _) = nonansi_module(
        &mut comp,
        "leaf",
        body,
        vec![NonAnsiPortSyntax::Empty { span: sp(0) }],
        &[],
    );
    let top = module_body(&mut comp);

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let map = resolve_connections(&mut comp, inst, &[ordered_empty()]);

    assert_no_diags(&comp);
    assert!(expr_of(map.iter().next().unwrap()).is_none());
}

#[test]
fn unnamed_port_warned_once_per_instance() {
    // Two empty ports, named connection style: one warning, not two.
    let mut comp = Compilation::new();
    let body = module_body(&mut comp);
    let (leaf, _) = nonansi_module(
        &mut comp,
        "leaf",
        body,
        vec![
            NonAnsiPortSyntax::Empty { span: sp(0) },
            NonAnsiPortSyntax::Empty { span: sp(1) },
        ],
        &[],
    );
    let top = module_body(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));

    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    resolve_connections(&mut comp, inst, &[named("bogus", name_of("x"))]);

    assert_eq!(diag_count(&comp, DiagnosticCode::UNCONNECTED_UNNAMED_PORT), 1);
}

#[test]
fn resolver_is_idempotent() {
    let mut comp = Compilation::new();
    let (leaf, top) = leaf_in_out(&mut comp);
    comp.declare_variable(top, "x", Ty::logic(), sp(1));

    let conns = [ordered(name_of("x"))];
    let inst = create_instance(&mut comp, top, leaf, "u1", sp(10));
    let first = resolve_connections(&mut comp, inst, &conns);
    let diags_after_first = comp.diagnostics().to_vec();

    let second = resolve_connections(&mut comp, inst, &conns);
    assert_eq!(first, second, "same syntax yields identical connections");

    let new_diags = &comp.diagnostics()[diags_after_first.len()..];
    assert_eq!(
        new_diags, &diags_after_first[..],
        "re-running reproduces the same diagnostics"
    );
}
