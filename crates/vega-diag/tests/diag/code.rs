use vega_diag::DiagnosticCode;

#[test]
fn code_as_str() {
    assert_eq!(DiagnosticCode::UNKNOWN_INTERFACE.as_str(), "vega.port[1]");
    assert_eq!(
        DiagnosticCode::MIXING_ORDERED_AND_NAMED_PORTS.as_str(),
        "vega.elab[1]"
    );
    assert_eq!(DiagnosticCode::NOT_AN_INTERFACE.as_str(), "vega.elab[17]");
}

#[test]
fn code_display() {
    assert_eq!(
        format!("{}", DiagnosticCode::IMPLICIT_NET_PORT_NO_DEFAULT),
        "vega.port[6]"
    );
}

#[test]
fn codes_are_distinct_within_namespace() {
    let port_codes = [
        DiagnosticCode::UNKNOWN_INTERFACE,
        DiagnosticCode::NOT_A_MODPORT,
        DiagnosticCode::PORT_TYPE_NOT_INTERFACE_OR_DATA,
        DiagnosticCode::VAR_WITH_INTERFACE_PORT,
        DiagnosticCode::DIRECTION_WITH_INTERFACE_PORT,
        DiagnosticCode::IMPLICIT_NET_PORT_NO_DEFAULT,
        DiagnosticCode::INOUT_PORT_CANNOT_BE_VARIABLE,
        DiagnosticCode::REF_PORT_MUST_BE_VARIABLE,
        DiagnosticCode::REDEFINITION,
        DiagnosticCode::UNUSED_PORT_DECL,
        DiagnosticCode::CONST_PORT_NOT_ALLOWED,
        DiagnosticCode::DISALLOWED_PORT_DEFAULT,
        DiagnosticCode::PORT_CONCAT_INOUT,
        DiagnosticCode::PORT_CONCAT_REF,
        DiagnosticCode::IFACE_PORT_IN_CONCAT,
        DiagnosticCode::BAD_CONCAT_EXPRESSION,
        DiagnosticCode::PORT_DECL_IN_ANSI_MODULE,
        DiagnosticCode::NOT_YET_SUPPORTED,
    ];
    for (i, a) in port_codes.iter().enumerate() {
        for b in &port_codes[i + 1..] {
            assert_ne!(a, b);
        }
    }
}
