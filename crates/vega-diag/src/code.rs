use core::fmt;

/// Identity code for a diagnostic, composed of a namespace and a number.
///
/// Namespace strings use dotted hierarchy (e.g. `"vega.port"`).
/// Numbers are unique within a namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DiagnosticCode {
    pub namespace: &'static str,
    pub number: u32,
}

impl DiagnosticCode {
    // Port list building
    pub const UNKNOWN_INTERFACE: Self = Self {
        namespace: "vega.port",
        number: 1,
    };
    pub const NOT_A_MODPORT: Self = Self {
        namespace: "vega.port",
        number: 2,
    };
    pub const PORT_TYPE_NOT_INTERFACE_OR_DATA: Self = Self {
        namespace: "vega.port",
        number: 3,
    };
    pub const VAR_WITH_INTERFACE_PORT: Self = Self {
        namespace: "vega.port",
        number: 4,
    };
    pub const DIRECTION_WITH_INTERFACE_PORT: Self = Self {
        namespace: "vega.port",
        number: 5,
    };
    pub const IMPLICIT_NET_PORT_NO_DEFAULT: Self = Self {
        namespace: "vega.port",
        number: 6,
    };
    pub const INOUT_PORT_CANNOT_BE_VARIABLE: Self = Self {
        namespace: "vega.port",
        number: 7,
    };
    pub const REF_PORT_MUST_BE_VARIABLE: Self = Self {
        namespace: "vega.port",
        number: 8,
    };
    pub const REDEFINITION: Self = Self {
        namespace: "vega.port",
        number: 9,
    };
    pub const UNUSED_PORT_DECL: Self = Self {
        namespace: "vega.port",
        number: 10,
    };
    pub const CONST_PORT_NOT_ALLOWED: Self = Self {
        namespace: "vega.port",
        number: 11,
    };
    pub const DISALLOWED_PORT_DEFAULT: Self = Self {
        namespace: "vega.port",
        number: 12,
    };
    pub const PORT_CONCAT_INOUT: Self = Self {
        namespace: "vega.port",
        number: 13,
    };
    pub const PORT_CONCAT_REF: Self = Self {
        namespace: "vega.port",
        number: 14,
    };
    pub const IFACE_PORT_IN_CONCAT: Self = Self {
        namespace: "vega.port",
        number: 15,
    };
    pub const BAD_CONCAT_EXPRESSION: Self = Self {
        namespace: "vega.port",
        number: 16,
    };
    pub const PORT_DECL_IN_ANSI_MODULE: Self = Self {
        namespace: "vega.port",
        number: 17,
    };
    pub const NOT_YET_SUPPORTED: Self = Self {
        namespace: "vega.port",
        number: 18,
    };

    // Connection resolution
    pub const MIXING_ORDERED_AND_NAMED_PORTS: Self = Self {
        namespace: "vega.elab",
        number: 1,
    };
    pub const DUPLICATE_WILDCARD_PORT_CONNECTION: Self = Self {
        namespace: "vega.elab",
        number: 2,
    };
    pub const DUPLICATE_PORT_CONNECTION: Self = Self {
        namespace: "vega.elab",
        number: 3,
    };
    pub const TOO_MANY_PORT_CONNECTIONS: Self = Self {
        namespace: "vega.elab",
        number: 4,
    };
    pub const PORT_DOES_NOT_EXIST: Self = Self {
        namespace: "vega.elab",
        number: 5,
    };
    pub const UNCONNECTED_NAMED_PORT: Self = Self {
        namespace: "vega.elab",
        number: 6,
    };
    pub const UNCONNECTED_UNNAMED_PORT: Self = Self {
        namespace: "vega.elab",
        number: 7,
    };
    pub const NULL_PORT_EXPRESSION: Self = Self {
        namespace: "vega.elab",
        number: 8,
    };
    pub const IMPLICIT_NAMED_PORT_NOT_FOUND: Self = Self {
        namespace: "vega.elab",
        number: 9,
    };
    pub const IMPLICIT_NAMED_PORT_TYPE_MISMATCH: Self = Self {
        namespace: "vega.elab",
        number: 10,
    };
    pub const USED_BEFORE_DECLARED: Self = Self {
        namespace: "vega.elab",
        number: 11,
    };
    pub const INTERFACE_PORT_NOT_CONNECTED: Self = Self {
        namespace: "vega.elab",
        number: 12,
    };
    pub const INTERFACE_PORT_INVALID_EXPRESSION: Self = Self {
        namespace: "vega.elab",
        number: 13,
    };
    pub const INTERFACE_PORT_TYPE_MISMATCH: Self = Self {
        namespace: "vega.elab",
        number: 14,
    };
    pub const MODPORT_CONN_MISMATCH: Self = Self {
        namespace: "vega.elab",
        number: 15,
    };
    pub const PORT_CONN_DIMENSIONS_MISMATCH: Self = Self {
        namespace: "vega.elab",
        number: 16,
    };
    pub const NOT_AN_INTERFACE: Self = Self {
        namespace: "vega.elab",
        number: 17,
    };

    /// Format as `"namespace[number]"`, e.g. `"vega.port[1]"`.
    pub fn as_str(&self) -> String {
        format!("{}[{}]", self.namespace, self.number)
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.namespace, self.number)
    }
}
