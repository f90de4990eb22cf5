use smol_str::SmolStr;

/// Identifies the template for a diagnostic message.
///
/// Each variant corresponds to a fixed message template. Arguments
/// (in `Message::args`) fill placeholders at render time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageId {
    // Port list building
    UnknownInterface,
    NotAModport,
    PortTypeNotInterfaceOrData,
    VarWithInterfacePort,
    DirectionWithInterfacePort,
    ImplicitNetPortNoDefault,
    InOutPortCannotBeVariable,
    RefPortMustBeVariable,
    Redefinition,
    UnusedPortDecl,
    ConstPortNotAllowed,
    DisallowedPortDefault,
    PortConcatInOut,
    PortConcatRef,
    IfacePortInConcat,
    BadConcatExpression,
    PortDeclInAnsiModule,
    NotYetSupported,
    // Connection resolution
    MixingOrderedAndNamedPorts,
    DuplicateWildcardPortConnection,
    DuplicatePortConnection,
    TooManyPortConnections,
    PortDoesNotExist,
    UnconnectedNamedPort,
    UnconnectedUnnamedPort,
    NullPortExpression,
    ImplicitNamedPortNotFound,
    ImplicitNamedPortTypeMismatch,
    UsedBeforeDeclared,
    InterfacePortNotConnected,
    InterfacePortInvalidExpression,
    InterfacePortTypeMismatch,
    ModportConnMismatch,
    PortConnDimensionsMismatch,
    NotAnInterface,
    // Label messages
    DeclaredHere,
    FirstDefinedHere,
    PreviousUsageHere,
}

/// A typed argument that fills a placeholder in a message template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    Name(SmolStr),
    Count(usize),
}

impl Arg {
    /// Extract the inner `&str` if this is a `Name` variant.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Arg::Name(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract the inner `usize` if this is a `Count` variant.
    pub fn as_count(&self) -> Option<usize> {
        match self {
            Arg::Count(c) => Some(*c),
            _ => None,
        }
    }
}

/// A structured message: template id plus arguments.
///
/// No pre-rendered text -- call `render_message()` at the presentation
/// boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub args: Box<[Arg]>,
}

impl Message {
    pub fn new(id: MessageId, args: impl Into<Box<[Arg]>>) -> Self {
        Self {
            id,
            args: args.into(),
        }
    }

    /// Convenience for messages with no arguments.
    pub fn simple(id: MessageId) -> Self {
        Self {
            id,
            args: Box::new([]),
        }
    }

    /// Convenience for messages whose only argument is a name.
    pub fn named(id: MessageId, name: impl Into<SmolStr>) -> Self {
        Self {
            id,
            args: Box::new([Arg::Name(name.into())]),
        }
    }
}

/// Render a `Message` to a human-readable string.
pub fn render_message(msg: &Message) -> String {
    let name = || msg.args.first().and_then(Arg::as_name).unwrap_or("?");
    let nth_name = |i: usize| msg.args.get(i).and_then(Arg::as_name).unwrap_or("?");
    match msg.id {
        MessageId::UnknownInterface => format!("unknown interface `{}`", name()),
        MessageId::NotAModport => {
            let modport = name();
            let iface = nth_name(1);
            format!("`{modport}` is not a modport of interface `{iface}`")
        }
        MessageId::PortTypeNotInterfaceOrData => {
            format!("`{}` is not an interface or a data type", name())
        }
        MessageId::VarWithInterfacePort => {
            "'var' keyword may not be used with an interface port".into()
        }
        MessageId::DirectionWithInterfacePort => {
            "port directions may not be specified for an interface port".into()
        }
        MessageId::ImplicitNetPortNoDefault => {
            "implicit net port with no default net type in effect".into()
        }
        MessageId::InOutPortCannotBeVariable => {
            format!("inout port `{}` cannot have a variable type", name())
        }
        MessageId::RefPortMustBeVariable => {
            format!("ref port `{}` must have a variable type", name())
        }
        MessageId::Redefinition => format!("redefinition of `{}`", name()),
        MessageId::UnusedPortDecl => {
            format!(
                "port declaration `{}` corresponds to no port in the port list",
                name()
            )
        }
        MessageId::ConstPortNotAllowed => "'const' is not allowed on ports".into(),
        MessageId::DisallowedPortDefault => {
            "default value is not allowed on this kind of port".into()
        }
        MessageId::PortConcatInOut => {
            "port concatenation with inout direction may contain only nets".into()
        }
        MessageId::PortConcatRef => {
            "port concatenation with ref direction may contain only variables".into()
        }
        MessageId::IfacePortInConcat => {
            format!(
                "interface port `{}` may not appear in a port concatenation",
                name()
            )
        }
        MessageId::BadConcatExpression => {
            format!("invalid type {} in port concatenation", name())
        }
        MessageId::PortDeclInAnsiModule => {
            "port declarations are not allowed in a module with an ANSI port list".into()
        }
        MessageId::NotYetSupported => "language construct is not yet supported".into(),
        MessageId::MixingOrderedAndNamedPorts => {
            "mixing ordered and named port connections is not allowed".into()
        }
        MessageId::DuplicateWildcardPortConnection => "duplicate wildcard port connection".into(),
        MessageId::DuplicatePortConnection => {
            format!("duplicate connection for port `{}`", name())
        }
        MessageId::TooManyPortConnections => {
            let module = name();
            let given = msg.args.get(1).and_then(Arg::as_count).unwrap_or(0);
            let expected = msg.args.get(2).and_then(Arg::as_count).unwrap_or(0);
            format!(
                "too many port connections to `{module}`: {given} given, {expected} expected"
            )
        }
        MessageId::PortDoesNotExist => {
            let port = name();
            let module = nth_name(1);
            format!("port `{port}` does not exist in module `{module}`")
        }
        MessageId::UnconnectedNamedPort => format!("port `{}` is not connected", name()),
        MessageId::UnconnectedUnnamedPort => "unnamed port is not connected".into(),
        MessageId::NullPortExpression => {
            "empty port cannot be connected to an expression".into()
        }
        MessageId::ImplicitNamedPortNotFound => {
            format!(
                "could not find symbol `{}` for implicit named port connection",
                name()
            )
        }
        MessageId::ImplicitNamedPortTypeMismatch => {
            let port = name();
            let port_ty = nth_name(1);
            let conn_ty = nth_name(2);
            format!(
                "implicit connection for port `{port}` has mismatched types: port is {port_ty}, connection is {conn_ty}"
            )
        }
        MessageId::UsedBeforeDeclared => {
            format!("`{}` is used before it is declared", name())
        }
        MessageId::InterfacePortNotConnected => {
            format!("interface port `{}` is not connected", name())
        }
        MessageId::InterfacePortInvalidExpression => {
            format!(
                "invalid expression for interface port `{}`; expected an interface instance name",
                name()
            )
        }
        MessageId::InterfacePortTypeMismatch => {
            let conn = name();
            let expected = nth_name(1);
            format!(
                "cannot connect instance of interface `{conn}` to port requiring interface `{expected}`"
            )
        }
        MessageId::ModportConnMismatch => {
            let conn_iface = name();
            let conn_modport = nth_name(1);
            let port_iface = nth_name(2);
            let port_modport = nth_name(3);
            format!(
                "cannot connect modport `{conn_iface}.{conn_modport}` to port requiring modport `{port_iface}.{port_modport}`"
            )
        }
        MessageId::PortConnDimensionsMismatch => {
            format!("connection dimensions do not match for port `{}`", name())
        }
        MessageId::NotAnInterface => format!("`{}` is not an interface instance", name()),
        MessageId::DeclaredHere => "declared here".into(),
        MessageId::FirstDefinedHere => "first defined here".into(),
        MessageId::PreviousUsageHere => "previous usage here".into(),
    }
}
