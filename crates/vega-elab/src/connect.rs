use std::collections::HashMap;

use smol_str::SmolStr;
use vega_diag::{Arg, Diagnostic, DiagnosticCode, Message, MessageId};
use vega_source::Span;
use vega_syntax::{
    AttributeSyntax, ConnectionSyntax, ExprSyntax, NamedConnectionSyntax, PortDirection,
};

use crate::Compilation;
use crate::definition::{DefinitionId, DefinitionKind};
use crate::expr::{self, Expression, convert_assignment};
use crate::scope::{LookupFlags, ScopeId, ScopeKind};
use crate::symbols::{SymbolId, SymbolKind};
use crate::types::{ConstantRange, Ty};

/// A binding between one formal port and one actual.
#[derive(Debug, Clone, PartialEq)]
pub enum PortConnection {
    /// Connection to a data port. `expr == None` means intentionally no
    /// connection.
    Value {
        port: SymbolId,
        expr: Option<Expression>,
        attrs: Vec<AttributeSyntax>,
    },
    /// Connection to an interface port: an interface instance, an array
    /// slice of one, or a modport symbol.
    Interface {
        port: SymbolId,
        target: Option<SymbolId>,
        attrs: Vec<AttributeSyntax>,
    },
}

impl PortConnection {
    pub fn port(&self) -> SymbolId {
        match self {
            PortConnection::Value { port, .. } | PortConnection::Interface { port, .. } => *port,
        }
    }
}

/// Per-instance connection map, total over the formal port list and in
/// formal-port order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConnectionMap {
    entries: Vec<PortConnection>,
}

impl ConnectionMap {
    pub fn get(&self, port: SymbolId) -> Option<&PortConnection> {
        self.entries.iter().find(|c| c.port() == port)
    }

    pub fn iter(&self) -> impl Iterator<Item = &PortConnection> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolve the port connections of `instance` against the formal port
/// list of its definition. The resulting map is stored on the
/// compilation and also returned.
pub fn resolve_connections(
    comp: &mut Compilation,
    instance: SymbolId,
    conns: &[ConnectionSyntax],
) -> ConnectionMap {
    let mut builder = PortConnectionBuilder::new(comp, instance, conns);
    let ports = builder.formal_ports();
    let mut entries = Vec::with_capacity(ports.len());
    for port in ports {
        let is_iface = matches!(
            builder.comp.symbol(port).kind,
            SymbolKind::InterfacePort(_)
        );
        let conn = if is_iface {
            builder.iface_connection(port)
        } else {
            builder.connection(port)
        };
        entries.push(conn);
    }
    builder.finalize();

    let map = ConnectionMap { entries };
    comp.set_connections(instance, map.clone());
    map
}

struct NamedConn {
    syntax: NamedConnectionSyntax,
    used: bool,
}

/// Matches an instance's formal ports against its connection syntax.
///
/// Style (ordered vs named) is fixed by the first connection; the
/// builder then produces one `PortConnection` per formal port.
struct PortConnectionBuilder<'a> {
    comp: &'a mut Compilation,
    instance: SymbolId,
    scope: ScopeId,
    definition: DefinitionId,
    /// Declaration index of the instance; lookups from connections must
    /// see symbols declared up to and including this point.
    lookup_index: u32,

    using_ordered: bool,
    ordered_conns: Vec<(Option<ExprSyntax>, Vec<AttributeSyntax>, Span)>,
    ordered_index: usize,
    /// Insertion order preserved for the port-does-not-exist sweep.
    named_conns: Vec<NamedConn>,
    named_by_name: HashMap<SmolStr, usize>,
    wildcard: Option<(Span, Vec<AttributeSyntax>)>,
    /// Instance array dimensions of the enclosing arrays, outermost
    /// first.
    instance_dims: Vec<ConstantRange>,
    warned_about_unnamed: bool,
}

impl<'a> PortConnectionBuilder<'a> {
    fn new(comp: &'a mut Compilation, instance: SymbolId, conns: &[ConnectionSyntax]) -> Self {
        let scope = comp
            .symbol(instance)
            .scope
            .expect("instance must live in a scope");
        let lookup_index = comp.symbol(instance).index;
        let definition = match &comp.symbol(instance).kind {
            SymbolKind::Instance(inst) => inst.definition,
            _ => unreachable!("connections are resolved for instances"),
        };

        let mut builder = Self {
            comp,
            instance,
            scope,
            definition,
            lookup_index,
            using_ordered: true,
            ordered_conns: Vec::new(),
            ordered_index: 0,
            named_conns: Vec::new(),
            named_by_name: HashMap::new(),
            wildcard: None,
            instance_dims: Vec::new(),
            warned_about_unnamed: false,
        };
        builder.classify_connections(conns);
        builder.collect_instance_dims();
        builder
    }

    fn classify_connections(&mut self, conns: &[ConnectionSyntax]) {
        let mut has_connections = false;
        for conn in conns {
            let is_ordered = conn.is_ordered();
            if !has_connections {
                has_connections = true;
                self.using_ordered = is_ordered;
            } else if is_ordered != self.using_ordered {
                self.comp.report(Diagnostic::error(
                    DiagnosticCode::MIXING_ORDERED_AND_NAMED_PORTS,
                    Message::simple(MessageId::MixingOrderedAndNamedPorts),
                    conn.span(),
                ));
                break;
            }

            match conn {
                ConnectionSyntax::Ordered(c) => {
                    self.ordered_conns
                        .push((c.expr.clone(), c.attrs.clone(), c.span));
                }
                ConnectionSyntax::Wildcard(c) => {
                    if let Some((previous, _)) = self.wildcard {
                        self.comp.report(
                            Diagnostic::error(
                                DiagnosticCode::DUPLICATE_WILDCARD_PORT_CONNECTION,
                                Message::simple(MessageId::DuplicateWildcardPortConnection),
                                c.span,
                            )
                            .with_related(
                                previous,
                                Message::simple(MessageId::PreviousUsageHere),
                            ),
                        );
                    } else {
                        self.wildcard = Some((c.span, c.attrs.clone()));
                    }
                }
                ConnectionSyntax::Named(c) => {
                    if c.name.is_empty() {
                        continue;
                    }
                    if let Some(&existing) = self.named_by_name.get(&c.name) {
                        let previous = self.named_conns[existing].syntax.name_span;
                        self.comp.report(
                            Diagnostic::error(
                                DiagnosticCode::DUPLICATE_PORT_CONNECTION,
                                Message::named(MessageId::DuplicatePortConnection, c.name.clone()),
                                c.name_span,
                            )
                            .with_related(
                                previous,
                                Message::simple(MessageId::PreviousUsageHere),
                            ),
                        );
                    } else {
                        self.named_by_name
                            .insert(c.name.clone(), self.named_conns.len());
                        self.named_conns.push(NamedConn {
                            syntax: c.clone(),
                            used: false,
                        });
                    }
                }
            }
        }
    }

    /// Dimensions of the enclosing instance arrays, outermost first,
    /// collected by walking up through `InstanceArray` scopes.
    fn collect_instance_dims(&mut self) {
        let mut dims = Vec::new();
        let mut current = Some(self.scope);
        while let Some(id) = current {
            let scope = self.comp.scope(id);
            if scope.kind == ScopeKind::InstanceArray
                && let Some(owner) = scope.owner
                && let SymbolKind::InstanceArray(array) = &self.comp.symbol(owner).kind
            {
                dims.push(array.range);
            }
            current = scope.parent;
        }
        dims.reverse();
        self.instance_dims = dims;
    }

    fn formal_ports(&self) -> Vec<SymbolId> {
        self.comp.definition(self.definition).ports.clone()
    }

    // Data-port accessors shared between `Port` and `MultiPort`.

    fn port_name(&self, port: SymbolId) -> SmolStr {
        self.comp.symbol(port).name.clone()
    }

    fn port_loc(&self, port: SymbolId) -> Span {
        self.comp.symbol(port).loc
    }

    fn port_ty(&self, port: SymbolId) -> Ty {
        match &self.comp.symbol(port).kind {
            SymbolKind::Port(p) => p.ty.clone(),
            SymbolKind::MultiPort(p) => p.ty.clone(),
            _ => Ty::Error,
        }
    }

    fn port_direction(&self, port: SymbolId) -> PortDirection {
        match &self.comp.symbol(port).kind {
            SymbolKind::Port(p) => p.direction,
            SymbolKind::MultiPort(p) => p.direction,
            _ => PortDirection::Input,
        }
    }

    /// Default-value expression of the port, if any. Multi-ports never
    /// have one.
    fn port_default(&self, port: SymbolId) -> Option<Expression> {
        match &self.comp.symbol(port).kind {
            SymbolKind::Port(p) => p.initializer.clone(),
            _ => None,
        }
    }

    fn empty_connection(&self, port: SymbolId) -> PortConnection {
        PortConnection::Value {
            port,
            expr: None,
            attrs: Vec::new(),
        }
    }

    /// Produce the connection for a data port or multi-port.
    fn connection(&mut self, port: SymbolId) -> PortConnection {
        let has_default = self.port_default(port).is_some();
        if self.using_ordered {
            if self.ordered_index >= self.ordered_conns.len() {
                self.ordered_index += 1;

                if has_default {
                    return PortConnection::Value {
                        port,
                        expr: self.port_default(port),
                        attrs: Vec::new(),
                    };
                }

                self.report_unconnected(port);
                return self.empty_connection(port);
            }

            let (expr, attrs, _) = self.ordered_conns[self.ordered_index].clone();
            self.ordered_index += 1;
            return match expr {
                Some(expr) => self.value_connection(port, &expr, attrs),
                // An empty ordered slot takes the default if there is one.
                None => PortConnection::Value {
                    port,
                    expr: self.port_default(port),
                    attrs,
                },
            };
        }

        let name = self.port_name(port);
        if name.is_empty() {
            // An unnamed port can never be connected by name.
            self.warn_unconnected_unnamed(port);
            return self.empty_connection(port);
        }

        let Some(&conn_idx) = self.named_by_name.get(&name) else {
            if let Some((range, attrs)) = self.wildcard.clone() {
                return self.implicit_named_port(port, attrs, range, true);
            }

            if has_default {
                return PortConnection::Value {
                    port,
                    expr: self.port_default(port),
                    attrs: Vec::new(),
                };
            }

            self.report_unconnected(port);
            return self.empty_connection(port);
        };

        self.named_conns[conn_idx].used = true;
        let conn = self.named_conns[conn_idx].syntax.clone();
        if conn.open_paren {
            // An explicitly empty `.name()` means no connection; the
            // default is never taken here.
            return match &conn.expr {
                Some(expr) => self.value_connection(port, expr, conn.attrs.clone()),
                None => self.empty_connection(port),
            };
        }

        self.implicit_named_port(port, conn.attrs.clone(), conn.name_span, false)
    }

    fn report_unconnected(&mut self, port: SymbolId) {
        let name = self.port_name(port);
        if name.is_empty() {
            self.warn_unconnected_unnamed(port);
        } else {
            let loc = self.comp.symbol(self.instance).loc;
            self.comp.report(Diagnostic::warning(
                DiagnosticCode::UNCONNECTED_NAMED_PORT,
                Message::named(MessageId::UnconnectedNamedPort, name),
                loc,
            ));
        }
    }

    fn warn_unconnected_unnamed(&mut self, port: SymbolId) {
        if self.warned_about_unnamed {
            return;
        }
        self.warned_about_unnamed = true;
        let port_loc = self.port_loc(port);
        let loc = self.comp.symbol(self.instance).loc;
        self.comp.report(
            Diagnostic::warning(
                DiagnosticCode::UNCONNECTED_UNNAMED_PORT,
                Message::simple(MessageId::UnconnectedUnnamedPort),
                loc,
            )
            .with_related(port_loc, Message::simple(MessageId::DeclaredHere)),
        );
    }

    /// Bind an expression actual against a data port.
    fn value_connection(
        &mut self,
        port: SymbolId,
        syntax: &ExprSyntax,
        attrs: Vec<AttributeSyntax>,
    ) -> PortConnection {
        let ty = self.port_ty(port);
        if ty.is_void() {
            let port_loc = self.port_loc(port);
            self.comp.report(
                Diagnostic::error(
                    DiagnosticCode::NULL_PORT_EXPRESSION,
                    Message::simple(MessageId::NullPortExpression),
                    syntax.span(),
                )
                .with_related(port_loc, Message::simple(MessageId::DeclaredHere)),
            );
            return self.empty_connection(port);
        }

        let direction = self.port_direction(port);
        let expr = expr::bind_argument(self.comp, self.scope, &ty, direction, syntax);
        PortConnection::Value {
            port,
            expr: Some(expr),
            attrs,
        }
    }

    /// An implicit named (`.name`) or wildcard (`.*`) connection.
    ///
    /// Semantically `.port(port)` except: implicit nets are never
    /// created, the types must be equivalent rather than assignment
    /// compatible, and using a symbol declared after the instance is
    /// diagnosed.
    fn implicit_named_port(
        &mut self,
        port: SymbolId,
        attrs: Vec<AttributeSyntax>,
        range: Span,
        is_wildcard: bool,
    ) -> PortConnection {
        let name = self.port_name(port);
        let flags = if is_wildcard {
            LookupFlags::DISALLOW_WILDCARD_IMPORT
        } else {
            LookupFlags::NONE
        };

        let Some(symbol) = self.comp.lookup_unqualified(self.scope, &name, flags) else {
            // A wildcard connection is allowed to fall back to the
            // port's default value.
            if is_wildcard && self.port_default(port).is_some() {
                return PortConnection::Value {
                    port,
                    expr: self.port_default(port),
                    attrs,
                };
            }

            self.comp.report(Diagnostic::error(
                DiagnosticCode::IMPLICIT_NAMED_PORT_NOT_FOUND,
                Message::named(MessageId::ImplicitNamedPortNotFound, name),
                range,
            ));
            return self.empty_connection(port);
        };

        self.check_declared_before(symbol, &name, range);

        let port_ty = self.port_ty(port);
        if port_ty.is_error() {
            return self.empty_connection(port);
        }

        let expr = Expression::from_symbol(self.comp, symbol, range);
        if expr.bad() {
            return self.empty_connection(port);
        }

        if !expr.ty.is_equivalent(&port_ty) {
            self.comp.report(Diagnostic::error(
                DiagnosticCode::IMPLICIT_NAMED_PORT_TYPE_MISMATCH,
                Message::new(
                    MessageId::ImplicitNamedPortTypeMismatch,
                    vec![
                        Arg::Name(name),
                        Arg::Name(port_ty.pretty().into()),
                        Arg::Name(expr.ty.pretty().into()),
                    ],
                ),
                range,
            ));
            return self.empty_connection(port);
        }

        let assign = convert_assignment(&port_ty, expr, range);
        PortConnection::Value {
            port,
            expr: Some(assign),
            attrs,
        }
    }

    fn check_declared_before(&mut self, symbol: SymbolId, name: &str, range: Span) {
        if !self.comp.is_declared_before(symbol, self.lookup_index) {
            let decl_loc = self.comp.symbol(symbol).loc;
            self.comp.report(
                Diagnostic::warning(
                    DiagnosticCode::USED_BEFORE_DECLARED,
                    Message::named(MessageId::UsedBeforeDeclared, name),
                    range,
                )
                .with_related(decl_loc, Message::simple(MessageId::DeclaredHere)),
            );
        }
    }

    /// Produce the connection for an interface port.
    fn iface_connection(&mut self, port: SymbolId) -> PortConnection {
        let name = self.port_name(port);
        let iface_def = match &self.comp.symbol(port).kind {
            SymbolKind::InterfacePort(p) => p.interface_def,
            _ => None,
        };

        // An absent definition means an error was already issued; just
        // consume the matching connection so finalize stays quiet.
        if iface_def.is_none() {
            if self.using_ordered {
                self.ordered_index += 1;
            } else if let Some(&idx) = self.named_by_name.get(&name) {
                self.named_conns[idx].used = true;
            }
            return self.empty_iface_connection(port);
        }

        if self.using_ordered {
            let mut expr = None;
            let mut attrs = Vec::new();
            if self.ordered_index < self.ordered_conns.len() {
                let (e, a, _) = self.ordered_conns[self.ordered_index].clone();
                expr = e;
                attrs = a;
            }
            self.ordered_index += 1;

            return match expr {
                Some(expr) => self.iface_expr_connection(port, &expr, attrs),
                None => self.report_iface_unconnected(port),
            };
        }

        let Some(&conn_idx) = self.named_by_name.get(&name) else {
            if let Some((range, attrs)) = self.wildcard.clone() {
                return self.implicit_iface_connection(port, range, attrs);
            }
            return self.report_iface_unconnected(port);
        };

        self.named_conns[conn_idx].used = true;
        let conn = self.named_conns[conn_idx].syntax.clone();
        if conn.open_paren {
            return match &conn.expr {
                Some(expr) => self.iface_expr_connection(port, expr, conn.attrs.clone()),
                None => self.report_iface_unconnected(port),
            };
        }

        self.implicit_iface_connection(port, conn.name_span, conn.attrs.clone())
    }

    fn empty_iface_connection(&self, port: SymbolId) -> PortConnection {
        PortConnection::Interface {
            port,
            target: None,
            attrs: Vec::new(),
        }
    }

    fn report_iface_unconnected(&mut self, port: SymbolId) -> PortConnection {
        let name = self.port_name(port);
        let port_loc = self.port_loc(port);
        let loc = self.comp.symbol(self.instance).loc;
        self.comp.report(
            Diagnostic::error(
                DiagnosticCode::INTERFACE_PORT_NOT_CONNECTED,
                Message::named(MessageId::InterfacePortNotConnected, name),
                loc,
            )
            .with_related(port_loc, Message::simple(MessageId::DeclaredHere)),
        );
        self.empty_iface_connection(port)
    }

    /// Resolve an explicit interface connection expression: it must be
    /// a (possibly parenthesized, possibly selected) name denoting an
    /// interface instance or modport.
    fn iface_expr_connection(
        &mut self,
        port: SymbolId,
        syntax: &ExprSyntax,
        attrs: Vec<AttributeSyntax>,
    ) -> PortConnection {
        let Some(name_syntax) = syntax.as_name() else {
            let port_name = self.port_name(port);
            self.comp.report(Diagnostic::error(
                DiagnosticCode::INTERFACE_PORT_INVALID_EXPRESSION,
                Message::named(MessageId::InterfacePortInvalidExpression, port_name),
                syntax.unwrap_parens().span(),
            ));
            return self.empty_iface_connection(port);
        };

        let mut provided_modport = SmolStr::default();
        let mut symbol = self.comp.find(self.scope, &name_syntax.ident);

        // If the name resolved to an interface port of the enclosing
        // module, unwrap to its own connection target before applying
        // any selectors.
        if let Some(found) = symbol
            && let SymbolKind::InterfacePort(iface) = &self.comp.symbol(found).kind
        {
            provided_modport = iface.modport.clone();
            symbol = self.comp.interface_port_connection(found);
        }

        if let Some(found) = symbol
            && !name_syntax.selectors.is_empty()
        {
            symbol = self.comp.select_child(found, &name_syntax.selectors);
        }

        let target = match symbol {
            Some(found) => {
                self.resolve_interface(port, found, provided_modport, name_syntax.span)
            }
            // Lookup failure diagnostics belong to the name-lookup
            // subsystem; produce a neutered connection.
            None => None,
        };

        PortConnection::Interface {
            port,
            target,
            attrs,
        }
    }

    /// An implicit (`.name` or wildcard) interface connection.
    fn implicit_iface_connection(
        &mut self,
        port: SymbolId,
        range: Span,
        attrs: Vec<AttributeSyntax>,
    ) -> PortConnection {
        let name = self.port_name(port);
        let Some(symbol) = self
            .comp
            .lookup_unqualified(self.scope, &name, LookupFlags::NONE)
        else {
            self.comp.report(Diagnostic::error(
                DiagnosticCode::IMPLICIT_NAMED_PORT_NOT_FOUND,
                Message::named(MessageId::ImplicitNamedPortNotFound, name),
                range,
            ));
            return self.empty_iface_connection(port);
        };

        self.check_declared_before(symbol, &name, range);

        let target = self.resolve_interface(port, symbol, SmolStr::default(), range);
        PortConnection::Interface {
            port,
            target,
            attrs,
        }
    }

    /// Validate an interface connection target and perform array
    /// slicing. Returns the connected symbol, or `None` after
    /// diagnosing.
    fn resolve_interface(
        &mut self,
        port: SymbolId,
        mut symbol: SymbolId,
        mut provided_modport: SmolStr,
        range: Span,
    ) -> Option<SymbolId> {
        let (port_def, port_modport, port_dims) = match &self.comp.symbol(port).kind {
            SymbolKind::InterfacePort(p) => (
                p.interface_def?,
                p.modport.clone(),
                p.declared_range.clone(),
            ),
            _ => return None,
        };
        let port_name = self.comp.symbol(port).name.clone();
        let port_loc = self.comp.symbol(port).loc;
        let port_def_name = self.comp.definition(port_def).name.clone();

        // The user can explicitly connect a modport symbol.
        if let SymbolKind::Modport(modport) = &self.comp.symbol(symbol).kind {
            let conn_def = modport.interface;
            let conn_def_name = self.comp.definition(conn_def).name.clone();
            let modport_name = self.comp.symbol(symbol).name.clone();

            if conn_def != port_def {
                self.comp.report(
                    Diagnostic::error(
                        DiagnosticCode::INTERFACE_PORT_TYPE_MISMATCH,
                        Message::new(
                            MessageId::InterfacePortTypeMismatch,
                            vec![Arg::Name(conn_def_name), Arg::Name(port_def_name)],
                        ),
                        range,
                    )
                    .with_related(port_loc, Message::simple(MessageId::DeclaredHere)),
                );
                return None;
            }

            if !port_modport.is_empty() && modport_name != port_modport {
                self.report_modport_mismatch(
                    conn_def_name,
                    modport_name,
                    port_def_name,
                    port_modport,
                    range,
                );
                return None;
            }

            if !port_dims.is_empty() {
                self.report_dimensions_mismatch(port_name, port_loc, range);
                return None;
            }

            return Some(symbol);
        }

        // A nested interface port unwraps to its own connection.
        if let SymbolKind::InterfacePort(iface) = &self.comp.symbol(symbol).kind {
            provided_modport = iface.modport.clone();
            symbol = self.comp.interface_port_connection(symbol)?;
        }

        // The target must be an interface instance or an array of them.
        let mut conn_dims = Vec::new();
        let mut leaf = symbol;
        loop {
            match &self.comp.symbol(leaf).kind {
                SymbolKind::InstanceArray(array) => {
                    if array.elements.is_empty() {
                        return None;
                    }
                    conn_dims.push(array.range);
                    leaf = array.elements[0];
                }
                _ => break,
            }
        }

        let leaf_def = match &self.comp.symbol(leaf).kind {
            SymbolKind::Instance(inst) => Some(inst.definition),
            _ => None,
        };
        let Some(conn_def) = leaf_def
            .filter(|&d| self.comp.definition(d).kind == DefinitionKind::Interface)
        else {
            // A variable with an errored type has already been
            // diagnosed; everything else gets the mismatch error.
            let already_errored = matches!(
                &self.comp.symbol(leaf).kind,
                SymbolKind::Variable(v) if v.ty.is_error()
            );
            if !already_errored {
                let sym_name = self.comp.symbol(symbol).name.clone();
                let sym_loc = self.comp.symbol(symbol).loc;
                self.comp.report(
                    Diagnostic::error(
                        DiagnosticCode::NOT_AN_INTERFACE,
                        Message::named(MessageId::NotAnInterface, sym_name),
                        range,
                    )
                    .with_related(sym_loc, Message::simple(MessageId::DeclaredHere)),
                );
            }
            return None;
        };

        if conn_def != port_def {
            let conn_def_name = self.comp.definition(conn_def).name.clone();
            self.comp.report(
                Diagnostic::error(
                    DiagnosticCode::INTERFACE_PORT_TYPE_MISMATCH,
                    Message::new(
                        MessageId::InterfacePortTypeMismatch,
                        vec![Arg::Name(conn_def_name), Arg::Name(port_def_name)],
                    ),
                    range,
                )
                .with_related(port_loc, Message::simple(MessageId::DeclaredHere)),
            );
            return None;
        }

        // If both sides specify a modport they must agree.
        if !provided_modport.is_empty()
            && !port_modport.is_empty()
            && provided_modport != port_modport
        {
            let conn_def_name = self.comp.definition(conn_def).name.clone();
            self.report_modport_mismatch(
                conn_def_name,
                provided_modport,
                port_def_name,
                port_modport,
                range,
            );
            return None;
        }

        // Dimensions matching exactly connect directly.
        if dim_sizes_equal(&conn_dims, &port_dims) {
            return Some(symbol);
        }

        // Otherwise slice the array per instance if
        // connection dims == instance array dims ++ port dims.
        let split = self.instance_dims.len();
        if conn_dims.len() >= split
            && dim_sizes_equal(&conn_dims[..split], &self.instance_dims)
            && dim_sizes_equal(&conn_dims[split..], &port_dims)
        {
            let array_path = match &self.comp.symbol(self.instance).kind {
                SymbolKind::Instance(inst) => inst.array_path.clone(),
                _ => Default::default(),
            };

            for (i, &path_index) in array_path.iter().enumerate() {
                // Translate the instance's index to its declaration
                // position; elements are stored in declaration order, so
                // the flip between endianness conventions is absorbed
                // here.
                let position = self.instance_dims[i].declaration_index(path_index);
                let SymbolKind::InstanceArray(array) = &self.comp.symbol(symbol).kind else {
                    return None;
                };
                symbol = *array.elements.get(position)?;
            }

            return Some(symbol);
        }

        self.report_dimensions_mismatch(port_name, port_loc, range);
        None
    }

    fn report_modport_mismatch(
        &mut self,
        conn_iface: SmolStr,
        conn_modport: SmolStr,
        port_iface: SmolStr,
        port_modport: SmolStr,
        range: Span,
    ) {
        self.comp.report(Diagnostic::error(
            DiagnosticCode::MODPORT_CONN_MISMATCH,
            Message::new(
                MessageId::ModportConnMismatch,
                vec![
                    Arg::Name(conn_iface),
                    Arg::Name(conn_modport),
                    Arg::Name(port_iface),
                    Arg::Name(port_modport),
                ],
            ),
            range,
        ));
    }

    fn report_dimensions_mismatch(&mut self, port_name: SmolStr, port_loc: Span, range: Span) {
        self.comp.report(
            Diagnostic::error(
                DiagnosticCode::PORT_CONN_DIMENSIONS_MISMATCH,
                Message::named(MessageId::PortConnDimensionsMismatch, port_name),
                range,
            )
            .with_related(port_loc, Message::simple(MessageId::DeclaredHere)),
        );
    }

    fn finalize(&mut self) {
        if self.using_ordered {
            if self.ordered_index < self.ordered_conns.len() {
                let loc = self.ordered_conns[self.ordered_index].2;
                let def_name = self.comp.definition(self.definition).name.clone();
                self.comp.report(Diagnostic::error(
                    DiagnosticCode::TOO_MANY_PORT_CONNECTIONS,
                    Message::new(
                        MessageId::TooManyPortConnections,
                        vec![
                            Arg::Name(def_name),
                            Arg::Count(self.ordered_conns.len()),
                            Arg::Count(self.ordered_index),
                        ],
                    ),
                    loc,
                ));
            }
        } else {
            let unused: Vec<(SmolStr, Span)> = self
                .named_conns
                .iter()
                .filter(|c| !c.used)
                .map(|c| (c.syntax.name.clone(), c.syntax.name_span))
                .collect();
            for (name, span) in unused {
                let def_name = self.comp.definition(self.definition).name.clone();
                self.comp.report(Diagnostic::error(
                    DiagnosticCode::PORT_DOES_NOT_EXIST,
                    Message::new(
                        MessageId::PortDoesNotExist,
                        vec![Arg::Name(name), Arg::Name(def_name)],
                    ),
                    span,
                ));
            }
        }
    }
}

/// Element-wise width equality of two dimension lists.
fn dim_sizes_equal(left: &[ConstantRange], right: &[ConstantRange]) -> bool {
    left.len() == right.len()
        && left
            .iter()
            .zip(right.iter())
            .all(|(a, b)| a.width() == b.width())
}
