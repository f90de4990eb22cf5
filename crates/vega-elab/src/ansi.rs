use smol_str::SmolStr;
use vega_diag::{Diagnostic, DiagnosticCode, Message, MessageId};
use vega_syntax::{
    AnsiPortSyntax, AttributeSyntax, DataTypeSyntax, DeclaratorSyntax, ExplicitAnsiPortSyntax,
    ImplicitAnsiPortSyntax, PortDirection, PortHeaderSyntax, VariablePortHeaderSyntax,
};

use crate::Compilation;
use crate::definition::{DefinitionId, DefinitionKind};
use crate::expr::{self, convert_assignment};
use crate::ports::{
    ImplicitMember, default_net_type, direction_of, interface_port_info, resolve_port_type,
};
use crate::scope::{LookupFlags, ScopeId};
use crate::symbols::{
    InterfacePortSymbol, NetSymbol, NetTypeId, PortSymbol, SymbolId, SymbolKind, VariableSymbol,
};
use crate::types::{Ty, wrap_unpacked};

/// Walks an ANSI port list left to right, carrying the inheritance
/// state a port with a bare name picks up from its predecessor.
///
/// The state is explicit here rather than implied by the port symbols
/// so the inheritance contract stays visible: an explicit port resets
/// everything, an interface port switches the state to interface mode.
pub(crate) struct AnsiPortListBuilder<'a> {
    comp: &'a mut Compilation,
    scope: ScopeId,
    implicit_members: Vec<ImplicitMember>,

    last_direction: PortDirection,
    last_type: Option<DataTypeSyntax>,
    last_net_type: Option<NetTypeId>,
    last_interface: Option<DefinitionId>,
    last_modport: SmolStr,
}

impl<'a> AnsiPortListBuilder<'a> {
    pub(crate) fn new(comp: &'a mut Compilation, scope: ScopeId) -> Self {
        Self {
            comp,
            scope,
            implicit_members: Vec::new(),
            last_direction: PortDirection::Inout,
            last_type: None,
            last_net_type: None,
            last_interface: None,
            last_modport: SmolStr::default(),
        }
    }

    pub(crate) fn finish(self) -> Vec<ImplicitMember> {
        self.implicit_members
    }

    pub(crate) fn create_port(&mut self, syntax: &AnsiPortSyntax) -> SymbolId {
        match syntax {
            AnsiPortSyntax::Implicit(port) => self.create_implicit(port),
            AnsiPortSyntax::Explicit(port) => self.create_explicit(port),
        }
    }

    fn create_implicit(&mut self, syntax: &ImplicitAnsiPortSyntax) -> SymbolId {
        let decl = &syntax.declarator;
        match &syntax.header {
            PortHeaderSyntax::Variable(header) => {
                // The variable header is the parser's catch-all when the
                // port kind is not yet known. Three attributes matter:
                // kind, type, direction. All three omitted means inherit
                // everything from the previous port; the parser guarantees
                // the first port never takes this path, since that would
                // have produced a non-ANSI list instead.
                if header.direction.is_none()
                    && header.var_keyword.is_none()
                    && header.data_type.is_empty_implicit()
                {
                    return self.add_inherited(decl, &syntax.attrs);
                }

                // A bare identifier type may actually name a net type or
                // an interface; only a lookup can tell.
                if let Some(simple) = header.data_type.simple_name() {
                    let found =
                        self.comp
                            .lookup_unqualified(self.scope, simple, LookupFlags::TYPE);
                    if let Some(found) = found
                        && let SymbolKind::NetType(net_type) = self.comp.symbol(found).kind
                    {
                        let direction = direction_of(header.direction, self.last_direction);
                        return self.add_value_port(
                            decl,
                            &syntax.attrs,
                            direction,
                            None,
                            Some(net_type),
                        );
                    }

                    if found.is_none()
                        && let Some(def_id) = self.comp.get_definition(simple)
                    {
                        return self.add_resolved_interface(header, decl, &syntax.attrs, def_id);
                    }
                }

                self.add_classified_variable(header, decl, &syntax.attrs)
            }
            PortHeaderSyntax::Net(header) => {
                let direction = direction_of(header.direction, self.last_direction);
                let net_type = self.comp.net_type_for_keyword(header.net_type);
                let data_type = header.data_type.clone();
                self.add_value_port(
                    decl,
                    &syntax.attrs,
                    direction,
                    Some(&data_type),
                    Some(net_type),
                )
            }
            PortHeaderSyntax::Interface(header) => {
                let (definition, modport) = interface_port_info(self.comp, header);
                self.add_interface_port(decl, &syntax.attrs, definition, modport)
            }
        }
    }

    /// A data type identifier resolved to a definition instead of a
    /// type: an interface port if the definition is an interface,
    /// otherwise a neutered data port.
    fn add_resolved_interface(
        &mut self,
        header: &VariablePortHeaderSyntax,
        decl: &DeclaratorSyntax,
        attrs: &[AttributeSyntax],
        def_id: DefinitionId,
    ) -> SymbolId {
        let def = self.comp.definition(def_id);
        if def.kind != DefinitionKind::Interface {
            let name = def.name.clone();
            let loc = def.loc;
            let span = header.data_type.span().unwrap_or(decl.name_span);
            self.comp.report(
                Diagnostic::error(
                    DiagnosticCode::PORT_TYPE_NOT_INTERFACE_OR_DATA,
                    Message::named(MessageId::PortTypeNotInterfaceOrData, name),
                    span,
                )
                .with_related(loc, Message::simple(MessageId::DeclaredHere)),
            );
            return self.add_interface_port(decl, attrs, None, SmolStr::default());
        }

        if let Some(var_span) = header.var_keyword {
            self.comp.report(Diagnostic::error(
                DiagnosticCode::VAR_WITH_INTERFACE_PORT,
                Message::simple(MessageId::VarWithInterfacePort),
                var_span,
            ));
        }
        if let Some(dir) = header.direction {
            self.comp.report(Diagnostic::error(
                DiagnosticCode::DIRECTION_WITH_INTERFACE_PORT,
                Message::simple(MessageId::DirectionWithInterfacePort),
                dir.span,
            ));
        }

        self.add_interface_port(decl, attrs, Some(def_id), SmolStr::default())
    }

    /// Classify the underlying kind of a variable-headed port.
    ///
    /// With a `var` keyword it's a variable; inout defaults to a net;
    /// ref is always a variable; otherwise an implicit type means a net
    /// of the default net type. The LRM says `input` with an explicit
    /// data type is also a net, but every major simulator treats it as a
    /// variable; `strict_lrm_input_defaulting` restores the LRM rule.
    fn add_classified_variable(
        &mut self,
        header: &VariablePortHeaderSyntax,
        decl: &DeclaratorSyntax,
        attrs: &[AttributeSyntax],
    ) -> SymbolId {
        let direction = direction_of(header.direction, self.last_direction);
        let implicit = header.data_type.is_implicit();
        let strict_input =
            self.comp.strict_lrm_input_defaulting && direction == PortDirection::Input;

        let mut net_type = None;
        if header.var_keyword.is_none()
            && (direction == PortDirection::Inout
                || (direction != PortDirection::Ref && (implicit || strict_input)))
        {
            net_type = Some(default_net_type(self.comp, self.scope, decl.name_span));
        }

        let data_type = header.data_type.clone();
        self.add_value_port(decl, attrs, direction, Some(&data_type), net_type)
    }

    fn create_explicit(&mut self, syntax: &ExplicitAnsiPortSyntax) -> SymbolId {
        let direction = direction_of(syntax.direction, self.last_direction);

        // The internal expression doubles as the connection default;
        // the port's type is inferred from it.
        let mut ty = Ty::Error;
        let mut initializer = None;
        if let Some(expr_syntax) = &syntax.expr {
            let expr = expr::bind_expr(self.comp, self.scope, expr_syntax, true);
            ty = expr.ty.clone();
            initializer = Some(expr);
        }

        let port = self.comp.emplace(
            syntax.name.clone(),
            syntax.name_span,
            SymbolKind::Port(PortSymbol {
                direction,
                external_loc: syntax.name_span,
                internal_symbol: None,
                ty,
                initializer,
                attributes: syntax.attrs.clone(),
            }),
        );

        // No inheritance across an explicit port.
        self.last_direction = direction;
        self.last_type = None;
        self.last_net_type = None;
        self.last_interface = None;
        self.last_modport = SmolStr::default();

        port
    }

    fn add_inherited(&mut self, decl: &DeclaratorSyntax, attrs: &[AttributeSyntax]) -> SymbolId {
        if let Some(iface) = self.last_interface {
            let modport = self.last_modport.clone();
            return self.add_interface_port(decl, attrs, Some(iface), modport);
        }

        if self.last_type.is_none() && self.last_net_type.is_none() {
            self.last_type = Some(DataTypeSyntax::empty());
        }

        let direction = self.last_direction;
        let data_type = self.last_type.clone();
        let net_type = self.last_net_type;
        self.add_value_port(decl, attrs, direction, data_type.as_ref(), net_type)
    }

    fn add_value_port(
        &mut self,
        decl: &DeclaratorSyntax,
        attrs: &[AttributeSyntax],
        direction: PortDirection,
        data_type: Option<&DataTypeSyntax>,
        net_type: Option<NetTypeId>,
    ) -> SymbolId {
        if !decl.name.is_empty() {
            if direction == PortDirection::Inout && net_type.is_none() {
                self.comp.report(Diagnostic::error(
                    DiagnosticCode::INOUT_PORT_CANNOT_BE_VARIABLE,
                    Message::named(MessageId::InOutPortCannotBeVariable, decl.name.clone()),
                    decl.name_span,
                ));
            } else if direction == PortDirection::Ref && net_type.is_some() {
                self.comp.report(Diagnostic::error(
                    DiagnosticCode::REF_PORT_MUST_BE_VARIABLE,
                    Message::named(MessageId::RefPortMustBeVariable, decl.name.clone()),
                    decl.name_span,
                ));
            }
        }

        let base = resolve_port_type(self.comp, data_type, net_type);
        let ty = wrap_unpacked(base, &decl.unpacked_dims);

        // The internal symbol and the port keep independent copies of
        // the type; connection resolution reads the port's type while
        // the body reads the symbol's.
        let internal = match net_type {
            Some(net) => self.comp.emplace(
                decl.name.clone(),
                decl.name_span,
                SymbolKind::Net(NetSymbol {
                    net_type: net,
                    ty: ty.clone(),
                }),
            ),
            None => self.comp.emplace(
                decl.name.clone(),
                decl.name_span,
                SymbolKind::Variable(VariableSymbol { ty: ty.clone() }),
            ),
        };

        let initializer = decl.initializer.as_ref().map(|init| {
            let expr = expr::bind_expr(self.comp, self.scope, init, true);
            convert_assignment(&ty, expr, init.span())
        });

        let port = self.comp.emplace(
            decl.name.clone(),
            decl.name_span,
            SymbolKind::Port(PortSymbol {
                direction,
                external_loc: decl.name_span,
                internal_symbol: Some(internal),
                ty,
                initializer,
                attributes: attrs.to_vec(),
            }),
        );

        self.implicit_members.push(ImplicitMember {
            symbol: internal,
            insertion_point: Some(port),
        });

        // Remember the properties of this port in case the next port
        // wants to inherit from them.
        self.last_direction = direction;
        self.last_type = data_type.cloned();
        self.last_net_type = net_type;
        self.last_interface = None;
        self.last_modport = SmolStr::default();

        port
    }

    fn add_interface_port(
        &mut self,
        decl: &DeclaratorSyntax,
        attrs: &[AttributeSyntax],
        interface_def: Option<DefinitionId>,
        modport: SmolStr,
    ) -> SymbolId {
        let port = self.comp.emplace(
            decl.name.clone(),
            decl.name_span,
            SymbolKind::InterfacePort(InterfacePortSymbol {
                interface_def,
                modport: modport.clone(),
                declared_range: decl.unpacked_dims.iter().map(|d| (*d).into()).collect(),
                is_missing_io: false,
                multi_port_loc: None,
                attributes: attrs.to_vec(),
            }),
        );

        self.last_direction = PortDirection::Inout;
        self.last_type = None;
        self.last_net_type = None;
        self.last_interface = interface_def;
        self.last_modport = modport;

        port
    }
}
