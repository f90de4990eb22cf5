use std::collections::HashMap;

use smol_str::SmolStr;
use vega_diag::{Diagnostic, DiagnosticCode, Message, MessageId};
use vega_source::Span;
use vega_syntax::{
    AttributeSyntax, DataTypeSyntax, DeclaratorSyntax, NonAnsiPortSyntax, PortDeclarationSyntax,
    PortDirection, PortHeaderSyntax, PortRefExprSyntax, PortReferenceSyntax, Signing,
};

use crate::Compilation;
use crate::definition::DefinitionId;
use crate::expr::{self, convert_assignment};
use crate::ports::{
    ImplicitMember, default_net_type, direction_of, interface_port_info, resolve_port_type,
};
use crate::scope::{LookupFlags, ScopeId};
use crate::symbols::{
    InterfacePortSymbol, MultiPortSymbol, NetSymbol, NetTypeId, PortSymbol, SymbolId, SymbolKind,
    VariableSymbol,
};
use crate::types::{IntegralTy, Ty, apply_packed, wrap_unpacked};

/// Scratch record for one declared port name, built during the indexing
/// phase and consumed when the port list references it.
struct PortInfo {
    decl: DeclaratorSyntax,
    attrs: Vec<AttributeSyntax>,
    internal_symbol: Option<SymbolId>,
    iface_def: Option<DefinitionId>,
    modport: SmolStr,
    direction: PortDirection,
    used: bool,
    is_iface: bool,
}

impl PortInfo {
    fn new(decl: DeclaratorSyntax, attrs: Vec<AttributeSyntax>) -> Self {
        Self {
            decl,
            attrs,
            internal_symbol: None,
            iface_def: None,
            modport: SmolStr::default(),
            direction: PortDirection::Input,
            used: false,
            is_iface: false,
        }
    }
}

/// Builds the external ports of a non-ANSI module: first indexes every
/// declarator of every port declaration statement, then resolves each
/// port-list entry against that index.
pub(crate) struct NonAnsiPortListBuilder<'a> {
    comp: &'a mut Compilation,
    scope: ScopeId,
    implicit_members: Vec<ImplicitMember>,
    /// Declaration order; `finalize` sweeps this for unused entries.
    infos: Vec<PortInfo>,
    by_name: HashMap<SmolStr, usize>,
}

impl<'a> NonAnsiPortListBuilder<'a> {
    pub(crate) fn new(
        comp: &'a mut Compilation,
        scope: ScopeId,
        port_declarations: &[(PortDeclarationSyntax, Option<SymbolId>)],
    ) -> Self {
        let mut builder = Self {
            comp,
            scope,
            implicit_members: Vec::new(),
            infos: Vec::new(),
            by_name: HashMap::new(),
        };

        for (decl_syntax, insertion_point) in port_declarations {
            for decl in &decl_syntax.declarators {
                if decl.name.is_empty() {
                    continue;
                }
                if let Some(&existing) = builder.by_name.get(&decl.name) {
                    let previous = builder.infos[existing].decl.name_span;
                    builder.comp.report(
                        Diagnostic::error(
                            DiagnosticCode::REDEFINITION,
                            Message::named(MessageId::Redefinition, decl.name.clone()),
                            decl.name_span,
                        )
                        .with_related(previous, Message::simple(MessageId::FirstDefinedHere)),
                    );
                    continue;
                }

                let idx = builder.infos.len();
                builder
                    .infos
                    .push(PortInfo::new(decl.clone(), decl_syntax.attrs.clone()));
                builder.by_name.insert(decl.name.clone(), idx);
                builder.handle_io_decl(&decl_syntax.header, idx, *insertion_point);
            }
        }

        builder
    }

    pub(crate) fn finish(self) -> Vec<ImplicitMember> {
        self.implicit_members
    }

    pub(crate) fn create_port(&mut self, syntax: &NonAnsiPortSyntax) -> SymbolId {
        match syntax {
            NonAnsiPortSyntax::Implicit { expr } => {
                self.create_port_expr(SmolStr::default(), expr.span(), expr)
            }
            NonAnsiPortSyntax::Explicit {
                name,
                name_span,
                expr,
            } => match expr {
                Some(expr) => self.create_port_expr(name.clone(), *name_span, expr),
                None => self.create_empty_port(name.clone(), *name_span),
            },
            NonAnsiPortSyntax::Empty { span } => self.create_empty_port(SmolStr::default(), *span),
        }
    }

    /// Error if any port declarations are unused.
    pub(crate) fn finalize(&mut self) {
        let unused: Vec<(SmolStr, Span)> = self
            .infos
            .iter()
            .filter(|info| !info.used)
            .map(|info| (info.decl.name.clone(), info.decl.name_span))
            .collect();
        for (name, span) in unused {
            self.comp.report(Diagnostic::warning(
                DiagnosticCode::UNUSED_PORT_DECL,
                Message::named(MessageId::UnusedPortDecl, name),
                span,
            ));
        }
    }

    fn handle_io_decl(
        &mut self,
        header: &PortHeaderSyntax,
        info_idx: usize,
        insertion_point: Option<SymbolId>,
    ) {
        let decl = self.infos[info_idx].decl.clone();
        let name = decl.name.clone();
        let decl_loc = decl.name_span;

        match header {
            PortHeaderSyntax::Variable(var_header) => {
                self.infos[info_idx].direction =
                    direction_of(var_header.direction, PortDirection::Input);

                if let Some(const_span) = var_header.const_keyword {
                    self.comp.report(Diagnostic::error(
                        DiagnosticCode::CONST_PORT_NOT_ALLOWED,
                        Message::simple(MessageId::ConstPortNotAllowed),
                        const_span,
                    ));
                }

                // Any declared type constitutes a full symbol definition.
                // Otherwise look for an existing symbol to match with.
                if var_header.var_keyword.is_some() || !var_header.data_type.is_implicit() {
                    let mut as_net = None;
                    if var_header.var_keyword.is_none()
                        && let Some(type_name) = var_header.data_type.simple_name()
                        && let Some(found) =
                            self.comp
                                .lookup_unqualified(self.scope, type_name, LookupFlags::TYPE)
                        && let SymbolKind::NetType(net_type) = self.comp.symbol(found).kind
                    {
                        as_net = Some(net_type);
                    }

                    match as_net {
                        Some(net_type) => {
                            let ty = self.net_decl_ty(net_type, None, &decl);
                            let symbol = self.comp.emplace(
                                name.clone(),
                                decl_loc,
                                SymbolKind::Net(NetSymbol { net_type, ty }),
                            );
                            self.set_internal_symbol(symbol, info_idx, insertion_point);
                        }
                        None => {
                            let base = resolve_port_type(self.comp, Some(&var_header.data_type), None);
                            let ty = wrap_unpacked(base, &decl.unpacked_dims);
                            let symbol = self.comp.emplace(
                                name.clone(),
                                decl_loc,
                                SymbolKind::Variable(VariableSymbol { ty }),
                            );
                            self.set_internal_symbol(symbol, info_idx, insertion_point);
                        }
                    }
                } else if let Some(existing) = self.comp.find(self.scope, &name)
                    && self.comp.symbol(existing).is_value()
                {
                    // Port kind and type come from the matching symbol;
                    // merge the header's implicit type bits into it.
                    self.infos[info_idx].internal_symbol = Some(existing);

                    // If the I/O declaration precedes the symbol, renumber
                    // the symbol so lookups between the two positions
                    // resolve to the port-declaration site.
                    let io_index = insertion_point
                        .map(|ip| self.comp.symbol(ip).index + 1)
                        .unwrap_or(0);
                    if self.comp.symbol(existing).index > io_index {
                        self.comp.symbol_mut(existing).index = io_index;
                    }

                    if let DataTypeSyntax::Implicit {
                        signing,
                        packed_dims,
                    } = &var_header.data_type
                    {
                        merge_implicit_port_type(self.comp, existing, *signing, packed_dims, &decl);
                    }
                } else {
                    // No symbol and no data type defaults to a basic net.
                    let net_type = default_net_type(self.comp, self.scope, decl_loc);
                    let ty = self.net_decl_ty(net_type, Some(&var_header.data_type), &decl);
                    let symbol = self.comp.emplace(
                        name.clone(),
                        decl_loc,
                        SymbolKind::Net(NetSymbol { net_type, ty }),
                    );
                    self.set_internal_symbol(symbol, info_idx, insertion_point);
                }

                let info = &self.infos[info_idx];
                if info.direction == PortDirection::Inout && !self.internal_is_net(info_idx) {
                    self.comp.report(Diagnostic::error(
                        DiagnosticCode::INOUT_PORT_CANNOT_BE_VARIABLE,
                        Message::named(MessageId::InOutPortCannotBeVariable, name.clone()),
                        decl_loc,
                    ));
                }
            }
            PortHeaderSyntax::Net(net_header) => {
                self.infos[info_idx].direction =
                    direction_of(net_header.direction, PortDirection::Input);

                let net_type = self.comp.net_type_for_keyword(net_header.net_type);
                let ty = self.net_decl_ty(net_type, Some(&net_header.data_type), &decl);
                let symbol = self.comp.emplace(
                    name.clone(),
                    decl_loc,
                    SymbolKind::Net(NetSymbol { net_type, ty }),
                );
                self.set_internal_symbol(symbol, info_idx, insertion_point);
            }
            PortHeaderSyntax::Interface(iface_header) => {
                let (definition, modport) = interface_port_info(self.comp, iface_header);
                let info = &mut self.infos[info_idx];
                info.is_iface = true;
                info.iface_def = definition;
                info.modport = modport;
            }
        }

        let info = &self.infos[info_idx];
        let is_net = self.internal_is_net(info_idx);
        if info.direction == PortDirection::Ref && is_net {
            self.comp.report(Diagnostic::error(
                DiagnosticCode::REF_PORT_MUST_BE_VARIABLE,
                Message::named(MessageId::RefPortMustBeVariable, name),
                decl_loc,
            ));
        }

        let info = &self.infos[info_idx];
        if (info.direction != PortDirection::Output || is_net)
            && let Some(init) = &info.decl.initializer
        {
            let span = init.span();
            self.comp.report(Diagnostic::error(
                DiagnosticCode::DISALLOWED_PORT_DEFAULT,
                Message::simple(MessageId::DisallowedPortDefault),
                span,
            ));
        }
    }

    fn internal_is_net(&self, info_idx: usize) -> bool {
        self.infos[info_idx]
            .internal_symbol
            .is_some_and(|s| matches!(self.comp.symbol(s).kind, SymbolKind::Net(_)))
    }

    /// Type of a net synthesized from a port declaration: the declared
    /// data type if given, else the net type's own type, with the
    /// declarator's unpacked dimensions applied.
    fn net_decl_ty(
        &self,
        net_type: NetTypeId,
        data_type: Option<&DataTypeSyntax>,
        decl: &DeclaratorSyntax,
    ) -> Ty {
        let base = resolve_port_type(self.comp, data_type, Some(net_type));
        wrap_unpacked(base, &decl.unpacked_dims)
    }

    fn set_internal_symbol(
        &mut self,
        symbol: SymbolId,
        info_idx: usize,
        insertion_point: Option<SymbolId>,
    ) {
        self.implicit_members.push(ImplicitMember {
            symbol,
            insertion_point,
        });
        self.infos[info_idx].internal_symbol = Some(symbol);
    }

    fn get_info(&mut self, name: &str) -> Option<usize> {
        let idx = *self.by_name.get(name)?;
        self.infos[idx].used = true;
        Some(idx)
    }

    fn create_port_expr(
        &mut self,
        external_name: SmolStr,
        external_loc: Span,
        expr: &PortRefExprSyntax,
    ) -> SymbolId {
        match expr {
            PortRefExprSyntax::Reference(reference) => {
                self.create_port_ref(external_name, external_loc, reference)
            }
            PortRefExprSyntax::Concatenation { refs, span } => {
                self.create_port_concat(external_name, external_loc, refs, *span)
            }
        }
    }

    fn create_port_ref(
        &mut self,
        external_name: SmolStr,
        external_loc: Span,
        reference: &PortReferenceSyntax,
    ) -> SymbolId {
        let name = &reference.name;
        let external_name = if external_name.is_empty() {
            name.clone()
        } else {
            external_name
        };

        let Some(info_idx) = self.get_info(name) else {
            // Treat all unknown ports as an interface port. If that turns
            // out not to be true later we will issue an error then.
            return self.comp.emplace(
                external_name,
                external_loc,
                SymbolKind::InterfacePort(InterfacePortSymbol {
                    interface_def: None,
                    modport: SmolStr::default(),
                    declared_range: Default::default(),
                    is_missing_io: true,
                    multi_port_loc: None,
                    attributes: Vec::new(),
                }),
            );
        };

        let info = &self.infos[info_idx];
        let loc = info.decl.name_span;

        if info.is_iface {
            let iface_def = info.iface_def;
            let modport = info.modport.clone();
            let declared_range = info.decl.unpacked_dims.iter().map(|d| (*d).into()).collect();
            let attributes = info.attrs.clone();
            return self.comp.emplace(
                external_name,
                loc,
                SymbolKind::InterfacePort(InterfacePortSymbol {
                    interface_def: iface_def,
                    modport,
                    declared_range,
                    is_missing_io: false,
                    multi_port_loc: None,
                    attributes,
                }),
            );
        }

        let internal = info
            .internal_symbol
            .expect("non-interface port info always carries an internal symbol");
        let direction = info.direction;
        let attributes = info.attrs.clone();
        let initializer_syntax = info.decl.initializer.clone();
        let ty = self
            .comp
            .symbol(internal)
            .value_ty()
            .cloned()
            .unwrap_or(Ty::Error);

        let initializer = initializer_syntax.map(|init| {
            let bound = expr::bind_expr(self.comp, self.scope, &init, true);
            convert_assignment(&ty, bound, init.span())
        });

        self.comp.emplace(
            external_name,
            loc,
            SymbolKind::Port(PortSymbol {
                direction,
                external_loc,
                internal_symbol: Some(internal),
                ty,
                initializer,
                attributes,
            }),
        )
    }

    fn create_port_concat(
        &mut self,
        name: SmolStr,
        external_loc: Span,
        refs: &[PortReferenceSyntax],
        span: Span,
    ) -> SymbolId {
        let mut direction = PortDirection::Input;
        let mut ports = Vec::with_capacity(refs.len());
        let mut all_nets = true;
        let mut all_vars = true;
        let mut had_dir_error = false;

        enum Component {
            Value {
                direction: PortDirection,
                is_net: bool,
            },
            MissingIface,
            Iface { name: SmolStr },
            Other,
        }

        for item in refs {
            let port_id = self.create_port_ref(SmolStr::default(), item.span, item);
            let component = match &self.comp.symbol(port_id).kind {
                SymbolKind::Port(port) => Component::Value {
                    direction: port.direction,
                    is_net: port.internal_symbol.is_some_and(|s| {
                        matches!(self.comp.symbol(s).kind, SymbolKind::Net(_))
                    }),
                },
                SymbolKind::InterfacePort(iface) if iface.is_missing_io => Component::MissingIface,
                SymbolKind::InterfacePort(_) => Component::Iface {
                    name: self.comp.symbol(port_id).name.clone(),
                },
                _ => Component::Other,
            };

            match component {
                Component::Value {
                    direction: port_direction,
                    is_net,
                } => {
                    ports.push(port_id);

                    // Merge the component direction into the effective
                    // direction: output dominates input, ref requires all
                    // variables, inout requires all nets. Ref and inout
                    // can never mix.
                    match port_direction {
                        PortDirection::Inout => {
                            direction = PortDirection::Inout;
                            if !all_nets {
                                self.report_concat_dir_error(
                                    &mut had_dir_error,
                                    DiagnosticCode::PORT_CONCAT_INOUT,
                                    MessageId::PortConcatInOut,
                                    span,
                                );
                            }
                        }
                        PortDirection::Ref => {
                            direction = PortDirection::Ref;
                            if !all_vars {
                                self.report_concat_dir_error(
                                    &mut had_dir_error,
                                    DiagnosticCode::PORT_CONCAT_REF,
                                    MessageId::PortConcatRef,
                                    span,
                                );
                            }
                        }
                        PortDirection::Output if direction == PortDirection::Input => {
                            direction = PortDirection::Output;
                        }
                        _ => {}
                    }

                    if is_net {
                        all_vars = false;
                        if direction == PortDirection::Ref {
                            self.report_concat_dir_error(
                                &mut had_dir_error,
                                DiagnosticCode::PORT_CONCAT_REF,
                                MessageId::PortConcatRef,
                                span,
                            );
                        }
                    } else {
                        all_nets = false;
                        if direction == PortDirection::Inout {
                            self.report_concat_dir_error(
                                &mut had_dir_error,
                                DiagnosticCode::PORT_CONCAT_INOUT,
                                MessageId::PortConcatInOut,
                                span,
                            );
                        }
                    }
                }
                Component::MissingIface => {
                    // Keep the provisional port findable via lookup so
                    // later declarations can issue a proper error.
                    if let SymbolKind::InterfacePort(p) = &mut self.comp.symbol_mut(port_id).kind {
                        p.multi_port_loc = Some(item.span);
                    }
                    self.implicit_members.push(ImplicitMember {
                        symbol: port_id,
                        insertion_point: None,
                    });
                }
                Component::Iface { name: port_name } => {
                    self.comp.report(Diagnostic::error(
                        DiagnosticCode::IFACE_PORT_IN_CONCAT,
                        Message::named(MessageId::IfacePortInConcat, port_name),
                        item.span,
                    ));
                }
                Component::Other => {}
            }
        }

        let ty = self.concat_ty(&ports);
        self.comp.emplace(
            name,
            external_loc,
            SymbolKind::MultiPort(MultiPortSymbol {
                direction,
                ports,
                ty,
            }),
        )
    }

    fn report_concat_dir_error(
        &mut self,
        had_error: &mut bool,
        code: DiagnosticCode,
        message: MessageId,
        span: Span,
    ) {
        if !*had_error {
            self.comp
                .report(Diagnostic::error(code, Message::simple(message), span));
            *had_error = true;
        }
    }

    /// Packed concatenation of the component port types. All components
    /// must be integral; errors propagate without further diagnostics.
    fn concat_ty(&mut self, ports: &[SymbolId]) -> Ty {
        let mut total_width = 0u32;
        let mut four_state = false;

        for &port_id in ports {
            let (ty, external_loc) = match &self.comp.symbol(port_id).kind {
                SymbolKind::Port(p) => (p.ty.clone(), p.external_loc),
                _ => return Ty::Error,
            };

            if ty.is_error() {
                return Ty::Error;
            }
            if !ty.is_integral() {
                self.comp.report(Diagnostic::error(
                    DiagnosticCode::BAD_CONCAT_EXPRESSION,
                    Message::named(MessageId::BadConcatExpression, ty.pretty()),
                    external_loc,
                ));
                return Ty::Error;
            }

            total_width += ty.bit_width().unwrap_or(0);
            four_state |= ty.is_four_state();
        }

        if total_width == 0 {
            return Ty::Error;
        }
        Ty::concat(total_width, four_state)
    }

    fn create_empty_port(&mut self, name: SmolStr, loc: Span) -> SymbolId {
        self.comp.emplace(
            name,
            loc,
            SymbolKind::Port(PortSymbol {
                direction: PortDirection::Input,
                external_loc: loc,
                internal_symbol: None,
                ty: Ty::Void,
                initializer: None,
                attributes: Vec::new(),
            }),
        )
    }
}

/// Merge signing and dimensions from an implicit port header into an
/// existing symbol's declared type.
fn merge_implicit_port_type(
    comp: &mut Compilation,
    symbol: SymbolId,
    signing: Option<Signing>,
    packed_dims: &[vega_syntax::RangeSyntax],
    decl: &DeclaratorSyntax,
) {
    if signing.is_none() && packed_dims.is_empty() && decl.unpacked_dims.is_empty() {
        return;
    }

    let Some(existing) = comp.symbol(symbol).value_ty().cloned() else {
        return;
    };

    let base = match &existing {
        Ty::Integral(i) if packed_dims.is_empty() => *i,
        // Re-dimensioning starts from a scalar of the same state-ness.
        Ty::Integral(i) => IntegralTy {
            width: 1,
            four_state: i.four_state,
            signed: i.signed,
        },
        _ => return,
    };

    let merged = wrap_unpacked(
        Ty::Integral(apply_packed(base, signing, packed_dims)),
        &decl.unpacked_dims,
    );

    match &mut comp.symbol_mut(symbol).kind {
        SymbolKind::Variable(v) => v.ty = merged,
        SymbolKind::Net(n) => n.ty = merged,
        _ => {}
    }
}
