use smol_str::SmolStr;
use vega_diag::{Arg, Diagnostic, DiagnosticCode, Label, Message, MessageId};
use vega_source::Span;
use vega_syntax::{
    DataTypeSyntax, DirectionSyntax, InterfacePortHeaderSyntax, PortDeclarationSyntax,
    PortDirection, PortListSyntax,
};

use crate::Compilation;
use crate::ansi::AnsiPortListBuilder;
use crate::definition::{DefinitionId, DefinitionKind};
use crate::nonansi::NonAnsiPortListBuilder;
use crate::scope::ScopeId;
use crate::symbols::{NetTypeId, SymbolId};
use crate::types::{self, Ty};

/// An internal value symbol synthesized from a port header, together
/// with the body member it should be inserted after.
#[derive(Debug, Clone, Copy)]
pub struct ImplicitMember {
    pub symbol: SymbolId,
    pub insertion_point: Option<SymbolId>,
}

/// Output of building one module's port list.
#[derive(Debug, Default)]
pub struct PortListResult {
    /// Port symbols in source order.
    pub ports: Vec<SymbolId>,
    pub implicit_members: Vec<ImplicitMember>,
}

/// Direction encoded by `token`, or `inherited` when absent.
pub(crate) fn direction_of(
    token: Option<DirectionSyntax>,
    inherited: PortDirection,
) -> PortDirection {
    token.map_or(inherited, |t| t.direction)
}

/// The scope's default net type, with fallback to `wire` when the
/// default is the `` `default_nettype none `` sentinel.
pub(crate) fn default_net_type(comp: &mut Compilation, scope: ScopeId, loc: Span) -> NetTypeId {
    let net_type = comp.default_net_type(scope);
    if !net_type.is_error() {
        return net_type;
    }

    comp.report(Diagnostic::error(
        DiagnosticCode::IMPLICIT_NET_PORT_NO_DEFAULT,
        Message::simple(MessageId::ImplicitNetPortNoDefault),
        loc,
    ));
    NetTypeId::WIRE
}

/// Resolve the interface definition and modport named by an interface
/// port header. Unknown or non-interface names yield `None`; an unknown
/// modport is blanked after diagnosing.
pub(crate) fn interface_port_info(
    comp: &mut Compilation,
    header: &InterfacePortHeaderSyntax,
) -> (Option<DefinitionId>, SmolStr) {
    let Some(def_id) = comp.get_definition(&header.name) else {
        comp.report(Diagnostic::error(
            DiagnosticCode::UNKNOWN_INTERFACE,
            Message::named(MessageId::UnknownInterface, header.name.clone()),
            header.name_span,
        ));
        return (None, SmolStr::default());
    };

    let def = comp.definition(def_id);
    if def.kind != DefinitionKind::Interface {
        let diag = Diagnostic::error(
            DiagnosticCode::PORT_TYPE_NOT_INTERFACE_OR_DATA,
            Message::named(MessageId::PortTypeNotInterfaceOrData, def.name.clone()),
            header.name_span,
        )
        .with_label(Label::secondary(
            def.loc,
            Message::simple(MessageId::DeclaredHere),
        ));
        comp.report(diag);
        return (None, SmolStr::default());
    }

    let mut modport = SmolStr::default();
    if let Some(mp) = &header.modport {
        modport = mp.name.clone();
        if !modport.is_empty() && !def.modports.contains_key(&modport) {
            let iface_name = def.name.clone();
            comp.report(Diagnostic::error(
                DiagnosticCode::NOT_A_MODPORT,
                Message::new(
                    MessageId::NotAModport,
                    vec![Arg::Name(modport.clone()), Arg::Name(iface_name)],
                ),
                mp.span,
            ));
            modport = SmolStr::default();
        }
    }

    (Some(def_id), modport)
}

/// Resolve the value type of a port or internal symbol from its data
/// type syntax. `net` supplies the base type for implicit net ports.
/// Named types that survived classification without matching a net type
/// or interface resolve to the error type; diagnosing them belongs to
/// general type resolution.
pub(crate) fn resolve_port_type(
    comp: &Compilation,
    data_type: Option<&DataTypeSyntax>,
    net: Option<NetTypeId>,
) -> Ty {
    let base_of_net = |net: Option<NetTypeId>| match net {
        Some(id) => match &comp.net_type_info(id).ty {
            Ty::Integral(i) => *i,
            _ => types::IntegralTy::LOGIC,
        },
        None => types::IntegralTy::LOGIC,
    };

    match data_type {
        None | Some(DataTypeSyntax::Implicit { .. }) => {
            let (signing, packed_dims) = match data_type {
                Some(DataTypeSyntax::Implicit {
                    signing,
                    packed_dims,
                }) => (*signing, packed_dims.as_slice()),
                _ => (None, &[][..]),
            };
            Ty::Integral(types::apply_packed(base_of_net(net), signing, packed_dims))
        }
        Some(DataTypeSyntax::Integral {
            keyword,
            signing,
            packed_dims,
            ..
        }) => Ty::Integral(types::apply_packed(
            types::integral_keyword_info(*keyword),
            *signing,
            packed_dims,
        )),
        Some(DataTypeSyntax::Named { .. }) => Ty::Error,
    }
}

/// Build the port list of one module body.
///
/// `port_declarations` holds the body's separate port declaration
/// statements paired with the member they appear after; only non-ANSI
/// lists consume them.
pub fn build_port_list(
    comp: &mut Compilation,
    scope: ScopeId,
    syntax: &PortListSyntax,
    port_declarations: &[(PortDeclarationSyntax, Option<SymbolId>)],
) -> PortListResult {
    match syntax {
        PortListSyntax::Ansi(ports) => {
            let mut builder = AnsiPortListBuilder::new(comp, scope);
            let port_syms: Vec<SymbolId> = ports.iter().map(|p| builder.create_port(p)).collect();
            let implicit_members = builder.finish();

            if let Some((decl, _)) = port_declarations.first() {
                comp.report(Diagnostic::error(
                    DiagnosticCode::PORT_DECL_IN_ANSI_MODULE,
                    Message::simple(MessageId::PortDeclInAnsiModule),
                    decl.span,
                ));
            }

            PortListResult {
                ports: port_syms,
                implicit_members,
            }
        }
        PortListSyntax::NonAnsi(ports) => {
            let mut builder = NonAnsiPortListBuilder::new(comp, scope, port_declarations);
            let port_syms: Vec<SymbolId> = ports.iter().map(|p| builder.create_port(p)).collect();
            builder.finalize();
            let implicit_members = builder.finish();

            PortListResult {
                ports: port_syms,
                implicit_members,
            }
        }
        PortListSyntax::Wildcard(span) => {
            comp.report(Diagnostic::error(
                DiagnosticCode::NOT_YET_SUPPORTED,
                Message::simple(MessageId::NotYetSupported),
                *span,
            ));
            PortListResult::default()
        }
    }
}
