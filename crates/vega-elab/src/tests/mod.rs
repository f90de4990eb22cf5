mod connect;

use smol_str::SmolStr;
use vega_diag::{Diagnostic, DiagnosticCode};
use vega_source::{FileId, Span};
use vega_syntax::{
    AnsiPortSyntax, ConnectionSyntax, DataTypeSyntax, DeclaratorSyntax, DirectionSyntax,
    ExplicitAnsiPortSyntax, ExprSyntax, ImplicitAnsiPortSyntax, IntegralKeyword,
    InterfacePortHeaderSyntax, ModportNameSyntax, NamedConnectionSyntax, NetPortHeaderSyntax,
    NetTypeKeyword, NonAnsiPortSyntax, OrderedConnectionSyntax, PortDeclarationSyntax,
    PortDirection, PortHeaderSyntax, PortListSyntax, PortRefExprSyntax, PortReferenceSyntax,
    RangeSyntax, VariablePortHeaderSyntax, WildcardConnectionSyntax,
};

use crate::Compilation;
use crate::definition::{DefinitionId, DefinitionKind};
use crate::ports::{PortListResult, build_port_list};
use crate::scope::{ScopeId, ScopeKind};
use crate::symbols::{
    InterfacePortSymbol, MultiPortSymbol, PortSymbol, SymbolId, SymbolKind,
};

pub(crate) fn sp(offset: u32) -> Span {
    Span::at(FileId(0), offset, 1)
}

// --- syntax builders ---

pub(crate) fn decl(name: &str) -> DeclaratorSyntax {
    DeclaratorSyntax::new(name, sp(0))
}

pub(crate) fn decl_at(name: &str, offset: u32) -> DeclaratorSyntax {
    DeclaratorSyntax::new(name, sp(offset))
}

pub(crate) fn dir(direction: PortDirection) -> Option<DirectionSyntax> {
    Some(DirectionSyntax {
        direction,
        span: sp(0),
    })
}

pub(crate) fn implicit_ty() -> DataTypeSyntax {
    DataTypeSyntax::empty()
}

pub(crate) fn logic_ty() -> DataTypeSyntax {
    DataTypeSyntax::Integral {
        keyword: IntegralKeyword::Logic,
        signing: None,
        packed_dims: Vec::new(),
        span: sp(0),
    }
}

pub(crate) fn logic_vec(msb: i32, lsb: i32) -> DataTypeSyntax {
    DataTypeSyntax::Integral {
        keyword: IntegralKeyword::Logic,
        signing: None,
        packed_dims: vec![RangeSyntax {
            msb,
            lsb,
            span: sp(0),
        }],
        span: sp(0),
    }
}

pub(crate) fn int_ty() -> DataTypeSyntax {
    DataTypeSyntax::Integral {
        keyword: IntegralKeyword::Int,
        signing: None,
        packed_dims: Vec::new(),
        span: sp(0),
    }
}

pub(crate) fn named_ty(name: &str) -> DataTypeSyntax {
    DataTypeSyntax::Named {
        name: SmolStr::new(name),
        span: sp(0),
    }
}

pub(crate) fn var_header(
    direction: Option<DirectionSyntax>,
    data_type: DataTypeSyntax,
) -> PortHeaderSyntax {
    PortHeaderSyntax::Variable(VariablePortHeaderSyntax {
        const_keyword: None,
        direction,
        var_keyword: None,
        data_type,
    })
}

pub(crate) fn var_kw_header(
    direction: Option<DirectionSyntax>,
    data_type: DataTypeSyntax,
) -> PortHeaderSyntax {
    PortHeaderSyntax::Variable(VariablePortHeaderSyntax {
        const_keyword: None,
        direction,
        var_keyword: Some(sp(0)),
        data_type,
    })
}

pub(crate) fn net_header(
    direction: Option<DirectionSyntax>,
    net_type: NetTypeKeyword,
    data_type: DataTypeSyntax,
) -> PortHeaderSyntax {
    PortHeaderSyntax::Net(NetPortHeaderSyntax {
        direction,
        net_type,
        data_type,
    })
}

pub(crate) fn iface_header(name: &str, modport: Option<&str>) -> PortHeaderSyntax {
    PortHeaderSyntax::Interface(InterfacePortHeaderSyntax {
        name: SmolStr::new(name),
        name_span: sp(0),
        modport: modport.map(|m| ModportNameSyntax {
            name: SmolStr::new(m),
            span: sp(0),
        }),
    })
}

pub(crate) fn implicit_port(header: PortHeaderSyntax, declarator: DeclaratorSyntax) -> AnsiPortSyntax {
    AnsiPortSyntax::Implicit(ImplicitAnsiPortSyntax {
        attrs: Vec::new(),
        header,
        declarator,
    })
}

pub(crate) fn explicit_port(
    direction: Option<DirectionSyntax>,
    name: &str,
    expr: Option<ExprSyntax>,
) -> AnsiPortSyntax {
    AnsiPortSyntax::Explicit(ExplicitAnsiPortSyntax {
        attrs: Vec::new(),
        direction,
        name: SmolStr::new(name),
        name_span: sp(0),
        expr,
    })
}

pub(crate) fn port_ref(name: &str) -> NonAnsiPortSyntax {
    NonAnsiPortSyntax::Implicit {
        expr: PortRefExprSyntax::Reference(PortReferenceSyntax {
            name: SmolStr::new(name),
            span: sp(0),
        }),
    }
}

pub(crate) fn port_concat(names: &[&str]) -> NonAnsiPortSyntax {
    NonAnsiPortSyntax::Implicit {
        expr: PortRefExprSyntax::Concatenation {
            refs: names
                .iter()
                .map(|n| PortReferenceSyntax {
                    name: SmolStr::new(*n),
                    span: sp(0),
                })
                .collect(),
            span: sp(0),
        },
    }
}

pub(crate) fn port_decl(header: PortHeaderSyntax, names: &[&str]) -> PortDeclarationSyntax {
    PortDeclarationSyntax {
        attrs: Vec::new(),
        header,
        declarators: names
            .iter()
            .enumerate()
            .map(|(i, n)| decl_at(n, 100 + i as u32))
            .collect(),
        span: sp(100),
    }
}

// --- connection builders ---

pub(crate) fn name_of(name: &str) -> ExprSyntax {
    ExprSyntax::name(name, sp(0))
}

pub(crate) fn lit(width: u32) -> ExprSyntax {
    ExprSyntax::Literal {
        value: 0,
        width,
        span: sp(0),
    }
}

pub(crate) fn ordered(expr: ExprSyntax) -> ConnectionSyntax {
    ConnectionSyntax::Ordered(OrderedConnectionSyntax {
        attrs: Vec::new(),
        expr: Some(expr),
        span: sp(0),
    })
}

pub(crate) fn ordered_empty() -> ConnectionSyntax {
    ConnectionSyntax::Ordered(OrderedConnectionSyntax {
        attrs: Vec::new(),
        expr: None,
        span: sp(0),
    })
}

pub(crate) fn named(port: &str, expr: ExprSyntax) -> ConnectionSyntax {
    ConnectionSyntax::Named(NamedConnectionSyntax {
        attrs: Vec::new(),
        name: SmolStr::new(port),
        name_span: sp(0),
        open_paren: true,
        expr: Some(expr),
        span: sp(0),
    })
}

pub(crate) fn named_empty(port: &str) -> ConnectionSyntax {
    ConnectionSyntax::Named(NamedConnectionSyntax {
        attrs: Vec::new(),
        name: SmolStr::new(port),
        name_span: sp(0),
        open_paren: true,
        expr: None,
        span: sp(0),
    })
}

pub(crate) fn named_implicit(port: &str) -> ConnectionSyntax {
    ConnectionSyntax::Named(NamedConnectionSyntax {
        attrs: Vec::new(),
        name: SmolStr::new(port),
        name_span: sp(0),
        open_paren: false,
        expr: None,
        span: sp(0),
    })
}

pub(crate) fn wildcard() -> ConnectionSyntax {
    ConnectionSyntax::Wildcard(WildcardConnectionSyntax {
        attrs: Vec::new(),
        span: sp(0),
    })
}

// --- elaboration helpers ---

/// Create a module definition with an ANSI port list and install it.
pub(crate) fn module_with_ports(
    comp: &mut Compilation,
    name: &str,
    ports: Vec<AnsiPortSyntax>,
) -> (DefinitionId, ScopeId, PortListResult) {
    let def = comp.create_definition(DefinitionKind::Module, name, sp(0));
    let body = comp.create_scope(ScopeKind::Module, Some(comp.root()));
    let result = build_port_list(comp, body, &PortListSyntax::Ansi(ports), &[]);
    comp.install_port_list(body, def, &result);
    (def, body, result)
}

/// Build a non-ANSI module into an already prepared body scope.
pub(crate) fn nonansi_module(
    comp: &mut Compilation,
    name: &str,
    body: ScopeId,
    ports: Vec<NonAnsiPortSyntax>,
    decls: &[(PortDeclarationSyntax, Option<SymbolId>)],
) -> (DefinitionId, PortListResult) {
    let def = comp.create_definition(DefinitionKind::Module, name, sp(0));
    let result = build_port_list(comp, body, &PortListSyntax::NonAnsi(ports), decls);
    comp.install_port_list(body, def, &result);
    (def, result)
}

pub(crate) fn module_body(comp: &mut Compilation) -> ScopeId {
    let root = comp.root();
    comp.create_scope(ScopeKind::Module, Some(root))
}

// --- inspection helpers ---

pub(crate) fn diags_with(comp: &Compilation, code: DiagnosticCode) -> Vec<&Diagnostic> {
    comp.diagnostics().iter().filter(|d| d.code == code).collect()
}

pub(crate) fn diag_count(comp: &Compilation, code: DiagnosticCode) -> usize {
    diags_with(comp, code).len()
}

#[track_caller]
pub(crate) fn assert_no_diags(comp: &Compilation) {
    assert!(
        comp.diagnostics().is_empty(),
        "expected no diagnostics, got: {:?}",
        comp.diagnostics()
    );
}

#[track_caller]
pub(crate) fn port_sym<'c>(comp: &'c Compilation, id: SymbolId) -> &'c PortSymbol {
    match &comp.symbol(id).kind {
        SymbolKind::Port(p) => p,
        other => panic!("expected a port symbol, got {other:?}"),
    }
}

#[track_caller]
pub(crate) fn iface_sym<'c>(comp: &'c Compilation, id: SymbolId) -> &'c InterfacePortSymbol {
    match &comp.symbol(id).kind {
        SymbolKind::InterfacePort(p) => p,
        other => panic!("expected an interface port symbol, got {other:?}"),
    }
}

#[track_caller]
pub(crate) fn multi_sym<'c>(comp: &'c Compilation, id: SymbolId) -> &'c MultiPortSymbol {
    match &comp.symbol(id).kind {
        SymbolKind::MultiPort(p) => p,
        other => panic!("expected a multi-port symbol, got {other:?}"),
    }
}

pub(crate) fn is_net(comp: &Compilation, id: SymbolId) -> bool {
    matches!(comp.symbol(id).kind, SymbolKind::Net(_))
}

pub(crate) fn is_variable(comp: &Compilation, id: SymbolId) -> bool {
    matches!(comp.symbol(id).kind, SymbolKind::Variable(_))
}
