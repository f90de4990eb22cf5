use smol_str::SmolStr;
use vega_source::Span;

use crate::{AttributeSyntax, RangeSyntax, Signing};
use crate::expr::ExprSyntax;

/// Which way data flows through a port.
///
/// Arrives already decided by the parser; elaboration only inherits a
/// missing one from the previous port and validates net/variable rules
/// against it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PortDirection {
    Input,
    Output,
    Inout,
    Ref,
}

/// A direction keyword with its source span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirectionSyntax {
    pub direction: PortDirection,
    pub span: Span,
}

/// Integral type keywords that can head a port declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntegralKeyword {
    Logic,
    Bit,
    Reg,
    Int,
    Integer,
    Byte,
    ShortInt,
    LongInt,
}

/// Built-in net type keywords.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NetTypeKeyword {
    Wire,
    Tri,
    Wand,
    Wor,
    TriAnd,
    TriOr,
    Tri0,
    Tri1,
    Supply0,
    Supply1,
    UWire,
}

/// The data type portion of a port header or declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataTypeSyntax {
    /// No type keyword: optional signing and packed dimensions only.
    Implicit {
        signing: Option<Signing>,
        packed_dims: Vec<RangeSyntax>,
    },
    /// An integral keyword type, e.g. `logic [7:0]` or `int`.
    Integral {
        keyword: IntegralKeyword,
        signing: Option<Signing>,
        packed_dims: Vec<RangeSyntax>,
        span: Span,
    },
    /// A bare identifier; may name a net type, a typedef, or an interface.
    Named { name: SmolStr, span: Span },
}

impl DataTypeSyntax {
    /// An implicit type with nothing specified at all.
    pub fn empty() -> Self {
        DataTypeSyntax::Implicit {
            signing: None,
            packed_dims: Vec::new(),
        }
    }

    pub fn is_implicit(&self) -> bool {
        matches!(self, DataTypeSyntax::Implicit { .. })
    }

    /// True when the type is implicit with no signing and no dimensions.
    pub fn is_empty_implicit(&self) -> bool {
        matches!(
            self,
            DataTypeSyntax::Implicit {
                signing: None,
                packed_dims,
            } if packed_dims.is_empty()
        )
    }

    /// The bare identifier if this is a simple named type.
    pub fn simple_name(&self) -> Option<&str> {
        match self {
            DataTypeSyntax::Named { name, .. } => Some(name.as_str()),
            _ => None,
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            DataTypeSyntax::Implicit { .. } => None,
            DataTypeSyntax::Integral { span, .. } | DataTypeSyntax::Named { span, .. } => {
                Some(*span)
            }
        }
    }
}

/// A declarator: name, unpacked dimensions, optional initializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaratorSyntax {
    pub name: SmolStr,
    pub name_span: Span,
    pub unpacked_dims: Vec<RangeSyntax>,
    pub initializer: Option<ExprSyntax>,
}

impl DeclaratorSyntax {
    pub fn new(name: impl Into<SmolStr>, name_span: Span) -> Self {
        Self {
            name: name.into(),
            name_span,
            unpacked_dims: Vec::new(),
            initializer: None,
        }
    }
}

/// Header of a variable port (also the parser's catch-all when the port
/// kind is not yet known).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariablePortHeaderSyntax {
    pub const_keyword: Option<Span>,
    pub direction: Option<DirectionSyntax>,
    pub var_keyword: Option<Span>,
    pub data_type: DataTypeSyntax,
}

/// Header of a net port, e.g. `input wire [3:0]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetPortHeaderSyntax {
    pub direction: Option<DirectionSyntax>,
    pub net_type: NetTypeKeyword,
    pub data_type: DataTypeSyntax,
}

/// `iface.modport` selection in an interface port header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModportNameSyntax {
    pub name: SmolStr,
    pub span: Span,
}

/// Header of an interface port, e.g. `my_bus.consumer`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfacePortHeaderSyntax {
    pub name: SmolStr,
    pub name_span: Span,
    pub modport: Option<ModportNameSyntax>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortHeaderSyntax {
    Variable(VariablePortHeaderSyntax),
    Net(NetPortHeaderSyntax),
    Interface(InterfacePortHeaderSyntax),
}

/// An ANSI port carrying its own header: `input logic [7:0] a`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplicitAnsiPortSyntax {
    pub attrs: Vec<AttributeSyntax>,
    pub header: PortHeaderSyntax,
    pub declarator: DeclaratorSyntax,
}

/// An explicit ANSI port: `output .result(sum)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplicitAnsiPortSyntax {
    pub attrs: Vec<AttributeSyntax>,
    pub direction: Option<DirectionSyntax>,
    pub name: SmolStr,
    pub name_span: Span,
    pub expr: Option<ExprSyntax>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnsiPortSyntax {
    Implicit(ImplicitAnsiPortSyntax),
    Explicit(ExplicitAnsiPortSyntax),
}

/// A reference to a declared port inside a non-ANSI port list entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortReferenceSyntax {
    pub name: SmolStr,
    pub span: Span,
}

/// The expression of a non-ANSI port list entry: a bare reference or a
/// concatenation `{a, b}` of references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortRefExprSyntax {
    Reference(PortReferenceSyntax),
    Concatenation {
        refs: Vec<PortReferenceSyntax>,
        span: Span,
    },
}

impl PortRefExprSyntax {
    pub fn span(&self) -> Span {
        match self {
            PortRefExprSyntax::Reference(r) => r.span,
            PortRefExprSyntax::Concatenation { span, .. } => *span,
        }
    }
}

/// One entry of a non-ANSI port list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NonAnsiPortSyntax {
    /// `a` or `{a, b}`.
    Implicit { expr: PortRefExprSyntax },
    /// `.x(a)` or `.x()`.
    Explicit {
        name: SmolStr,
        name_span: Span,
        expr: Option<PortRefExprSyntax>,
    },
    /// Nothing between two commas.
    Empty { span: Span },
}

/// The port list of a module heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PortListSyntax {
    Ansi(Vec<AnsiPortSyntax>),
    NonAnsi(Vec<NonAnsiPortSyntax>),
    /// `(.*)` as the entire port list.
    Wildcard(Span),
}

/// A separate `input`/`output`/`inout` port declaration statement in a
/// non-ANSI module body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PortDeclarationSyntax {
    pub attrs: Vec<AttributeSyntax>,
    pub header: PortHeaderSyntax,
    pub declarators: Vec<DeclaratorSyntax>,
    pub span: Span,
}
