use smol_str::SmolStr;
use vega_source::Span;

use crate::AttributeSyntax;
use crate::expr::ExprSyntax;

/// A positional connection: an expression, or nothing between commas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedConnectionSyntax {
    pub attrs: Vec<AttributeSyntax>,
    /// `None` for an empty slot `( , )`.
    pub expr: Option<ExprSyntax>,
    pub span: Span,
}

/// A named connection: `.name(expr)`, `.name()`, or implicit `.name`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedConnectionSyntax {
    pub attrs: Vec<AttributeSyntax>,
    pub name: SmolStr,
    pub name_span: Span,
    /// Whether parentheses were written. `.name` has none; `.name()` has
    /// them with no expression.
    pub open_paren: bool,
    pub expr: Option<ExprSyntax>,
    pub span: Span,
}

/// The `.*` wildcard connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WildcardConnectionSyntax {
    pub attrs: Vec<AttributeSyntax>,
    pub span: Span,
}

/// One element of an instantiation's connection list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionSyntax {
    Ordered(OrderedConnectionSyntax),
    Named(NamedConnectionSyntax),
    Wildcard(WildcardConnectionSyntax),
}

impl ConnectionSyntax {
    pub fn span(&self) -> Span {
        match self {
            ConnectionSyntax::Ordered(c) => c.span,
            ConnectionSyntax::Named(c) => c.span,
            ConnectionSyntax::Wildcard(c) => c.span,
        }
    }

    /// Whether this connection participates in ordered (positional) style.
    pub fn is_ordered(&self) -> bool {
        matches!(self, ConnectionSyntax::Ordered(_))
    }
}
