//! Parsed-input data model for port elaboration.
//!
//! The lexer and parser are external to this workspace; the types here are
//! the shapes they hand to elaboration. Everything is owned plain data --
//! ranges and selector indices arrive already evaluated to constants.

mod connect;
mod expr;
mod ports;

pub use connect::{
    ConnectionSyntax, NamedConnectionSyntax, OrderedConnectionSyntax, WildcardConnectionSyntax,
};
pub use expr::{ElementSelectSyntax, ExprSyntax, NameSyntax};
pub use ports::{
    AnsiPortSyntax, DataTypeSyntax, DeclaratorSyntax, DirectionSyntax, ExplicitAnsiPortSyntax,
    ImplicitAnsiPortSyntax, IntegralKeyword, InterfacePortHeaderSyntax, ModportNameSyntax,
    NetPortHeaderSyntax, NetTypeKeyword, NonAnsiPortSyntax, PortDeclarationSyntax,
    PortDirection, PortHeaderSyntax, PortListSyntax, PortRefExprSyntax, PortReferenceSyntax,
    VariablePortHeaderSyntax,
};

use smol_str::SmolStr;
use vega_source::Span;

/// A user attribute instance, `(* name *)`, attached to a declaration or
/// connection. Attribute values are opaque to port elaboration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeSyntax {
    pub name: SmolStr,
    pub span: Span,
}

/// A constant range `[msb:lsb]`. Bounds are evaluated by the parser's
/// constant folder before elaboration sees them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeSyntax {
    pub msb: i32,
    pub lsb: i32,
    pub span: Span,
}

/// Signing keyword on an implicit or integral type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Signing {
    Signed,
    Unsigned,
}
