use smol_str::SmolStr;
use vega_source::Span;

/// A constant element select trailing a name, e.g. the `[2]` in `bus[2]`.
/// Indices arrive already evaluated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementSelectSyntax {
    pub index: i32,
    pub span: Span,
}

/// An identifier with optional trailing element selects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameSyntax {
    pub ident: SmolStr,
    pub span: Span,
    pub selectors: Vec<ElementSelectSyntax>,
}

impl NameSyntax {
    pub fn new(ident: impl Into<SmolStr>, span: Span) -> Self {
        Self {
            ident: ident.into(),
            span,
            selectors: Vec::new(),
        }
    }

    pub fn with_selectors(mut self, selectors: Vec<ElementSelectSyntax>) -> Self {
        self.selectors = selectors;
        self
    }
}

/// Expression forms that can appear as a port connection actual.
///
/// The general expression grammar lives with the external binder; this
/// covers the shapes the port core inspects structurally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExprSyntax {
    Name(NameSyntax),
    Literal { value: u64, width: u32, span: Span },
    Concat { elems: Vec<ExprSyntax>, span: Span },
    Paren { inner: Box<ExprSyntax>, span: Span },
}

impl ExprSyntax {
    pub fn name(ident: impl Into<SmolStr>, span: Span) -> Self {
        ExprSyntax::Name(NameSyntax::new(ident, span))
    }

    pub fn span(&self) -> Span {
        match self {
            ExprSyntax::Name(n) => n.span,
            ExprSyntax::Literal { span, .. }
            | ExprSyntax::Concat { span, .. }
            | ExprSyntax::Paren { span, .. } => *span,
        }
    }

    /// Strip any number of surrounding parentheses.
    pub fn unwrap_parens(&self) -> &ExprSyntax {
        let mut expr = self;
        while let ExprSyntax::Paren { inner, .. } = expr {
            expr = inner;
        }
        expr
    }

    /// The name form of this expression, parens stripped, if it is one.
    pub fn as_name(&self) -> Option<&NameSyntax> {
        match self.unwrap_parens() {
            ExprSyntax::Name(n) => Some(n),
            _ => None,
        }
    }
}
