use vega_source::Span;
use vega_syntax::{ExprSyntax, PortDirection};

use crate::Compilation;
use crate::scope::ScopeId;
use crate::symbols::SymbolId;
use crate::types::{IntegralTy, Ty};

/// A bound expression: shape, type, and source position.
///
/// This is the argument-binding slice of the front-end's expression
/// binder -- just enough to type and record port connection actuals.
#[derive(Debug, Clone, PartialEq)]
pub struct Expression {
    pub kind: ExprKind,
    pub ty: Ty,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    /// A reference to a value symbol.
    Named(SymbolId),
    Literal { value: u64 },
    Concat(Vec<Expression>),
    /// An implicit conversion to the target type.
    Conversion(Box<Expression>),
    Error,
}

impl Expression {
    pub fn error(span: Span) -> Self {
        Self {
            kind: ExprKind::Error,
            ty: Ty::Error,
            span,
        }
    }

    pub fn bad(&self) -> bool {
        matches!(self.kind, ExprKind::Error)
    }

    /// Build a reference expression from a value symbol. Non-value
    /// symbols yield an error expression.
    pub fn from_symbol(comp: &Compilation, symbol: SymbolId, span: Span) -> Self {
        match comp.symbol(symbol).value_ty() {
            Some(ty) => Self {
                kind: ExprKind::Named(symbol),
                ty: ty.clone(),
                span,
            },
            None => Self::error(span),
        }
    }
}

/// Bind a connection actual against a port's type and direction.
///
/// Input and output connections are converted to the port type; inout
/// and ref connections bind the actual directly, since their matching is
/// enforced by the net/variable rules rather than by conversion.
pub fn bind_argument(
    comp: &mut Compilation,
    scope: ScopeId,
    target: &Ty,
    direction: PortDirection,
    syntax: &ExprSyntax,
) -> Expression {
    let expr = bind_expr(comp, scope, syntax, true);
    if expr.bad() || target.is_error() {
        return expr;
    }
    match direction {
        PortDirection::Input | PortDirection::Output => {
            convert_assignment(target, expr, syntax.span())
        }
        PortDirection::Inout | PortDirection::Ref => expr,
    }
}

/// Convert `expr` to `target` for assignment, inserting a conversion
/// node when the types are not equivalent. Assignment compatibility
/// between integral types always holds; width adjustment is the
/// conversion's job downstream.
pub fn convert_assignment(target: &Ty, expr: Expression, loc: Span) -> Expression {
    if expr.bad() || target.is_error() || expr.ty.is_equivalent(target) {
        return expr;
    }
    Expression {
        kind: ExprKind::Conversion(Box::new(expr)),
        ty: target.clone(),
        span: loc,
    }
}

/// Bind an expression bottom-up.
///
/// Unknown names become freshly declared implicit nets when the scope
/// allows them; implicit named port connections pass
/// `allow_implicit_nets = false` and diagnose the miss themselves.
pub(crate) fn bind_expr(
    comp: &mut Compilation,
    scope: ScopeId,
    syntax: &ExprSyntax,
    allow_implicit_nets: bool,
) -> Expression {
    match syntax {
        ExprSyntax::Name(name) => {
            let symbol = match comp.find(scope, &name.ident) {
                Some(s) => s,
                None => {
                    if !allow_implicit_nets {
                        return Expression::error(name.span);
                    }
                    let net_type = comp.default_net_type(scope);
                    if net_type.is_error() {
                        return Expression::error(name.span);
                    }
                    comp.declare_net(scope, name.ident.clone(), net_type, name.span)
                }
            };
            let mut expr = Expression::from_symbol(comp, symbol, name.span);
            for _sel in &name.selectors {
                expr.ty = select_ty(&expr.ty);
            }
            expr
        }
        ExprSyntax::Literal { value, width, span } => Expression {
            kind: ExprKind::Literal { value: *value },
            ty: Ty::Integral(IntegralTy {
                width: *width,
                four_state: false,
                signed: false,
            }),
            span: *span,
        },
        ExprSyntax::Concat { elems, span } => {
            let bound: Vec<Expression> = elems
                .iter()
                .map(|e| bind_expr(comp, scope, e, allow_implicit_nets))
                .collect();
            let mut width = 0u32;
            let mut four_state = false;
            for e in &bound {
                match e.ty.bit_width() {
                    Some(w) => width += w,
                    None => return Expression::error(*span),
                }
                four_state |= e.ty.is_four_state();
            }
            Expression {
                kind: ExprKind::Concat(bound),
                ty: Ty::concat(width, four_state),
                span: *span,
            }
        }
        ExprSyntax::Paren { inner, .. } => bind_expr(comp, scope, inner, allow_implicit_nets),
    }
}

/// Type of a single element select applied to `ty`.
fn select_ty(ty: &Ty) -> Ty {
    match ty {
        Ty::Array { elem, dims } => {
            if dims.len() > 1 {
                Ty::Array {
                    elem: elem.clone(),
                    dims: dims[1..].iter().copied().collect(),
                }
            } else {
                (**elem).clone()
            }
        }
        Ty::Integral(i) if i.width > 1 => Ty::Integral(IntegralTy {
            width: 1,
            four_state: i.four_state,
            signed: false,
        }),
        _ => Ty::Error,
    }
}
