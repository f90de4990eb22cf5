use smallvec::SmallVec;
use smol_str::SmolStr;
use vega_source::Span;
use vega_syntax::{AttributeSyntax, PortDirection};

use crate::definition::DefinitionId;
use crate::expr::Expression;
use crate::scope::ScopeId;
use crate::types::{ConstantRange, Ty};

/// Index into the compilation's symbol arena.
///
/// All inter-symbol references are ids into the arena; nothing owns
/// another symbol, so the port/body/internal-symbol reachability cycle
/// never becomes an ownership cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(pub u32);

/// A symbol in the compilation arena.
#[derive(Debug, Clone, PartialEq)]
pub struct Symbol {
    pub name: SmolStr,
    pub loc: Span,
    /// Declaration order within the owning scope. Drives
    /// declared-before queries and the non-ANSI renumbering rule.
    pub index: u32,
    /// Scope this symbol was added to, if any.
    pub scope: Option<ScopeId>,
    pub kind: SymbolKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SymbolKind {
    Variable(VariableSymbol),
    Net(NetSymbol),
    /// A user-defined net type visible to type lookups.
    NetType(NetTypeId),
    Port(PortSymbol),
    MultiPort(MultiPortSymbol),
    InterfacePort(InterfacePortSymbol),
    Modport(ModportSymbol),
    Instance(InstanceSymbol),
    InstanceArray(InstanceArraySymbol),
}

impl Symbol {
    /// Whether this symbol is a value (variable or net).
    pub fn is_value(&self) -> bool {
        matches!(self.kind, SymbolKind::Variable(_) | SymbolKind::Net(_))
    }

    pub fn value_ty(&self) -> Option<&Ty> {
        match &self.kind {
            SymbolKind::Variable(v) => Some(&v.ty),
            SymbolKind::Net(n) => Some(&n.ty),
            _ => None,
        }
    }
}

/// Identifies a net type (builtin or user-defined) in the compilation's
/// net type table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetTypeId(pub u32);

impl NetTypeId {
    /// The sentinel produced by `` `default_nettype none ``.
    pub const ERROR: NetTypeId = NetTypeId(0);
    pub const WIRE: NetTypeId = NetTypeId(1);

    pub fn is_error(self) -> bool {
        self == Self::ERROR
    }
}

/// A variable synthesized from a port header or declared in a body.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableSymbol {
    pub ty: Ty,
}

/// A net symbol; always carries its net type.
#[derive(Debug, Clone, PartialEq)]
pub struct NetSymbol {
    pub net_type: NetTypeId,
    pub ty: Ty,
}

/// An externally visible data port of a module.
#[derive(Debug, Clone, PartialEq)]
pub struct PortSymbol {
    pub direction: PortDirection,
    /// Position of the name at the instantiation interface; differs from
    /// the symbol's `loc` for explicit ports.
    pub external_loc: Span,
    /// The variable or net inside the body this port is bound to.
    /// Absent for empty ports.
    pub internal_symbol: Option<SymbolId>,
    pub ty: Ty,
    /// Default-value expression, used when an instantiation leaves the
    /// port unconnected.
    pub initializer: Option<Expression>,
    pub attributes: Vec<AttributeSyntax>,
}

/// A port formed by a concatenation `{a, b}` in a non-ANSI port list.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiPortSymbol {
    /// Effective direction merged from the components.
    pub direction: PortDirection,
    /// Component ports in source order.
    pub ports: Vec<SymbolId>,
    /// Packed concatenation of the component types.
    pub ty: Ty,
}

/// A port whose type is an interface instance.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfacePortSymbol {
    /// Absent when resolution already failed; connection checking then
    /// bails out without further diagnostics.
    pub interface_def: Option<DefinitionId>,
    /// Empty if unrestricted.
    pub modport: SmolStr,
    /// Declared ranges for interface port arrays.
    pub declared_range: SmallVec<[ConstantRange; 2]>,
    /// Set when a non-ANSI reference did not match any indexed port
    /// declaration; the real diagnosis is deferred to connection time.
    pub is_missing_io: bool,
    /// Set when this port appears inside a port concatenation.
    pub multi_port_loc: Option<Span>,
    pub attributes: Vec<AttributeSyntax>,
}

/// A named direction-restricted view of an interface.
#[derive(Debug, Clone, PartialEq)]
pub struct ModportSymbol {
    pub interface: DefinitionId,
}

/// An instantiation of a module or interface definition.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceSymbol {
    pub definition: DefinitionId,
    /// Index value per enclosing instance-array dimension, outermost
    /// first. Empty for a standalone instance.
    pub array_path: SmallVec<[i32; 2]>,
}

/// A multi-dimensional array of instances sharing one declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceArraySymbol {
    pub definition: DefinitionId,
    pub range: ConstantRange,
    /// Elements in declaration order (msb bound first). Each is an
    /// `Instance` or a nested `InstanceArray`.
    pub elements: Vec<SymbolId>,
}
