use std::collections::HashMap;

use smol_str::SmolStr;
use vega_syntax::ElementSelectSyntax;

use crate::Compilation;
use crate::symbols::{NetTypeId, SymbolId, SymbolKind};

/// Scope identifier into the compilation's scope table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScopeId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Compilation,
    Module,
    InstanceArray,
}

/// A single scope in the scope tree.
///
/// Bindings are name -> symbol; declaration order lives on the symbols
/// themselves (`Symbol::index`), so renumbering a reused symbol never
/// has to touch the scope.
#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    /// The symbol this scope belongs to: the instance being elaborated
    /// for module bodies, the array symbol for instance-array scopes.
    pub owner: Option<SymbolId>,
    pub default_net_type: NetTypeId,
    pub(crate) bindings: HashMap<SmolStr, SymbolId>,
    pub(crate) next_index: u32,
}

impl Scope {
    pub(crate) fn new(kind: ScopeKind, parent: Option<ScopeId>) -> Self {
        Self {
            kind,
            parent,
            owner: None,
            default_net_type: NetTypeId::WIRE,
            bindings: HashMap::new(),
            next_index: 0,
        }
    }
}

/// Flags modifying an unqualified lookup.
///
/// `disallow_wildcard_import` exists for wildcard port connections; the
/// import machinery itself lives with the external name-lookup subsystem,
/// so here the flag is carried but has no additional effect.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LookupFlags {
    /// Only consider symbols usable as a type (net types).
    pub type_only: bool,
    pub disallow_wildcard_import: bool,
}

impl LookupFlags {
    pub const NONE: LookupFlags = LookupFlags {
        type_only: false,
        disallow_wildcard_import: false,
    };
    pub const TYPE: LookupFlags = LookupFlags {
        type_only: true,
        disallow_wildcard_import: false,
    };
    pub const DISALLOW_WILDCARD_IMPORT: LookupFlags = LookupFlags {
        type_only: false,
        disallow_wildcard_import: true,
    };
}

impl Compilation {
    /// Resolve `name` starting from `scope`, walking the parent chain.
    pub fn find(&self, scope: ScopeId, name: &str) -> Option<SymbolId> {
        let mut current = Some(scope);
        while let Some(id) = current {
            let s = self.scope(id);
            if let Some(&sym) = s.bindings.get(name) {
                return Some(sym);
            }
            current = s.parent;
        }
        None
    }

    /// Unqualified lookup with flags.
    pub fn lookup_unqualified(
        &self,
        scope: ScopeId,
        name: &str,
        flags: LookupFlags,
    ) -> Option<SymbolId> {
        let found = self.find(scope, name)?;
        if flags.type_only && !matches!(self.symbol(found).kind, SymbolKind::NetType(_)) {
            return None;
        }
        Some(found)
    }

    /// Apply trailing element selects to a symbol, descending instance
    /// arrays. Returns `None` when a selector is out of range or the
    /// symbol has no elements to select; the lookup subsystem owns the
    /// diagnostics for that.
    pub fn select_child(
        &self,
        symbol: SymbolId,
        selectors: &[ElementSelectSyntax],
    ) -> Option<SymbolId> {
        let mut current = symbol;
        for sel in selectors {
            let SymbolKind::InstanceArray(array) = &self.symbol(current).kind else {
                return None;
            };
            if !array.range.contains(sel.index) {
                return None;
            }
            current = array.elements[array.range.declaration_index(sel.index)];
        }
        Some(current)
    }

    /// Whether `symbol` was declared before declaration index `index`
    /// in its scope. Symbols outside any scope count as declared before
    /// everything.
    pub fn is_declared_before(&self, symbol: SymbolId, index: u32) -> bool {
        let sym = self.symbol(symbol);
        sym.scope.is_none() || sym.index <= index
    }

    /// The scope's configured default net type.
    pub fn default_net_type(&self, scope: ScopeId) -> NetTypeId {
        self.scope(scope).default_net_type
    }
}
