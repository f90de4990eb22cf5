use std::collections::HashMap;

use smol_str::SmolStr;
use vega_source::Span;

use crate::scope::ScopeId;
use crate::symbols::SymbolId;

/// Identifies a module/interface/program definition in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DefinitionId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Module,
    Interface,
    Program,
}

/// A design element definition.
///
/// Ports are filled in when the definition's header is elaborated;
/// modports when the interface body is.
#[derive(Debug)]
pub struct Definition {
    pub kind: DefinitionKind,
    pub name: SmolStr,
    pub loc: Span,
    pub modports: HashMap<SmolStr, SymbolId>,
    /// Formal port symbols in source order.
    pub ports: Vec<SymbolId>,
    /// Body scope, once elaborated.
    pub body_scope: Option<ScopeId>,
}

/// Registry of all definitions known to the compilation.
///
/// Lookup is a flat name map; configuration-scoped visibility is out of
/// scope here, so the scope a lookup originates from does not matter.
#[derive(Debug, Default)]
pub struct DefinitionRegistry {
    defs: Vec<Definition>,
    by_name: HashMap<SmolStr, DefinitionId>,
}

impl DefinitionRegistry {
    pub fn add(&mut self, def: Definition) -> DefinitionId {
        let id = DefinitionId(self.defs.len() as u32);
        self.by_name.insert(def.name.clone(), id);
        self.defs.push(def);
        id
    }

    pub fn get_definition(&self, name: &str) -> Option<DefinitionId> {
        self.by_name.get(name).copied()
    }

    pub fn get(&self, id: DefinitionId) -> &Definition {
        &self.defs[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: DefinitionId) -> &mut Definition {
        &mut self.defs[id.0 as usize]
    }
}
