//! Port elaboration core: builds typed port symbols from parsed module
//! headers and resolves port connections at instantiation sites.
//!
//! Entry points are [`ports::build_port_list`] for one module body and
//! [`connect::resolve_connections`] for one instance. Everything else
//! is the collaborator surface those two need: the symbol arena, scopes
//! and lookup, a minimal type model, the definition registry, and the
//! argument expression binder.

mod ansi;
pub mod connect;
pub mod definition;
pub mod expr;
pub mod instance;
mod nonansi;
pub mod ports;
pub mod scope;
pub mod serialize;
pub mod symbols;
pub mod types;

#[cfg(test)]
mod tests;

use std::collections::HashMap;

use smol_str::SmolStr;
use vega_diag::Diagnostic;
use vega_source::Span;
use vega_syntax::NetTypeKeyword;

use crate::connect::ConnectionMap;
use crate::definition::{Definition, DefinitionId, DefinitionKind, DefinitionRegistry};
use crate::ports::PortListResult;
use crate::scope::{Scope, ScopeId, ScopeKind};
use crate::symbols::{
    ModportSymbol, NetSymbol, NetTypeId, Symbol, SymbolId, SymbolKind, VariableSymbol,
};
use crate::types::Ty;

/// A named net type: builtin (`wire`, `tri`, ...) or user-defined.
#[derive(Debug, Clone)]
pub struct NetTypeInfo {
    pub name: SmolStr,
    pub ty: Ty,
}

/// Owns every symbol, scope, net type, definition, connection map, and
/// diagnostic produced during elaboration.
///
/// Symbols reference each other by arena index only; the arena releases
/// everything en masse, so the port -> internal symbol -> body -> port
/// reachability cycle never becomes an ownership problem.
pub struct Compilation {
    symbols: Vec<Symbol>,
    scopes: Vec<Scope>,
    net_types: Vec<NetTypeInfo>,
    definitions: DefinitionRegistry,
    diagnostics: Vec<Diagnostic>,
    connections: HashMap<SymbolId, ConnectionMap>,
    root: ScopeId,

    /// Follow the LRM rule that a directionless-typed `input` port is a
    /// net. Off by default: every major simulator treats `input int i`
    /// as a variable, and so does this crate unless asked otherwise.
    pub strict_lrm_input_defaulting: bool,
}

impl Compilation {
    pub fn new() -> Self {
        let builtin = [
            "<error>", "wire", "tri", "wand", "wor", "triand", "trior", "tri0", "tri1",
            "supply0", "supply1", "uwire",
        ];
        let net_types = builtin
            .iter()
            .map(|&name| NetTypeInfo {
                name: SmolStr::new_static(name),
                ty: Ty::logic(),
            })
            .collect();

        let mut comp = Self {
            symbols: Vec::new(),
            scopes: Vec::new(),
            net_types,
            definitions: DefinitionRegistry::default(),
            diagnostics: Vec::new(),
            connections: HashMap::new(),
            root: ScopeId(0),
            strict_lrm_input_defaulting: false,
        };
        comp.root = comp.create_scope(ScopeKind::Compilation, None);
        comp
    }

    pub fn root(&self) -> ScopeId {
        self.root
    }

    // --- scopes ---

    pub fn create_scope(&mut self, kind: ScopeKind, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        let mut scope = Scope::new(kind, parent);
        if let Some(p) = parent {
            scope.default_net_type = self.scope(p).default_net_type;
        }
        self.scopes.push(scope);
        id
    }

    pub(crate) fn scope(&self, id: ScopeId) -> &Scope {
        &self.scopes[id.0 as usize]
    }

    pub(crate) fn scope_mut(&mut self, id: ScopeId) -> &mut Scope {
        &mut self.scopes[id.0 as usize]
    }

    pub fn set_scope_owner(&mut self, scope: ScopeId, owner: SymbolId) {
        self.scope_mut(scope).owner = Some(owner);
    }

    pub fn set_default_net_type(&mut self, scope: ScopeId, net_type: NetTypeId) {
        self.scope_mut(scope).default_net_type = net_type;
    }

    // --- symbols ---

    pub fn symbol(&self, id: SymbolId) -> &Symbol {
        &self.symbols[id.0 as usize]
    }

    pub(crate) fn symbol_mut(&mut self, id: SymbolId) -> &mut Symbol {
        &mut self.symbols[id.0 as usize]
    }

    /// Allocate a symbol in the arena without attaching it to a scope.
    pub(crate) fn emplace(&mut self, name: SmolStr, loc: Span, kind: SymbolKind) -> SymbolId {
        let id = SymbolId(self.symbols.len() as u32);
        self.symbols.push(Symbol {
            name,
            loc,
            index: 0,
            scope: None,
            kind,
        });
        id
    }

    /// Attach a symbol to a scope, assigning the next declaration index.
    /// Unnamed symbols get an index but no binding.
    pub fn add_to_scope(&mut self, scope: ScopeId, symbol: SymbolId) {
        let index = {
            let s = self.scope_mut(scope);
            let i = s.next_index;
            s.next_index += 1;
            i
        };
        let name = {
            let sym = self.symbol_mut(symbol);
            sym.scope = Some(scope);
            sym.index = index;
            sym.name.clone()
        };
        if !name.is_empty() {
            self.scope_mut(scope).bindings.insert(name, symbol);
        }
    }

    pub fn declare_variable(
        &mut self,
        scope: ScopeId,
        name: impl Into<SmolStr>,
        ty: Ty,
        loc: Span,
    ) -> SymbolId {
        let sym = self.emplace(name.into(), loc, SymbolKind::Variable(VariableSymbol { ty }));
        self.add_to_scope(scope, sym);
        sym
    }

    pub fn declare_net(
        &mut self,
        scope: ScopeId,
        name: impl Into<SmolStr>,
        net_type: NetTypeId,
        loc: Span,
    ) -> SymbolId {
        let ty = self.net_type_info(net_type).ty.clone();
        let sym = self.emplace(
            name.into(),
            loc,
            SymbolKind::Net(NetSymbol { net_type, ty }),
        );
        self.add_to_scope(scope, sym);
        sym
    }

    /// Declare a user-defined net type, making it visible to type
    /// lookups in `scope`.
    pub fn declare_net_type(
        &mut self,
        scope: ScopeId,
        name: impl Into<SmolStr>,
        ty: Ty,
        loc: Span,
    ) -> NetTypeId {
        let name = name.into();
        let id = NetTypeId(self.net_types.len() as u32);
        self.net_types.push(NetTypeInfo {
            name: name.clone(),
            ty,
        });
        let sym = self.emplace(name, loc, SymbolKind::NetType(id));
        self.add_to_scope(scope, sym);
        id
    }

    pub fn net_type_info(&self, id: NetTypeId) -> &NetTypeInfo {
        &self.net_types[id.0 as usize]
    }

    pub fn net_type_for_keyword(&self, keyword: NetTypeKeyword) -> NetTypeId {
        let index = match keyword {
            NetTypeKeyword::Wire => 1,
            NetTypeKeyword::Tri => 2,
            NetTypeKeyword::Wand => 3,
            NetTypeKeyword::Wor => 4,
            NetTypeKeyword::TriAnd => 5,
            NetTypeKeyword::TriOr => 6,
            NetTypeKeyword::Tri0 => 7,
            NetTypeKeyword::Tri1 => 8,
            NetTypeKeyword::Supply0 => 9,
            NetTypeKeyword::Supply1 => 10,
            NetTypeKeyword::UWire => 11,
        };
        NetTypeId(index)
    }

    // --- definitions ---

    pub fn create_definition(
        &mut self,
        kind: DefinitionKind,
        name: impl Into<SmolStr>,
        loc: Span,
    ) -> DefinitionId {
        self.definitions.add(Definition {
            kind,
            name: name.into(),
            loc,
            modports: HashMap::new(),
            ports: Vec::new(),
            body_scope: None,
        })
    }

    pub fn get_definition(&self, name: &str) -> Option<DefinitionId> {
        self.definitions.get_definition(name)
    }

    pub fn definition(&self, id: DefinitionId) -> &Definition {
        self.definitions.get(id)
    }

    /// Add a modport to an interface definition.
    pub fn add_modport(
        &mut self,
        interface: DefinitionId,
        name: impl Into<SmolStr>,
        loc: Span,
    ) -> SymbolId {
        let name = name.into();
        let sym = self.emplace(
            name.clone(),
            loc,
            SymbolKind::Modport(ModportSymbol { interface }),
        );
        self.definitions.get_mut(interface).modports.insert(name, sym);
        sym
    }

    /// Install a built port list into a definition and its body scope:
    /// ports are recorded on the definition; implicit members become
    /// findable body members.
    pub fn install_port_list(
        &mut self,
        body_scope: ScopeId,
        definition: DefinitionId,
        result: &PortListResult,
    ) {
        for member in &result.implicit_members {
            if self.symbol(member.symbol).scope.is_none() {
                self.add_to_scope(body_scope, member.symbol);
            }
        }
        // Interface ports have no internal symbol standing in for them,
        // so the port symbol itself becomes the findable body member
        // (pass-through connections look them up by name).
        for &port in &result.ports {
            if matches!(self.symbol(port).kind, SymbolKind::InterfacePort(_))
                && self.symbol(port).scope.is_none()
            {
                self.add_to_scope(body_scope, port);
            }
        }
        let def = self.definitions.get_mut(definition);
        def.ports = result.ports.clone();
        def.body_scope = Some(body_scope);
    }

    // --- connections ---

    pub(crate) fn set_connections(&mut self, instance: SymbolId, map: ConnectionMap) {
        self.connections.insert(instance, map);
    }

    pub fn connections(&self, instance: SymbolId) -> Option<&ConnectionMap> {
        self.connections.get(&instance)
    }

    /// Resolve an interface port of an enclosing module to its own
    /// connection target, by way of the instance that owns the port's
    /// body scope.
    pub fn interface_port_connection(&self, port: SymbolId) -> Option<SymbolId> {
        let scope = self.symbol(port).scope?;
        let owner = self.scope(scope).owner?;
        let map = self.connections.get(&owner)?;
        match map.get(port)? {
            connect::PortConnection::Interface { target, .. } => *target,
            connect::PortConnection::Value { .. } => None,
        }
    }

    // --- diagnostics ---

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl Default for Compilation {
    fn default() -> Self {
        Self::new()
    }
}
