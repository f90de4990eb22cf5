use smallvec::SmallVec;
use smol_str::SmolStr;
use vega_source::Span;

use crate::Compilation;
use crate::definition::DefinitionId;
use crate::scope::{ScopeId, ScopeKind};
use crate::symbols::{InstanceArraySymbol, InstanceSymbol, SymbolId, SymbolKind};
use crate::types::ConstantRange;

/// Create a standalone instance of `definition` in `scope`.
pub fn create_instance(
    comp: &mut Compilation,
    scope: ScopeId,
    definition: DefinitionId,
    name: impl Into<SmolStr>,
    loc: Span,
) -> SymbolId {
    let sym = comp.emplace(
        name.into(),
        loc,
        SymbolKind::Instance(InstanceSymbol {
            definition,
            array_path: SmallVec::new(),
        }),
    );
    comp.add_to_scope(scope, sym);
    sym
}

/// Create a (possibly multi-dimensional) instance array.
///
/// Each dimension produces an `InstanceArray` owning a scope of kind
/// `InstanceArray`; leaf elements are `Instance` symbols carrying their
/// index path. Elements are stored in declaration order.
pub fn create_instance_array(
    comp: &mut Compilation,
    scope: ScopeId,
    definition: DefinitionId,
    name: impl Into<SmolStr>,
    loc: Span,
    dims: &[ConstantRange],
) -> SymbolId {
    let name = name.into();
    let sym = build_array_level(comp, scope, definition, &name, loc, dims, &mut SmallVec::new());
    comp.add_to_scope(scope, sym);
    sym
}

fn build_array_level(
    comp: &mut Compilation,
    scope: ScopeId,
    definition: DefinitionId,
    name: &SmolStr,
    loc: Span,
    dims: &[ConstantRange],
    path: &mut SmallVec<[i32; 2]>,
) -> SymbolId {
    let Some((&range, rest)) = dims.split_first() else {
        return comp.emplace(
            name.clone(),
            loc,
            SymbolKind::Instance(InstanceSymbol {
                definition,
                array_path: path.clone(),
            }),
        );
    };

    let array = comp.emplace(
        name.clone(),
        loc,
        SymbolKind::InstanceArray(InstanceArraySymbol {
            definition,
            range,
            elements: Vec::new(),
        }),
    );

    let inner_scope = comp.create_scope(ScopeKind::InstanceArray, Some(scope));
    comp.set_scope_owner(inner_scope, array);

    let mut elements = Vec::with_capacity(range.width() as usize);
    for index in range.iter_decl_order() {
        path.push(index);
        let elem_name = SmolStr::new(format!("{name}[{index}]"));
        let elem = build_array_level(comp, inner_scope, definition, &elem_name, loc, rest, path);
        // Elements live in the array's scope so lookups and
        // declared-before queries see them.
        comp.add_to_scope(inner_scope, elem);
        elements.push(elem);
        path.pop();
    }

    if let SymbolKind::InstanceArray(a) = &mut comp.symbol_mut(array).kind {
        a.elements = elements;
    }
    array
}

/// Leaf instances of an instance array, in declaration order.
pub fn leaf_instances(comp: &Compilation, root: SymbolId) -> Vec<SymbolId> {
    let mut out = Vec::new();
    collect_leaves(comp, root, &mut out);
    out
}

fn collect_leaves(comp: &Compilation, sym: SymbolId, out: &mut Vec<SymbolId>) {
    match &comp.symbol(sym).kind {
        SymbolKind::Instance(_) => out.push(sym),
        SymbolKind::InstanceArray(array) => {
            for &elem in &array.elements {
                collect_leaves(comp, elem, out);
            }
        }
        _ => {}
    }
}
