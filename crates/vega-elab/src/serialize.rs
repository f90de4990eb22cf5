use serde_json::{Value, json};
use vega_syntax::PortDirection;

use crate::Compilation;
use crate::connect::PortConnection;
use crate::expr::{ExprKind, Expression};
use crate::symbols::{SymbolId, SymbolKind};

/// Symbolic link to a symbol: `"name@index"`. Link identity survives a
/// serialization round trip without pointer fixup.
fn link(comp: &Compilation, id: SymbolId) -> Value {
    Value::String(format!("{}@{}", comp.symbol(id).name, id.0))
}

fn direction_str(direction: PortDirection) -> &'static str {
    match direction {
        PortDirection::Input => "input",
        PortDirection::Output => "output",
        PortDirection::Inout => "inout",
        PortDirection::Ref => "ref",
    }
}

/// Serialize a port, multi-port, or interface port symbol.
pub fn serialize_symbol(comp: &Compilation, id: SymbolId) -> Value {
    let sym = comp.symbol(id);
    match &sym.kind {
        SymbolKind::Port(port) => {
            let mut obj = json!({
                "name": sym.name.as_str(),
                "direction": direction_str(port.direction),
            });
            if let Some(internal) = port.internal_symbol {
                obj["internalSymbol"] = link(comp, internal);
            }
            obj
        }
        SymbolKind::MultiPort(multi) => {
            let ports: Vec<Value> = multi
                .ports
                .iter()
                .map(|&p| serialize_symbol(comp, p))
                .collect();
            json!({
                "name": sym.name.as_str(),
                "direction": direction_str(multi.direction),
                "ports": ports,
            })
        }
        SymbolKind::InterfacePort(iface) => {
            let mut obj = json!({
                "name": sym.name.as_str(),
            });
            if let Some(def) = iface.interface_def {
                obj["interfaceDef"] = Value::String(comp.definition(def).name.to_string());
            }
            if !iface.modport.is_empty() {
                obj["modport"] = Value::String(iface.modport.to_string());
            }
            obj
        }
        _ => json!({ "name": sym.name.as_str() }),
    }
}

fn serialize_expression(comp: &Compilation, expr: &Expression) -> Value {
    match &expr.kind {
        ExprKind::Named(sym) => json!({
            "kind": "Named",
            "symbol": link(comp, *sym),
            "type": expr.ty.pretty(),
        }),
        ExprKind::Literal { value } => json!({
            "kind": "Literal",
            "value": value,
            "type": expr.ty.pretty(),
        }),
        ExprKind::Concat(elems) => json!({
            "kind": "Concat",
            "elems": elems
                .iter()
                .map(|e| serialize_expression(comp, e))
                .collect::<Vec<_>>(),
            "type": expr.ty.pretty(),
        }),
        ExprKind::Conversion(inner) => json!({
            "kind": "Conversion",
            "operand": serialize_expression(comp, inner),
            "type": expr.ty.pretty(),
        }),
        ExprKind::Error => json!({ "kind": "Error" }),
    }
}

/// Serialize one port connection record.
pub fn serialize_connection(comp: &Compilation, conn: &PortConnection) -> Value {
    match conn {
        PortConnection::Value { port, expr, attrs } => {
            let mut obj = json!({
                "isInterfacePort": false,
                "port": link(comp, *port),
            });
            if let Some(expr) = expr {
                obj["expr"] = serialize_expression(comp, expr);
            }
            if !attrs.is_empty() {
                obj["attributes"] = Value::Array(
                    attrs
                        .iter()
                        .map(|a| Value::String(a.name.to_string()))
                        .collect(),
                );
            }
            obj
        }
        PortConnection::Interface {
            port,
            target,
            attrs,
        } => {
            let mut obj = json!({
                "isInterfacePort": true,
                "ifacePort": link(comp, *port),
            });
            if let Some(target) = target {
                obj["ifaceInstance"] = link(comp, *target);
            }
            if !attrs.is_empty() {
                obj["attributes"] = Value::Array(
                    attrs
                        .iter()
                        .map(|a| Value::String(a.name.to_string()))
                        .collect(),
                );
            }
            obj
        }
    }
}
