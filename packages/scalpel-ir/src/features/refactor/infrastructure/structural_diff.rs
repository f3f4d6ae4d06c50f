//! Structural diff between two IR module trees (spec.md §4.10): which
//! top-level functions/classes were added, removed, or changed shape.

use std::collections::HashMap;

use crate::shared::ir::{Ir, IrKind};

use crate::features::refactor::domain::{ChangeKind, ChangeRecord};

struct FunctionShape<'a> {
    param_count: usize,
    body_len: usize,
    node: &'a Ir,
}

pub fn diff_modules(original: &Ir, proposed: &Ir) -> Vec<ChangeRecord> {
    let before = collect_functions(original);
    let after = collect_functions(proposed);

    let mut changes = Vec::new();

    for (name, shape) in &before {
        match after.get(name) {
            None => changes.push(ChangeRecord { kind: ChangeKind::Removed, symbol_name: name.clone(), span: Some(shape.node.span.clone()) }),
            Some(new_shape) => {
                if new_shape.param_count != shape.param_count {
                    changes.push(ChangeRecord {
                        kind: ChangeKind::SignatureChanged,
                        symbol_name: name.clone(),
                        span: Some(new_shape.node.span.clone()),
                    });
                } else if new_shape.body_len != shape.body_len {
                    changes.push(ChangeRecord {
                        kind: ChangeKind::BodyChanged,
                        symbol_name: name.clone(),
                        span: Some(new_shape.node.span.clone()),
                    });
                }
            }
        }
    }

    for (name, shape) in &after {
        if !before.contains_key(name) {
            changes.push(ChangeRecord { kind: ChangeKind::Added, symbol_name: name.clone(), span: Some(shape.node.span.clone()) });
        }
    }

    changes
}

fn collect_functions(root: &Ir) -> HashMap<String, FunctionShape<'_>> {
    let mut out = HashMap::new();
    for node in root.walk_preorder() {
        if let IrKind::FunctionDef { name, params, body, .. } = &node.kind {
            out.insert(name.clone(), FunctionShape { param_count: params.len(), body_len: body.len(), node });
        }
    }
    out
}
