//! Renders a callee or attribute-chain expression into the dotted text the
//! source/sink/sanitizer registry matches against, e.g. `Attribute { value:
//! Name("request"), attr: "args" }` -> `"request.args"`.

use crate::shared::ir::{Ir, IrKind};

pub fn callee_path(node: &Ir) -> Option<String> {
    match &node.kind {
        IrKind::Name { id } => Some(id.clone()),
        IrKind::Attribute { value, attr } => {
            let prefix = callee_path(value)?;
            Some(format!("{prefix}.{attr}"))
        }
        _ => None,
    }
}
