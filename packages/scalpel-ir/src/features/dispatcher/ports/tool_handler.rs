//! The handler seam every registered tool implements (spec.md §4.9: "the
//! signature comprises input schema, output schema, and a handler
//! function").

use serde_json::Value;

use crate::features::dispatcher::domain::{Context, ErrorObject};

pub trait ToolHandler: Send + Sync {
    fn id(&self) -> &'static str;

    /// Names this handler's `not_found` errors may reference, for the
    /// dispatcher's oracle-hint enhancement to fuzzy-match against.
    fn known_names(&self, ctx: &Context) -> Vec<String> {
        let _ = ctx;
        Vec::new()
    }

    fn call(&self, ctx: &Context, params: Value) -> Result<Value, ErrorObject>;
}
