//! Maps `tool_id` to its handler (spec.md §4.9: "For each registered tool,
//! the signature comprises input schema, output schema, and a handler
//! function").

use std::collections::HashMap;

use crate::features::dispatcher::infrastructure::tools::{
    CodePolicyCheckTool, CrawlProjectTool, CrossFileSecurityScanTool, ExtractCodeTool, GenerateUnitTestsTool,
    GetCallGraphTool, GetCrossFileDependenciesTool, GetFileContextTool, GetGraphNeighborhoodTool, GetProjectMapTool,
    GetSymbolReferencesTool, RenameSymbolTool, ScanDependenciesTool, SecurityScanTool, SimulateRefactorTool,
    SymbolicExecuteTool, UpdateSymbolTool, VerifyPolicyIntegrityTool,
};
use crate::features::dispatcher::ports::ToolHandler;

pub struct ToolRegistry {
    handlers: HashMap<&'static str, Box<dyn ToolHandler>>,
}

impl ToolRegistry {
    /// The core's required tool families (spec.md §4.9): extraction,
    /// navigation, security, mutation, synthesis, governance. Embedders may
    /// add more by composition via [`ToolRegistry::register`].
    pub fn with_core_tools() -> Self {
        let mut registry = Self { handlers: HashMap::new() };
        registry.register(Box::new(ExtractCodeTool));
        registry.register(Box::new(GetFileContextTool));
        registry.register(Box::new(CrawlProjectTool));
        registry.register(Box::new(GetProjectMapTool));
        registry.register(Box::new(GetSymbolReferencesTool));
        registry.register(Box::new(GetCallGraphTool));
        registry.register(Box::new(GetGraphNeighborhoodTool));
        registry.register(Box::new(GetCrossFileDependenciesTool));
        registry.register(Box::new(SecurityScanTool));
        registry.register(Box::new(CrossFileSecurityScanTool));
        registry.register(Box::new(ScanDependenciesTool));
        registry.register(Box::new(RenameSymbolTool));
        registry.register(Box::new(UpdateSymbolTool));
        registry.register(Box::new(SimulateRefactorTool));
        registry.register(Box::new(GenerateUnitTestsTool));
        registry.register(Box::new(SymbolicExecuteTool));
        registry.register(Box::new(CodePolicyCheckTool));
        registry.register(Box::new(VerifyPolicyIntegrityTool));
        registry
    }

    pub fn register(&mut self, handler: Box<dyn ToolHandler>) {
        self.handlers.insert(handler.id(), handler);
    }

    pub fn get(&self, tool_id: &str) -> Option<&dyn ToolHandler> {
        self.handlers.get(tool_id).map(Box::as_ref)
    }

    pub fn tool_ids(&self) -> Vec<&'static str> {
        let mut ids: Vec<_> = self.handlers.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::with_core_tools()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn the_core_registry_carries_all_eighteen_required_tools() {
        let registry = ToolRegistry::with_core_tools();
        assert_eq!(registry.tool_ids().len(), 18);
    }

    #[test]
    fn an_unknown_tool_id_looks_up_to_nothing() {
        let registry = ToolRegistry::with_core_tools();
        assert!(registry.get("not_a_real_tool").is_none());
    }
}
