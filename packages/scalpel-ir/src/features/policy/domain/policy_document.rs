//! The on-disk policy document shape (spec.md §6: "Policy document").

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Capabilities {
    #[serde(default)]
    pub feature_flags: HashMap<String, bool>,
    #[serde(default)]
    pub limits: HashMap<String, u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDocument {
    pub tier_name: String,
    pub capabilities: Capabilities,
    #[serde(default)]
    pub signature: Option<String>,
    #[serde(default)]
    pub signer_key_id: Option<String>,
}

impl PolicyDocument {
    /// The bytes a signature is computed over: the document's canonical
    /// serialization with `signature`/`signer_key_id` excluded (spec.md §6).
    pub fn signable_bytes(&self) -> Vec<u8> {
        let unsigned = PolicyDocument {
            tier_name: self.tier_name.clone(),
            capabilities: self.capabilities.clone(),
            signature: None,
            signer_key_id: None,
        };
        serde_json::to_vec(&unsigned).unwrap_or_default()
    }
}
