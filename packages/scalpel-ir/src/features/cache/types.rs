//! Core types for the analysis cache (spec.md §4.7).

use blake3::Hash as Blake3Hash;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::shared::ports::Language;

/// File identifier (interned path + language).
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct FileId {
    pub path: Arc<str>,
    pub language: Language,
}

impl FileId {
    pub fn new(path: impl Into<Arc<str>>, language: Language) -> Self {
        Self { path: path.into(), language }
    }

    pub fn from_path_str(path: &str, language: Language) -> Self {
        Self { path: Arc::from(path), language }
    }
}

/// Content fingerprint (Blake3 hash). Blake3 is SIMD-accelerated and gives
/// the cache a fast, collision-resistant key component for arbitrary byte
/// payloads (file content, canonical option strings, tool version strings).
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq)]
pub struct Fingerprint(pub Blake3Hash);

impl Fingerprint {
    pub fn compute(content: &[u8]) -> Self {
        Self(blake3::hash(content))
    }

    /// Fast-path fingerprint from file metadata alone (mtime + size). This is
    /// probabilistic — always re-verify with a content fingerprint before
    /// trusting a hit built on this.
    pub fn from_metadata(mtime_ns: u64, size_bytes: u64) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&mtime_ns.to_le_bytes());
        hasher.update(&size_bytes.to_le_bytes());
        Self(hasher.finalize())
    }

    pub fn new(hash: Blake3Hash) -> Self {
        Self(hash)
    }

    pub fn zero() -> Self {
        Self(blake3::Hash::from_bytes([0u8; 32]))
    }

    pub fn to_hex(&self) -> String {
        self.0.to_hex().to_string()
    }

    pub fn from_hex(hex: &str) -> Result<Self, blake3::HexError> {
        Ok(Self(blake3::Hash::from_hex(hex)?))
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        self.0.as_bytes()
    }

    /// XOR two fingerprints together — the combinator behind the analysis
    /// cache key (spec.md §4.7: `H(kind) ⊕ H(content) ⊕ H(options) ⊕
    /// H(version)`). XOR keeps the combination order-independent and is
    /// itself a fixed-width operation, unlike re-hashing a concatenation.
    pub fn xor(&self, other: &Fingerprint) -> Self {
        let a = self.as_bytes();
        let b = other.as_bytes();
        let mut out = [0u8; 32];
        for i in 0..32 {
            out[i] = a[i] ^ b[i];
        }
        Self(Blake3Hash::from_bytes(out))
    }
}

impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        Self::from_hex(&hex_str).map_err(serde::de::Error::custom)
    }
}

/// File metadata used for the L0 fast path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileMetadata {
    pub mtime_ns: u64,
    pub size_bytes: u64,
    pub fingerprint: Fingerprint,
}

impl FileMetadata {
    pub fn new(mtime_ns: u64, size_bytes: u64, fingerprint: Fingerprint) -> Self {
        Self { mtime_ns, size_bytes, fingerprint }
    }

    pub fn matches_fast(&self, mtime_ns: u64, size_bytes: u64) -> bool {
        self.mtime_ns == mtime_ns && self.size_bytes == size_bytes
    }
}

/// The analysis cache key (spec.md §4.7): a file-level key used by the L0/L1
/// in-memory tiers, carrying enough identity to act as the L2 on-disk key as
/// well once combined with an analysis kind and options fingerprint via
/// [`AnalysisCacheKey`].
#[derive(Debug, Clone, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CacheKey {
    pub file_id: FileId,
    pub fingerprint: Fingerprint,
}

impl CacheKey {
    pub fn new(file_id: FileId, fingerprint: Fingerprint) -> Self {
        Self { file_id, fingerprint }
    }

    pub fn from_content(path: &str, language: Language, content: &[u8]) -> Self {
        Self {
            file_id: FileId::from_path_str(path, language),
            fingerprint: Fingerprint::compute(content),
        }
    }

    pub fn to_file_id(&self) -> FileId {
        self.file_id.clone()
    }

    pub fn from_file_id(file_id: FileId) -> Self {
        Self { file_id, fingerprint: Fingerprint::zero() }
    }

    pub fn as_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(self.file_id.path.as_bytes());
        bytes.extend_from_slice(self.file_id.language.name().as_bytes());
        bytes.extend_from_slice(self.fingerprint.as_bytes());
        bytes
    }

    pub fn language(&self) -> Language {
        self.file_id.language
    }
}

/// Full key identity for a single cached analysis result: `analysis_kind`,
/// the input content, the canonical option string, and the tool version —
/// combined with XOR per spec.md §4.7.
#[derive(Debug, Clone)]
pub struct AnalysisCacheKey {
    pub file: CacheKey,
    pub analysis_kind: String,
    combined: Fingerprint,
}

impl AnalysisCacheKey {
    pub fn new(
        file_id: FileId,
        analysis_kind: &str,
        content: &[u8],
        options_canonical: &str,
        tool_version: &str,
    ) -> Self {
        let h_kind = Fingerprint::compute(analysis_kind.as_bytes());
        let h_content = Fingerprint::compute(content);
        let h_options = Fingerprint::compute(options_canonical.as_bytes());
        let h_version = Fingerprint::compute(tool_version.as_bytes());
        let combined = h_kind.xor(&h_content).xor(&h_options).xor(&h_version);

        Self {
            file: CacheKey::new(file_id, h_content),
            analysis_kind: analysis_kind.to_string(),
            combined,
        }
    }

    /// Hex-encoded combined fingerprint, used as the L2 file name and the L0/L1
    /// lookup key's disambiguator (two different `analysis_kind`s over the
    /// same file must never collide).
    pub fn key_hex(&self) -> String {
        self.combined.to_hex()
    }

    pub fn as_cache_key(&self) -> CacheKey {
        CacheKey::new(self.file.file_id.clone(), self.combined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_deterministic() {
        let content = b"print('hello')";
        assert_eq!(Fingerprint::compute(content), Fingerprint::compute(content));
    }

    #[test]
    fn cache_key_equality_follows_content() {
        let key1 = CacheKey::from_content("a.py", Language::Python, b"code");
        let key2 = CacheKey::from_content("a.py", Language::Python, b"code");
        assert_eq!(key1, key2);

        let key3 = CacheKey::from_content("a.py", Language::Python, b"other");
        assert_ne!(key1, key3);
    }

    #[test]
    fn analysis_cache_key_differs_by_kind_options_and_version() {
        let file = FileId::from_path_str("a.py", Language::Python);
        let content = b"def f(): pass";

        let base = AnalysisCacheKey::new(file.clone(), "taint", content, "{}", "1.0.0");
        let other_kind = AnalysisCacheKey::new(file.clone(), "symbolic", content, "{}", "1.0.0");
        let other_opts = AnalysisCacheKey::new(file.clone(), "taint", content, "{\"x\":1}", "1.0.0");
        let other_version = AnalysisCacheKey::new(file, "taint", content, "{}", "1.0.1");

        assert_ne!(base.key_hex(), other_kind.key_hex());
        assert_ne!(base.key_hex(), other_opts.key_hex());
        assert_ne!(base.key_hex(), other_version.key_hex());
    }

    #[test]
    fn analysis_cache_key_stable_across_recomputation() {
        let file = FileId::from_path_str("a.py", Language::Python);
        let a = AnalysisCacheKey::new(file.clone(), "taint", b"x = 1", "{}", "1.0.0");
        let b = AnalysisCacheKey::new(file, "taint", b"x = 1", "{}", "1.0.0");
        assert_eq!(a.key_hex(), b.key_hex());
    }
}
