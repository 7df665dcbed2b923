use blake3::Hasher;
use serde::{Deserialize, Serialize};

/// Cache key for a validated query.
///
/// Hex-encoded BLAKE3 digest of the sanitized text, the request context and the model
/// identity. Ordering is lexicographic on the hex string, which the response cache uses
/// to break eviction ties.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Fingerprint {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Computes the query fingerprint.
///
/// Fields are length-prefixed so `("ab", "c")` and `("a", "bc")` never collide.
#[inline]
pub fn fingerprint(sanitized: &str, context: &str, model: &str) -> Fingerprint {
    let mut hasher = Hasher::new();
    for part in [sanitized, context, model] {
        hasher.update(&(part.len() as u64).to_le_bytes());
        hasher.update(part.as_bytes());
    }
    Fingerprint(hasher.finalize().to_hex().to_string())
}

/// Stable 64-bit hash of arbitrary bytes (first 8 bytes of BLAKE3).
#[inline]
pub fn hash_to_u64(data: &[u8]) -> u64 {
    let hash = blake3::hash(data);
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&hash.as_bytes()[..8]);
    u64::from_le_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_fingerprint_determinism() {
        let a = fingerprint("Solve 2x + 3 = 7", "grade=intermediate", "llama3.1:8b");
        let b = fingerprint("Solve 2x + 3 = 7", "grade=intermediate", "llama3.1:8b");
        assert_eq!(a, b);
    }

    #[test]
    fn test_fingerprint_input_sensitivity() {
        let inputs = [
            ("Solve 2x + 3 = 7", "grade=intermediate", "llama3.1:8b"),
            ("solve 2x + 3 = 7", "grade=intermediate", "llama3.1:8b"),
            ("Solve 2x + 3 = 7", "grade=advanced", "llama3.1:8b"),
            ("Solve 2x + 3 = 7", "grade=intermediate", "mistral:7b"),
        ];

        let keys: HashSet<_> = inputs
            .iter()
            .map(|(q, c, m)| fingerprint(q, c, m))
            .collect();
        assert_eq!(keys.len(), inputs.len());
    }

    #[test]
    fn test_fingerprint_field_boundaries() {
        let a = fingerprint("ab", "c", "");
        let b = fingerprint("a", "bc", "");
        let c = fingerprint("a", "b", "c");
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
    }

    #[test]
    fn test_fingerprint_is_hex() {
        let key = fingerprint("x", "", "");
        assert_eq!(key.as_str().len(), 64);
        assert!(key.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_hash_to_u64_determinism() {
        assert_eq!(hash_to_u64(b"doc-1"), hash_to_u64(b"doc-1"));
        assert_ne!(hash_to_u64(b"doc-1"), hash_to_u64(b"doc-2"));
    }
}
