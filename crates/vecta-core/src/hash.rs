//! Content hashing for exact state comparison.
//!
//! A SHA-256 digest over a canonical byte encoding lets callers check that
//! a document returned to a previous state bit for bit.

use sha2::{Digest, Sha256};

/// A content hash digest (SHA-256, 32 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentHash {
    bytes: [u8; 32],
}

impl ContentHash {
    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self { bytes }
    }

    /// Hash an arbitrary byte slice.
    pub fn of(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(data);
        let result = hasher.finalize();
        let mut bytes = [0u8; 32];
        bytes.copy_from_slice(&result);
        Self::from_bytes(bytes)
    }

    /// Hash the JSON encoding of a serializable value.
    pub fn of_json<T: serde::Serialize>(value: &T) -> Result<Self, serde_json::Error> {
        let data = serde_json::to_vec(value)?;
        Ok(Self::of(&data))
    }

    pub fn to_hex(&self) -> String {
        self.bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.bytes
    }
}

impl std::fmt::Display for ContentHash {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_deterministic() {
        assert_eq!(ContentHash::of(b"knots"), ContentHash::of(b"knots"));
        assert_ne!(ContentHash::of(b"knots"), ContentHash::of(b"knot"));
    }

    #[test]
    fn test_hash_hex_length() {
        assert_eq!(ContentHash::of(&[]).to_hex().len(), 64);
    }

    #[test]
    fn test_hash_of_json_matches_bytes() {
        let value = serde_json::json!({ "radius": 10.0 });
        let bytes = serde_json::to_vec(&value).unwrap();
        assert_eq!(ContentHash::of_json(&value).unwrap(), ContentHash::of(&bytes));
    }
}
