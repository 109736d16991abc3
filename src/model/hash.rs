//! Keccak-256 digest type used for node references and trie roots

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha3::{Digest, Keccak256};
use std::fmt;

/// Length in bytes of a Keccak-256 digest
pub const HASH_LEN: usize = 32;

/// Root of the empty trie: `keccak256(rlp(b""))`
pub const EMPTY_ROOT: Hash = Hash([
    0x56, 0xe8, 0x1f, 0x17, 0x1b, 0xcc, 0x55, 0xa6, 0xff, 0x83, 0x45, 0xe6, 0x92, 0xc0, 0xf8,
    0x6e, 0x5b, 0x48, 0xe0, 0x1b, 0x99, 0x6c, 0xad, 0xc0, 0x01, 0x62, 0x2f, 0xb5, 0xe3, 0x63,
    0xb4, 0x21,
]);

/// A 32-byte Keccak-256 hash
///
/// Serializes as a `0x`-prefixed hex string.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Hash([u8; HASH_LEN]);

impl Hash {
    /// Create a hash from raw bytes
    pub fn from_bytes(bytes: [u8; HASH_LEN]) -> Self {
        Hash(bytes)
    }

    /// Hash arbitrary data
    pub fn digest(data: &[u8]) -> Self {
        Hash(Keccak256::digest(data).into())
    }

    /// The root of a trie holding no keys
    pub fn empty_root() -> Self {
        EMPTY_ROOT
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8; HASH_LEN] {
        &self.0
    }

    /// Convert to hex string (no `0x` prefix)
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse from hex string, with or without a `0x` prefix
    pub fn from_hex(s: &str) -> Result<Self, hex::FromHexError> {
        let bytes = hex::decode(remove_hex_prefix(s))?;
        if bytes.len() != HASH_LEN {
            return Err(hex::FromHexError::InvalidStringLength);
        }
        let mut arr = [0u8; HASH_LEN];
        arr.copy_from_slice(&bytes);
        Ok(Hash(arr))
    }

    /// Get a short prefix for display
    pub fn short(&self) -> String {
        self.to_hex()[..8].to_string()
    }
}

/// Compute the Keccak-256 digest of `data`
pub fn keccak256(data: &[u8]) -> Hash {
    Hash::digest(data)
}

/// Whether `s` carries a `0x` or `0X` prefix
pub fn has_hex_prefix(s: &str) -> bool {
    s.starts_with("0x") || s.starts_with("0X")
}

/// Strip a leading `0x`/`0X`, if any
pub fn remove_hex_prefix(s: &str) -> &str {
    if has_hex_prefix(s) {
        &s[2..]
    } else {
        s
    }
}

/// Decode a hex string into bytes, accepting an optional `0x` prefix
pub fn hex_to_bytes(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(remove_hex_prefix(s))
}

impl fmt::Display for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.to_hex())
    }
}

impl fmt::Debug for Hash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Hash({})", self.short())
    }
}

/// Defaults to the root of the empty trie
impl Default for Hash {
    fn default() -> Self {
        EMPTY_ROOT
    }
}

impl AsRef<[u8]> for Hash {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<[u8; HASH_LEN]> for Hash {
    fn from(bytes: [u8; HASH_LEN]) -> Self {
        Hash(bytes)
    }
}

impl Serialize for Hash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Hash::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keccak_known_vectors() {
        assert_eq!(
            keccak256(b"").to_hex(),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
        // FIPS SHA3-256 of the empty string starts with a7ffc6f8
        assert_ne!(&keccak256(b"").to_hex()[..8], "a7ffc6f8");
    }

    #[test]
    fn test_empty_root_matches_digest() {
        assert_eq!(Hash::digest(&[0x80]), EMPTY_ROOT);
        assert_eq!(
            EMPTY_ROOT.to_hex(),
            "56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421"
        );
    }

    #[test]
    fn test_hash_hex_roundtrip() {
        let h1 = Hash::digest(b"test data");
        let h2 = Hash::from_hex(&h1.to_hex()).unwrap();
        assert_eq!(h1, h2);

        let h3 = Hash::from_hex(&h1.to_string()).unwrap();
        assert_eq!(h1, h3);
        assert!(Hash::from_hex("0x1234").is_err());
    }

    #[test]
    fn test_hex_helpers() {
        assert!(has_hex_prefix("0xabcd"));
        assert!(!has_hex_prefix("abcd"));
        assert_eq!(remove_hex_prefix("0xabcd"), "abcd");
        assert_eq!(hex_to_bytes("0x0045").unwrap(), vec![0x00, 0x45]);
        assert_eq!(hex_to_bytes("0x").unwrap(), Vec::<u8>::new());
        assert!(hex_to_bytes("0xzz").is_err());
    }

    #[test]
    fn test_hash_serde() {
        let json = serde_json::to_string(&EMPTY_ROOT).unwrap();
        assert_eq!(
            json,
            "\"0x56e81f171bcc55a6ff8345e692c0f86e5b48e01b996cadc001622fb5e363b421\""
        );
        let parsed: Hash = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, EMPTY_ROOT);
        assert!(serde_json::from_str::<Hash>("\"0x12\"").is_err());
    }

    #[test]
    fn test_hash_short() {
        let h = Hash::digest(b"test");
        assert_eq!(h.short().len(), 8);
        assert_eq!(h.short(), &h.to_hex()[..8]);
    }

    #[test]
    fn test_default_is_empty_root() {
        assert_eq!(Hash::default(), EMPTY_ROOT);
        assert_eq!(Hash::default(), Hash::empty_root());
    }
}
