//! Construction-time trie configuration

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Settings fixed for the lifetime of a trie
///
/// - `secured`: keys are Keccak-256 hashed before they become trie paths
/// - `default`: the value that means "absent"; storing it deletes the key
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrieConfig {
    #[serde(default)]
    pub secured: bool,
    #[serde(
        default,
        serialize_with = "serialize_hex",
        deserialize_with = "deserialize_hex"
    )]
    pub default: Vec<u8>,
}

impl TrieConfig {
    /// Plain trie with the empty byte string as default
    pub fn new() -> Self {
        Self::default()
    }

    /// Secured trie with the empty byte string as default
    pub fn secured() -> Self {
        TrieConfig {
            secured: true,
            default: Vec::new(),
        }
    }

    /// Set whether keys are hashed
    pub fn with_secured(mut self, secured: bool) -> Self {
        self.secured = secured;
        self
    }

    /// Set the value treated as "absent"
    pub fn with_default(mut self, default: impl Into<Vec<u8>>) -> Self {
        self.default = default.into();
        self
    }
}

fn serialize_hex<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
}

fn deserialize_hex<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let s = String::deserialize(deserializer)?;
    crate::model::hex_to_bytes(&s).map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let config = TrieConfig::new();
        assert!(!config.secured);
        assert!(config.default.is_empty());

        let config = TrieConfig::secured().with_default(vec![0x00]);
        assert!(config.secured);
        assert_eq!(config.default, vec![0x00]);

        assert!(!TrieConfig::secured().with_secured(false).secured);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = TrieConfig::secured().with_default(b"none".to_vec());
        let json = serde_json::to_string(&config).unwrap();
        assert_eq!(json, r#"{"secured":true,"default":"0x6e6f6e65"}"#);

        let parsed: TrieConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_json_defaults() {
        let parsed: TrieConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed, TrieConfig::default());

        assert!(serde_json::from_str::<TrieConfig>(r#"{"default":"0xzz"}"#).is_err());
    }
}
