//! Loader and runner for Ethereum `TrieTests` JSON fixtures
//!
//! A fixture file maps test names to objects of the form:
//!
//! ```json
//! { "in": [["key", "value"], ["0x0102", null]], "root": "0x..." }
//! ```
//!
//! `in` is either an ordered list of `[key, value]` pairs or an object whose
//! order does not matter. Strings starting with `0x` are hex, anything else
//! is taken as its UTF-8 bytes, and `null` stands for the default value.

use crate::config::TrieConfig;
use crate::error::{Error, Result};
use crate::model::{has_hex_prefix, hex_to_bytes, Hash};
use crate::trie::MerklePatriciaTrie;
use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use tracing::debug;

/// One named test case
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrieTest {
    pub name: String,
    /// Operations in application order; `None` means "set to default"
    pub ops: Vec<(Vec<u8>, Option<Vec<u8>>)>,
    pub expected: Hash,
}

/// Result of running one test case
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FixtureOutcome {
    pub name: String,
    pub expected: Hash,
    pub actual: Hash,
}

impl FixtureOutcome {
    /// Check if the computed root matches the expected one
    pub fn passed(&self) -> bool {
        self.expected == self.actual
    }
}

impl TrieTest {
    /// Apply every operation to a fresh trie
    pub fn build(&self, config: &TrieConfig) -> MerklePatriciaTrie {
        let mut trie = MerklePatriciaTrie::new(config.clone());
        for (key, value) in &self.ops {
            match value {
                Some(value) => trie.set(key, value.clone()),
                None => trie.set(key, config.default.clone()),
            }
        }
        trie
    }

    /// Build the trie and compare its root with the expected one
    pub fn run(&self, config: &TrieConfig) -> FixtureOutcome {
        let actual = self.build(config).root();
        debug!(test = %self.name, expected = %self.expected, actual = %actual, "ran fixture");
        FixtureOutcome {
            name: self.name.clone(),
            expected: self.expected,
            actual,
        }
    }
}

/// Decode a fixture string: `0x`-prefixed hex, otherwise raw UTF-8
pub fn string_to_bytes(data: &str) -> Result<Vec<u8>> {
    if has_hex_prefix(data) {
        Ok(hex_to_bytes(data)?)
    } else {
        Ok(data.as_bytes().to_vec())
    }
}

/// Read and parse a fixture file
pub fn load_fixtures(path: impl AsRef<Path>) -> Result<Vec<TrieTest>> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path)?;
    let tests = parse_fixtures(&json)?;
    debug!(path = %path.display(), count = tests.len(), "loaded fixtures");
    Ok(tests)
}

/// Parse fixture JSON; tests come back sorted by name
pub fn parse_fixtures(json: &str) -> Result<Vec<TrieTest>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Object(tests) = value else {
        return Err(Error::InvalidFixture(
            "top level must be an object of named tests".into(),
        ));
    };

    tests
        .iter()
        .map(|(name, test)| parse_test(name, test))
        .collect()
}

/// Run every test, returning one outcome per test in the same order
pub fn run_fixtures(tests: &[TrieTest], config: &TrieConfig) -> Vec<FixtureOutcome> {
    tests.iter().map(|test| test.run(config)).collect()
}

// === Internal helpers ===

fn parse_test(name: &str, test: &Value) -> Result<TrieTest> {
    let ops = match test.get("in") {
        Some(Value::Array(pairs)) => pairs
            .iter()
            .map(|pair| parse_pair(name, pair))
            .collect::<Result<Vec<_>>>()?,
        Some(Value::Object(map)) => map
            .iter()
            .map(|(key, value)| Ok((string_to_bytes(key)?, parse_value(name, value)?)))
            .collect::<Result<Vec<_>>>()?,
        _ => {
            return Err(Error::InvalidFixture(format!(
                "{name}: \"in\" must be an array or object"
            )))
        }
    };

    let root = test
        .get("root")
        .and_then(Value::as_str)
        .ok_or_else(|| Error::InvalidFixture(format!("{name}: missing \"root\" string")))?;
    let expected =
        Hash::from_hex(root).map_err(|e| Error::InvalidHash(format!("{name}: {root}: {e}")))?;

    Ok(TrieTest {
        name: name.to_string(),
        ops,
        expected,
    })
}

fn parse_pair(name: &str, pair: &Value) -> Result<(Vec<u8>, Option<Vec<u8>>)> {
    match pair.as_array().map(Vec::as_slice) {
        Some([key, value]) => {
            let key = parse_value(name, key)?.unwrap_or_default();
            Ok((key, parse_value(name, value)?))
        }
        _ => Err(Error::InvalidFixture(format!(
            "{name}: expected a [key, value] pair, got {pair}"
        ))),
    }
}

fn parse_value(name: &str, value: &Value) -> Result<Option<Vec<u8>>> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => string_to_bytes(s).map(Some),
        other => Err(Error::InvalidFixture(format!(
            "{name}: expected string or null, got {other}"
        ))),
    }
}
