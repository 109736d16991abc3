//! Ethereum TrieTests vectors
//!
//! Runs the JSON fixtures under `tests/fixtures/` through the fixture loader
//! and checks every root, for both plain and secured tries.
//!
//! Run with:
//! ```bash
//! cargo test --test trie_vectors
//! ```

use merkle_patricia::fixture::{load_fixtures, run_fixtures, TrieTest};
use merkle_patricia::{MerklePatriciaTrie, TrieConfig, EMPTY_ROOT};
use std::path::PathBuf;

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn load(name: &str) -> Vec<TrieTest> {
    load_fixtures(fixture_path(name)).expect("Failed to load fixture")
}

fn assert_all_pass(name: &str, config: TrieConfig) {
    let tests = load(name);
    assert!(!tests.is_empty(), "{} has no tests", name);

    for outcome in run_fixtures(&tests, &config) {
        assert!(
            outcome.passed(),
            "{}/{}: expected {}, got {}",
            name,
            outcome.name,
            outcome.expected,
            outcome.actual
        );
    }
}

// ============================================================================
// Fixture Files
// ============================================================================

#[test]
fn test_trietest() {
    assert_all_pass("trietest.json", TrieConfig::new());
}

#[test]
fn test_trietest_secure() {
    assert_all_pass("trietest_secureTrie.json", TrieConfig::secured());
}

#[test]
fn test_trie_any_order() {
    assert_all_pass("trieanyorder.json", TrieConfig::new());
}

#[test]
fn test_trie_any_order_secure() {
    assert_all_pass("trieanyorder_secureTrie.json", TrieConfig::secured());
}

// ============================================================================
// Order Independence
// ============================================================================

#[test]
fn test_any_order_reversed_and_rotated() {
    for (file, config) in [
        ("trieanyorder.json", TrieConfig::new()),
        ("trieanyorder_secureTrie.json", TrieConfig::secured()),
    ] {
        for mut test in load(file) {
            test.ops.reverse();
            assert_eq!(test.build(&config).root(), test.expected, "{}", test.name);

            let mid = test.ops.len() / 2;
            test.ops.rotate_left(mid);
            assert_eq!(test.build(&config).root(), test.expected, "{}", test.name);
        }
    }
}

// ============================================================================
// Deletion
// ============================================================================

#[test]
fn test_deleting_everything_returns_to_empty_root() {
    for test in load("trieanyorder.json") {
        let config = TrieConfig::new();
        let mut trie = test.build(&config);
        assert_ne!(trie.root(), EMPTY_ROOT);

        for (key, _) in &test.ops {
            trie.delete(key);
        }
        assert!(trie.is_empty(), "{}", test.name);
        assert_eq!(trie.root(), EMPTY_ROOT, "{}", test.name);
    }
}

#[test]
fn test_partial_delete_matches_fresh_build() {
    let tests = load("trieanyorder.json");
    let puppy = tests.iter().find(|t| t.name == "puppy").unwrap();

    let mut trie = puppy.build(&TrieConfig::new());
    trie.delete(b"doge");
    trie.delete(b"horse");

    let mut fresh = MerklePatriciaTrie::default();
    fresh.set(b"do", b"verb");
    fresh.set(b"dog", b"puppy");

    assert_eq!(trie.root(), fresh.root());
    assert_eq!(trie.root_node_rlp(), fresh.root_node_rlp());
}

#[test]
fn test_custom_default_fixture_equivalence() {
    // With a non-empty default, "" is a real value and "none" deletes
    let config = TrieConfig::new().with_default(b"none".to_vec());
    let mut trie = MerklePatriciaTrie::new(config);
    trie.set(b"dog", b"puppy");
    trie.set(b"cat", b"none");
    trie.set(b"bird", b"");

    let mut plain = MerklePatriciaTrie::default();
    plain.set(b"dog", b"puppy");
    assert_ne!(trie.root(), plain.root());

    trie.set(b"bird", b"none");
    assert_eq!(trie.root(), plain.root());
    assert_eq!(trie.get_or_default(b"cat"), b"none".to_vec());
}
