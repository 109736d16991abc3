//! Merkle Patricia Trie
//!
//! An authenticated key-value map whose root hash commits to its entire
//! contents:
//! - Keys are walked as nibble paths, optionally Keccak-hashed first
//! - Nodes are RLP encoded; small encodings are embedded in their parent
//! - Tries holding the same entries always produce the same root

mod nibbles;
mod node;
mod shared;
mod tree;

pub use nibbles::{
    bytes_to_nibbles, common_prefix, compact_decode, compact_encode, nibbles_to_bytes,
};
pub use node::{NodeRef, TrieNode, BRANCH_WIDTH, EMBED_THRESHOLD};
pub use shared::SharedTrie;
pub use tree::MerklePatriciaTrie;
