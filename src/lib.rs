//! # merkle_patricia
//!
//! An Ethereum-compatible Merkle Patricia Trie.
//!
//! The trie maps arbitrary byte-string keys to byte-string values and
//! commits to the whole mapping with a single Keccak-256 root. Roots match
//! the Ethereum reference implementation bit for bit.
//!
//! ## Core Concepts
//!
//! - **Nodes**: leaves, extensions and branches, RLP encoded
//! - **Root**: Keccak-256 of the root node's encoding
//! - **Secured mode**: keys are hashed before they become paths
//! - **Default value**: storing it deletes the key
//!
//! ## Example
//!
//! ```
//! use merkle_patricia::{MerklePatriciaTrie, TrieConfig, EMPTY_ROOT};
//!
//! let mut trie = MerklePatriciaTrie::new(TrieConfig::default());
//! trie.set(b"dog", b"puppy");
//! assert_eq!(trie.get(b"dog"), Some(b"puppy".as_slice()));
//!
//! trie.set(b"dog", b"");
//! assert_eq!(trie.root(), EMPTY_ROOT);
//! ```

pub mod config;
pub mod fixture;
pub mod model;
pub mod trie;

mod error;

pub use config::TrieConfig;
pub use error::{Error, Result};
pub use model::{keccak256, Hash, EMPTY_ROOT};
pub use trie::{MerklePatriciaTrie, NodeRef, SharedTrie, TrieNode};
