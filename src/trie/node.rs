//! Trie node types and their canonical RLP encoding

use super::nibbles::compact_encode;
use crate::model::{keccak256, Hash};
use alloy_rlp::{BufMut, Encodable, Header, EMPTY_STRING_CODE};
use std::fmt;

/// Encodings shorter than this are embedded in the parent instead of hashed
pub const EMBED_THRESHOLD: usize = 32;

/// Number of child slots in a branch node, one per nibble value
pub const BRANCH_WIDTH: usize = 16;

/// A node in the Merkle Patricia Trie
///
/// Paths are stored as nibbles. Leaf paths implicitly carry the terminator
/// flag; extension paths never do and are never empty. An extension's child
/// is always a branch.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum TrieNode {
    /// The absent node: the empty trie, or an unused branch slot
    #[default]
    Empty,
    /// Remaining key suffix and the stored value
    Leaf { path: Vec<u8>, value: Vec<u8> },
    /// Shared path segment leading to a single branch
    Extension { path: Vec<u8>, child: Box<TrieNode> },
    /// Sixteen children indexed by the next nibble, plus a value for keys
    /// ending exactly here
    Branch {
        children: Box<[TrieNode; BRANCH_WIDTH]>,
        value: Option<Vec<u8>>,
    },
}

/// How a parent refers to a child in its encoding
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum NodeRef {
    /// The child's full encoding, spliced in as-is
    Inline(Vec<u8>),
    /// Keccak-256 of the child's encoding, written as a 32-byte string
    Hash(Hash),
}

impl NodeRef {
    /// Choose inline or hashed reference for an encoded node
    pub fn from_encoded(encoded: Vec<u8>) -> Self {
        if encoded.len() < EMBED_THRESHOLD {
            NodeRef::Inline(encoded)
        } else {
            NodeRef::Hash(keccak256(&encoded))
        }
    }

    /// Check if the child is referenced by hash
    pub fn is_hash(&self) -> bool {
        matches!(self, NodeRef::Hash(_))
    }
}

impl Encodable for NodeRef {
    fn encode(&self, out: &mut dyn BufMut) {
        match self {
            NodeRef::Inline(encoded) => out.put_slice(encoded),
            NodeRef::Hash(hash) => hash.as_bytes().as_slice().encode(out),
        }
    }

    fn length(&self) -> usize {
        match self {
            NodeRef::Inline(encoded) => encoded.len(),
            NodeRef::Hash(hash) => hash.as_bytes().as_slice().length(),
        }
    }
}

impl TrieNode {
    /// Create an empty node
    pub fn empty() -> Self {
        TrieNode::Empty
    }

    /// Create a leaf node
    pub fn leaf(path: Vec<u8>, value: Vec<u8>) -> Self {
        TrieNode::Leaf { path, value }
    }

    /// Create an extension node over a branch
    pub fn extension(path: Vec<u8>, child: TrieNode) -> Self {
        debug_assert!(!path.is_empty(), "extension with empty path");
        TrieNode::Extension {
            path,
            child: Box::new(child),
        }
    }

    /// A branch with no children and no value
    pub fn branch() -> Self {
        TrieNode::Branch {
            children: Box::default(),
            value: None,
        }
    }

    /// Check if this node is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, TrieNode::Empty)
    }

    /// The value stored at this exact node, if any
    pub fn value(&self) -> Option<&[u8]> {
        match self {
            TrieNode::Leaf { value, .. } => Some(value.as_slice()),
            TrieNode::Branch { value, .. } => value.as_deref(),
            TrieNode::Empty | TrieNode::Extension { .. } => None,
        }
    }

    /// Short name of the node kind, for logs and display
    pub fn node_type(&self) -> &'static str {
        match self {
            TrieNode::Empty => "empty",
            TrieNode::Leaf { .. } => "leaf",
            TrieNode::Extension { .. } => "extension",
            TrieNode::Branch { .. } => "branch",
        }
    }

    /// Canonical RLP encoding of this node
    ///
    /// - empty: the empty string `0x80`
    /// - leaf: `[hp(path, leaf), value]`
    /// - extension: `[hp(path, ext), ref(child)]`
    /// - branch: `[ref(c0), ..., ref(c15), value]`, empty slots as `0x80`
    pub fn encode(&self) -> Vec<u8> {
        let mut out = Vec::new();
        self.encode_into(&mut out);
        out
    }

    fn encode_into(&self, out: &mut dyn BufMut) {
        match self {
            TrieNode::Empty => out.put_u8(EMPTY_STRING_CODE),
            TrieNode::Leaf { path, value } => {
                let key = compact_encode(path, true);
                encode_pair(&key, value.as_slice(), out);
            }
            TrieNode::Extension { path, child } => {
                debug_assert!(
                    matches!(**child, TrieNode::Branch { .. }),
                    "extension must point at a branch"
                );
                let key = compact_encode(path, false);
                encode_pair(&key, &child.reference(), out);
            }
            TrieNode::Branch { children, value } => {
                let refs: Vec<Option<NodeRef>> = children
                    .iter()
                    .map(|child| (!child.is_empty()).then(|| child.reference()))
                    .collect();
                let value = value.as_deref().unwrap_or_default();

                let payload_length = refs
                    .iter()
                    .map(|r| r.as_ref().map_or(1, NodeRef::length))
                    .sum::<usize>()
                    + value.length();
                Header {
                    list: true,
                    payload_length,
                }
                .encode(out);

                for r in &refs {
                    match r {
                        Some(r) => r.encode(out),
                        None => out.put_u8(EMPTY_STRING_CODE),
                    }
                }
                value.encode(out);
            }
        }
    }

    /// Reference a parent would use for this node
    pub fn reference(&self) -> NodeRef {
        NodeRef::from_encoded(self.encode())
    }

    /// Keccak-256 of the encoding, regardless of its length
    pub fn hash(&self) -> Hash {
        keccak256(&self.encode())
    }
}

/// Encode a two-item list: compact path followed by a value or reference
fn encode_pair<T: Encodable + ?Sized>(key: &[u8], second: &T, out: &mut dyn BufMut) {
    Header {
        list: true,
        payload_length: key.length() + second.length(),
    }
    .encode(out);
    key.encode(out);
    second.encode(out);
}

impl fmt::Display for TrieNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrieNode::Empty => write!(f, "Empty"),
            TrieNode::Leaf { path, value } => {
                write!(f, "Leaf(path: {:?}, value: 0x{})", path, hex::encode(value))
            }
            TrieNode::Extension { path, child } => {
                write!(f, "Extension(path: {:?}, child: {})", path, child.node_type())
            }
            TrieNode::Branch { children, value } => {
                let child_count = children.iter().filter(|c| !c.is_empty()).count();
                write!(f, "Branch(children: {}, value: ", child_count)?;
                match value {
                    Some(v) => write!(f, "0x{})", hex::encode(v)),
                    None => write!(f, "None)"),
                }
            }
        }
    }
}
