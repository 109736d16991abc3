//! Merkle Patricia Trie engine
//!
//! The trie owns a tree of [`TrieNode`]s. Mutations consume the affected
//! path and rebuild it, so every node reachable from the root always
//! satisfies the path-compression rules:
//!
//! - an extension is never empty and always leads to a branch
//! - a branch always holds at least two of {children, value}
//!
//! Those rules make the shape of the tree a pure function of its key set,
//! which is what lets [`MerklePatriciaTrie::root`] agree across insertion
//! orders and with other implementations.

use super::nibbles::{bytes_to_nibbles, common_prefix, nibbles_to_bytes};
use super::node::TrieNode;
use crate::config::TrieConfig;
use crate::model::{keccak256, Hash};
use tracing::{debug, trace};

/// An in-memory Merkle Patricia Trie
#[derive(Clone, Debug, Default)]
pub struct MerklePatriciaTrie {
    root: TrieNode,
    config: TrieConfig,
}

impl MerklePatriciaTrie {
    /// Create an empty trie
    pub fn new(config: TrieConfig) -> Self {
        MerklePatriciaTrie {
            root: TrieNode::empty(),
            config,
        }
    }

    /// Create an empty trie from the two construction-time settings
    pub fn with_default(secured: bool, default: impl Into<Vec<u8>>) -> Self {
        Self::new(TrieConfig::new().with_secured(secured).with_default(default))
    }

    /// Get the construction-time configuration
    pub fn config(&self) -> &TrieConfig {
        &self.config
    }

    /// Check if keys are hashed before use
    pub fn is_secured(&self) -> bool {
        self.config.secured
    }

    /// The value that stands for "absent"
    pub fn default_value(&self) -> &[u8] {
        &self.config.default
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        let path = self.key_path(key);
        let mut remaining = path.as_slice();
        let mut node = &self.root;

        loop {
            match node {
                TrieNode::Empty => return None,
                TrieNode::Leaf { path, value } => {
                    return (path.as_slice() == remaining).then_some(value.as_slice());
                }
                TrieNode::Extension { path, child } => {
                    if !remaining.starts_with(path) {
                        return None;
                    }
                    remaining = &remaining[path.len()..];
                    node = child;
                }
                TrieNode::Branch { children, value } => match remaining.split_first() {
                    None => return value.as_deref(),
                    Some((nibble, rest)) => {
                        node = &children[*nibble as usize];
                        remaining = rest;
                    }
                },
            }
        }
    }

    /// Get the value under `key`, or the configured default when absent
    pub fn get_or_default(&self, key: &[u8]) -> Vec<u8> {
        self.get(key)
            .map(<[u8]>::to_vec)
            .unwrap_or_else(|| self.config.default.clone())
    }

    /// Check if `key` holds a value
    pub fn contains_key(&self, key: &[u8]) -> bool {
        self.get(key).is_some()
    }

    /// Store `value` under `key`
    ///
    /// Storing the configured default removes the key instead, leaving the
    /// trie exactly as if the key had never been set.
    pub fn set(&mut self, key: &[u8], value: impl Into<Vec<u8>>) {
        let value = value.into();
        if value == self.config.default {
            self.delete(key);
            return;
        }

        debug!(key = %hex::encode(key), value_len = value.len(), "set");
        let path = self.key_path(key);
        let root = std::mem::take(&mut self.root);
        self.root = insert(root, &path, value);
    }

    /// Remove `key`; absent keys are a no-op
    pub fn delete(&mut self, key: &[u8]) {
        self.remove(key);
    }

    /// Remove `key` and return the value it held
    pub fn remove(&mut self, key: &[u8]) -> Option<Vec<u8>> {
        let path = self.key_path(key);
        let root = std::mem::take(&mut self.root);
        let (root, removed) = remove(root, &path);
        self.root = root;

        debug!(
            key = %hex::encode(key),
            removed = removed.is_some(),
            "delete"
        );
        removed
    }

    /// Commitment over the whole mapping
    ///
    /// The root node is always hashed, even when its encoding is short
    /// enough to be embedded elsewhere.
    pub fn root(&self) -> Hash {
        let root = self.root.hash();
        trace!(root = %root, node = self.root.node_type(), "computed root");
        root
    }

    /// RLP encoding of the root node
    pub fn root_node_rlp(&self) -> Vec<u8> {
        self.root.encode()
    }

    /// Get the root node
    pub fn root_node(&self) -> &TrieNode {
        &self.root
    }

    /// Check if the trie holds no keys
    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        count_values(&self.root)
    }

    /// All `(path, value)` pairs in path order
    ///
    /// In secured mode the path is the Keccak-256 of the original key, since
    /// the preimage is not kept.
    pub fn entries(&self) -> Vec<(Vec<u8>, Vec<u8>)> {
        let mut results = Vec::new();
        collect_entries(&self.root, Vec::new(), &mut results);
        results
    }

    /// Remove every key
    pub fn clear(&mut self) {
        self.root = TrieNode::empty();
    }

    fn key_path(&self, key: &[u8]) -> Vec<u8> {
        if self.config.secured {
            bytes_to_nibbles(keccak256(key).as_bytes())
        } else {
            bytes_to_nibbles(key)
        }
    }
}

impl<K, V> Extend<(K, V)> for MerklePatriciaTrie
where
    K: AsRef<[u8]>,
    V: Into<Vec<u8>>,
{
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.set(key.as_ref(), value);
        }
    }
}

// === Internal helpers ===

fn insert(node: TrieNode, path: &[u8], value: Vec<u8>) -> TrieNode {
    match node {
        TrieNode::Empty => TrieNode::leaf(path.to_vec(), value),

        TrieNode::Leaf {
            path: leaf_path,
            value: leaf_value,
        } => {
            if leaf_path == path {
                return TrieNode::leaf(leaf_path, value);
            }

            // Two distinct keys: split at the first differing nibble
            let common_len = common_prefix(path, &leaf_path);
            let mut branch = TrieNode::branch();
            place(&mut branch, &leaf_path[common_len..], leaf_value);
            place(&mut branch, &path[common_len..], value);
            prefix_with(&path[..common_len], branch)
        }

        TrieNode::Extension {
            path: ext_path,
            child,
        } => {
            let common_len = common_prefix(path, &ext_path);

            if common_len == ext_path.len() {
                let child = insert(*child, &path[common_len..], value);
                return TrieNode::extension(ext_path, child);
            }

            // Diverged inside the extension: a branch takes over at the split
            let mut branch = TrieNode::branch();
            if let TrieNode::Branch { children, .. } = &mut branch {
                let old_nibble = ext_path[common_len] as usize;
                let old_rest = &ext_path[common_len + 1..];
                children[old_nibble] = if old_rest.is_empty() {
                    *child
                } else {
                    TrieNode::extension(old_rest.to_vec(), *child)
                };
            }
            place(&mut branch, &path[common_len..], value);
            prefix_with(&path[..common_len], branch)
        }

        TrieNode::Branch {
            mut children,
            value: branch_value,
        } => match path.split_first() {
            None => TrieNode::Branch {
                children,
                value: Some(value),
            },
            Some((nibble, rest)) => {
                let slot = &mut children[*nibble as usize];
                *slot = insert(std::mem::take(slot), rest, value);
                TrieNode::Branch {
                    children,
                    value: branch_value,
                }
            }
        },
    }
}

/// Put a value into a fresh branch: as the branch value when the remaining
/// path is exhausted, otherwise as a leaf under its first nibble
fn place(branch: &mut TrieNode, rest: &[u8], value: Vec<u8>) {
    let TrieNode::Branch {
        children,
        value: branch_value,
    } = branch
    else {
        unreachable!("place called on a non-branch node");
    };

    match rest.split_first() {
        None => *branch_value = Some(value),
        Some((nibble, tail)) => {
            debug_assert!(children[*nibble as usize].is_empty());
            children[*nibble as usize] = TrieNode::leaf(tail.to_vec(), value);
        }
    }
}

/// Prepend `prefix` to `node`'s path, merging with leaves and extensions
/// and wrapping a branch in a new extension
fn prefix_with(prefix: &[u8], node: TrieNode) -> TrieNode {
    if prefix.is_empty() {
        return node;
    }

    match node {
        TrieNode::Empty => TrieNode::Empty,
        TrieNode::Leaf { path, value } => {
            TrieNode::leaf([prefix, path.as_slice()].concat(), value)
        }
        TrieNode::Extension { path, child } => TrieNode::Extension {
            path: [prefix, path.as_slice()].concat(),
            child,
        },
        branch @ TrieNode::Branch { .. } => TrieNode::extension(prefix.to_vec(), branch),
    }
}

fn remove(node: TrieNode, path: &[u8]) -> (TrieNode, Option<Vec<u8>>) {
    match node {
        TrieNode::Empty => (TrieNode::Empty, None),

        TrieNode::Leaf {
            path: leaf_path,
            value,
        } => {
            if leaf_path == path {
                (TrieNode::Empty, Some(value))
            } else {
                (TrieNode::Leaf { path: leaf_path, value }, None)
            }
        }

        TrieNode::Extension {
            path: ext_path,
            child,
        } => {
            if !path.starts_with(&ext_path) {
                return (TrieNode::Extension { path: ext_path, child }, None);
            }

            let (child, removed) = remove(*child, &path[ext_path.len()..]);
            // The child may have collapsed into a leaf or extension
            (prefix_with(&ext_path, child), removed)
        }

        TrieNode::Branch {
            mut children,
            value,
        } => match path.split_first() {
            None => match value {
                None => (TrieNode::Branch { children, value }, None),
                Some(removed) => (collapse_branch(children, None), Some(removed)),
            },
            Some((nibble, rest)) => {
                let slot = &mut children[*nibble as usize];
                let (child, removed) = remove(std::mem::take(slot), rest);
                *slot = child;

                if removed.is_some() {
                    (collapse_branch(children, value), removed)
                } else {
                    (TrieNode::Branch { children, value }, None)
                }
            }
        },
    }
}

/// Rebuild a branch after a removal, collapsing it if it has a single
/// member left
fn collapse_branch(mut children: Box<[TrieNode; 16]>, value: Option<Vec<u8>>) -> TrieNode {
    let mut occupied = children
        .iter()
        .enumerate()
        .filter(|(_, child)| !child.is_empty())
        .map(|(i, _)| i);
    let first = occupied.next();
    let more = occupied.next().is_some();

    match (first, more, value) {
        (None, _, None) => TrieNode::Empty,
        (None, _, Some(value)) => TrieNode::leaf(Vec::new(), value),
        (Some(i), false, None) => {
            let child = std::mem::take(&mut children[i]);
            prefix_with(&[i as u8], child)
        }
        (_, _, value) => TrieNode::Branch { children, value },
    }
}

fn count_values(node: &TrieNode) -> usize {
    match node {
        TrieNode::Empty => 0,
        TrieNode::Leaf { .. } => 1,
        TrieNode::Extension { child, .. } => count_values(child),
        TrieNode::Branch { children, value } => {
            usize::from(value.is_some()) + children.iter().map(count_values).sum::<usize>()
        }
    }
}

fn collect_entries(node: &TrieNode, prefix: Vec<u8>, results: &mut Vec<(Vec<u8>, Vec<u8>)>) {
    match node {
        TrieNode::Empty => {}
        TrieNode::Leaf { path, value } => {
            let full = [prefix.as_slice(), path.as_slice()].concat();
            results.push((nibbles_to_bytes(&full), value.clone()));
        }
        TrieNode::Extension { path, child } => {
            collect_entries(child, [prefix.as_slice(), path.as_slice()].concat(), results);
        }
        TrieNode::Branch { children, value } => {
            if let Some(v) = value {
                results.push((nibbles_to_bytes(&prefix), v.clone()));
            }
            for (nibble, child) in children.iter().enumerate() {
                if !child.is_empty() {
                    let mut child_prefix = prefix.clone();
                    child_prefix.push(nibble as u8);
                    collect_entries(child, child_prefix, results);
                }
            }
        }
    }
}
