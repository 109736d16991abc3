//! A trie handle that can be shared across threads
//!
//! Readers take the read lock and may run concurrently; `set` and `delete`
//! take the write lock, so there is at most one writer at a time.

use super::tree::MerklePatriciaTrie;
use crate::config::TrieConfig;
use crate::model::Hash;
use parking_lot::RwLock;
use std::sync::Arc;

/// Cloneable handle to a single [`MerklePatriciaTrie`]
#[derive(Clone, Debug, Default)]
pub struct SharedTrie {
    inner: Arc<RwLock<MerklePatriciaTrie>>,
}

impl SharedTrie {
    /// Create a shared handle to an empty trie
    pub fn new(config: TrieConfig) -> Self {
        Self::from_trie(MerklePatriciaTrie::new(config))
    }

    /// Wrap an existing trie
    pub fn from_trie(trie: MerklePatriciaTrie) -> Self {
        SharedTrie {
            inner: Arc::new(RwLock::new(trie)),
        }
    }

    /// Owned copy of the value under `key`
    pub fn get(&self, key: &[u8]) -> Option<Vec<u8>> {
        self.inner.read().get(key).map(<[u8]>::to_vec)
    }

    /// Store `value` under `key`
    pub fn set(&self, key: &[u8], value: impl Into<Vec<u8>>) {
        self.inner.write().set(key, value);
    }

    /// Remove `key`; absent keys are a no-op
    pub fn delete(&self, key: &[u8]) {
        self.inner.write().delete(key);
    }

    /// Get the current root hash
    pub fn root(&self) -> Hash {
        self.inner.read().root()
    }

    /// Number of stored keys
    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    /// Check if the trie holds no keys
    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }

    /// Independent copy of the current state
    pub fn snapshot(&self) -> MerklePatriciaTrie {
        self.inner.read().clone()
    }

    /// Run `f` with shared access to the trie
    pub fn with_read<R>(&self, f: impl FnOnce(&MerklePatriciaTrie) -> R) -> R {
        f(&self.inner.read())
    }

    /// Run `f` with exclusive access, e.g. to apply a batch atomically
    pub fn with_write<R>(&self, f: impl FnOnce(&mut MerklePatriciaTrie) -> R) -> R {
        f(&mut self.inner.write())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::EMPTY_ROOT;
    use std::thread;

    #[test]
    fn test_clones_share_state() {
        let shared = SharedTrie::default();
        let other = shared.clone();

        shared.set(b"dog", b"puppy");
        assert_eq!(other.get(b"dog"), Some(b"puppy".to_vec()));
        assert_eq!(other.len(), 1);

        other.delete(b"dog");
        assert!(shared.is_empty());
        assert_eq!(shared.root(), EMPTY_ROOT);
    }

    #[test]
    fn test_snapshot_is_detached() {
        let shared = SharedTrie::new(TrieConfig::secured());
        shared.set(b"key", b"value");

        let snapshot = shared.snapshot();
        shared.set(b"key", b"changed");

        assert_eq!(snapshot.get(b"key"), Some(b"value".as_slice()));
        assert_ne!(snapshot.root(), shared.root());
    }

    #[test]
    fn test_concurrent_writers() {
        let shared = SharedTrie::default();

        let handles: Vec<_> = (0u8..8)
            .map(|t| {
                let shared = shared.clone();
                thread::spawn(move || {
                    for i in 0u8..16 {
                        shared.set(&[t, i], vec![t, i, 1]);
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let mut expected = MerklePatriciaTrie::default();
        for t in 0u8..8 {
            for i in 0u8..16 {
                expected.set(&[t, i], vec![t, i, 1]);
            }
        }
        assert_eq!(shared.len(), 128);
        assert_eq!(shared.root(), expected.root());
    }

    #[test]
    fn test_with_write_batch() {
        let shared = SharedTrie::default();
        let root = shared.with_write(|trie| {
            trie.set(b"a", b"1");
            trie.set(b"b", b"2");
            trie.root()
        });
        assert_eq!(shared.with_read(|trie| trie.root()), root);
    }
}
