//! Core data model types

mod hash;

pub use hash::{
    has_hex_prefix, hex_to_bytes, keccak256, remove_hex_prefix, Hash, EMPTY_ROOT, HASH_LEN,
};
