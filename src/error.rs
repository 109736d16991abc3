//! Error types for merkle_patricia
//!
//! The trie itself never fails; these cover parsing caller input and
//! loading test fixtures.

use thiserror::Error;

/// Result type alias for merkle_patricia operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur outside the trie engine
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    #[error("Invalid hash: {0}")]
    InvalidHash(String),

    #[error("Invalid fixture: {0}")]
    InvalidFixture(String),
}
