//! Error types for core operations.
//!
//! "Content unreadable" and "content missing" are deliberately separate
//! variants: a rejected token and an absent blob are different
//! user-visible outcomes and must stay distinguishable.

use std::path::PathBuf;

use thiserror::Error;

use alcove_crypto::DecryptError;

pub type Result<T> = std::result::Result<T, ChatError>;

#[derive(Debug, Error)]
pub enum ChatError {
    /// PIN rejected at the format boundary (must be exactly four digits).
    #[error("pin must be exactly four digits")]
    InvalidPin,

    /// The store refuses empty payloads.
    #[error("message content is empty")]
    EmptyContent,

    /// A record carried a content tag this version does not know.
    #[error("unknown content kind: {0}")]
    UnknownKind(String),

    /// A record's stored payload does not match its content kind.
    #[error("message {0} payload does not match its kind")]
    MalformedRecord(i64),

    /// The referenced encrypted blob is gone from the blob store.
    #[error("attachment blob missing: {0}")]
    BlobMissing(PathBuf),

    /// Ciphertext failed authentication — wrong key or tampered token.
    #[error("ciphertext rejected: {0}")]
    Unreadable(#[from] DecryptError),

    #[error("storage failure: {0}")]
    Storage(#[source] anyhow::Error),

    #[error("i/o failure: {0}")]
    Io(#[from] std::io::Error),
}
