//! Alcove cryptographic core.
//!
//! One static AES-256-GCM key per conversation pair, generated on first
//! contact and reused for the pair's whole lifetime. Tokens are
//! self-contained — version byte, per-call nonce, ciphertext and tag — so
//! decoding needs only the token and the key, with no nonce bookkeeping
//! anywhere else.

pub mod keys;
pub mod pin;
pub mod token;

pub use keys::ConversationKey;
pub use token::{DecryptError, decrypt_payload, encrypt_payload};
