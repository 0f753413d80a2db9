use aes_gcm::{
    Aes256Gcm, Key, Nonce,
    aead::{Aead, KeyInit, OsRng, rand_core::RngCore},
};
use anyhow::{Result, anyhow};
use thiserror::Error;

use crate::keys::ConversationKey;

/// Token layout: `[version (1) | nonce (12) | ciphertext + tag]`.
pub const TOKEN_VERSION: u8 = 1;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

/// Why a token was rejected. No partial plaintext ever accompanies these;
/// callers render a placeholder instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecryptError {
    #[error("token shorter than header and tag")]
    Truncated,
    #[error("unsupported token version {0}")]
    Version(u8),
    #[error("token failed authentication")]
    Auth,
}

/// Encrypt a payload under the conversation key.
///
/// A fresh random nonce is drawn on every call: the key lives as long as
/// the conversation does, and a repeated nonce under one GCM key breaks
/// both confidentiality and integrity.
pub fn encrypt_payload(key: &ConversationKey, plaintext: &[u8]) -> Result<Vec<u8>> {
    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| anyhow!("encryption failed: {}", e))?;

    let mut token = Vec::with_capacity(1 + NONCE_LEN + ciphertext.len());
    token.push(TOKEN_VERSION);
    token.extend_from_slice(&nonce_bytes);
    token.extend_from_slice(&ciphertext);
    Ok(token)
}

/// Decrypt a token. Integrity is verified before any plaintext is
/// released; wrong key, truncation, and tampering all land on the same
/// `Auth`-shaped rejection path.
pub fn decrypt_payload(key: &ConversationKey, token: &[u8]) -> Result<Vec<u8>, DecryptError> {
    if token.len() < 1 + NONCE_LEN + TAG_LEN {
        return Err(DecryptError::Truncated);
    }
    let version = token[0];
    if version != TOKEN_VERSION {
        return Err(DecryptError::Version(version));
    }
    let (nonce_bytes, ciphertext) = token[1..].split_at(NONCE_LEN);

    let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| DecryptError::Auth)
}
