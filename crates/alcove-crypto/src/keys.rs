use aes_gcm::aead::OsRng;
use aes_gcm::aead::rand_core::RngCore;
use anyhow::Result;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};

pub const KEY_LEN: usize = 32;

/// Symmetric key for one conversation pair. Opaque bytes to every other
/// component; only the codec looks inside.
#[derive(Clone, PartialEq, Eq)]
pub struct ConversationKey([u8; KEY_LEN]);

impl ConversationKey {
    /// Generate a fresh random 256-bit key.
    pub fn generate() -> Self {
        let mut key = [0u8; KEY_LEN];
        OsRng.fill_bytes(&mut key);
        Self(key)
    }

    /// Rebuild a key from stored key material.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_LEN] = bytes
            .try_into()
            .map_err(|_| anyhow::anyhow!("key must be {} bytes, got {}", KEY_LEN, bytes.len()))?;
        Ok(Self(key))
    }

    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Encode for display or out-of-band sharing.
    pub fn to_base64(&self) -> String {
        BASE64.encode(self.0)
    }

    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = BASE64.decode(encoded)?;
        Self::from_bytes(&bytes)
    }
}

// Key material stays out of logs and panic messages.
impl std::fmt::Debug for ConversationKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ConversationKey(..)")
    }
}
