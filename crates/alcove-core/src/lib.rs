//! Alcove core — private-messaging operations.
//!
//! One symmetric key per participant pair, created on first contact and
//! used for every message between them. Text ciphertext is stored inline
//! on the record; attachments are encrypted into the blob store and
//! referenced. An optional per-user PIN gates plaintext behind a
//! session-scoped unlock.
//!
//! Collaborators hand in authenticated usernames and raw content; key
//! material never crosses the boundary except as the opaque
//! [`ConversationKey`] the decode helpers take back.

pub mod blobs;
pub mod config;
pub mod error;
pub mod gate;
pub mod keyring;
pub mod session;
pub mod store;

use alcove_crypto::ConversationKey;
use alcove_db::Database;
use alcove_types::{AttachmentKind, MessageRecord};

pub use blobs::BlobStore;
pub use config::Config;
pub use error::{ChatError, Result};
pub use session::Session;
pub use store::{Attachment, OutgoingContent, TextContent, UNREADABLE_PLACEHOLDER};

/// Owns the database and blob store and exposes the messaging surface.
pub struct Messenger {
    db: Database,
    blobs: BlobStore,
}

impl Messenger {
    pub fn open(config: &Config) -> Result<Self> {
        let db = Database::open(&config.db_path).map_err(ChatError::Storage)?;
        let blobs = BlobStore::open(&config.blob_dir)?;
        Ok(Self { db, blobs })
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Resolve the pair's conversation key, creating it on first contact.
    pub fn conversation_key(&self, a: &str, b: &str) -> Result<ConversationKey> {
        keyring::resolve_or_create(&self.db, a, b)
    }

    pub fn set_pin(&self, owner: &str, partner: &str, pin: &str) -> Result<()> {
        gate::set_pin(&self.db, owner, partner, pin)
    }

    pub fn is_pin_set(&self, owner: &str, partner: &str) -> Result<bool> {
        gate::is_pin_set(&self.db, owner, partner)
    }

    pub fn verify_pin(&self, owner: &str, partner: &str, attempt: &str) -> Result<bool> {
        gate::verify_pin(&self.db, owner, partner, attempt)
    }

    pub fn send_text(&self, sender: &str, receiver: &str, text: &str) -> Result<i64> {
        store::append(
            &self.db,
            &self.blobs,
            sender,
            receiver,
            OutgoingContent::Text(text),
        )
    }

    /// Encrypt and store a binary attachment. The declared MIME type is
    /// reduced to a validated category before it touches storage.
    pub fn send_attachment(
        &self,
        sender: &str,
        receiver: &str,
        bytes: &[u8],
        filename: &str,
        mime: &str,
    ) -> Result<i64> {
        store::append(
            &self.db,
            &self.blobs,
            sender,
            receiver,
            OutgoingContent::Attachment {
                bytes,
                filename,
                kind: AttachmentKind::from_mime(mime),
            },
        )
    }

    pub fn list_ordered(&self, a: &str, b: &str) -> Result<Vec<MessageRecord>> {
        store::list_ordered(&self.db, a, b)
    }

    pub fn read_text(&self, key: &ConversationKey, record: &MessageRecord) -> TextContent {
        store::decode_text(key, record)
    }

    pub fn fetch_attachment(
        &self,
        key: &ConversationKey,
        record: &MessageRecord,
    ) -> Result<Attachment> {
        store::open_attachment(&self.blobs, key, record)
    }
}
