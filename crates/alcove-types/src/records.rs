use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::content::ContentKind;

/// A stored message as handed to consumers. Payloads are always encrypted;
/// decoding is the caller's job, with the pair's resolved conversation key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: i64,
    pub sender: String,
    pub receiver: String,
    pub kind: ContentKind,
    pub sent_at: DateTime<Utc>,
    pub payload: Payload,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Payload {
    /// Ciphertext token stored inline on the record (text messages).
    Inline(Vec<u8>),
    /// Encrypted attachment in the blob store, plus the name to display.
    Stored {
        blob_ref: String,
        display_name: String,
    },
}
