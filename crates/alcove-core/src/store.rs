//! The message store: append-only encrypted records per conversation.
//!
//! The store never decrypts on the read path — `list_ordered` hands back
//! ciphertext and blob references, and the decode helpers below exchange
//! them for plaintext under the caller's resolved key.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::{debug, warn};

use alcove_crypto::{ConversationKey, decrypt_payload, encrypt_payload};
use alcove_db::{Database, NewMessage, models::MessageRow};
use alcove_types::{AttachmentKind, ContentKind, MessageRecord, Payload, PeerPair};

use crate::blobs::BlobStore;
use crate::error::{ChatError, Result};
use crate::keyring;

/// Rendered in place of a text message whose token was rejected.
pub const UNREADABLE_PLACEHOLDER: &str = "⚠ this message could not be decrypted";

/// Exactly one payload per append; "both" or "neither" cannot be
/// expressed.
pub enum OutgoingContent<'a> {
    Text(&'a str),
    Attachment {
        bytes: &'a [u8],
        filename: &'a str,
        kind: AttachmentKind,
    },
}

/// Encrypt and append one message. Returns the record id.
///
/// Attachment blobs are written before the record is inserted: if the blob
/// write fails, no record exists at all.
pub fn append(
    db: &Database,
    blobs: &BlobStore,
    sender: &str,
    receiver: &str,
    content: OutgoingContent<'_>,
) -> Result<i64> {
    let empty = match &content {
        OutgoingContent::Text(text) => text.is_empty(),
        OutgoingContent::Attachment { bytes, .. } => bytes.is_empty(),
    };
    if empty {
        return Err(ChatError::EmptyContent);
    }

    let key = keyring::resolve_or_create(db, sender, receiver)?;
    let pair = PeerPair::new(sender, receiver);

    let id = match content {
        OutgoingContent::Text(text) => {
            let token = encrypt_payload(&key, text.as_bytes()).map_err(ChatError::Storage)?;
            db.insert_message(
                &pair,
                &NewMessage {
                    sender,
                    receiver,
                    kind: ContentKind::Text.as_str(),
                    ciphertext: Some(&token),
                    blob_ref: None,
                    display_name: None,
                },
            )
            .map_err(ChatError::Storage)?
        }
        OutgoingContent::Attachment {
            bytes,
            filename,
            kind,
        } => {
            let token = encrypt_payload(&key, bytes).map_err(ChatError::Storage)?;
            let blob_ref = blobs.write(&token)?;
            db.insert_message(
                &pair,
                &NewMessage {
                    sender,
                    receiver,
                    kind: ContentKind::from(kind).as_str(),
                    ciphertext: None,
                    blob_ref: Some(&blob_ref),
                    display_name: Some(filename),
                },
            )
            .map_err(ChatError::Storage)?
        }
    };

    debug!("appended message {} from {} to {}", id, sender, receiver);
    Ok(id)
}

/// All messages between the pair, oldest first (insertion order on
/// timestamp ties). Ciphertext only; nothing here is decrypted.
pub fn list_ordered(db: &Database, a: &str, b: &str) -> Result<Vec<MessageRecord>> {
    let pair = PeerPair::new(a, b);
    let rows = db.list_messages(&pair).map_err(ChatError::Storage)?;
    rows.into_iter().map(record_from_row).collect()
}

/// Outcome of decoding a text record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TextContent {
    Plain(String),
    /// Token rejected; render [`UNREADABLE_PLACEHOLDER`] instead.
    Unreadable,
}

impl TextContent {
    pub fn display(&self) -> &str {
        match self {
            TextContent::Plain(text) => text,
            TextContent::Unreadable => UNREADABLE_PLACEHOLDER,
        }
    }
}

/// Decode an inline text record. A rejected token becomes a placeholder
/// value — decryption failure never escalates past this boundary, and no
/// partial plaintext survives it.
pub fn decode_text(key: &ConversationKey, record: &MessageRecord) -> TextContent {
    let Payload::Inline(token) = &record.payload else {
        warn!("text decode requested for attachment record {}", record.id);
        return TextContent::Unreadable;
    };
    match decrypt_payload(key, token).map(String::from_utf8) {
        Ok(Ok(text)) => TextContent::Plain(text),
        Ok(Err(_)) | Err(_) => {
            warn!("rejected ciphertext on message {}", record.id);
            TextContent::Unreadable
        }
    }
}

/// A decrypted attachment ready for the presentation layer.
#[derive(Debug, Clone, Serialize)]
pub struct Attachment {
    pub bytes: Vec<u8>,
    pub display_name: String,
    pub kind: ContentKind,
}

/// Fetch and decode an attachment record. "Blob missing" and "token
/// rejected" stay distinct errors so callers can report them apart.
pub fn open_attachment(
    blobs: &BlobStore,
    key: &ConversationKey,
    record: &MessageRecord,
) -> Result<Attachment> {
    let Payload::Stored {
        blob_ref,
        display_name,
    } = &record.payload
    else {
        return Err(ChatError::MalformedRecord(record.id));
    };

    let token = blobs.read(blob_ref)?;
    let bytes = decrypt_payload(key, &token)?;
    Ok(Attachment {
        bytes,
        display_name: display_name.clone(),
        kind: record.kind,
    })
}

fn record_from_row(row: MessageRow) -> Result<MessageRecord> {
    let kind =
        ContentKind::from_tag(&row.kind).ok_or_else(|| ChatError::UnknownKind(row.kind.clone()))?;

    let payload = match kind {
        ContentKind::Text => Payload::Inline(
            row.ciphertext.ok_or(ChatError::MalformedRecord(row.id))?,
        ),
        ContentKind::Image | ContentKind::File => Payload::Stored {
            blob_ref: row.blob_ref.ok_or(ChatError::MalformedRecord(row.id))?,
            display_name: row.display_name.unwrap_or_default(),
        },
    };

    Ok(MessageRecord {
        id: row.id,
        sender: row.sender,
        receiver: row.receiver,
        kind,
        sent_at: parse_row_timestamp(&row.created_at)?,
        payload,
    })
}

// SQLite's datetime('now') format, always UTC.
fn parse_row_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| ChatError::Storage(anyhow::anyhow!("bad timestamp {:?}: {}", raw, e)))
}
