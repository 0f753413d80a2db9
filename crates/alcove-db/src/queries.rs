use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};
use tracing::debug;

use alcove_types::{PeerPair, PinSlot};

use crate::Database;
use crate::models::{ConversationRow, MessageRow};

/// Field set for one message insert. Exactly one of `ciphertext` and
/// `blob_ref` is expected to be present; the core layer enforces that
/// before reaching here.
pub struct NewMessage<'a> {
    pub sender: &'a str,
    pub receiver: &'a str,
    pub kind: &'a str,
    pub ciphertext: Option<&'a [u8]>,
    pub blob_ref: Option<&'a str>,
    pub display_name: Option<&'a str>,
}

impl Database {
    // -- Conversations --

    /// Insert a conversation row for the pair. Returns false when another
    /// session already created it (UNIQUE constraint); the caller re-reads
    /// the winning row instead of failing.
    pub fn create_conversation(&self, pair: &PeerPair, key: &[u8]) -> Result<bool> {
        self.with_conn(|conn| {
            let res = conn.execute(
                "INSERT INTO conversations (peer_low, peer_high, shared_key) VALUES (?1, ?2, ?3)",
                rusqlite::params![pair.low(), pair.high(), key],
            );
            match res {
                Ok(_) => Ok(true),
                Err(e) if is_unique_violation(&e) => {
                    debug!("conversation {}|{} already exists", pair.low(), pair.high());
                    Ok(false)
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_conversation(&self, pair: &PeerPair) -> Result<Option<ConversationRow>> {
        self.with_conn(|conn| query_conversation(conn, pair))
    }

    /// Overwrite one participant's PIN digest; the partner's slot is never
    /// touched. Pass `None` to clear.
    pub fn set_pin_hash(&self, pair: &PeerPair, slot: PinSlot, digest: Option<&str>) -> Result<()> {
        self.with_conn(|conn| {
            let sql = match slot {
                PinSlot::Low => {
                    "UPDATE conversations SET pin_low = ?1 WHERE peer_low = ?2 AND peer_high = ?3"
                }
                PinSlot::High => {
                    "UPDATE conversations SET pin_high = ?1 WHERE peer_low = ?2 AND peer_high = ?3"
                }
            };
            conn.execute(sql, rusqlite::params![digest, pair.low(), pair.high()])?;
            Ok(())
        })
    }

    // -- Messages --

    /// Append one message record. Returns the assigned row id.
    pub fn insert_message(&self, pair: &PeerPair, msg: &NewMessage<'_>) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO messages
                     (peer_low, peer_high, sender, receiver, kind, ciphertext, blob_ref, display_name)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    pair.low(),
                    pair.high(),
                    msg.sender,
                    msg.receiver,
                    msg.kind,
                    msg.ciphertext,
                    msg.blob_ref,
                    msg.display_name,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// All messages for the pair, oldest first. The row id breaks timestamp
    /// ties, so listing order always matches insertion order.
    pub fn list_messages(&self, pair: &PeerPair) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender, receiver, kind, ciphertext, blob_ref, display_name, created_at
                 FROM messages
                 WHERE peer_low = ?1 AND peer_high = ?2
                 ORDER BY created_at ASC, id ASC",
            )?;

            let rows = stmt
                .query_map([pair.low(), pair.high()], |row| {
                    Ok(MessageRow {
                        id: row.get(0)?,
                        sender: row.get(1)?,
                        receiver: row.get(2)?,
                        kind: row.get(3)?,
                        ciphertext: row.get(4)?,
                        blob_ref: row.get(5)?,
                        display_name: row.get(6)?,
                        created_at: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }
}

fn query_conversation(conn: &Connection, pair: &PeerPair) -> Result<Option<ConversationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, peer_low, peer_high, shared_key, pin_low, pin_high, created_at
         FROM conversations
         WHERE peer_low = ?1 AND peer_high = ?2",
    )?;

    let row = stmt
        .query_row([pair.low(), pair.high()], |row| {
            Ok(ConversationRow {
                id: row.get(0)?,
                peer_low: row.get(1)?,
                peer_high: row.get(2)?,
                shared_key: row.get(3)?,
                pin_low: row.get(4)?,
                pin_high: row.get(5)?,
                created_at: row.get(6)?,
            })
        })
        .optional()?;

    Ok(row)
}

fn is_unique_violation(err: &rusqlite::Error) -> bool {
    matches!(
        err,
        rusqlite::Error::SqliteFailure(e, _)
            if e.code == rusqlite::ErrorCode::ConstraintViolation
    )
}
