//! Per-user, per-conversation PIN gate.
//!
//! Each participant owns one slot on the conversation row; setting or
//! checking a PIN never touches the partner's slot. There is no attempt
//! limiting: the gate is a convenience lock, not an auth boundary.

use alcove_crypto::pin;
use alcove_db::Database;
use alcove_types::PeerPair;

use crate::error::{ChatError, Result};
use crate::keyring;

/// Set or replace `owner`'s PIN for the chat with `partner`.
///
/// The conversation row is resolved first so a PIN can be set before the
/// first message is ever sent.
pub fn set_pin(db: &Database, owner: &str, partner: &str, pin: &str) -> Result<()> {
    if !pin::validate_pin(pin) {
        return Err(ChatError::InvalidPin);
    }

    keyring::resolve_or_create(db, owner, partner)?;

    let (pair, slot) = PeerPair::anchored(owner, partner);
    db.set_pin_hash(&pair, slot, Some(&pin::hash_pin(pin)))
        .map_err(ChatError::Storage)
}

/// True iff `owner` has a PIN on this chat. A missing conversation row
/// means no PIN, not an error.
pub fn is_pin_set(db: &Database, owner: &str, partner: &str) -> Result<bool> {
    let (pair, slot) = PeerPair::anchored(owner, partner);
    let row = db.get_conversation(&pair).map_err(ChatError::Storage)?;
    Ok(row.is_some_and(|row| row.pin_digest(slot).is_some()))
}

/// Check an unlock attempt against `owner`'s stored digest. Absent rows,
/// absent digests, and malformed attempts all come back false, never an
/// error.
pub fn verify_pin(db: &Database, owner: &str, partner: &str, attempt: &str) -> Result<bool> {
    let (pair, slot) = PeerPair::anchored(owner, partner);
    let row = db.get_conversation(&pair).map_err(ChatError::Storage)?;
    Ok(row
        .as_ref()
        .and_then(|row| row.pin_digest(slot))
        .is_some_and(|digest| pin::verify_pin(digest, attempt)))
}
