//! Conversation key resolution: one persistent key per participant pair.

use anyhow::anyhow;
use tracing::debug;

use alcove_crypto::ConversationKey;
use alcove_db::Database;
use alcove_types::PeerPair;

use crate::error::{ChatError, Result};

/// Fetch the pair's key, creating it on first contact. Argument order
/// never matters; both sides resolve the same record.
///
/// Lookup-then-create is not atomic, so simultaneous first contact from
/// both participants can race. The UNIQUE constraint on the canonical pair
/// decides the winner; the loser re-reads the winning row here and the
/// conflict never leaves this function.
pub fn resolve_or_create(db: &Database, a: &str, b: &str) -> Result<ConversationKey> {
    let pair = PeerPair::new(a, b);

    if let Some(row) = db.get_conversation(&pair).map_err(ChatError::Storage)? {
        return ConversationKey::from_bytes(&row.shared_key).map_err(ChatError::Storage);
    }

    let key = ConversationKey::generate();
    if db
        .create_conversation(&pair, key.as_bytes())
        .map_err(ChatError::Storage)?
    {
        debug!("created conversation key for {}|{}", pair.low(), pair.high());
        return Ok(key);
    }

    // Lost the first-contact race; the winner's key is authoritative.
    let row = db
        .get_conversation(&pair)
        .map_err(ChatError::Storage)?
        .ok_or_else(|| ChatError::Storage(anyhow!("conversation vanished after insert conflict")))?;
    ConversationKey::from_bytes(&row.shared_key).map_err(ChatError::Storage)
}
