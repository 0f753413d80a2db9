use alcove_types::PinSlot;

/// Database row types — these map directly to SQLite rows and stay
/// independent from the consumer-facing records in alcove-types.
pub struct ConversationRow {
    pub id: i64,
    pub peer_low: String,
    pub peer_high: String,
    pub shared_key: Vec<u8>,
    pub pin_low: Option<String>,
    pub pin_high: Option<String>,
    pub created_at: String,
}

impl ConversationRow {
    /// PIN digest stored in the given slot, if any.
    pub fn pin_digest(&self, slot: PinSlot) -> Option<&str> {
        match slot {
            PinSlot::Low => self.pin_low.as_deref(),
            PinSlot::High => self.pin_high.as_deref(),
        }
    }
}

pub struct MessageRow {
    pub id: i64,
    pub sender: String,
    pub receiver: String,
    pub kind: String,
    pub ciphertext: Option<Vec<u8>>,
    pub blob_ref: Option<String>,
    pub display_name: Option<String>,
    pub created_at: String,
}
