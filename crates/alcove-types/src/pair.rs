use serde::{Deserialize, Serialize};

/// A participant pair ordered deterministically, so `(a, b)` and `(b, a)`
/// address the same conversation record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeerPair {
    low: String,
    high: String,
}

/// A participant's fixed position after canonical ordering. Selects which
/// of the two PIN slots on a conversation belongs to a given user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinSlot {
    Low,
    High,
}

impl PeerPair {
    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        Self::anchored(a, b).0
    }

    /// Canonicalize and also report which slot the first argument landed
    /// in. Used wherever an operation acts on one participant's own slot.
    pub fn anchored(owner: impl Into<String>, partner: impl Into<String>) -> (Self, PinSlot) {
        let (owner, partner) = (owner.into(), partner.into());
        if owner <= partner {
            (
                Self {
                    low: owner,
                    high: partner,
                },
                PinSlot::Low,
            )
        } else {
            (
                Self {
                    low: partner,
                    high: owner,
                },
                PinSlot::High,
            )
        }
    }

    pub fn low(&self) -> &str {
        &self.low
    }

    pub fn high(&self) -> &str {
        &self.high
    }

    /// Slot owned by `user`, or `None` for a non-member.
    pub fn slot_of(&self, user: &str) -> Option<PinSlot> {
        if user == self.low {
            Some(PinSlot::Low)
        } else if user == self.high {
            Some(PinSlot::High)
        } else {
            None
        }
    }

    pub fn contains(&self, user: &str) -> bool {
        self.slot_of(user).is_some()
    }
}
