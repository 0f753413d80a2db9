//! Per-viewer session state.
//!
//! Unlocks live only inside this value: drop it or switch partners and
//! every chat is locked again. Nothing here persists, and nothing here is
//! shared between sessions.

use std::collections::HashSet;

use alcove_db::Database;

use crate::error::Result;
use crate::gate;

pub struct Session {
    user: String,
    active: Option<String>,
    unlocked: HashSet<String>,
}

impl Session {
    pub fn new(user: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            active: None,
            unlocked: HashSet::new(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// Make `partner` the active chat. Switching re-locks everything;
    /// re-selecting the current partner changes nothing.
    pub fn switch_to(&mut self, partner: impl Into<String>) {
        let partner = partner.into();
        if self.active.as_deref() != Some(partner.as_str()) {
            self.unlocked.clear();
            self.active = Some(partner);
        }
    }

    /// Try to unlock the chat with `partner`. A failed attempt leaves the
    /// chat locked; there is no attempt limit.
    pub fn unlock(&mut self, db: &Database, partner: &str, attempt: &str) -> Result<bool> {
        if gate::verify_pin(db, &self.user, partner, attempt)? {
            self.unlocked.insert(partner.to_string());
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Whether this viewer may see plaintext for the chat with `partner`:
    /// either no PIN is set, or the chat was unlocked this session.
    pub fn can_view(&self, db: &Database, partner: &str) -> Result<bool> {
        if !gate::is_pin_set(db, &self.user, partner)? {
            return Ok(true);
        }
        Ok(self.unlocked.contains(partner))
    }
}
