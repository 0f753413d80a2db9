use sha2::{Digest, Sha256};

/// Chat PINs are exactly four ASCII digits.
pub const PIN_LEN: usize = 4;

pub fn validate_pin(pin: &str) -> bool {
    pin.len() == PIN_LEN && pin.bytes().all(|b| b.is_ascii_digit())
}

/// One-way digest stored in place of the PIN.
pub fn hash_pin(pin: &str) -> String {
    hex::encode(Sha256::digest(pin.as_bytes()))
}

/// Compare an attempt against a stored digest. Malformed attempts never
/// match anything.
pub fn verify_pin(stored: &str, attempt: &str) -> bool {
    if !validate_pin(attempt) {
        return false;
    }
    hash_pin(attempt) == stored
}
