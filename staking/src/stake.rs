//! Stake records and lock arithmetic.

use agora_types::Timestamp;
use serde::{Deserialize, Serialize};

/// Locked balance of one account for one purpose.
///
/// Records are created on first stake and never removed; a fully unstaked
/// record stays behind at zero with its last unlock time.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakeRecord {
    pub amount: u128,
    pub unlock_at: Timestamp,
}

impl StakeRecord {
    /// Whether the record can be withdrawn from at `now`.
    pub fn is_unlocked(&self, now: Timestamp) -> bool {
        now >= self.unlock_at
    }
}

/// Extend a lock without ever shortening it.
pub fn extend_lock(current: Timestamp, now: Timestamp, lock_secs: u64) -> Timestamp {
    current.max(now.saturating_add(lock_secs))
}
