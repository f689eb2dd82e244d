//! Persistent lock ownership: the owner identifier and a diagnostic state
//! byte, kept across restarts.

#[cfg(test)]
use mockall::automock;
use serde::Deserialize;
use serde::Serialize;

use crate::LockState;
use crate::OwnerId;
use crate::StorageResult;

/// The single persisted record. `save_owner` and `save_state` are separate
/// writes, but each one replaces the whole record atomically, so a crash can
/// never leave a partially written owner behind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockRecord {
    pub owner: OwnerId,
    /// Last known [`LockState`] byte. Diagnostic only, never trusted on boot.
    pub state: u8,
}

impl Default for LockRecord {
    fn default() -> Self {
        Self {
            owner: OwnerId::ZERO,
            state: LockState::Unknown.as_u8(),
        }
    }
}

#[cfg_attr(test, automock)]
pub trait OwnershipStore: Send + Sync + 'static {
    /// `Ok(None)` when nothing was ever stored, which callers treat as the
    /// zero owner.
    fn load_owner(&self) -> StorageResult<Option<OwnerId>>;

    /// Durable once it returns `Ok`.
    fn save_owner(
        &self,
        owner: OwnerId,
    ) -> StorageResult<()>;

    fn load_state(&self) -> StorageResult<Option<u8>>;

    fn save_state(
        &self,
        state: u8,
    ) -> StorageResult<()>;
}
