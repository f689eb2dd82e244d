use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;

use parking_lot::RwLock;

use crate::LockRecord;
use crate::OwnerId;
use crate::OwnershipStore;
use crate::StorageError;
use crate::StorageResult;

/// Volatile ownership store for simulated boards and tests.
///
/// Writes can be switched to fail to exercise the controller's retry paths.
#[derive(Debug, Default)]
pub struct MemOwnershipStore {
    record: RwLock<Option<LockRecord>>,
    fail_writes: AtomicBool,
}

impl MemOwnershipStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_owner(owner: OwnerId) -> Self {
        let store = Self::default();
        *store.record.write() = Some(LockRecord {
            owner,
            ..LockRecord::default()
        });
        store
    }

    pub fn set_write_failure(
        &self,
        fail: bool,
    ) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn record(&self) -> Option<LockRecord> {
        *self.record.read()
    }

    fn update(
        &self,
        f: impl FnOnce(&mut LockRecord),
    ) -> StorageResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Unavailable("write failure injected".into()));
        }
        let mut guard = self.record.write();
        f(guard.get_or_insert_with(LockRecord::default));
        Ok(())
    }
}

impl OwnershipStore for MemOwnershipStore {
    fn load_owner(&self) -> StorageResult<Option<OwnerId>> {
        Ok(self.record.read().map(|record| record.owner))
    }

    fn save_owner(
        &self,
        owner: OwnerId,
    ) -> StorageResult<()> {
        self.update(|record| record.owner = owner)
    }

    fn load_state(&self) -> StorageResult<Option<u8>> {
        Ok(self.record.read().map(|record| record.state))
    }

    fn save_state(
        &self,
        state: u8,
    ) -> StorageResult<()> {
        self.update(|record| record.state = state)
    }
}
