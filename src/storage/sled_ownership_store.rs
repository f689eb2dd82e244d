use tracing::debug;
use tracing::error;
use tracing::warn;

use crate::constants::LOCK_RECORD_KEY;
use crate::constants::LOCK_SERVICE_TREE;
use crate::LockRecord;
use crate::OwnerId;
use crate::OwnershipStore;
use crate::StorageError;
use crate::StorageResult;

#[derive(Clone)]
pub struct SledOwnershipStore {
    tree: sled::Tree,
}

impl std::fmt::Debug for SledOwnershipStore {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        f.debug_struct("SledOwnershipStore")
            .field("tree_len", &self.tree.len())
            .finish()
    }
}

impl SledOwnershipStore {
    pub fn new(db: &sled::Db) -> StorageResult<Self> {
        let tree = db.open_tree(LOCK_SERVICE_TREE).map_err(|e| {
            error!("Failed to open lock service db tree: {}", e);
            StorageError::from(e)
        })?;
        Ok(SledOwnershipStore { tree })
    }

    fn read_record(&self) -> StorageResult<Option<LockRecord>> {
        match self.tree.get(LOCK_RECORD_KEY)? {
            Some(ivec) => bincode::deserialize::<LockRecord>(&ivec).map(Some).map_err(|e| {
                error!("lock record deserialize error: {}", e);
                Self::corruption()
            }),
            None => Ok(None),
        }
    }

    fn corruption() -> StorageError {
        StorageError::DataCorruption {
            location: format!("{}/{}", LOCK_SERVICE_TREE, LOCK_RECORD_KEY),
        }
    }

    /// Atomic read-modify-write of the whole record followed by a flush. Only
    /// an owner write may replace a corrupted record; a state byte alone must
    /// not reset the owner.
    ///
    /// `f` may run more than once when another writer wins the race.
    fn update(
        &self,
        replace_corrupted: bool,
        f: impl Fn(&mut LockRecord),
    ) -> StorageResult<()> {
        let mut failure: Option<StorageError> = None;
        self.tree.fetch_and_update(LOCK_RECORD_KEY, |current| {
            failure = None;
            let mut record = match current.map(bincode::deserialize::<LockRecord>) {
                None => LockRecord::default(),
                Some(Ok(record)) => record,
                Some(Err(e)) if replace_corrupted => {
                    warn!("overwriting corrupted lock record: {}", e);
                    LockRecord::default()
                }
                Some(Err(e)) => {
                    error!("lock record deserialize error: {}", e);
                    failure = Some(Self::corruption());
                    return current.map(<[u8]>::to_vec);
                }
            };
            f(&mut record);
            match bincode::serialize(&record) {
                Ok(bytes) => Some(bytes),
                Err(e) => {
                    failure = Some(e.into());
                    current.map(<[u8]>::to_vec)
                }
            }
        })?;
        if let Some(e) = failure {
            return Err(e);
        }

        let flushed = self.tree.flush()?;
        debug!("lock record persisted, bytes flushed: {}", flushed);
        Ok(())
    }
}

impl OwnershipStore for SledOwnershipStore {
    fn load_owner(&self) -> StorageResult<Option<OwnerId>> {
        Ok(self.read_record()?.map(|record| record.owner))
    }

    fn save_owner(
        &self,
        owner: OwnerId,
    ) -> StorageResult<()> {
        self.update(true, |record| record.owner = owner)
    }

    fn load_state(&self) -> StorageResult<Option<u8>> {
        Ok(self.read_record()?.map(|record| record.state))
    }

    fn save_state(
        &self,
        state: u8,
    ) -> StorageResult<()> {
        self.update(false, |record| record.state = state)
    }
}
