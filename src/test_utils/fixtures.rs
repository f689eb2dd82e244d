use std::sync::Arc;

use crate::LockController;
use crate::LockState;
use crate::MemOwnershipStore;
use crate::OwnerId;
use crate::PhysicalPosition;
use crate::SimulatedBoard;

/// Controller wired to an in-memory store and a simulated board.
pub struct SimulatedLock {
    pub controller: Arc<LockController>,
    pub board: Arc<SimulatedBoard>,
    pub store: Arc<MemOwnershipStore>,
}

impl SimulatedLock {
    pub fn new(
        position: PhysicalPosition,
        persisted_owner: Option<OwnerId>,
    ) -> Self {
        let board = Arc::new(SimulatedBoard::new(position));
        let store = Arc::new(match persisted_owner {
            Some(owner) => MemOwnershipStore::with_owner(owner),
            None => MemOwnershipStore::new(),
        });
        let controller = Arc::new(LockController::new(store.clone(), board.clone(), board.clone()));
        Self {
            controller,
            board,
            store,
        }
    }

    /// Booted with no owner and the lock closed.
    pub fn unclaimed() -> Self {
        let lock = Self::new(PhysicalPosition::Closed, None);
        lock.controller.initialize().unwrap();
        lock
    }

    /// Claimed by `owner` through the regular claim flow, lock closed.
    pub fn claimed_by(owner: OwnerId) -> Self {
        let lock = Self::unclaimed();
        lock.controller.request_claim(owner).unwrap();
        lock.physical(PhysicalPosition::Open);
        lock.physical(PhysicalPosition::Closed);
        assert_eq!(lock.controller.get_state(), LockState::Claimed);
        lock
    }

    pub fn requested_claim(owner: OwnerId) -> Self {
        let lock = Self::unclaimed();
        lock.controller.request_claim(owner).unwrap();
        lock
    }

    pub fn requested_release(owner: OwnerId) -> Self {
        let lock = Self::claimed_by(owner);
        lock.controller.request_release(owner).unwrap();
        lock
    }

    /// Booted with a persisted owner but the lock open.
    pub fn support(owner: OwnerId) -> Self {
        let lock = Self::new(PhysicalPosition::Open, Some(owner));
        assert!(lock.controller.initialize().is_err());
        lock
    }

    /// Moves the simulated mechanism and feeds the debounced reading straight
    /// to the controller.
    pub fn physical(
        &self,
        position: PhysicalPosition,
    ) -> LockState {
        self.board.set_position(position);
        self.controller
            .on_position_changed(position)
            .expect("store accepts writes")
    }
}
