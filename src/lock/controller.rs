//! The lock ownership state machine.
//!
//! [`LockController`] is the only owner of [`LockState`] and the current
//! [`OwnerId`]. Two contexts drive it: the debounce worker through
//! [`LockController::on_position_changed`] and the protocol bridge through
//! [`LockController::request_claim`] / [`LockController::request_release`].
//! Every operation runs under one exclusive lock, store I/O included, so the
//! two never interleave.
//!
//! ```text
//! Unknown --initialize--> Unclaimed | Claimed | Support
//! Unclaimed --request_claim--> RequestedClaim --Closed--> Claimed
//! Claimed --request_release--> RequestedRelease --Open--> Unclaimed
//! Claimed --Open/Closed--> Claimed (alarm on/off)
//! ```

use std::sync::atomic::AtomicU8;
use std::sync::atomic::Ordering;
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::debug;
use tracing::error;
use tracing::info;
use tracing::warn;

use crate::Actuator;
use crate::BoltPosition;
use crate::InitFault;
use crate::LockError;
use crate::LockState;
use crate::OwnerId;
use crate::OwnershipStore;
use crate::PhysicalPosition;
use crate::PositionSensor;
use crate::StorageError;
use crate::REQUEST_REJECTIONS;
use crate::STATE_TRANSITIONS;
use crate::STORE_FAILURES;
use crate::TAMPER_ALARM;

/// Outcome of a successful [`LockController::initialize`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ready {
    pub state: LockState,
    pub owner: OwnerId,
}

/// Outcome of an accepted claim or release request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Accepted {
    /// State entered by the request
    pub state: LockState,
    /// Whether the bolt was commanded open to let the user act on the lock
    pub actuated: bool,
}

#[derive(Debug)]
struct ControllerCore {
    state: LockState,
    owner: OwnerId,
    /// Owner of an in-flight claim; committed on confirmation.
    pending_owner: OwnerId,
    position: PhysicalPosition,
    alarm: bool,
}

pub struct LockController {
    core: Mutex<ControllerCore>,
    /// Lock-free mirror of `core.state`.
    state: AtomicU8,
    state_tx: watch::Sender<LockState>,

    store: Arc<dyn OwnershipStore>,
    actuator: Arc<dyn Actuator>,
    sensor: Arc<dyn PositionSensor>,
}

impl LockController {
    pub fn new(
        store: Arc<dyn OwnershipStore>,
        actuator: Arc<dyn Actuator>,
        sensor: Arc<dyn PositionSensor>,
    ) -> Self {
        let (state_tx, _) = watch::channel(LockState::Unknown);
        Self {
            core: Mutex::new(ControllerCore {
                state: LockState::Unknown,
                owner: OwnerId::ZERO,
                pending_owner: OwnerId::ZERO,
                position: PhysicalPosition::Unknown,
                alarm: false,
            }),
            state: AtomicU8::new(LockState::Unknown.as_u8()),
            state_tx,
            store,
            actuator,
            sensor,
        }
    }

    /// One-time startup: recomputes the state from the persisted owner and
    /// the live position. The persisted state byte is only logged.
    pub fn initialize(&self) -> Result<Ready, InitFault> {
        let mut core = self.core.lock();
        if core.state != LockState::Unknown {
            warn!("initialize called in state {}", core.state);
            return Err(InitFault::AlreadyInitialized);
        }

        let owner = match self.store.load_owner() {
            Ok(Some(owner)) => owner,
            Ok(None) => {
                debug!("no persisted owner, starting unclaimed");
                OwnerId::ZERO
            }
            Err(e) => {
                error!("failed to load lock ownership: {}", e);
                STORE_FAILURES.with_label_values(&["load_owner"]).inc();
                self.transition(&mut core, LockState::Support);
                return Err(InitFault::Store(e));
            }
        };

        match self.store.load_state() {
            Ok(Some(byte)) => debug!("persisted state byte before boot: {}", byte),
            Ok(None) => debug!("no persisted state byte"),
            Err(e) => warn!("failed to load persisted state byte: {}", e),
        }

        let position = self.sensor.read_position();
        core.position = position;
        info!("boot: owner={}, position={}", owner, position);

        if owner.is_zero() {
            self.transition(&mut core, LockState::Unclaimed);
            return Ok(Ready {
                state: LockState::Unclaimed,
                owner,
            });
        }

        core.owner = owner;
        if position == PhysicalPosition::Closed {
            self.transition(&mut core, LockState::Claimed);
            return Ok(Ready {
                state: LockState::Claimed,
                owner,
            });
        }

        error!("lock owned by {} found {} at boot, tampered", owner, position);
        self.transition(&mut core, LockState::Support);
        self.set_alarm(&mut core, true);
        Err(InitFault::Tampered { owner })
    }

    pub fn request_claim(
        &self,
        owner: OwnerId,
    ) -> Result<Accepted, LockError> {
        let mut core = self.core.lock();
        if owner.is_zero() {
            return Err(reject(LockError::NullOwner));
        }
        if core.state != LockState::Unclaimed {
            debug!("claim by {} rejected in state {}", owner, core.state);
            return Err(reject(LockError::InvalidState { state: core.state }));
        }

        core.pending_owner = owner;
        self.transition(&mut core, LockState::RequestedClaim);
        info!("accepted claim from {}", owner);

        let actuated = self.open_if_closed(&mut core);
        Ok(Accepted {
            state: LockState::RequestedClaim,
            actuated,
        })
    }

    pub fn request_release(
        &self,
        owner: OwnerId,
    ) -> Result<Accepted, LockError> {
        let mut core = self.core.lock();
        if core.state != LockState::Claimed {
            debug!("release by {} rejected in state {}", owner, core.state);
            return Err(reject(LockError::InvalidState { state: core.state }));
        }
        if core.owner != owner {
            warn!("release rejected: requester {} is not the owner", owner);
            debug!("current owner {} <=> requester {}", core.owner, owner);
            return Err(reject(LockError::OwnerMismatch));
        }

        self.transition(&mut core, LockState::RequestedRelease);
        info!("accepted release from {}", owner);
        if core.alarm {
            self.set_alarm(&mut core, false);
        }

        let actuated = self.open_if_closed(&mut core);
        Ok(Accepted {
            state: LockState::RequestedRelease,
            actuated,
        })
    }

    /// Applies a debounced position reading and returns the resulting state.
    ///
    /// A store failure while confirming a transient state is returned; the
    /// controller stays in that state and a later reading retries.
    pub fn on_position_changed(
        &self,
        position: PhysicalPosition,
    ) -> Result<LockState, StorageError> {
        let mut core = self.core.lock();
        core.position = position;

        if position == PhysicalPosition::Unknown {
            warn!("position unreadable in state {}, ignored", core.state);
            return Ok(core.state);
        }

        match (core.state, position) {
            (LockState::RequestedClaim, PhysicalPosition::Closed) => {
                let owner = core.pending_owner;
                if let Err(e) = self.store.save_owner(owner) {
                    error!("failed to commit ownership of {}: {}", owner, e);
                    STORE_FAILURES.with_label_values(&["save_owner"]).inc();
                    self.actuator.set_bolt(BoltPosition::Open);
                    return Err(e);
                }
                info!("committed ownership: {}", owner);
                self.actuator.set_bolt(BoltPosition::Closed);
                core.owner = owner;
                core.pending_owner = OwnerId::ZERO;
                self.transition(&mut core, LockState::Claimed);
            }
            (LockState::Claimed, PhysicalPosition::Open) => {
                if !core.alarm {
                    error!("lock owned by {} opened, tamper alarm on", core.owner);
                    self.set_alarm(&mut core, true);
                }
            }
            (LockState::Claimed, PhysicalPosition::Closed) => {
                if core.alarm {
                    info!("lock closed again, alarm off");
                    self.set_alarm(&mut core, false);
                }
            }
            (LockState::RequestedRelease, PhysicalPosition::Open) => {
                if let Err(e) = self.store.save_owner(OwnerId::ZERO) {
                    error!("failed to clear ownership: {}", e);
                    STORE_FAILURES.with_label_values(&["save_owner"]).inc();
                    return Err(e);
                }
                info!("cleared ownership of {}", core.owner);
                core.owner = OwnerId::ZERO;
                self.transition(&mut core, LockState::Unclaimed);
            }
            (state, position) => {
                debug!("position {} has no effect in state {}", position, state);
            }
        }

        Ok(core.state)
    }

    /// Current state without taking the controller lock.
    pub fn get_state(&self) -> LockState {
        LockState::from_u8(self.state.load(Ordering::Acquire)).unwrap_or(LockState::Unknown)
    }

    pub fn owner(&self) -> OwnerId {
        self.core.lock().owner
    }

    pub fn position(&self) -> PhysicalPosition {
        self.core.lock().position
    }

    pub fn alarm_asserted(&self) -> bool {
        self.core.lock().alarm
    }

    /// Receiver updated on every state transition.
    pub fn subscribe(&self) -> watch::Receiver<LockState> {
        self.state_tx.subscribe()
    }

    fn transition(
        &self,
        core: &mut ControllerCore,
        to: LockState,
    ) {
        let from = core.state;
        debug!("lock state {} -> {}", from, to);
        core.state = to;
        self.state.store(to.as_u8(), Ordering::Release);
        self.state_tx.send_replace(to);
        STATE_TRANSITIONS.with_label_values(&[from.as_str(), to.as_str()]).inc();

        if let Err(e) = self.store.save_state(to.as_u8()) {
            warn!("failed to persist state byte {}: {}", to.as_u8(), e);
            STORE_FAILURES.with_label_values(&["save_state"]).inc();
        }
    }

    fn open_if_closed(
        &self,
        core: &mut ControllerCore,
    ) -> bool {
        let position = self.sensor.read_position();
        core.position = position;
        if position == PhysicalPosition::Closed {
            debug!("opening bolt");
            self.actuator.set_bolt(BoltPosition::Open);
            return true;
        }
        false
    }

    fn set_alarm(
        &self,
        core: &mut ControllerCore,
        on: bool,
    ) {
        self.actuator.set_alarm(on);
        core.alarm = on;
        TAMPER_ALARM.set(on as i64);
    }
}

fn reject(e: LockError) -> LockError {
    let reason = match e {
        LockError::InvalidState { .. } => "invalid_state",
        LockError::OwnerMismatch => "owner_mismatch",
        LockError::NullOwner => "null_owner",
    };
    REQUEST_REJECTIONS.with_label_values(&[reason]).inc();
    e
}
