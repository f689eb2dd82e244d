//! Lock Controller Error Hierarchy
//!
//! [`Error`] covers node startup and the daemon: infrastructure (storage,
//! background tasks) and configuration. The lock state machine and the
//! protocol payload decoding return their own error types.

use config::ConfigError;
use tokio::task::JoinError;

use crate::LockState;
use crate::OwnerId;

#[doc(hidden)]
pub type Result<T> = std::result::Result<T, Error>;

/// Result type returned by [`crate::OwnershipStore`] implementations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Infrastructure-level failures (storage, background tasks)
    #[error(transparent)]
    System(#[from] SystemError),

    /// Configuration loading failures
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Configuration validation failures
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Unrecoverable failures requiring process termination
    #[error("Fatal error: {0}")]
    Fatal(String),
}

#[derive(Debug, thiserror::Error)]
pub enum SystemError {
    #[error("Storage operation failed: {0}")]
    Storage(#[from] StorageError),

    #[error("Background task error: {0}")]
    Task(#[from] TaskError),

    #[error("Node failed to start: {0}")]
    NodeStartFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum TaskError {
    #[error("Task failed to complete: {0}")]
    TaskFailed(#[from] JoinError),

    #[error("{0}")]
    SignalSendFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Disk I/O failures
    #[error(transparent)]
    IoError(#[from] std::io::Error),

    /// Serialization failures for persisted data
    #[error(transparent)]
    BincodeError(#[from] bincode::Error),

    /// A persisted record could not be decoded
    #[error("Data corruption detected at {location}")]
    DataCorruption { location: String },

    /// Embedded database errors
    #[error("Embedded database error: {0}")]
    DbError(String),

    /// The backing store refused the operation
    #[error("Store unavailable: {0}")]
    Unavailable(String),
}

/// Reasons a claim or release request is refused. A rejected request has no
/// side effects on the lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum LockError {
    #[error("Request does not apply in state {state}")]
    InvalidState { state: LockState },

    #[error("Release requested by a non-owner")]
    OwnerMismatch,

    #[error("The all-zero owner identifier cannot claim the lock")]
    NullOwner,
}

/// Failures of [`crate::LockController::initialize`].
#[derive(Debug, thiserror::Error)]
pub enum InitFault {
    #[error("Lock service already initialized")]
    AlreadyInitialized,

    /// The lock was found open while owned: the controller is in `Support`
    /// and the alarm is asserted.
    #[error("Lock owned by {owner} was found open at boot")]
    Tampered { owner: OwnerId },

    #[error("Failed to load lock ownership: {0}")]
    Store(#[source] StorageError),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("Owner payload of {0} bytes is neither a 16-byte id nor a textual uuid")]
    InvalidOwnerLength(usize),

    #[error("Owner payload is not a valid uuid: {0}")]
    InvalidOwnerText(String),
}

// ============== Conversion Implementations ============== //
impl From<StorageError> for Error {
    fn from(e: StorageError) -> Self {
        Error::System(SystemError::Storage(e))
    }
}

impl From<TaskError> for Error {
    fn from(e: TaskError) -> Self {
        Error::System(SystemError::Task(e))
    }
}

impl From<sled::Error> for StorageError {
    fn from(err: sled::Error) -> Self {
        StorageError::DbError(err.to_string())
    }
}

impl From<sled::Error> for Error {
    fn from(err: sled::Error) -> Self {
        StorageError::from(err).into()
    }
}

impl From<JoinError> for Error {
    fn from(err: JoinError) -> Self {
        TaskError::TaskFailed(err).into()
    }
}
