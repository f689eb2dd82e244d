//! Controller for a remotely claimable physical lock.
//!
//! The lock is claimed and released over a wireless attribute interface
//! ([`ProtocolBridge`]), confirmed by the user physically closing or opening
//! it (debounced through [`DebounceWorker`]), persisted across power loss
//! ([`OwnershipStore`]) and guarded by a tamper alarm while claimed.
//! [`LockController`] owns the state machine; [`LockNodeBuilder`] wires the
//! pieces together.
mod config;
mod console;
mod constants;
mod errors;
mod hardware;
mod lock;
mod metrics;
mod node;
mod protocol;
mod sensor;
mod storage;

pub use config::*;
pub use console::*;
pub use errors::*;
pub use hardware::*;
pub use lock::*;
pub use metrics::*;
pub use node::*;
pub use protocol::*;
pub use sensor::*;
pub use storage::*;

//-----------------------------------------------------------
// Test utils

#[cfg(test)]
pub mod test_utils;
