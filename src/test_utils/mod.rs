//! Shared fixtures for the unit tests: owner ids, simulated boards and
//! controllers already driven into a given state.
mod common;
mod fixtures;

pub use common::*;
pub use fixtures::*;
