//! Sensor event pipeline: interrupt edges are queued without blocking,
//! debounced by a single worker and handed to the lock controller.
mod debouncer;
mod event;
mod worker;

pub use debouncer::*;
pub use event::*;
pub use worker::*;

#[cfg(test)]
mod debouncer_test;
