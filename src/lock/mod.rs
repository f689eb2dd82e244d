mod controller;
mod types;

pub use controller::*;
pub use types::*;

#[cfg(test)]
mod types_test;
