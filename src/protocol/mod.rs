//! Transport-agnostic adapter between remote attribute reads/writes and the
//! lock controller. The radio stack resolves handles and link security and
//! calls into [`ProtocolBridge`].
mod attributes;
mod bridge;

pub use attributes::*;
pub use bridge::*;
