//! Handlers that can be attached to a zone.

pub mod forward;
pub mod whoami;

pub use forward::ForwardHandler;
pub use whoami::WhoamiHandler;
