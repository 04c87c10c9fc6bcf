//! Ferrous DoH Domain Layer
pub mod config;
pub mod errors;
pub mod transport;
pub mod zone;

pub use config::{CliOverrides, Config};
pub use errors::DomainError;
pub use transport::Transport;
