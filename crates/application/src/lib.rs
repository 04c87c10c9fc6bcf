//! Ferrous DoH Application Layer
pub mod ports;
pub mod server;
pub mod services;

pub use server::{startup_zones, RequestContext, Server, ZoneSite};
