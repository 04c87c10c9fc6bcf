use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DomainError {
    #[error("Invalid zone name: {0}")]
    InvalidZone(String),

    #[error("Zone defined more than once: {0}")]
    DuplicateZone(String),

    #[error("No zones configured for server {0}")]
    NoZones(String),

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),

    #[error("Failed to bind {0}: {1}")]
    BindFailed(String, String),

    #[error("HTTP server error: {0}")]
    ServeFailed(String),

    #[error("A response has already been written for this request")]
    ResponseAlreadyWritten,

    #[error("Failed to encode DNS message: {0}")]
    EncodeFailed(String),

    #[error("Invalid DNS response: {0}")]
    InvalidDnsResponse(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Transport timeout connecting to {server}")]
    TransportTimeout { server: String },

    #[error("All upstream servers are unreachable")]
    TransportAllServersUnreachable,
}
