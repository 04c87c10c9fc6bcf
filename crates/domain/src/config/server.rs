use crate::transport::Transport;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    /// Listen address with transport scheme, e.g. `http://0.0.0.0:8053`
    #[serde(default = "default_address")]
    pub address: String,

    /// Suppress the startup banner
    #[serde(default)]
    pub quiet: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: default_address(),
            quiet: false,
        }
    }
}

fn default_address() -> String {
    format!(
        "{}0.0.0.0:{}",
        Transport::Http.scheme(),
        Transport::Http.default_port()
    )
}
