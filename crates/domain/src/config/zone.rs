use crate::transport::Transport;
use serde::{Deserialize, Serialize};
use std::net::{IpAddr, SocketAddr};

/// One server block: a zone and the handler answering queries below it.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneConfig {
    pub zone: String,

    pub handler: HandlerConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HandlerConfig {
    /// Relay queries to upstream resolvers
    Forward {
        upstreams: Vec<String>,

        #[serde(default = "default_forward_timeout_ms")]
        timeout_ms: u64,
    },

    /// Answer with the client's own address
    Whoami,
}

impl HandlerConfig {
    pub fn kind(&self) -> &'static str {
        match self {
            HandlerConfig::Forward { .. } => "forward",
            HandlerConfig::Whoami => "whoami",
        }
    }
}

fn default_forward_timeout_ms() -> u64 {
    2000
}

/// Parses `ip:port` or a bare `ip`, which gets the plain DNS port.
pub fn parse_upstream(s: &str) -> Result<SocketAddr, String> {
    if let Ok(addr) = s.parse::<SocketAddr>() {
        return Ok(addr);
    }
    let bare = s.trim_start_matches('[').trim_end_matches(']');
    bare.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, Transport::Dns.default_port()))
        .map_err(|_| format!("Invalid upstream address '{}'. Expected IP or IP:PORT", s))
}
