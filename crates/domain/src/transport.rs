use std::fmt;
use std::str::FromStr;

/// Default port for plain DNS.
pub const PORT: u16 = 53;
/// Default port for DNS-over-TLS.
pub const TLS_PORT: u16 = 853;
/// Default port for DNS-over-gRPC.
pub const GRPC_PORT: u16 = 443;
/// Default port for DNS-over-HTTPS.
pub const HTTPS_PORT: u16 = 443;
/// Default port for DNS-over-HTTP.
pub const HTTP_PORT: u16 = 80;

/// Transports a server block can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Transport {
    Dns,
    Tls,
    Grpc,
    Https,
    Http,
}

impl Transport {
    pub const ALL: [Transport; 5] = [
        Transport::Dns,
        Transport::Tls,
        Transport::Grpc,
        Transport::Https,
        Transport::Http,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Transport::Dns => "dns",
            Transport::Tls => "tls",
            Transport::Grpc => "grpc",
            Transport::Https => "https",
            Transport::Http => "http",
        }
    }

    pub const fn default_port(&self) -> u16 {
        match self {
            Transport::Dns => PORT,
            Transport::Tls => TLS_PORT,
            Transport::Grpc => GRPC_PORT,
            Transport::Https => HTTPS_PORT,
            Transport::Http => HTTP_PORT,
        }
    }

    /// URI scheme prefix, e.g. `http://`.
    pub const fn scheme(&self) -> &'static str {
        match self {
            Transport::Dns => "dns://",
            Transport::Tls => "tls://",
            Transport::Grpc => "grpc://",
            Transport::Https => "https://",
            Transport::Http => "http://",
        }
    }
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Transport::ALL
            .into_iter()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "Unknown transport '{}'. Expected one of: dns, tls, grpc, https, http",
                    s
                )
            })
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Host and port of a `host:port` string. Bracketed IPv6 hosts are unwrapped.
pub fn split_host_port(s: &str) -> Option<(&str, &str)> {
    if let Some(rest) = s.strip_prefix('[') {
        let end = rest.find(']')?;
        let host = &rest[..end];
        let port = rest[end + 1..].strip_prefix(':')?;
        return Some((host, port));
    }
    let (host, port) = s.rsplit_once(':')?;
    if host.contains(':') {
        // unbracketed IPv6 literal
        return None;
    }
    Some((host, port))
}

/// Splits `proto://host:port` (or `host:port`) into its three parts.
///
/// The protocol is empty when the address carries no scheme, the host is
/// empty for wildcard binds such as `:8053`.
pub fn split_protocol_host_port(address: &str) -> Result<(&str, &str, &str), String> {
    let parts: Vec<&str> = address.split("://").collect();
    let (protocol, host_port) = match parts.as_slice() {
        [host_port] => ("", *host_port),
        [protocol, host_port] => (*protocol, *host_port),
        _ => {
            return Err(format!(
                "provided value is not in an address format: {}",
                address
            ))
        }
    };

    let (host, port) = split_host_port(host_port)
        .ok_or_else(|| format!("missing port in address: {}", address))?;
    Ok((protocol, host, port))
}
