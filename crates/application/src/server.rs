use crate::ports::{DnsHandler, ResponseWriter};
use ferrous_doh_domain::transport::split_protocol_host_port;
use ferrous_doh_domain::zone::{normalize_zone, parent_zone};
use ferrous_doh_domain::DomainError;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::DNSClass;
use std::collections::HashMap;
use std::fmt::Write as _;
use std::sync::Arc;
use tracing::{debug, warn};

/// A zone and the handler answering for it.
#[derive(Clone)]
pub struct ZoneSite {
    pub zone: String,
    pub handler: Arc<dyn DnsHandler>,
}

impl ZoneSite {
    pub fn new(zone: impl Into<String>, handler: Arc<dyn DnsHandler>) -> Self {
        Self {
            zone: zone.into(),
            handler,
        }
    }
}

/// Per-request view of the server handed to handlers.
pub struct RequestContext<'a> {
    server: &'a Server,
    zone: &'a str,
}

impl<'a> RequestContext<'a> {
    pub fn server(&self) -> &'a Server {
        self.server
    }

    /// Zone the query was matched against.
    pub fn zone(&self) -> &'a str {
        self.zone
    }
}

/// Transport-independent DNS server: routes each query to the handler of
/// the most specific zone containing its name.
pub struct Server {
    addr: String,
    zones: HashMap<String, Arc<dyn DnsHandler>>,
}

impl Server {
    pub fn new(addr: impl Into<String>, sites: Vec<ZoneSite>) -> Result<Self, DomainError> {
        let addr = addr.into();
        if sites.is_empty() {
            return Err(DomainError::NoZones(addr));
        }

        let mut zones = HashMap::with_capacity(sites.len());
        for site in sites {
            let zone = normalize_zone(&site.zone)?;
            if zones.contains_key(&zone) {
                return Err(DomainError::DuplicateZone(zone));
            }
            debug!(zone = %zone, handler = site.handler.name(), "Zone registered");
            zones.insert(zone, site.handler);
        }

        Ok(Self { addr, zones })
    }

    pub fn addr(&self) -> &str {
        &self.addr
    }

    /// Served zones in lexical order.
    pub fn zones(&self) -> Vec<&str> {
        let mut zones: Vec<&str> = self.zones.keys().map(String::as_str).collect();
        zones.sort_unstable();
        zones
    }

    fn match_zone(&self, qname: &str) -> Option<(&str, &Arc<dyn DnsHandler>)> {
        let mut current = Some(qname);
        while let Some(name) = current {
            if let Some((zone, handler)) = self.zones.get_key_value(name) {
                return Some((zone.as_str(), handler));
            }
            current = parent_zone(name);
        }
        None
    }

    /// Runs the resolution chain for `request`.
    ///
    /// Replies REFUSED, FORMERR or SERVFAIL itself when no handler can or
    /// will; otherwise the matched handler owns the reply.
    pub async fn serve_dns(&self, writer: &mut dyn ResponseWriter, request: &Message) {
        let Some(query) = request.queries().first() else {
            debug!(id = request.id(), "Request carries no question");
            write_error(writer, request, ResponseCode::FormErr);
            return;
        };

        if query.query_class() != DNSClass::IN {
            debug!(class = ?query.query_class(), "Refusing non-IN query");
            write_error(writer, request, ResponseCode::Refused);
            return;
        }

        let mut qname = query.name().to_ascii().to_ascii_lowercase();
        if !qname.ends_with('.') {
            qname.push('.');
        }

        let Some((zone, handler)) = self.match_zone(&qname) else {
            debug!(name = %qname, "No zone matches query");
            write_error(writer, request, ResponseCode::Refused);
            return;
        };

        let ctx = RequestContext { server: self, zone };
        match handler.serve_dns(&ctx, writer, request).await {
            Ok(rcode) if server_replies_for(rcode) => {
                debug!(name = %qname, zone = %zone, rcode = ?rcode, "Handler left reply to server");
                write_error(writer, request, rcode);
            }
            Ok(_) => {}
            Err(e) => {
                warn!(name = %qname, zone = %zone, handler = handler.name(), error = %e, "Handler failed");
                write_error(writer, request, ResponseCode::ServFail);
            }
        }
    }
}

fn server_replies_for(rcode: ResponseCode) -> bool {
    matches!(
        rcode,
        ResponseCode::ServFail | ResponseCode::Refused | ResponseCode::FormErr | ResponseCode::NotImp
    )
}

fn write_error(writer: &mut dyn ResponseWriter, request: &Message, rcode: ResponseCode) {
    let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
    reply.set_recursion_desired(request.recursion_desired());
    reply.set_response_code(rcode);
    for query in request.queries() {
        reply.add_query(query.clone());
    }

    if let Err(e) = writer.write_msg(reply) {
        debug!(error = %e, rcode = ?rcode, "Error reply dropped");
    }
}

/// Banner lines listing each served zone, e.g. `http://example.org.:8053 on 127.0.0.1`.
pub fn startup_zones(scheme: &str, addr: &str, zones: &[&str]) -> String {
    let mut out = String::new();
    for zone in zones {
        match split_protocol_host_port(addr) {
            Err(_) => {
                let _ = writeln!(out, "{}{}:{}", scheme, zone, addr);
            }
            Ok((_, "", port)) => {
                let _ = writeln!(out, "{}{}:{}", scheme, zone, port);
            }
            Ok((_, ip, port)) => {
                let _ = writeln!(out, "{}{}:{} on {}", scheme, zone, port, ip);
            }
        }
    }
    out
}
