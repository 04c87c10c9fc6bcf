use async_trait::async_trait;
use ferrous_doh_application::ports::{DnsHandler, ResponseWriter};
use ferrous_doh_application::RequestContext;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Writer that keeps every message it is given.
pub struct RecordingWriter {
    pub messages: Vec<Message>,
    local: SocketAddr,
    remote: SocketAddr,
}

impl RecordingWriter {
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            local: "127.0.0.1:8053".parse().unwrap(),
            remote: "192.0.2.10:40000".parse().unwrap(),
        }
    }

    pub fn single(&self) -> &Message {
        assert_eq!(self.messages.len(), 1, "expected exactly one reply");
        &self.messages[0]
    }
}

impl ResponseWriter for RecordingWriter {
    fn write_msg(&mut self, msg: Message) -> Result<(), DomainError> {
        self.messages.push(msg);
        Ok(())
    }

    fn local_addr(&self) -> SocketAddr {
        self.local
    }

    fn remote_addr(&self) -> SocketAddr {
        self.remote
    }

    fn network(&self) -> &'static str {
        "tcp"
    }
}

/// Handler that optionally writes a canned reply and returns a fixed rcode.
pub struct StaticHandler {
    reply: Option<Message>,
    rcode: ResponseCode,
    calls: AtomicUsize,
    zones_seen: Mutex<Vec<String>>,
}

impl StaticHandler {
    pub fn replying(reply: Message) -> Self {
        Self {
            reply: Some(reply),
            rcode: ResponseCode::NoError,
            calls: AtomicUsize::new(0),
            zones_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn returning(rcode: ResponseCode) -> Self {
        Self {
            reply: None,
            rcode,
            calls: AtomicUsize::new(0),
            zones_seen: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn zones_seen(&self) -> Vec<String> {
        self.zones_seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl DnsHandler for StaticHandler {
    async fn serve_dns(
        &self,
        ctx: &RequestContext<'_>,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.zones_seen.lock().unwrap().push(ctx.zone().to_string());
        if let Some(reply) = &self.reply {
            let mut reply = reply.clone();
            let mut header = *reply.header();
            header.set_id(request.id());
            reply.set_header(header);
            writer.write_msg(reply)?;
        }
        Ok(self.rcode)
    }

    fn name(&self) -> &'static str {
        "static"
    }
}

pub struct FailingHandler;

#[async_trait]
impl DnsHandler for FailingHandler {
    async fn serve_dns(
        &self,
        _ctx: &RequestContext<'_>,
        _writer: &mut dyn ResponseWriter,
        _request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        Err(DomainError::TransportAllServersUnreachable)
    }

    fn name(&self) -> &'static str {
        "failing"
    }
}
