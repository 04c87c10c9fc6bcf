use super::answer_for;
use async_trait::async_trait;
use ferrous_doh_application::ports::{DnsHandler, ResponseWriter};
use ferrous_doh_application::RequestContext;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};
use std::net::Ipv4Addr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Answers every query with a single A record, optionally after a delay.
pub struct AnswerHandler {
    ip: Ipv4Addr,
    ttl: u32,
    delay: Option<Duration>,
    calls: AtomicUsize,
}

impl AnswerHandler {
    pub fn new(ip: Ipv4Addr, ttl: u32) -> Self {
        Self {
            ip,
            ttl,
            delay: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DnsHandler for AnswerHandler {
    async fn serve_dns(
        &self,
        _ctx: &RequestContext<'_>,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        writer.write_msg(answer_for(request, self.ttl, &[self.ip]))?;
        Ok(ResponseCode::NoError)
    }

    fn name(&self) -> &'static str {
        "answer"
    }
}

/// Returns success without writing anything.
pub struct SilentHandler;

#[async_trait]
impl DnsHandler for SilentHandler {
    async fn serve_dns(
        &self,
        _ctx: &RequestContext<'_>,
        _writer: &mut dyn ResponseWriter,
        _request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        Ok(ResponseCode::NoError)
    }

    fn name(&self) -> &'static str {
        "silent"
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
