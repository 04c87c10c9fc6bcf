use super::ResponseWriter;
use crate::server::RequestContext;
use async_trait::async_trait;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::{Message, ResponseCode};

/// A link of the resolution chain serving one zone.
#[async_trait]
pub trait DnsHandler: Send + Sync {
    /// Answer `request`, writing at most one message into `writer`.
    ///
    /// Returning SERVFAIL, REFUSED, FORMERR or NOTIMP without writing asks
    /// the server to reply with that code on the handler's behalf.
    async fn serve_dns(
        &self,
        ctx: &RequestContext<'_>,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) -> Result<ResponseCode, DomainError>;

    fn name(&self) -> &'static str;
}
