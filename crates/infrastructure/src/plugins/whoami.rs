use async_trait::async_trait;
use ferrous_doh_application::ports::{DnsHandler, ResponseWriter};
use ferrous_doh_application::RequestContext;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::{Message, MessageType, ResponseCode};
use hickory_proto::rr::rdata::{A, AAAA, SRV};
use hickory_proto::rr::{Name, RData, Record};
use std::net::IpAddr;

/// Tells the client which address and port its query arrived from.
///
/// The reply carries no answers; the additional section holds an A or AAAA
/// record for the client IP and an SRV record `_<network>.<qname>` whose
/// port is the client's source port.
#[derive(Debug, Default)]
pub struct WhoamiHandler;

#[async_trait]
impl DnsHandler for WhoamiHandler {
    async fn serve_dns(
        &self,
        _ctx: &RequestContext<'_>,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        let mut reply = Message::new(request.id(), MessageType::Response, request.op_code());
        reply.set_authoritative(true);
        reply.set_recursion_desired(request.recursion_desired());
        for query in request.queries() {
            reply.add_query(query.clone());
        }

        let Some(query) = request.queries().first() else {
            return Ok(ResponseCode::FormErr);
        };
        let qname = query.name().clone();
        let remote = writer.remote_addr();

        let address = match remote.ip() {
            IpAddr::V4(ip) => RData::A(A(ip)),
            IpAddr::V6(ip) => RData::AAAA(AAAA(ip)),
        };
        reply.add_additional(Record::from_rdata(qname.clone(), 0, address));

        let srv_name = Name::from_ascii(format!("_{}", writer.network()))
            .and_then(|label| label.append_domain(&qname))
            .map_err(|e| DomainError::EncodeFailed(e.to_string()))?;
        let srv = SRV::new(0, 0, remote.port(), Name::root());
        reply.add_additional(Record::from_rdata(srv_name, 0, RData::SRV(srv)));

        writer.write_msg(reply)?;
        Ok(ResponseCode::NoError)
    }

    fn name(&self) -> &'static str {
        "whoami"
    }
}
