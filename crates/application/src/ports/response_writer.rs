use ferrous_doh_domain::DomainError;
use hickory_proto::op::Message;
use std::net::SocketAddr;

/// Sink for the reply to a single DNS request.
pub trait ResponseWriter: Send {
    fn write_msg(&mut self, msg: Message) -> Result<(), DomainError>;

    fn local_addr(&self) -> SocketAddr;

    fn remote_addr(&self) -> SocketAddr;

    /// `"tcp"` or `"udp"`
    fn network(&self) -> &'static str;
}
