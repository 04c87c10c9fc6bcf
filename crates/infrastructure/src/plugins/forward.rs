//! Forwarding to plain DNS upstreams (RFC 1035 §4.2).
//!
//! Queries go out over UDP first. A truncated reply is retried over TCP with
//! the usual two-byte length prefix.

use crate::doh::codec::msg_to_bytes;
use async_trait::async_trait;
use ferrous_doh_application::ports::{DnsHandler, ResponseWriter};
use ferrous_doh_application::RequestContext;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::{Header, Message, ResponseCode};
use std::net::{Ipv4Addr, Ipv6Addr, SocketAddr};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, UdpSocket};
use tracing::{debug, warn};

/// Maximum UDP DNS response size with EDNS(0)
const MAX_UDP_RESPONSE_SIZE: usize = 4096;

pub struct ForwardHandler {
    upstreams: Vec<SocketAddr>,
    timeout: Duration,
}

impl ForwardHandler {
    pub fn new(upstreams: Vec<SocketAddr>, timeout: Duration) -> Self {
        Self { upstreams, timeout }
    }

    async fn exchange(&self, server: SocketAddr, query: &Message) -> Result<Message, DomainError> {
        let bytes = msg_to_bytes(query)?;

        let reply = self.exchange_udp(server, &bytes, query.id()).await?;
        if !reply.truncated() {
            return Ok(reply);
        }

        debug!(server = %server, "UDP reply truncated, retrying over TCP");
        self.exchange_tcp(server, &bytes, query.id()).await
    }

    async fn exchange_udp(
        &self,
        server: SocketAddr,
        bytes: &[u8],
        id: u16,
    ) -> Result<Message, DomainError> {
        let bind_addr = if server.is_ipv4() {
            SocketAddr::from((Ipv4Addr::UNSPECIFIED, 0))
        } else {
            SocketAddr::from((Ipv6Addr::UNSPECIFIED, 0))
        };

        let socket = UdpSocket::bind(bind_addr)
            .await
            .map_err(|e| DomainError::IoError(format!("Failed to bind UDP socket: {}", e)))?;
        socket.connect(server).await.map_err(|e| {
            DomainError::IoError(format!("Failed to connect UDP socket to {}: {}", server, e))
        })?;

        let mut buf = vec![0u8; MAX_UDP_RESPONSE_SIZE];
        let len = tokio::time::timeout(self.timeout, async {
            socket.send(bytes).await?;
            let n = socket.recv(&mut buf).await?;
            Ok::<_, std::io::Error>(n)
        })
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server.to_string(),
        })?
        .map_err(|e| DomainError::IoError(format!("UDP exchange with {} failed: {}", server, e)))?;

        buf.truncate(len);
        parse_reply(&buf, id, server)
    }

    async fn exchange_tcp(
        &self,
        server: SocketAddr,
        bytes: &[u8],
        id: u16,
    ) -> Result<Message, DomainError> {
        let len = u16::try_from(bytes.len()).map_err(|_| {
            DomainError::EncodeFailed(format!("query of {} bytes exceeds TCP framing", bytes.len()))
        })?;

        let buf = tokio::time::timeout(self.timeout, async {
            let mut stream = TcpStream::connect(server).await?;
            stream.set_nodelay(true)?;

            let mut frame = Vec::with_capacity(bytes.len() + 2);
            frame.extend_from_slice(&len.to_be_bytes());
            frame.extend_from_slice(bytes);
            stream.write_all(&frame).await?;

            let mut len_buf = [0u8; 2];
            stream.read_exact(&mut len_buf).await?;
            let mut buf = vec![0u8; usize::from(u16::from_be_bytes(len_buf))];
            stream.read_exact(&mut buf).await?;
            Ok::<_, std::io::Error>(buf)
        })
        .await
        .map_err(|_| DomainError::TransportTimeout {
            server: server.to_string(),
        })?
        .map_err(|e| DomainError::IoError(format!("TCP exchange with {} failed: {}", server, e)))?;

        parse_reply(&buf, id, server)
    }
}

fn with_id(msg: &Message, id: u16) -> Header {
    let mut header = *msg.header();
    header.set_id(id);
    header
}

fn parse_reply(buf: &[u8], id: u16, server: SocketAddr) -> Result<Message, DomainError> {
    let reply = Message::from_vec(buf).map_err(|e| {
        DomainError::InvalidDnsResponse(format!("Failed to parse reply from {}: {}", server, e))
    })?;
    if reply.id() != id {
        return Err(DomainError::InvalidDnsResponse(format!(
            "Reply from {} has id {}, expected {}",
            server,
            reply.id(),
            id
        )));
    }
    Ok(reply)
}

#[async_trait]
impl DnsHandler for ForwardHandler {
    async fn serve_dns(
        &self,
        ctx: &RequestContext<'_>,
        writer: &mut dyn ResponseWriter,
        request: &Message,
    ) -> Result<ResponseCode, DomainError> {
        let mut query = request.clone();
        query.set_header(with_id(request, fastrand::u16(..)));

        for &server in &self.upstreams {
            match self.exchange(server, &query).await {
                Ok(mut reply) => {
                    debug!(
                        zone = ctx.zone(),
                        server = %server,
                        rcode = ?reply.response_code(),
                        answers = reply.answers().len(),
                        "Upstream replied"
                    );
                    reply.set_header(with_id(&reply, request.id()));
                    writer.write_msg(reply)?;
                    return Ok(ResponseCode::NoError);
                }
                Err(e) => {
                    warn!(zone = ctx.zone(), server = %server, error = %e, "Upstream failed");
                }
            }
        }

        Ok(ResponseCode::ServFail)
    }

    fn name(&self) -> &'static str {
        "forward"
    }
}
