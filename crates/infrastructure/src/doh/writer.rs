use ferrous_doh_application::ports::ResponseWriter;
use ferrous_doh_domain::DomainError;
use hickory_proto::op::Message;
use std::net::SocketAddr;

/// Response sink for a single DoH request.
///
/// Holds at most one message; the HTTP handler takes it once the resolution
/// chain returns.
#[derive(Debug)]
pub struct DohWriter {
    local_addr: SocketAddr,
    remote_addr: SocketAddr,
    msg: Option<Message>,
}

impl DohWriter {
    pub fn new(local_addr: SocketAddr, remote_addr: SocketAddr) -> Self {
        Self {
            local_addr,
            remote_addr,
            msg: None,
        }
    }

    pub fn message(&self) -> Option<&Message> {
        self.msg.as_ref()
    }

    pub fn take_message(&mut self) -> Option<Message> {
        self.msg.take()
    }
}

impl ResponseWriter for DohWriter {
    fn write_msg(&mut self, msg: Message) -> Result<(), DomainError> {
        if self.msg.is_some() {
            return Err(DomainError::ResponseAlreadyWritten);
        }
        self.msg = Some(msg);
        Ok(())
    }

    fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    fn remote_addr(&self) -> SocketAddr {
        self.remote_addr
    }

    fn network(&self) -> &'static str {
        "tcp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_proto::op::{MessageType, OpCode};

    fn writer() -> DohWriter {
        DohWriter::new(
            "127.0.0.1:8053".parse().unwrap(),
            "192.0.2.7:51000".parse().unwrap(),
        )
    }

    #[test]
    fn test_addresses_and_network() {
        let w = writer();
        assert_eq!(w.local_addr().port(), 8053);
        assert_eq!(w.remote_addr().to_string(), "192.0.2.7:51000");
        assert_eq!(w.network(), "tcp");
        assert!(w.message().is_none());
    }

    #[test]
    fn test_second_write_rejected() {
        let mut w = writer();
        w.write_msg(Message::new(1, MessageType::Response, OpCode::Query))
            .unwrap();

        let err = w
            .write_msg(Message::new(2, MessageType::Response, OpCode::Query))
            .unwrap_err();
        assert!(matches!(err, DomainError::ResponseAlreadyWritten));
        assert_eq!(w.message().unwrap().id(), 1);
    }

    #[test]
    fn test_take_message_empties_slot() {
        let mut w = writer();
        w.write_msg(Message::new(7, MessageType::Response, OpCode::Query))
            .unwrap();
        assert_eq!(w.take_message().unwrap().id(), 7);
        assert!(w.take_message().is_none());
    }
}
