use super::answer_for;
use ferrous_doh_infrastructure::doh::msg_to_bytes;
use hickory_proto::op::Message;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, UdpSocket};
use tokio::task::JoinHandle;

pub const ANSWER_IP: Ipv4Addr = Ipv4Addr::new(93, 184, 216, 34);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamMode {
    /// Answer over both UDP and TCP
    Answer,
    /// Reply over UDP with TC set and no records; answer over TCP
    TruncateUdp,
    /// Read queries and never reply
    Silent,
}

/// Loopback DNS server on a UDP and TCP port pair.
pub struct MockUpstream {
    addr: SocketAddr,
    udp_queries: Arc<AtomicUsize>,
    tcp_queries: Arc<AtomicUsize>,
    tasks: Vec<JoinHandle<()>>,
}

impl MockUpstream {
    pub async fn start(mode: UpstreamMode) -> std::io::Result<Self> {
        let udp = UdpSocket::bind(SocketAddr::from((Ipv4Addr::LOCALHOST, 0))).await?;
        let addr = udp.local_addr()?;
        let tcp = TcpListener::bind(addr).await?;

        let udp_queries = Arc::new(AtomicUsize::new(0));
        let tcp_queries = Arc::new(AtomicUsize::new(0));

        let udp_task = {
            let counter = udp_queries.clone();
            tokio::spawn(async move {
                let mut buf = vec![0u8; 512];
                while let Ok((len, peer)) = udp.recv_from(&mut buf).await {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if mode == UpstreamMode::Silent {
                        continue;
                    }
                    let Ok(query) = Message::from_vec(&buf[..len]) else {
                        continue;
                    };
                    let reply = if mode == UpstreamMode::TruncateUdp {
                        let mut reply = answer_for(&query, 60, &[]);
                        reply.set_truncated(true);
                        reply
                    } else {
                        answer_for(&query, 60, &[ANSWER_IP])
                    };
                    if let Ok(bytes) = msg_to_bytes(&reply) {
                        let _ = udp.send_to(&bytes, peer).await;
                    }
                }
            })
        };

        let tcp_task = {
            let counter = tcp_queries.clone();
            tokio::spawn(async move {
                while let Ok((mut stream, _)) = tcp.accept().await {
                    counter.fetch_add(1, Ordering::SeqCst);
                    if mode == UpstreamMode::Silent {
                        continue;
                    }
                    let mut len_buf = [0u8; 2];
                    if stream.read_exact(&mut len_buf).await.is_err() {
                        continue;
                    }
                    let mut buf = vec![0u8; usize::from(u16::from_be_bytes(len_buf))];
                    if stream.read_exact(&mut buf).await.is_err() {
                        continue;
                    }
                    let Ok(query) = Message::from_vec(&buf) else {
                        continue;
                    };
                    let Ok(bytes) = msg_to_bytes(&answer_for(&query, 60, &[ANSWER_IP])) else {
                        continue;
                    };
                    let mut frame = (bytes.len() as u16).to_be_bytes().to_vec();
                    frame.extend_from_slice(&bytes);
                    let _ = stream.write_all(&frame).await;
                }
            })
        };

        Ok(Self {
            addr,
            udp_queries,
            tcp_queries,
            tasks: vec![udp_task, tcp_task],
        })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn udp_queries(&self) -> usize {
        self.udp_queries.load(Ordering::SeqCst)
    }

    pub fn tcp_queries(&self) -> usize {
        self.tcp_queries.load(Ordering::SeqCst)
    }
}

impl Drop for MockUpstream {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}
