use super::codec::{msg_to_bytes, request_to_msg, DOH_PATH, MIME_TYPE};
use super::writer::DohWriter;
use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, Request, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Router;
use chrono::Utc;
use ferrous_doh_application::ports::{ResponseClassifier, StreamServer};
use ferrous_doh_application::services::StandardClassifier;
use ferrous_doh_application::{startup_zones, Server, ZoneSite};
use ferrous_doh_domain::transport::{split_host_port, Transport};
use ferrous_doh_domain::DomainError;
use socket2::{Domain, Protocol, Socket, Type};
use std::io;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument};

const UNSPECIFIED: SocketAddr = SocketAddr::new(std::net::IpAddr::V4(Ipv4Addr::UNSPECIFIED), 0);

pub struct ServerHttpOptions {
    /// Suppress the startup banner.
    pub quiet: bool,
    pub classifier: Arc<dyn ResponseClassifier>,
}

impl Default for ServerHttpOptions {
    fn default() -> Self {
        Self {
            quiet: false,
            classifier: Arc::new(StandardClassifier),
        }
    }
}

/// Request-handling side of [`ServerHttp`], shared with every connection task.
pub struct DohHandler {
    server: Arc<Server>,
    classifier: Arc<dyn ResponseClassifier>,
    local_addr: OnceLock<SocketAddr>,
}

impl DohHandler {
    pub fn new(server: Arc<Server>, classifier: Arc<dyn ResponseClassifier>) -> Self {
        Self {
            server,
            classifier,
            local_addr: OnceLock::new(),
        }
    }

    /// Address the serving listener is bound to, once serving started.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.local_addr.get().copied()
    }

    fn publish_local_addr(&self, addr: SocketAddr) {
        let _ = self.local_addr.set(addr);
    }
}

/// Router answering every path and method through the DoH handler.
pub fn router(handler: Arc<DohHandler>) -> Router {
    Router::new()
        .fallback(serve_http)
        .with_state(handler)
        .layer(TraceLayer::new_for_http())
}

#[instrument(skip_all, name = "doh_request", fields(method = %req.method()))]
async fn serve_http(State(handler): State<Arc<DohHandler>>, req: Request<Body>) -> Response {
    if req.uri().path() != DOH_PATH {
        return StatusCode::NOT_FOUND.into_response();
    }

    let remote = req
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr)
        .unwrap_or(UNSPECIFIED);

    let msg = match request_to_msg(req).await {
        Ok(msg) => msg,
        Err(e) => {
            debug!(remote = %remote, error = %e, "Rejecting undecodable DoH request");
            return (StatusCode::BAD_REQUEST, e.to_string()).into_response();
        }
    };

    let mut writer = DohWriter::new(handler.local_addr().unwrap_or(UNSPECIFIED), remote);
    handler.server.serve_dns(&mut writer, &msg).await;

    let Some(reply) = writer.take_message() else {
        debug!(id = msg.id(), "Resolution chain wrote no response");
        return (StatusCode::INTERNAL_SERVER_ERROR, "No response").into_response();
    };

    let bytes = match msg_to_bytes(&reply) {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(id = reply.id(), error = %e, "Failed to serialize reply");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    let response_type = handler.classifier.classify(&reply, Utc::now());
    let ttl = handler.classifier.minimal_ttl(&reply, response_type);
    debug!(
        id = reply.id(),
        rcode = ?reply.response_code(),
        response_type = %response_type,
        ttl_secs = ttl.as_secs(),
        "DoH reply"
    );

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, MIME_TYPE.to_string()),
            (
                header::CACHE_CONTROL,
                format!("max-age={:.6}", ttl.as_secs_f64()),
            ),
            (header::CONTENT_LENGTH, bytes.len().to_string()),
        ],
        bytes,
    )
        .into_response()
}

/// DNS server speaking plain-HTTP DoH on one listener.
///
/// `stop` and `shutdown` may race with `serve` and with each other; the
/// lifecycle mutex is only held for bookkeeping, never while waiting.
pub struct ServerHttp {
    server: Arc<Server>,
    handler: Arc<DohHandler>,
    quiet: bool,
    lifecycle: Mutex<Option<SocketAddr>>,
    shutdown: CancellationToken,
    running: watch::Sender<bool>,
}

impl ServerHttp {
    /// Builds the zone server and its HTTP handler. No socket is bound.
    pub fn new(
        addr: impl Into<String>,
        sites: Vec<ZoneSite>,
        options: ServerHttpOptions,
    ) -> Result<Self, DomainError> {
        let server = Arc::new(Server::new(addr, sites)?);
        let handler = Arc::new(DohHandler::new(server.clone(), options.classifier));
        let (running, _) = watch::channel(false);

        Ok(Self {
            server,
            handler,
            quiet: options.quiet,
            lifecycle: Mutex::new(None),
            shutdown: CancellationToken::new(),
            running,
        })
    }

    pub fn handler(&self) -> &Arc<DohHandler> {
        &self.handler
    }

    pub fn router(&self) -> Router {
        router(self.handler.clone())
    }

    /// Zone listing printed once the listener is up, `None` when quiet.
    pub fn banner(&self) -> Option<String> {
        if self.quiet {
            return None;
        }
        Some(startup_zones(
            Transport::Http.scheme(),
            self.server.addr(),
            &self.server.zones(),
        ))
    }

    /// Address recorded by `serve`.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        *self.lifecycle()
    }

    fn lifecycle(&self) -> MutexGuard<'_, Option<SocketAddr>> {
        self.lifecycle.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn wait_drained(&self) {
        let mut running = self.running.subscribe();
        let _ = running.wait_for(|serving| !*serving).await;
    }
}

struct RunningGuard<'a>(&'a watch::Sender<bool>);

impl Drop for RunningGuard<'_> {
    fn drop(&mut self) {
        self.0.send_replace(false);
    }
}

#[async_trait]
impl StreamServer for ServerHttp {
    async fn listen(&self) -> Result<TcpListener, DomainError> {
        let addr = self.server.addr();
        let host_port = addr.strip_prefix(Transport::Http.scheme()).unwrap_or(addr);

        let (host, port) = split_host_port(host_port)
            .ok_or_else(|| DomainError::InvalidAddress(addr.to_string()))?;
        let host = if host.is_empty() { "0.0.0.0" } else { host };
        let port: u16 = port
            .parse()
            .map_err(|_| DomainError::InvalidAddress(format!("{}: bad port '{}'", addr, port)))?;

        let socket_addr = tokio::net::lookup_host((host, port))
            .await
            .map_err(|e| DomainError::InvalidAddress(format!("{}: {}", addr, e)))?
            .next()
            .ok_or_else(|| DomainError::InvalidAddress(format!("{}: no addresses", addr)))?;

        let listener = create_tcp_listener(socket_addr)
            .map_err(|e| DomainError::BindFailed(socket_addr.to_string(), e.to_string()))?;

        debug!(bind_address = %socket_addr, "DoH listener bound");
        Ok(listener)
    }

    async fn serve(&self, listener: TcpListener) -> Result<(), DomainError> {
        let local = listener
            .local_addr()
            .map_err(|e| DomainError::IoError(e.to_string()))?;

        {
            let mut recorded = self.lifecycle();
            if self.shutdown.is_cancelled() {
                debug!(bind_address = %local, "Server already stopped, not serving");
                return Ok(());
            }
            *recorded = Some(local);
            self.handler.publish_local_addr(local);
            self.running.send_replace(true);
        }
        let _running = RunningGuard(&self.running);

        info!(bind_address = %local, zones = ?self.server.zones(), "Serving DNS over HTTP");

        let app = router(self.handler.clone()).into_make_service_with_connect_info::<SocketAddr>();
        axum::serve(listener, app)
            .with_graceful_shutdown(self.shutdown.clone().cancelled_owned())
            .await
            .map_err(|e| DomainError::ServeFailed(e.to_string()))?;

        info!(bind_address = %local, "DoH server stopped");
        Ok(())
    }

    async fn stop(&self) -> Result<(), DomainError> {
        {
            let recorded = self.lifecycle();
            if !self.shutdown.is_cancelled() {
                debug!(bind_address = ?*recorded, "Stopping DoH server");
            }
            self.shutdown.cancel();
        }
        self.wait_drained().await;
        Ok(())
    }

    async fn shutdown(&self) -> Result<(), DomainError> {
        self.shutdown.cancel();
        self.wait_drained().await;
        Ok(())
    }

    fn on_startup_complete(&self) {
        if let Some(banner) = self.banner() {
            print!("{}", banner);
        }
    }
}

fn create_tcp_listener(socket_addr: SocketAddr) -> io::Result<TcpListener> {
    let domain = if socket_addr.is_ipv4() {
        Domain::IPV4
    } else {
        Domain::IPV6
    };
    let socket = Socket::new(domain, Type::STREAM, Some(Protocol::TCP))?;
    if socket_addr.is_ipv6() {
        socket.set_only_v6(false)?;
    }
    socket.set_reuse_address(true)?;
    socket.bind(&socket_addr.into())?;
    socket.listen(1024)?;
    socket.set_nonblocking(true)?;
    let std_listener: std::net::TcpListener = socket.into();
    TcpListener::from_std(std_listener)
}
