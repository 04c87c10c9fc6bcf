use async_trait::async_trait;
use ferrous_doh_domain::DomainError;
use tokio::net::TcpListener;

/// Lifecycle of a connection-oriented DNS transport.
///
/// `stop` and `shutdown` may be called from any task at any point of
/// `serve`'s lifetime, including before it starts and after it returned.
#[async_trait]
pub trait StreamServer: Send + Sync {
    async fn listen(&self) -> Result<TcpListener, DomainError>;

    /// Blocks until the listener is closed by `stop` or `shutdown`.
    async fn serve(&self, listener: TcpListener) -> Result<(), DomainError>;

    async fn stop(&self) -> Result<(), DomainError>;

    async fn shutdown(&self) -> Result<(), DomainError>;

    fn on_startup_complete(&self);
}
