use ferrous_doh_application::ports::StreamServer;
use ferrous_doh_infrastructure::doh::ServerHttp;
use std::sync::Arc;
use tracing::{info, warn};

/// Binds, serves and blocks until Ctrl-C or until the accept loop ends.
pub async fn run_doh_server(server: Arc<ServerHttp>) -> anyhow::Result<()> {
    let listener = server.listen().await?;

    let serving = server.clone();
    let mut serve_task = tokio::spawn(async move { serving.serve(listener).await });

    server.on_startup_complete();

    let finished = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal?;
            info!("Shutdown signal received");
            None
        }
        result = &mut serve_task => {
            warn!("DoH server exited before shutdown was requested");
            Some(result)
        }
    };

    server.stop().await?;

    let result = match finished {
        Some(result) => result,
        None => serve_task.await,
    };
    result??;

    Ok(())
}
