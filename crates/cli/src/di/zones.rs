use ferrous_doh_application::ports::DnsHandler;
use ferrous_doh_application::ZoneSite;
use ferrous_doh_domain::config::{parse_upstream, HandlerConfig};
use ferrous_doh_domain::Config;
use ferrous_doh_infrastructure::plugins::{ForwardHandler, WhoamiHandler};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

pub fn build_sites(config: &Config) -> anyhow::Result<Vec<ZoneSite>> {
    config
        .zones
        .iter()
        .map(|zone| {
            let handler: Arc<dyn DnsHandler> = match &zone.handler {
                HandlerConfig::Forward {
                    upstreams,
                    timeout_ms,
                } => {
                    let upstreams = upstreams
                        .iter()
                        .map(|u| parse_upstream(u).map_err(anyhow::Error::msg))
                        .collect::<anyhow::Result<Vec<_>>>()?;
                    debug!(zone = %zone.zone, upstreams = ?upstreams, timeout_ms, "Upstreams parsed");
                    Arc::new(ForwardHandler::new(
                        upstreams,
                        Duration::from_millis(*timeout_ms),
                    ))
                }
                HandlerConfig::Whoami => Arc::new(WhoamiHandler),
            };
            info!(zone = %zone.zone, handler = zone.handler.kind(), "Zone configured");
            Ok(ZoneSite::new(zone.zone.clone(), handler))
        })
        .collect()
}
