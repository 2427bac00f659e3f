use async_trait::async_trait;
use tracing::{debug, info};

use crate::config::DemoConfig;
use crate::error::Result;
use crate::pipeline::http::{MemoryClient, RequestSpec};
use crate::pipeline::poll::DeadlinePoller;
use crate::pipeline::traits::{Probe, ProbeOutcome};

/// Ready only on a 2xx whose body has `"ok": true`.
pub struct HealthProbe<'a> {
    client: &'a MemoryClient,
    url: String,
}

impl<'a> HealthProbe<'a> {
    pub fn new(client: &'a MemoryClient, url: String) -> Self {
        Self { client, url }
    }
}

#[async_trait]
impl Probe for HealthProbe<'_> {
    type Output = ();

    fn describe(&self) -> String {
        format!("health at {}", self.url)
    }

    async fn probe(&mut self) -> ProbeOutcome<()> {
        // The service may still be starting; every failure here means "not yet".
        match self
            .client
            .send(RequestSpec::get(self.url.clone()))
            .await
        {
            Ok(res) if res.ok && is_ready(res.body.as_ref()) => ProbeOutcome::Ready(()),
            Ok(res) => {
                debug!(status = res.status, "health not ready");
                ProbeOutcome::NotYet
            }
            Err(err) => {
                debug!(kind = err.kind(), error = %err, "health probe failed");
                ProbeOutcome::NotYet
            }
        }
    }
}

fn is_ready(body: Option<&serde_json::Value>) -> bool {
    body.and_then(|b| b.get("ok"))
        .and_then(|ok| ok.as_bool())
        .unwrap_or(false)
}

pub async fn wait_for_health(client: &MemoryClient, config: &DemoConfig) -> Result<()> {
    let poller = DeadlinePoller::new(config.health_interval, config.health_wait);
    let mut probe = HealthProbe::new(client, config.health_url());
    poller.run(&mut probe).await?;
    info!(url = %config.health_url(), "service healthy");
    Ok(())
}
