use async_trait::async_trait;
use tracing::{debug, info};
use url::Url;

use crate::config::DemoConfig;
use crate::error::{DemoError, Result};
use crate::models::{AccessCredential, CellId, EnrichmentStatus, EnrichmentStatusResponse};
use crate::pipeline::http::{MemoryClient, RequestSpec};
use crate::pipeline::poll::DeadlinePoller;
use crate::pipeline::traits::{Probe, ProbeOutcome};

const ENDPOINT: &str = "/v1/enrichment/status";

pub struct EnrichmentProbe<'a> {
    client: &'a MemoryClient,
    token: &'a str,
    url: String,
    cell_id: &'a CellId,
}

impl<'a> EnrichmentProbe<'a> {
    pub fn new(
        client: &'a MemoryClient,
        api_url: &str,
        credential: &'a AccessCredential,
        cell_id: &'a CellId,
    ) -> Result<Self> {
        let url = Url::parse_with_params(
            &format!("{api_url}/enrichment/status"),
            &[("cell_id", cell_id.as_str())],
        )
        .map_err(|e| DemoError::Config(format!("invalid LAM_API_URL {api_url}: {e}")))?;
        Ok(Self {
            client,
            token: &credential.token,
            url: url.to_string(),
            cell_id,
        })
    }
}

#[async_trait]
impl Probe for EnrichmentProbe<'_> {
    type Output = ();

    fn describe(&self) -> String {
        format!(
            "enrichment for cell_id={} (is lam_worker running?)",
            self.cell_id
        )
    }

    async fn probe(&mut self) -> ProbeOutcome<()> {
        let spec = RequestSpec::get(self.url.clone()).bearer(self.token);
        let res = match self.client.send(spec).await {
            Ok(res) if res.ok => res,
            Ok(res) => {
                debug!(status = res.status, "enrichment status not available yet");
                return ProbeOutcome::NotYet;
            }
            // An unreadable 2xx reply is terminal.
            Err(err @ DemoError::MalformedBody { .. }) => return ProbeOutcome::Failed(err),
            Err(err) => {
                debug!(kind = err.kind(), error = %err, "enrichment poll failed");
                return ProbeOutcome::NotYet;
            }
        };

        let parsed: EnrichmentStatusResponse = match res.parse(ENDPOINT) {
            Ok(parsed) => parsed,
            Err(err) => return ProbeOutcome::Failed(err),
        };

        match EnrichmentStatus::classify(&parsed) {
            EnrichmentStatus::Done => ProbeOutcome::Ready(()),
            EnrichmentStatus::Failed { last_error } => ProbeOutcome::Failed(DemoError::JobFailed {
                cell_id: self.cell_id.to_string(),
                cause: last_error,
            }),
            EnrichmentStatus::Pending(status) => {
                debug!(cell_id = %self.cell_id, status = %status, "enrichment pending");
                ProbeOutcome::NotYet
            }
        }
    }
}

pub async fn wait_for_enrichment(
    client: &MemoryClient,
    config: &DemoConfig,
    credential: &AccessCredential,
    cell_id: &CellId,
) -> Result<()> {
    let poller = DeadlinePoller::new(config.enrich_interval, config.enrich_wait);
    let mut probe = EnrichmentProbe::new(client, &config.api_url, credential, cell_id)?;
    poller.run(&mut probe).await?;
    info!(cell_id = %cell_id, "enrichment done");
    Ok(())
}
