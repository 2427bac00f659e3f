use chrono::Utc;
use tracing::info;

use crate::config::DemoConfig;
use crate::error::{DemoError, Result};
use crate::models::{AccessCredential, KeyRequest, KeyResponse};
use crate::pipeline::http::{MemoryClient, RequestSpec};

const ENDPOINT: &str = "/v1/admin/keys";

pub fn key_label() -> String {
    format!("hello-world-{}", Utc::now().format("%Y-%m-%d"))
}

/// Mints the scoped key used for the rest of the run. Never retried: a failure
/// here is a misconfiguration, not a timing problem.
pub async fn mint_credential(client: &MemoryClient, config: &DemoConfig) -> Result<AccessCredential> {
    let request = KeyRequest {
        tenant_id: config.tenant_id,
        scope_user: config.scope_user.clone(),
        namespace: config.namespace.clone(),
        label: key_label(),
    };
    let spec = RequestSpec::post_json(config.endpoint("admin/keys"), &request)?
        .bearer(&config.admin_token);

    let res = client
        .send(spec)
        .await?
        .require_success(ENDPOINT)?;

    let parsed: KeyResponse = res.parse(ENDPOINT)?;
    let token = parsed
        .token
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| DemoError::DataShape("admin/keys response missing token".to_string()))?;

    info!(tenant_id = config.tenant_id, scope_user = %config.scope_user, "minted demo key");
    Ok(AccessCredential {
        token: token.to_string(),
        tenant_id: config.tenant_id,
        scope_user: config.scope_user.clone(),
        namespace: config.namespace.clone(),
    })
}
