use serde::{Deserialize, Serialize};
use std::fmt;

/// Body of `POST /admin/keys`.
#[derive(Clone, Debug, Serialize)]
pub struct KeyRequest {
    pub tenant_id: i64,
    pub scope_user: String,
    pub namespace: String,
    pub label: String,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct KeyResponse {
    #[serde(default)]
    pub token: Option<String>,
}

/// Scoped bearer token minted for this run. Lives in memory only.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessCredential {
    pub token: String,
    pub tenant_id: i64,
    pub scope_user: String,
    pub namespace: String,
}

// Keep the token out of logs and panics.
impl fmt::Debug for AccessCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccessCredential")
            .field("token", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .field("scope_user", &self.scope_user)
            .field("namespace", &self.namespace)
            .finish()
    }
}
