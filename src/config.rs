use std::env;
use std::time::Duration;

use crate::error::{DemoError, Result};

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8080/v1";

const TENANT_ID_MAX: i64 = 2_000_000_000;

/// Everything the run needs, resolved once at startup and then only borrowed.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    pub api_url: String,
    pub base_url: String,
    pub admin_token: String,
    pub tenant_id: i64,
    pub namespace: String,
    pub scope_user: String,
    pub http_timeout: Duration,
    pub enrich_wait: Duration,
    pub health_wait: Duration,
    pub health_interval: Duration,
    pub enrich_interval: Duration,
    pub context_limit: u32,
    pub max_chars: u32,
}

impl DemoConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = normalize_url(
            &lookup("LAM_API_URL")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        );
        let base_url = match lookup("LAM_BASE_URL").filter(|v| !v.trim().is_empty()) {
            Some(v) => normalize_url(&v),
            None => normalize_url(api_url.strip_suffix("/v1").unwrap_or(&api_url)),
        };

        let admin_token = lookup("LAM_ADMIN_TOKEN").unwrap_or_default();
        if !valid_admin_token(&admin_token) {
            return Err(DemoError::Config(
                "Missing LAM_ADMIN_TOKEN (needed to mint a demo API key via /v1/admin/keys)"
                    .to_string(),
            ));
        }

        let scope_user = match lookup("LAM_DEMO_SCOPE_USER") {
            Some(v) if !v.trim().is_empty() && !v.trim().eq_ignore_ascii_case("auto") => {
                v.trim().to_string()
            }
            _ => random_scope_user(),
        };

        let int = |key: &str, def: i64, min: i64, max: i64| {
            clamp_int(lookup(key).as_deref(), def, min, max)
        };
        let millis = |key: &str, def: i64, min: i64, max: i64| {
            Duration::from_millis(int(key, def, min, max) as u64)
        };

        Ok(Self {
            api_url,
            base_url,
            admin_token: admin_token.trim().to_string(),
            tenant_id: int("LAM_DEMO_TENANT_ID", 1, 1, TENANT_ID_MAX),
            namespace: lookup("LAM_DEMO_NAMESPACE").unwrap_or_else(|| "default".to_string()),
            scope_user,
            http_timeout: millis("LAM_DEMO_HTTP_TIMEOUT_MS", 15_000, 1_000, 120_000),
            enrich_wait: millis("LAM_DEMO_ENRICH_WAIT_MS", 30_000, 1_000, 300_000),
            health_wait: millis("LAM_DEMO_HEALTH_WAIT_MS", 60_000, 1_000, 600_000),
            health_interval: Duration::from_millis(200),
            enrich_interval: Duration::from_millis(150),
            context_limit: int("LAM_DEMO_CONTEXT_LIMIT", 8, 1, 50) as u32,
            max_chars: int("LAM_DEMO_MAX_CHARS", 1_200, 200, 20_000) as u32,
        })
    }

    pub fn health_url(&self) -> String {
        format!("{}/health", self.base_url)
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_url, path.trim_start_matches('/'))
    }
}

fn valid_admin_token(key: &str) -> bool {
    let trimmed = key.trim();
    !trimmed.is_empty() && !trimmed.contains("...")
}

pub fn normalize_url(raw: &str) -> String {
    raw.trim().trim_end_matches('/').to_string()
}

/// Parses a number leniently: unset or junk falls back to `def`, a blank value
/// reads as zero, fractions truncate, and the result is forced into `[min, max]`.
pub fn clamp_int(raw: Option<&str>, def: i64, min: i64, max: i64) -> i64 {
    let parsed = match raw.map(str::trim) {
        None => None,
        Some("") => Some(0.0),
        Some(s) => s.parse::<f64>().ok(),
    }
    .filter(|n| n.is_finite());
    match parsed {
        Some(n) => (n.trunc() as i64).clamp(min, max),
        None => def,
    }
}

fn random_scope_user() -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("demo-{}", &id[..8])
}
