use std::time::Duration;

use reqwest::{Client, Method};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::time::Instant;
use tracing::debug;

use crate::error::{DemoError, Result};

/// One request against the memory service, built before it is sent.
#[derive(Clone, Debug)]
pub struct RequestSpec {
    pub method: Method,
    pub url: String,
    pub token: Option<String>,
    pub body: Option<Value>,
}

impl RequestSpec {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::GET,
            url: url.into(),
            token: None,
            body: None,
        }
    }

    pub fn post(url: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::POST,
            url: url.into(),
            token: None,
            body: Some(body),
        }
    }

    pub fn post_json<T: Serialize>(url: impl Into<String>, body: &T) -> Result<Self> {
        let body = serde_json::to_value(body)
            .map_err(|e| DemoError::DataShape(format!("cannot encode request body: {e}")))?;
        Ok(Self::post(url, body))
    }

    pub fn bearer(mut self, token: &str) -> Self {
        self.token = Some(token.to_string());
        self
    }
}

/// Normalised result of one exchange. `body` is `None` when the response was empty.
#[derive(Clone, Debug, PartialEq)]
pub struct TimedResponse {
    pub ok: bool,
    pub status: u16,
    pub body: Option<Value>,
}

impl TimedResponse {
    /// Turns a non-2xx response into `Rejected`, carrying status and raw body.
    pub fn require_success(self, endpoint: &str) -> Result<Self> {
        if self.ok {
            return Ok(self);
        }
        Err(DemoError::Rejected {
            endpoint: endpoint.to_string(),
            status: self.status,
            body: self.raw_body(),
        })
    }

    pub fn raw_body(&self) -> String {
        match &self.body {
            Some(v) => v.to_string(),
            None => "{}".to_string(),
        }
    }

    /// Reads the body as `T`; an empty body yields `T::default()`.
    pub fn parse<T>(&self, endpoint: &str) -> Result<T>
    where
        T: DeserializeOwned + Default,
    {
        match &self.body {
            None => Ok(T::default()),
            Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
                DemoError::DataShape(format!("{endpoint} response has unexpected shape: {e}"))
            }),
        }
    }
}

/// Thin async client for the memory service. Every call gets the full
/// per-call timeout, so a waiter's last attempt still has time to land.
#[derive(Clone, Debug)]
pub struct MemoryClient {
    client: Client,
    timeout: Duration,
}

impl MemoryClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("lam-hello-world/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DemoError::Config(format!("cannot build HTTP client: {e}")))?;
        Ok(Self { client, timeout })
    }

    pub async fn send(&self, spec: RequestSpec) -> Result<TimedResponse> {
        let budget = self.timeout;
        let started = Instant::now();

        let mut request = self.client.request(spec.method.clone(), &spec.url);
        if let Some(token) = &spec.token {
            request = request.bearer_auth(token);
        }
        if let Some(body) = &spec.body {
            request = request.json(body);
        }

        // Dropping the future on timeout aborts the in-flight exchange.
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let text = response.text().await?;
            Ok::<_, reqwest::Error>((status, text))
        };

        let (status, text) = match tokio::time::timeout(budget, exchange).await {
            Err(_) => {
                debug!(method = %spec.method, url = %spec.url, budget_ms = budget.as_millis() as u64, "request timed out");
                return Err(DemoError::RequestTimeout {
                    url: spec.url,
                    after: budget,
                });
            }
            Ok(Err(source)) => {
                return Err(DemoError::Transport {
                    url: spec.url,
                    source,
                })
            }
            Ok(Ok(pair)) => pair,
        };

        debug!(
            method = %spec.method,
            url = %spec.url,
            status = status.as_u16(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "request complete"
        );

        let body = if text.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str(&text).map_err(|source| DemoError::MalformedBody {
                    url: spec.url.clone(),
                    source,
                })?,
            )
        };

        Ok(TimedResponse {
            ok: status.is_success(),
            status: status.as_u16(),
            body,
        })
    }
}
