#![allow(dead_code)]

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use axum::extract::{Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use lam_hello::pipeline::sha256_hex;
use lam_hello::DemoConfig;
use serde_json::{json, Value};

pub const ADMIN_TOKEN: &str = "admin-secret";
pub const MINTED_TOKEN: &str = "tok-123";
pub const CELL_ID: &str = "cell-1";

/// Knobs and counters for the in-process memory service.
pub struct MockService {
    pub health_ready_after: usize,
    /// When set, health turns ready once this much time has passed since the
    /// service was built, regardless of the call count.
    pub health_ready_at: Option<Duration>,
    pub key_token: Value,
    pub omit_cell_id: bool,
    pub enrichment_script: Mutex<Vec<(String, Option<String>)>>,
    /// Raw 200 body served instead of the scripted enrichment status.
    pub enrichment_raw_body: Option<&'static str>,
    pub context_failure: Option<StatusCode>,
    pub decode_failure: Option<StatusCode>,
    pub decode_encoding: String,
    pub tamper_hash: bool,
    pub cite_passages: bool,

    pub started: Instant,

    pub health_calls: AtomicUsize,
    pub key_calls: AtomicUsize,
    pub enrichment_calls: AtomicUsize,
    pub context_calls: AtomicUsize,
    pub decode_calls: AtomicUsize,
    pub key_request: Mutex<Option<Value>>,
    pub evidence_text: Mutex<Option<String>>,
    pub evidence_span: Mutex<Option<(u64, u64)>>,
}

impl Default for MockService {
    fn default() -> Self {
        Self {
            health_ready_after: 1,
            health_ready_at: None,
            key_token: json!(MINTED_TOKEN),
            omit_cell_id: false,
            enrichment_script: Mutex::new(vec![("done".to_string(), None)]),
            enrichment_raw_body: None,
            context_failure: None,
            decode_failure: None,
            decode_encoding: "utf8".to_string(),
            tamper_hash: false,
            cite_passages: true,

            started: Instant::now(),

            health_calls: AtomicUsize::new(0),
            key_calls: AtomicUsize::new(0),
            enrichment_calls: AtomicUsize::new(0),
            context_calls: AtomicUsize::new(0),
            decode_calls: AtomicUsize::new(0),
            key_request: Mutex::new(None),
            evidence_text: Mutex::new(None),
            evidence_span: Mutex::new(None),
        }
    }
}

impl MockService {
    pub fn with_enrichment(self, script: &[(&str, Option<&str>)]) -> Self {
        *self.enrichment_script.lock().unwrap() = script
            .iter()
            .map(|(s, e)| (s.to_string(), e.map(str::to_string)))
            .collect();
        self
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

pub type Shared = Arc<MockService>;

fn bearer(headers: &HeaderMap) -> String {
    headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or("")
        .to_string()
}

fn unauthorized() -> Response {
    (StatusCode::UNAUTHORIZED, Json(json!({"error": "unauthorized"}))).into_response()
}

async fn health(State(svc): State<Shared>) -> Response {
    let n = svc.health_calls.fetch_add(1, Ordering::SeqCst) + 1;
    let ready = match svc.health_ready_at {
        Some(at) => svc.started.elapsed() >= at,
        None => n >= svc.health_ready_after,
    };
    if ready {
        Json(json!({"ok": true})).into_response()
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, Json(json!({"ok": false}))).into_response()
    }
}

async fn admin_keys(State(svc): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    svc.key_calls.fetch_add(1, Ordering::SeqCst);
    if bearer(&headers) != ADMIN_TOKEN {
        return unauthorized();
    }
    *svc.key_request.lock().unwrap() = Some(body);
    Json(json!({"token": svc.key_token})).into_response()
}

async fn ingest(State(svc): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if bearer(&headers) != MINTED_TOKEN {
        return unauthorized();
    }
    let content = body["content"].as_str().unwrap_or("").as_bytes().to_vec();
    let ev = &body["claims"][0]["evidence"];
    let (start, end) = (
        ev["start_pos"].as_u64().unwrap_or(0),
        ev["end_pos"].as_u64().unwrap_or(0),
    );
    let Some(slice) = content.get(start as usize..end as usize) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "span out of range"}))).into_response();
    };
    let Ok(text) = String::from_utf8(slice.to_vec()) else {
        return (StatusCode::BAD_REQUEST, Json(json!({"error": "span splits a character"}))).into_response();
    };
    *svc.evidence_text.lock().unwrap() = Some(text);
    *svc.evidence_span.lock().unwrap() = Some((start, end));
    if svc.omit_cell_id {
        return Json(json!({"ok": true})).into_response();
    }
    Json(json!({"cell_id": CELL_ID})).into_response()
}

async fn enrichment_status(
    State(svc): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if bearer(&headers) != MINTED_TOKEN {
        return unauthorized();
    }
    svc.enrichment_calls.fetch_add(1, Ordering::SeqCst);
    if params.get("cell_id").map(String::as_str) != Some(CELL_ID) {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "unknown cell"}))).into_response();
    }
    if let Some(raw) = svc.enrichment_raw_body {
        return raw.into_response();
    }
    let mut script = svc.enrichment_script.lock().unwrap();
    let (status, last_error) = if script.len() > 1 {
        script.remove(0)
    } else {
        script.first().cloned().unwrap_or(("pending".to_string(), None))
    };
    Json(json!({"status": status, "last_error": last_error})).into_response()
}

async fn context(State(svc): State<Shared>, headers: HeaderMap, Json(body): Json<Value>) -> Response {
    if bearer(&headers) != MINTED_TOKEN {
        return unauthorized();
    }
    svc.context_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = svc.context_failure {
        return (status, Json(json!({"error": "retrieval unavailable"}))).into_response();
    }
    let evidence = svc.evidence_text.lock().unwrap().clone().unwrap_or_default();
    match body["passage_kind"].as_str() {
        Some("sentence_window_v1") => Json(json!({
            "context_text": format!("LAM Hello World (proof-carrying memory)\n{evidence}"),
            "passages": [{"passage_id": "sw-1", "ref": "[1]", "text": evidence}],
            "citations": [],
        }))
        .into_response(),
        Some("evidence_span_v1") => {
            let mut sha = sha256_hex(&evidence);
            if svc.tamper_hash {
                let flipped = if sha.ends_with('0') { '1' } else { '0' };
                sha.pop();
                sha.push(flipped);
            }
            let citations = if svc.cite_passages {
                json!([
                    {"ref": "[9]", "passage_id": "", "sha256": "ignored"},
                    {"ref": "[2]", "passage_id": "ev-2", "sha256": sha},
                ])
            } else {
                json!([])
            };
            Json(json!({
                "context_text": format!("[2] {evidence}"),
                "passages": [
                    {"passage_id": "ev-1", "ref": "[1]", "text": "The on-call engineer is: Casey."},
                    {"passage_id": "ev-2", "ref": "[2]", "text": evidence},
                ],
                "citations": citations,
            }))
            .into_response()
        }
        _ => (StatusCode::BAD_REQUEST, Json(json!({"error": "bad passage_kind"}))).into_response(),
    }
}

async fn decode(
    State(svc): State<Shared>,
    headers: HeaderMap,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if bearer(&headers) != MINTED_TOKEN {
        return unauthorized();
    }
    svc.decode_calls.fetch_add(1, Ordering::SeqCst);
    if let Some(status) = svc.decode_failure {
        return (status, Json(json!({"error": "decoder offline"}))).into_response();
    }
    if params.get("passage_id").map(String::as_str) != Some("ev-2") {
        return (StatusCode::NOT_FOUND, Json(json!({"error": "unknown passage"}))).into_response();
    }
    let evidence = svc.evidence_text.lock().unwrap().clone().unwrap_or_default();
    let (start, end) = svc.evidence_span.lock().unwrap().unwrap_or((0, 0));
    Json(json!({
        "encoding": svc.decode_encoding,
        "text": evidence,
        "cell_id": CELL_ID,
        "span_type": "text",
        "transform": "identity",
        "start_pos": start,
        "end_pos": end,
    }))
    .into_response()
}

pub async fn spawn(service: MockService) -> (SocketAddr, Shared) {
    let shared = Arc::new(service);
    let router = Router::new()
        .route("/health", get(health))
        .route("/v1/admin/keys", post(admin_keys))
        .route("/v1/ingest", post(ingest))
        .route("/v1/enrichment/status", get(enrichment_status))
        .route("/v1/context", post(context))
        .route("/v1/decode", get(decode))
        .with_state(shared.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    (addr, shared)
}

pub fn config_for(addr: SocketAddr, extra: &[(&str, &str)]) -> DemoConfig {
    let mut vars: HashMap<String, String> = HashMap::from([
        ("LAM_API_URL".to_string(), format!("http://{addr}/v1/")),
        ("LAM_ADMIN_TOKEN".to_string(), ADMIN_TOKEN.to_string()),
        ("LAM_DEMO_SCOPE_USER".to_string(), "tester".to_string()),
        ("LAM_DEMO_HTTP_TIMEOUT_MS".to_string(), "2000".to_string()),
        ("LAM_DEMO_ENRICH_WAIT_MS".to_string(), "3000".to_string()),
        ("LAM_DEMO_HEALTH_WAIT_MS".to_string(), "3000".to_string()),
    ]);
    for (k, v) in extra {
        vars.insert(k.to_string(), v.to_string());
    }
    DemoConfig::from_lookup(|key| vars.get(key).cloned()).unwrap()
}
