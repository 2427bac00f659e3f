use tracing::info;

use crate::config::DemoConfig;
use crate::error::Result;
use crate::models::{AccessCredential, ContextAnswer, ContextQuery, ContextResult, PassageKind};
use crate::pipeline::http::{MemoryClient, RequestSpec};

/// The same question answered under both retrieval policies.
#[derive(Clone, Debug)]
pub struct ContextComparison {
    pub sentence_window: ContextResult,
    pub evidence_span: ContextResult,
}

pub async fn fetch_context(
    client: &MemoryClient,
    config: &DemoConfig,
    credential: &AccessCredential,
    query: &str,
    kind: PassageKind,
) -> Result<ContextResult> {
    let endpoint = format!("/v1/context ({kind})");
    let body = ContextQuery {
        q: query.to_string(),
        limit: config.context_limit,
        max_chars: config.max_chars,
        passage_kind: kind,
    };
    let spec = RequestSpec::post_json(config.endpoint("context"), &body)?.bearer(&credential.token);
    let res = client.send(spec).await?.require_success(&endpoint)?;

    let answer: ContextAnswer = res.parse(&endpoint)?;
    info!(
        passage_kind = %kind,
        passages = answer.passages.len(),
        citations = answer.citations.len(),
        "context retrieved"
    );
    Ok(ContextResult {
        kind,
        raw: res.body.unwrap_or(serde_json::Value::Null),
        answer,
    })
}

pub async fn compare_contexts(
    client: &MemoryClient,
    config: &DemoConfig,
    credential: &AccessCredential,
    query: &str,
) -> Result<ContextComparison> {
    let sentence_window =
        fetch_context(client, config, credential, query, PassageKind::SentenceWindowV1).await?;
    let evidence_span =
        fetch_context(client, config, credential, query, PassageKind::EvidenceSpanV1).await?;
    Ok(ContextComparison {
        sentence_window,
        evidence_span,
    })
}
