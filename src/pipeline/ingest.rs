use tracing::info;

use crate::config::DemoConfig;
use crate::error::{DemoError, Result};
use crate::models::{
    AccessCredential, ByteSpan, CellId, EvidenceClaim, IngestRequest, IngestResponse,
    SourceDocument,
};
use crate::pipeline::http::{MemoryClient, RequestSpec};

const ENDPOINT: &str = "/v1/ingest";
const CONTENT_TYPE: &str = "text/plain; charset=utf-8";
const QUOTE_BUDGET: u32 = 512;

/// Byte offsets of the first occurrence of `sentence` in `document`.
///
/// Offsets index the UTF-8 encoding, so any multi-byte character before the
/// sentence shifts `start` past its character index.
pub fn locate_evidence(document: &str, sentence: &str) -> Result<ByteSpan> {
    if sentence.is_empty() {
        return Err(DemoError::DataShape(
            "Internal error: empty evidence sentence".to_string(),
        ));
    }
    // `str::find` already reports a byte index.
    let start = document
        .find(sentence)
        .ok_or_else(|| DemoError::DataShape("Internal error: missing sentence in doc".to_string()))?;
    Ok(ByteSpan {
        start,
        end: start + sentence.len(),
    })
}

pub fn build_ingest_request(doc: &SourceDocument) -> Result<IngestRequest> {
    let span = locate_evidence(&doc.text, &doc.sentence)?;
    let claim = EvidenceClaim::text_fact(
        format!("demo launch code is {}", doc.secret),
        span,
        QUOTE_BUDGET,
    );
    Ok(IngestRequest {
        content_type: CONTENT_TYPE.to_string(),
        content: doc.text.clone(),
        claims: vec![claim],
    })
}

pub async fn ingest_document(
    client: &MemoryClient,
    config: &DemoConfig,
    credential: &AccessCredential,
    doc: &SourceDocument,
) -> Result<CellId> {
    let request = build_ingest_request(doc)?;
    let span = &request.claims[0].evidence;
    info!(start = span.start_pos, end = span.end_pos, bytes = doc.byte_len(), "ingesting document");

    let spec = RequestSpec::post_json(config.endpoint("ingest"), &request)?.bearer(&credential.token);
    let res = client.send(spec).await?.require_success(ENDPOINT)?;

    let parsed: IngestResponse = res.parse(ENDPOINT)?;
    parsed
        .cell_id
        .as_deref()
        .and_then(CellId::parse)
        .ok_or_else(|| DemoError::DataShape("/v1/ingest response missing cell_id".to_string()))
}
