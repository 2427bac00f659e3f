use serde::{Deserialize, Serialize};

/// Half-open byte range `[start, end)` into the UTF-8 encoding of a document.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ByteSpan {
    pub start: usize,
    pub end: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceSpan {
    pub span_type: String,
    pub transform: String,
    pub start_pos: usize,
    pub end_pos: usize,
    pub quote_budget: u32,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvidenceClaim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub canonical: String,
    pub evidence: EvidenceSpan,
}

impl EvidenceClaim {
    /// A `FACT` claim backed by an identity-transformed text span.
    pub fn text_fact(canonical: impl Into<String>, span: ByteSpan, quote_budget: u32) -> Self {
        Self {
            claim_type: "FACT".to_string(),
            canonical: canonical.into(),
            evidence: EvidenceSpan {
                span_type: "text".to_string(),
                transform: "identity".to_string(),
                start_pos: span.start,
                end_pos: span.end,
                quote_budget,
            },
        }
    }
}

/// Body of `POST /ingest`.
#[derive(Clone, Debug, Serialize)]
pub struct IngestRequest {
    pub content_type: String,
    pub content: String,
    pub claims: Vec<EvidenceClaim>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct IngestResponse {
    #[serde(default)]
    pub cell_id: Option<String>,
}
