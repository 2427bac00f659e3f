use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tracing::{info, warn};
use url::Url;

use crate::error::{DemoError, IntegrityViolation, Result};
use crate::models::{
    AccessCredential, Citation, ContextAnswer, DecodedSpan, Passage, PassageId, PassageKind,
};
use crate::pipeline::http::{MemoryClient, RequestSpec};
use crate::pipeline::traits::{PassageSelector, SpanDecoder};

/// Shortest declared hash accepted before any decoding is attempted.
pub const MIN_HASH_HEX_LEN: usize = 16;

pub fn sha256_hex(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    hex::encode(hasher.finalize())
}

/// Prefers the passage mentioning `needle` (case-insensitive), else the first one.
#[derive(Clone, Debug)]
pub struct SecretTokenSelector {
    needle: String,
}

impl SecretTokenSelector {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
        }
    }
}

impl PassageSelector for SecretTokenSelector {
    fn select<'a>(&self, passages: &'a [Passage]) -> Option<&'a Passage> {
        passages
            .iter()
            .find(|p| p.text.to_lowercase().contains(&self.needle))
            .or_else(|| passages.first())
    }
}

/// Resolves spans through `GET /decode?passage_id=`.
pub struct HttpSpanDecoder<'a> {
    client: &'a MemoryClient,
    api_url: &'a str,
    credential: &'a AccessCredential,
}

impl<'a> HttpSpanDecoder<'a> {
    pub fn new(client: &'a MemoryClient, api_url: &'a str, credential: &'a AccessCredential) -> Self {
        Self {
            client,
            api_url,
            credential,
        }
    }
}

#[async_trait]
impl SpanDecoder for HttpSpanDecoder<'_> {
    async fn decode(&self, passage_id: &PassageId) -> Result<DecodedSpan> {
        const ENDPOINT: &str = "/v1/decode?passage_id";
        let url = Url::parse_with_params(
            &format!("{}/decode", self.api_url),
            &[("passage_id", passage_id.as_str())],
        )
        .map_err(|e| DemoError::Config(format!("invalid LAM_API_URL {}: {e}", self.api_url)))?;

        let spec = RequestSpec::get(url.to_string()).bearer(&self.credential.token);
        let res = self.client.send(spec).await?.require_success(ENDPOINT)?;
        res.parse(ENDPOINT)
    }
}

/// A citation whose declared hash was reproduced from the decoded bytes.
#[derive(Clone, Debug)]
pub struct VerifiedCitation {
    pub passage: Passage,
    pub citation: Citation,
    pub span: DecodedSpan,
    pub text: String,
    pub sha256: String,
}

/// A passage and citation that passed the checks which need no network.
#[derive(Clone, Debug)]
pub struct PreparedCitation<'a> {
    pub passage: &'a Passage,
    pub passage_id: PassageId,
    pub citation: &'a Citation,
    pub expected: &'a str,
}

pub struct CitationVerifier<D, S> {
    decoder: D,
    selector: S,
}

impl<D, S> CitationVerifier<D, S>
where
    D: SpanDecoder,
    S: PassageSelector,
{
    pub fn new(decoder: D, selector: S) -> Self {
        Self { decoder, selector }
    }

    pub fn select_passage<'a>(&self, answer: &'a ContextAnswer) -> Result<&'a Passage> {
        self.selector.select(&answer.passages).ok_or_else(|| {
            IntegrityViolation::NoPassages(PassageKind::EvidenceSpanV1.display_name().to_string())
                .into()
        })
    }

    /// Selects a passage, finds its citation and checks the declared hash.
    pub fn prepare<'a>(&self, answer: &'a ContextAnswer) -> Result<PreparedCitation<'a>> {
        let passage = self.select_passage(answer)?;
        let passage_id =
            PassageId::parse(&passage.passage_id).ok_or(IntegrityViolation::MissingPassageId)?;
        let citation = correlate_citation(&answer.citations, passage)?;
        let expected = check_declared_hash(citation)?;
        Ok(PreparedCitation {
            passage,
            passage_id,
            citation,
            expected,
        })
    }

    /// Decodes the cited span and proves its SHA-256 equals the declared one.
    pub async fn confirm(&self, prepared: PreparedCitation<'_>) -> Result<VerifiedCitation> {
        let PreparedCitation {
            passage,
            passage_id,
            citation,
            expected,
        } = prepared;

        info!(passage_id = %passage_id, reference = %citation.reference, "decoding citation");
        let span = self.decoder.decode(&passage_id).await?;
        let text = plain_text(&span, &passage_id)?.to_string();

        let actual = sha256_hex(&text);
        if actual != expected {
            warn!(passage_id = %passage_id, "citation hash mismatch");
            return Err(IntegrityViolation::HashMismatch {
                expected: expected.to_string(),
                actual,
            }
            .into());
        }

        info!(passage_id = %passage_id, sha256 = %actual, "citation verified");
        Ok(VerifiedCitation {
            passage: passage.clone(),
            citation: citation.clone(),
            span,
            text,
            sha256: actual,
        })
    }

    /// Every step must pass; nothing here is retried.
    pub async fn verify(&self, answer: &ContextAnswer) -> Result<VerifiedCitation> {
        let prepared = self.prepare(answer)?;
        self.confirm(prepared).await
    }
}

/// Finds the citation for `passage`: by passage id first, then by reference.
pub fn correlate_citation<'a>(citations: &'a [Citation], passage: &Passage) -> Result<&'a Citation> {
    let by_id = citations
        .iter()
        .find(|c| !passage.passage_id.is_empty() && c.passage_id == passage.passage_id);
    let by_ref = || {
        citations
            .iter()
            .find(|c| !passage.reference.is_empty() && c.reference == passage.reference)
    };
    by_id.or_else(by_ref).ok_or_else(|| {
        IntegrityViolation::MissingCitation {
            passage_id: passage.passage_id.clone(),
            reference: passage.reference.clone(),
        }
        .into()
    })
}

fn check_declared_hash(citation: &Citation) -> Result<&str> {
    let declared = citation.sha256.trim();
    if declared.len() < MIN_HASH_HEX_LEN || !declared.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(IntegrityViolation::WeakHash {
            passage_id: citation.passage_id.clone(),
            got: declared.to_string(),
        }
        .into());
    }
    Ok(declared)
}

fn plain_text<'a>(span: &'a DecodedSpan, passage_id: &PassageId) -> Result<&'a str> {
    if !span.is_plain_text() {
        let got = match span.encoding() {
            "" => "empty",
            other => other,
        };
        return Err(IntegrityViolation::UnsupportedEncoding(got.to_string()).into());
    }
    match span.text.as_deref() {
        Some(text) if !text.is_empty() => Ok(text),
        _ => Err(IntegrityViolation::EmptyDecodedText(passage_id.to_string()).into()),
    }
}
