use std::io::Write;

use tracing::info;

use crate::config::DemoConfig;
use crate::error::Result;
use crate::models::{AccessCredential, CellId, SourceDocument, DEMO_QUERY};
use crate::pipeline::context::{compare_contexts, ContextComparison};
use crate::pipeline::enrichment::wait_for_enrichment;
use crate::pipeline::http::MemoryClient;
use crate::pipeline::ingest::ingest_document;
use crate::pipeline::provision::mint_credential;
use crate::pipeline::readiness::wait_for_health;
use crate::pipeline::report::Reporter;
use crate::pipeline::verify::{
    CitationVerifier, HttpSpanDecoder, SecretTokenSelector, VerifiedCitation,
};

/// Everything a successful run produced.
#[derive(Debug)]
pub struct RunSummary {
    pub credential: AccessCredential,
    pub cell_id: CellId,
    pub contexts: ContextComparison,
    pub verified: VerifiedCitation,
}

/// Runs the five stages in order, stopping at the first failure.
pub async fn run_demo<W: Write>(config: &DemoConfig, out: W) -> Result<RunSummary> {
    let client = MemoryClient::new(config.http_timeout)?;
    let mut report = Reporter::new(out);
    let doc = SourceDocument::demo();

    report.stage(1, &format!("Waiting for LAM health: {}", config.health_url()))?;
    wait_for_health(&client, config).await?;

    report.stage(
        2,
        &format!(
            "Minting a demo API key (tenant={}, user={}, ns={})",
            config.tenant_id, config.scope_user, config.namespace
        ),
    )?;
    let credential = mint_credential(&client, config).await?;

    report.stage(3, "Ingesting a tiny doc")?;
    let cell_id = ingest_document(&client, config, &credential, &doc).await?;

    report.stage(4, &format!("Waiting for enrichment (cell_id={cell_id})"))?;
    wait_for_enrichment(&client, config, &credential, &cell_id).await?;

    report.stage(5, "Asking the same question two ways (RAG-ish vs LAM-ish)")?;
    let contexts = compare_contexts(&client, config, &credential, DEMO_QUERY).await?;
    report.context(&contexts.sentence_window)?;
    report.context(&contexts.evidence_span)?;

    let answer = &contexts.evidence_span.answer;
    let verifier = CitationVerifier::new(
        HttpSpanDecoder::new(&client, &config.api_url, &credential),
        SecretTokenSelector::new(&doc.secret),
    );
    let prepared = verifier.prepare(answer)?;
    report.citations(&answer.citations)?;
    report.decoding(&prepared.citation.reference, prepared.passage_id.as_str())?;

    let verified = verifier.confirm(prepared).await?;
    report.verified(&verified)?;
    report.dev_token(&credential)?;

    info!(cell_id = %cell_id, "demo verified");
    Ok(RunSummary {
        credential,
        cell_id,
        contexts,
        verified,
    })
}
