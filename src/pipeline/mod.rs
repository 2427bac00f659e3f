pub mod context;
pub mod enrichment;
pub mod http;
pub mod ingest;
#[cfg(test)]
pub(crate) mod mock;
pub mod poll;
pub mod provision;
pub mod readiness;
pub mod report;
pub mod run;
pub mod traits;
pub mod verify;

pub use context::{compare_contexts, ContextComparison};
pub use enrichment::{wait_for_enrichment, EnrichmentProbe};
pub use http::{MemoryClient, RequestSpec, TimedResponse};
pub use ingest::{build_ingest_request, ingest_document, locate_evidence};
pub use poll::DeadlinePoller;
pub use provision::mint_credential;
pub use readiness::{wait_for_health, HealthProbe};
pub use report::Reporter;
pub use run::{run_demo, RunSummary};
pub use traits::{PassageSelector, Probe, ProbeOutcome, SpanDecoder};
pub use verify::{
    sha256_hex, CitationVerifier, HttpSpanDecoder, PreparedCitation, SecretTokenSelector,
    VerifiedCitation,
};
