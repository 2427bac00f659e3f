use std::time::Duration;
use thiserror::Error;

/// Ways a retrieved citation can fail to prove it matches the stored bytes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IntegrityViolation {
    #[error("no passages returned from /v1/context ({0})")]
    NoPassages(String),
    #[error("chosen passage missing passage_id")]
    MissingPassageId,
    #[error("failed to find matching citation for passage_id={passage_id} (ref={reference})")]
    MissingCitation {
        passage_id: String,
        reference: String,
    },
    #[error("citation for passage_id={passage_id} carries no usable sha256 (got {got:?})")]
    WeakHash { passage_id: String, got: String },
    #[error("unsupported encoding for decoded span: expected utf8, got {0}")]
    UnsupportedEncoding(String),
    #[error("decoded span for passage_id={0} is empty")]
    EmptyDecodedText(String),
    #[error("SHA-256 mismatch: expected {expected} got {actual}")]
    HashMismatch { expected: String, actual: String },
}

#[derive(Debug, Error)]
pub enum DemoError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request to {url} timed out after {}ms", .after.as_millis())]
    RequestTimeout { url: String, after: Duration },

    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("malformed JSON from {url}: {source}")]
    MalformedBody {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Timed out waiting for {what} after {}ms ({attempts} attempts)", .waited.as_millis())]
    DeadlineElapsed {
        what: String,
        waited: Duration,
        attempts: u32,
    },

    #[error("{endpoint} failed ({status}): {body}")]
    Rejected {
        endpoint: String,
        status: u16,
        body: String,
    },

    #[error("Enrichment failed for cell_id={cell_id}: {cause}")]
    JobFailed { cell_id: String, cause: String },

    #[error("{0}")]
    DataShape(String),

    #[error(transparent)]
    Integrity(#[from] IntegrityViolation),

    #[error("cannot write report: {0}")]
    Output(#[from] std::io::Error),
}

impl DemoError {
    /// Stable code for log fields and callers that only care about the class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG",
            Self::RequestTimeout { .. } => "REQUEST_TIMEOUT",
            Self::Transport { .. } => "TRANSPORT",
            Self::MalformedBody { .. } => "MALFORMED_BODY",
            Self::DeadlineElapsed { .. } => "DEADLINE_ELAPSED",
            Self::Rejected { .. } => "REMOTE_REJECTED",
            Self::JobFailed { .. } => "JOB_FAILED",
            Self::DataShape(_) => "DATA_SHAPE",
            Self::Integrity(_) => "INTEGRITY_VIOLATION",
            Self::Output(_) => "OUTPUT",
        }
    }

    pub fn is_integrity(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }
}

pub type Result<T, E = DemoError> = std::result::Result<T, E>;
