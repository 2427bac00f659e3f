pub mod claim;
pub mod context;
pub mod credential;
pub mod decode;
pub mod document;
pub mod enrichment;
pub mod ids;

pub use claim::{ByteSpan, EvidenceClaim, EvidenceSpan, IngestRequest, IngestResponse};
pub use context::{Citation, ContextAnswer, ContextQuery, ContextResult, Passage, PassageKind};
pub use credential::{AccessCredential, KeyRequest, KeyResponse};
pub use decode::{DecodedSpan, PLAIN_TEXT_ENCODING};
pub use document::{SourceDocument, DEMO_ANSWER, DEMO_QUERY};
pub use enrichment::{EnrichmentStatus, EnrichmentStatusResponse};
pub use ids::{CellId, PassageId};
