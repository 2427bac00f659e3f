use crate::error::{DemoError, Result};
use crate::models::{DecodedSpan, Passage, PassageId};
use async_trait::async_trait;

/// What one probe attempt observed.
#[derive(Debug)]
pub enum ProbeOutcome<T> {
    NotYet,
    Ready(T),
    Failed(DemoError),
}

/// A single check against remote state, repeated by `DeadlinePoller`.
#[async_trait]
pub trait Probe: Send {
    type Output: Send;

    /// Human-readable name of the awaited resource, used in timeout errors.
    fn describe(&self) -> String;

    async fn probe(&mut self) -> ProbeOutcome<Self::Output>;
}

/// Fetches the server's reconstruction of a cited span.
#[async_trait]
pub trait SpanDecoder: Send + Sync {
    async fn decode(&self, passage_id: &PassageId) -> Result<DecodedSpan>;
}

/// Picks the passage whose citation will be verified.
pub trait PassageSelector: Send + Sync {
    fn select<'a>(&self, passages: &'a [Passage]) -> Option<&'a Passage>;
}
