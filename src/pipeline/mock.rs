use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{DemoError, Result};
use crate::models::{DecodedSpan, PassageId};
use crate::pipeline::traits::SpanDecoder;

/// Serves decoded spans from memory and counts lookups.
#[derive(Debug, Default)]
pub struct StaticDecoder {
    spans: HashMap<String, DecodedSpan>,
    calls: AtomicUsize,
}

impl StaticDecoder {
    pub fn with(mut self, passage_id: &str, span: DecodedSpan) -> Self {
        self.spans.insert(passage_id.to_string(), span);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SpanDecoder for StaticDecoder {
    async fn decode(&self, passage_id: &PassageId) -> Result<DecodedSpan> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.spans
            .get(passage_id.as_str())
            .cloned()
            .ok_or_else(|| DemoError::Rejected {
                endpoint: "/v1/decode?passage_id".to_string(),
                status: 404,
                body: format!("{{\"error\":\"unknown passage_id {passage_id}\"}}"),
            })
    }
}
