use serde::{Deserialize, Serialize};
use std::fmt;

/// Retrieval policy selector for `POST /context`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum PassageKind {
    #[serde(rename = "sentence_window_v1")]
    SentenceWindowV1,
    #[serde(rename = "evidence_span_v1")]
    EvidenceSpanV1,
}

impl PassageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::SentenceWindowV1 => "sentence_window_v1",
            Self::EvidenceSpanV1 => "evidence_span_v1",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::SentenceWindowV1 => "RAG-ish",
            Self::EvidenceSpanV1 => "LAM-ish",
        }
    }
}

impl fmt::Display for PassageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ContextQuery {
    pub q: String,
    pub limit: u32,
    pub max_chars: u32,
    pub passage_kind: PassageKind,
}

// Fields are trimmed strings; a missing field reads as "".
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Passage {
    #[serde(default, deserialize_with = "lenient_string")]
    pub passage_id: String,
    #[serde(default, rename = "ref", deserialize_with = "lenient_string")]
    pub reference: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub text: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct Citation {
    #[serde(default, rename = "ref", deserialize_with = "lenient_string")]
    pub reference: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub passage_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub sha256: String,
}

impl Citation {
    pub fn is_complete(&self) -> bool {
        !self.reference.trim().is_empty()
            && !self.passage_id.trim().is_empty()
            && !self.sha256.trim().is_empty()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct ContextAnswer {
    #[serde(default, deserialize_with = "lenient_string")]
    pub context_text: String,
    #[serde(default, deserialize_with = "lenient_list")]
    pub passages: Vec<Passage>,
    #[serde(default, deserialize_with = "lenient_list")]
    pub citations: Vec<Citation>,
}

/// One policy's answer: the body exactly as returned plus its typed view.
#[derive(Clone, Debug)]
pub struct ContextResult {
    pub kind: PassageKind,
    pub raw: serde_json::Value,
    pub answer: ContextAnswer,
}

// The service is loose with scalar types (ids may be numbers, fields may be
// null), so strings are read from any scalar and anything else becomes "".
pub(crate) fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde_json::Value;
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

// A non-array or null list reads as empty; malformed entries fall back to
// defaults so one odd citation cannot hide the rest.
fn lenient_list<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::de::DeserializeOwned + Default,
{
    use serde_json::Value;
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}
