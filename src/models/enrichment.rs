use serde::Deserialize;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EnrichmentStatusResponse {
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub last_error: Option<String>,
}

/// Background enrichment state of a cell as seen by one poll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EnrichmentStatus {
    /// Anything the service reports that is neither `done` nor `failed`.
    Pending(String),
    Done,
    Failed { last_error: String },
}

impl EnrichmentStatus {
    pub fn classify(response: &EnrichmentStatusResponse) -> Self {
        match response.status.as_deref().unwrap_or("") {
            "done" => Self::Done,
            "failed" => {
                let last_error = response
                    .last_error
                    .as_deref()
                    .map(str::trim)
                    .filter(|e| !e.is_empty())
                    .unwrap_or("unknown")
                    .to_string();
                Self::Failed { last_error }
            }
            other => Self::Pending(other.to_string()),
        }
    }
}
