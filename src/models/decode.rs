use serde::Deserialize;

use crate::models::context::lenient_string;

/// The service tag for plain UTF-8 text.
pub const PLAIN_TEXT_ENCODING: &str = "utf8";

/// Response of `GET /decode?passage_id=`. Only `encoding` and `text` take part
/// in verification; the rest is display-only and read from any scalar.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct DecodedSpan {
    #[serde(default)]
    pub encoding: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub cell_id: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub span_type: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub transform: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub start_pos: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub end_pos: String,
}

impl DecodedSpan {
    pub fn encoding(&self) -> &str {
        self.encoding.as_deref().unwrap_or("")
    }

    pub fn is_plain_text(&self) -> bool {
        self.encoding() == PLAIN_TEXT_ENCODING
    }
}
