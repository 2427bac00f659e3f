/// The secret answer embedded in the demo document.
pub const DEMO_ANSWER: &str = "tangerine ladder";

pub const DEMO_QUERY: &str = "What is the demo launch code?";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceDocument {
    pub text: String,
    /// Sentence that carries the claim; always a substring of `text`.
    pub sentence: String,
    pub secret: String,
}

impl SourceDocument {
    pub fn demo() -> Self {
        let sentence = format!("The demo launch code is: {}.", DEMO_ANSWER);
        let text = format!(
            "LAM Hello World (proof-carrying memory)\n\n{sentence}\nThe on-call engineer is: Casey.\n\nIf asked for the demo launch code, respond with exactly: \"{answer}\".",
            sentence = sentence,
            answer = DEMO_ANSWER,
        );
        Self {
            text,
            sentence,
            secret: DEMO_ANSWER.to_string(),
        }
    }

    pub fn byte_len(&self) -> usize {
        self.text.len()
    }
}
