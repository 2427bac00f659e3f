use std::io::Write;

use crate::error::Result;
use crate::models::{AccessCredential, Citation, ContextResult};
use crate::pipeline::verify::VerifiedCitation;

pub const STAGES: usize = 5;

/// Human-readable progress on stdout (or any writer in tests).
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn stage(&mut self, n: usize, msg: &str) -> Result<()> {
        writeln!(self.out, "[{n}/{STAGES}] {msg}")?;
        Ok(())
    }

    pub fn context(&mut self, result: &ContextResult) -> Result<()> {
        let text = result.answer.context_text.as_str();
        writeln!(self.out)?;
        writeln!(
            self.out,
            "=== {} ({}) ===",
            result.kind.display_name(),
            result.kind
        )?;
        writeln!(
            self.out,
            "{}",
            if text.is_empty() { "(empty context_text)" } else { text }
        )?;
        Ok(())
    }

    /// Lists complete citations; incomplete ones are skipped here only.
    pub fn citations(&mut self, citations: &[Citation]) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Citations:")?;
        for c in citations.iter().filter(|c| c.is_complete()) {
            writeln!(
                self.out,
                "- {} passage_id={} sha256={}",
                c.reference, c.passage_id, c.sha256
            )?;
        }
        Ok(())
    }

    pub fn decoding(&mut self, reference: &str, passage_id: &str) -> Result<()> {
        let reference = if reference.is_empty() { "(no ref)" } else { reference };
        writeln!(self.out)?;
        writeln!(
            self.out,
            "Decoding citation {reference} (passage_id={passage_id})"
        )?;
        Ok(())
    }

    pub fn verified(&mut self, verified: &VerifiedCitation) -> Result<()> {
        let span = &verified.span;
        writeln!(self.out)?;
        writeln!(self.out, "Decoded span (verified):")?;
        writeln!(self.out, "- cell_id={}", span.cell_id)?;
        writeln!(
            self.out,
            "- span_type={} transform={}",
            span.span_type, span.transform
        )?;
        writeln!(
            self.out,
            "- start_pos={} end_pos={}",
            span.start_pos, span.end_pos
        )?;
        writeln!(self.out)?;
        writeln!(self.out, "{}", verified.text)?;
        Ok(())
    }

    pub fn dev_token(&mut self, credential: &AccessCredential) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Dev token (use for manual curl calls):")?;
        writeln!(self.out, "export TOKEN={}", credential.token)?;
        self.out.flush()?;
        Ok(())
    }
}
