//! crates/questify_core/src/contract.rs
//!
//! The response contract for the generation model. The model is asked to
//! reply with a single JSON object matching `QuestionPaper`; this module
//! treats that reply as untrusted input: it strips any markdown code
//! fences the model wrapped around the payload, then parses it against
//! the strict schema. Absent optional fields coerce to their defaults
//! during deserialization (see the serde attributes in `domain`).

use crate::domain::{GenerationRequest, QuestionPaper, DEFAULT_SECTION_COUNT};

/// The model replied with text that does not parse as the agreed JSON
/// shape. Carries the fence-stripped raw text so callers can log it for
/// diagnosis; the `Display` message stays generic.
#[derive(Debug, thiserror::Error)]
#[error("Invalid response format from AI")]
pub struct PaperFormatError {
    pub raw: String,
    #[source]
    pub source: serde_json::Error,
}

/// Removes markdown code-fence markers (```json / ```) the model may have
/// wrapped around its JSON payload, and trims surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json", "").replace("```", "").trim().to_string()
}

/// Fence-strips and parses a raw model reply into a `QuestionPaper`.
pub fn parse_paper(raw: &str) -> Result<QuestionPaper, PaperFormatError> {
    let cleaned = strip_code_fences(raw);
    serde_json::from_str::<QuestionPaper>(&cleaned).map_err(|source| PaperFormatError {
        raw: cleaned,
        source,
    })
}

/// Compares a generated paper against the request it answered and reports
/// every structural mismatch: a requested section type the model omitted,
/// a section with the wrong question count, or an extra section the user
/// never asked for. An empty report means the paper conforms.
///
/// Mismatches do not reject the paper; callers log them and show the
/// paper anyway.
pub fn conformance_report(request: &GenerationRequest, paper: &QuestionPaper) -> Vec<String> {
    let mut report = Vec::new();

    for requested in &request.question_types {
        let expected = request
            .section_counts
            .get(requested)
            .copied()
            .unwrap_or(DEFAULT_SECTION_COUNT);
        match paper.sections.iter().find(|s| &s.kind == requested) {
            None => report.push(format!("missing requested section '{}'", requested)),
            Some(section) if section.questions.len() as u32 != expected => report.push(format!(
                "section '{}' has {} questions, {} requested",
                requested,
                section.questions.len(),
                expected
            )),
            Some(_) => {}
        }
    }

    for section in &paper.sections {
        if !request.question_types.iter().any(|t| t == &section.kind) {
            report.push(format!("unrequested section '{}'", section.kind));
        }
    }

    report
}
