//! crates/questify_core/src/export.rs
//!
//! Plain-text serialization of a generated paper. The output is a pure
//! function of the paper value: the same paper always produces the same
//! bytes, which is what makes re-downloading a saved paper reproducible.
//!
//! PDF and print exports rasterize the rendered preview and live outside
//! the core; they only ever read the paper.

use crate::domain::QuestionPaper;
use std::fmt::Write;

/// Option labels run A, B, C, ... in order.
fn option_label(index: usize) -> char {
    (b'A' + (index as u8 % 26)) as char
}

/// Serializes a paper into the line-oriented export format:
/// title line, domain-info line, instructions line, then per section a
/// `--- <type> ---` header and numbered questions with their options,
/// answer, and explanation.
pub fn plain_text(paper: &QuestionPaper) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", paper.title);
    let _ = writeln!(out, "{}", paper.domain_info);
    let _ = writeln!(out, "Instructions: {}", paper.instructions);
    let _ = writeln!(out);

    for section in &paper.sections {
        let _ = writeln!(out, "\n--- {} ---", section.kind);
        for (idx, q) in section.questions.iter().enumerate() {
            let _ = writeln!(out, "{}. {} [{} Marks]", idx + 1, q.text, q.marks);
            for (i, opt) in q.options.iter().enumerate() {
                let _ = writeln!(out, "   {}) {}", option_label(i), opt);
            }
            if let Some(answer) = &q.answer {
                let _ = writeln!(out, "   Ans: {}", answer);
            }
            if let Some(explanation) = &q.explanation {
                let _ = writeln!(out, "   Exp: {}", explanation);
            }
            let _ = writeln!(out);
        }
    }

    out
}

/// Builds the download file name, e.g. `Questify_School_Class_10.txt`,
/// with every whitespace run collapsed to a single underscore.
pub fn export_file_name(domain: &str, sub_domain: &str, extension: &str) -> String {
    let raw = format!("Questify_{}_{}.{}", domain, sub_domain, extension);
    raw.split_whitespace().collect::<Vec<_>>().join("_")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Question, QuestionPaper, Section};

    fn sample_paper() -> QuestionPaper {
        QuestionPaper {
            id: None,
            title: "Questify - Practice Paper".to_string(),
            domain_info: "School - Class 10".to_string(),
            instructions: "Attempt all questions.".to_string(),
            sections: vec![Section {
                kind: "MCQs".to_string(),
                questions: vec![Question {
                    id: 1,
                    text: "2+2=?".to_string(),
                    options: vec!["3".into(), "4".into(), "5".into(), "6".into()],
                    marks: 1,
                    answer: Some("4".to_string()),
                    explanation: None,
                }],
            }],
            created_at: None,
        }
    }

    #[test]
    fn sample_paper_serializes_to_the_exact_expected_bytes() {
        let expected = "Questify - Practice Paper\n\
                        School - Class 10\n\
                        Instructions: Attempt all questions.\n\
                        \n\
                        \n\
                        --- MCQs ---\n\
                        1. 2+2=? [1 Marks]\n   \
                        A) 3\n   \
                        B) 4\n   \
                        C) 5\n   \
                        D) 6\n   \
                        Ans: 4\n\
                        \n";
        assert_eq!(plain_text(&sample_paper()), expected);
    }

    #[test]
    fn export_is_deterministic_across_invocations() {
        let paper = sample_paper();
        let first = plain_text(&paper);
        let second = plain_text(&paper);
        assert_eq!(first.as_bytes(), second.as_bytes());
    }

    #[test]
    fn explanation_line_appears_only_when_present() {
        let mut paper = sample_paper();
        assert!(!plain_text(&paper).contains("Exp:"));

        paper.sections[0].questions[0].explanation = Some("Basic addition.".to_string());
        let text = plain_text(&paper);
        assert!(text.contains("   Exp: Basic addition.\n"));
    }

    #[test]
    fn exporting_does_not_mutate_the_paper() {
        let paper = sample_paper();
        let before = paper.clone();
        let _ = plain_text(&paper);
        assert_eq!(paper, before);
    }

    #[test]
    fn file_name_collapses_whitespace_to_underscores() {
        assert_eq!(
            export_file_name("School", "Class 10", "txt"),
            "Questify_School_Class_10.txt"
        );
        assert_eq!(
            export_file_name("Competitive", "JEE  Main", "pdf"),
            "Questify_Competitive_JEE_Main.pdf"
        );
    }
}
