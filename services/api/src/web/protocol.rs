//! services/api/src/web/protocol.rs
//!
//! Request and response payloads for the REST endpoints, as the browser
//! client sends and receives them (camelCase JSON).

use questify_core::domain::{Domain, PaperRequest};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The body of `POST /api/generate`.
///
/// `numQuestions` arrives pre-rendered by the client ("MCQs: 5, Short
/// Answers: 3"); the server forwards it into the prompt verbatim and
/// never parses it back apart.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateBody {
    #[schema(value_type = String, example = "School")]
    pub domain: Domain,
    pub sub_domain: String,
    #[serde(default)]
    pub subject: Option<String>,
    pub topics: String,
    pub question_types: Vec<String>,
    #[serde(default)]
    pub programming_levels: Option<Vec<String>>,
    pub num_questions: String,
    pub include_answers: bool,
    pub include_explanations: bool,
}

impl From<GenerateBody> for PaperRequest {
    fn from(body: GenerateBody) -> Self {
        PaperRequest {
            domain: body.domain,
            sub_domain: body.sub_domain,
            subject: body.subject,
            topics: body.topics,
            question_types: body.question_types,
            programming_levels: body.programming_levels,
            num_questions: body.num_questions,
            include_answers: body.include_answers,
            include_explanations: body.include_explanations,
        }
    }
}

/// The uniform error body: `{"error": "..."}` with a non-2xx status.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ErrorBody {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generate_body_accepts_the_client_wire_shape() {
        let raw = r#"{
            "domain": "School",
            "subDomain": "Class 10",
            "subject": "Maths",
            "topics": "Algebra",
            "questionTypes": ["MCQs"],
            "numQuestions": "MCQs: 5",
            "includeAnswers": true,
            "includeExplanations": false
        }"#;
        let body: GenerateBody = serde_json::from_str(raw).unwrap();
        assert_eq!(body.sub_domain, "Class 10");
        assert_eq!(body.num_questions, "MCQs: 5");
        assert!(body.programming_levels.is_none());

        let request = PaperRequest::from(body);
        assert_eq!(request.context_line(), "School - Class 10 (Maths)");
    }

    #[test]
    fn error_body_serializes_as_the_error_key() {
        let json = serde_json::to_string(&ErrorBody::new("boom")).unwrap();
        assert_eq!(json, r#"{"error":"boom"}"#);
    }
}
