//! crates/questify_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or HTTP framework; the
//! paper types mirror the JSON contract the generation model is asked to
//! honor, so they derive serde directly.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// The question-type label that triggers the programming-specific rules.
pub const PROGRAMMING_TYPE: &str = "Programming codes";

/// Count assigned to a section when the user enables a question type
/// without setting one explicitly.
pub const DEFAULT_SECTION_COUNT: u32 = 5;

/// The top-level audience category for a paper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    School,
    College,
    Competitive,
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Domain::School => "School",
            Domain::College => "College",
            Domain::Competitive => "Competitive",
        };
        f.write_str(s)
    }
}

/// Everything the user configures before asking for a paper.
///
/// `section_counts` keeps an entry per question type the user has ever
/// enabled; disabled types keep their entry so re-enabling restores the
/// previous count (see `workflow`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub domain: Domain,
    pub sub_domain: String,
    pub subject: Option<String>,
    /// Free text; comma separation is a convention, never parsed.
    pub topics: String,
    pub question_types: Vec<String>,
    pub programming_levels: Option<Vec<String>>,
    pub section_counts: BTreeMap<String, u32>,
    pub include_answers: bool,
    pub include_explanations: bool,
}

/// A required-field violation detected before any service call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestValidationError {
    #[error("Please select a class, course, or exam")]
    MissingSubDomain,
    #[error("Please enter the topics to cover")]
    MissingTopics,
    #[error("Please select a subject for your course")]
    MissingSubject,
    #[error("Please choose difficulty levels for programming questions")]
    MissingProgrammingLevels,
}

impl GenerationRequest {
    /// Checks the invariants that must hold before the generation service
    /// may be called. Field validation is the caller's job; the service
    /// itself stays permissive.
    pub fn validate(&self) -> Result<(), RequestValidationError> {
        if self.sub_domain.trim().is_empty() {
            return Err(RequestValidationError::MissingSubDomain);
        }
        if self.topics.trim().is_empty() {
            return Err(RequestValidationError::MissingTopics);
        }
        if self.domain == Domain::College
            && self.subject.as_deref().map_or(true, |s| s.trim().is_empty())
        {
            return Err(RequestValidationError::MissingSubject);
        }
        if self.question_types.iter().any(|t| t == PROGRAMMING_TYPE)
            && self
                .programming_levels
                .as_deref()
                .map_or(true, |l| l.is_empty())
        {
            return Err(RequestValidationError::MissingProgrammingLevels);
        }
        Ok(())
    }

    /// Human-readable per-section counts, e.g. `"MCQs: 5, Short Answers: 3"`.
    /// This is the `numQuestions` string on the wire; types with no stored
    /// count fall back to the default.
    pub fn counts_summary(&self) -> String {
        self.question_types
            .iter()
            .map(|t| {
                let n = self
                    .section_counts
                    .get(t)
                    .copied()
                    .unwrap_or(DEFAULT_SECTION_COUNT);
                format!("{}: {}", t, n)
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The `domainInfo` summary: `"College - B.Tech (Computer Science)"`,
    /// or without the parenthesis when no subject applies.
    pub fn context_line(&self) -> String {
        match self.subject.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(subject) => format!("{} - {} ({})", self.domain, self.sub_domain, subject),
            None => format!("{} - {}", self.domain, self.sub_domain),
        }
    }

    /// Levels to pass along, only meaningful when programming questions
    /// were requested.
    pub fn effective_programming_levels(&self) -> Option<&[String]> {
        if self.question_types.iter().any(|t| t == PROGRAMMING_TYPE) {
            self.programming_levels.as_deref()
        } else {
            None
        }
    }

    /// Flattens the request into the wire shape sent to the generation
    /// endpoint: per-section counts collapse into the `numQuestions`
    /// summary string, and programming levels are omitted unless the
    /// programming type was selected.
    pub fn to_wire(&self) -> PaperRequest {
        PaperRequest {
            domain: self.domain,
            sub_domain: self.sub_domain.clone(),
            subject: self.subject.clone(),
            topics: self.topics.clone(),
            question_types: self.question_types.clone(),
            programming_levels: self.effective_programming_levels().map(<[String]>::to_vec),
            num_questions: self.counts_summary(),
            include_answers: self.include_answers,
            include_explanations: self.include_explanations,
        }
    }
}

/// The generation request as it travels over HTTP to `POST /api/generate`.
/// Unlike [`GenerationRequest`], the per-section counts are already
/// rendered into the human-readable `numQuestions` string; the server
/// never parses it back apart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaperRequest {
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

impl PaperRequest {
    /// Same `domainInfo` convention as [`GenerationRequest::context_line`].
    pub fn context_line(&self) -> String {
        match self.subject.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(subject) => format!("{} - {} ({})", self.domain, self.sub_domain, subject),
            None => format!("{} - {}", self.domain, self.sub_domain),
        }
    }
}

/// One generated question. `options` is empty for everything except
/// MCQ-shaped questions; `answer` carries source code for programming
/// questions and must be rendered as a code block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub id: u32,
    pub text: String,
    #[serde(default)]
    pub options: Vec<String>,
    pub marks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub answer: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

/// A labeled group of questions of one type within a paper. The label
/// determines rendering and answer-formatting rules downstream.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    #[serde(rename = "type")]
    pub kind: String,
    pub questions: Vec<Question>,
}

/// A complete generated paper. Constructed once from the generation
/// service response and never mutated; persisting it assigns `id` and
/// `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionPaper {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Uuid>,
    pub title: String,
    pub domain_info: String,
    pub instructions: String,
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

impl QuestionPaper {
    /// Total question count across all sections.
    pub fn question_count(&self) -> usize {
        self.sections.iter().map(|s| s.questions.len()).sum()
    }
}

/// A persisted paper as read back from the store, newest first.
#[derive(Debug, Clone, PartialEq)]
pub struct SavedPaper {
    pub id: Uuid,
    pub title: String,
    pub domain: String,
    pub sub_domain: String,
    pub paper: QuestionPaper,
    pub created_at: DateTime<Utc>,
}

// Represents a user - used throughout the app.
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: Uuid,
    pub email: Option<String>,
}

// Only used internally for login/signup - contains sensitive data.
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie).
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

//=========================================================================================
// Catalogs
//=========================================================================================

/// Question-type labels offered in the Configure step. The programming
/// type is only offered for computer-related subjects.
pub const QUESTION_TYPES: &[&str] = &[
    "MCQs",
    "Short Answers",
    "Long Answers",
    "Case-based",
    PROGRAMMING_TYPE,
];

const COLLEGE_COURSES: &[&str] = &["B.Tech", "B.Sc", "B.Com", "BA", "M.Tech", "M.Sc", "MBA"];

const COMPETITIVE_EXAMS: &[&str] =
    &["NEET", "JEE Main", "JEE Advanced", "UPSC", "SSC", "Banking", "Custom"];

/// The sub-domain choices for a domain: classes, courses, or exam names.
pub fn sub_domains(domain: Domain) -> Vec<String> {
    match domain {
        Domain::School => (6..=12).map(|n| format!("Class {}", n)).collect(),
        Domain::College => COLLEGE_COURSES.iter().map(|s| s.to_string()).collect(),
        Domain::Competitive => COMPETITIVE_EXAMS.iter().map(|s| s.to_string()).collect(),
    }
}

/// The subjects offered for a college course, if it is a known course.
pub fn subjects_for_course(course: &str) -> Option<&'static [&'static str]> {
    let subjects: &'static [&'static str] = match course {
        "B.Tech" => &[
            "Computer Science",
            "Electrical Engineering",
            "Mechanical Engineering",
            "Civil Engineering",
            "Electronics & Communication",
        ],
        "B.Sc" => &["Physics", "Chemistry", "Mathematics", "Biology", "Computer Science"],
        "B.Com" => &["Accounting", "Finance", "Business Law", "Economics", "Taxation"],
        "BA" => &[
            "History",
            "Political Science",
            "Sociology",
            "Psychology",
            "English Literature",
        ],
        "M.Tech" => &[
            "Advanced Data Structures",
            "VLSI Design",
            "Structural Engineering",
            "Thermal Engineering",
        ],
        "M.Sc" => &["Quantum Physics", "Organic Chemistry", "Real Analysis", "Microbiology"],
        "MBA" => &[
            "Marketing Management",
            "Financial Management",
            "Human Resource Management",
            "Operations Management",
        ],
        _ => return None,
    };
    Some(subjects)
}

/// Whether the current selection is computer-related, which unlocks the
/// "Programming codes" question type.
pub fn is_computer_selection(domain: Domain, sub_domain: &str, subject: Option<&str>) -> bool {
    let subject_is_computer = subject
        .map(|s| s.to_lowercase().contains("computer"))
        .unwrap_or(false);
    let sub_domain_is_computer = sub_domain.to_lowercase().contains("computer");
    subject_is_computer
        || sub_domain_is_computer
        || (domain == Domain::College
            && sub_domain == "B.Tech"
            && subject == Some("Computer Science"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> GenerationRequest {
        GenerationRequest {
            domain: Domain::School,
            sub_domain: "Class 10".to_string(),
            subject: None,
            topics: "Trigonometry, Calculus".to_string(),
            question_types: vec!["MCQs".to_string(), "Short Answers".to_string()],
            programming_levels: None,
            section_counts: BTreeMap::from([("MCQs".to_string(), 5)]),
            include_answers: true,
            include_explanations: false,
        }
    }

    #[test]
    fn counts_summary_falls_back_to_default() {
        // "Short Answers" has no stored count and must show the default.
        assert_eq!(request().counts_summary(), "MCQs: 5, Short Answers: 5");
    }

    #[test]
    fn context_line_includes_subject_only_when_set() {
        let mut req = request();
        assert_eq!(req.context_line(), "School - Class 10");

        req.domain = Domain::College;
        req.sub_domain = "B.Tech".to_string();
        req.subject = Some("Computer Science".to_string());
        assert_eq!(req.context_line(), "College - B.Tech (Computer Science)");
    }

    #[test]
    fn validation_rejects_missing_required_fields() {
        let mut req = request();
        req.sub_domain = "  ".to_string();
        assert_eq!(req.validate(), Err(RequestValidationError::MissingSubDomain));

        let mut req = request();
        req.topics = String::new();
        assert_eq!(req.validate(), Err(RequestValidationError::MissingTopics));

        let mut req = request();
        req.domain = Domain::College;
        req.sub_domain = "B.Sc".to_string();
        req.subject = None;
        assert_eq!(req.validate(), Err(RequestValidationError::MissingSubject));
    }

    #[test]
    fn validation_requires_levels_for_programming_sections() {
        let mut req = request();
        req.question_types.push(PROGRAMMING_TYPE.to_string());
        req.programming_levels = None;
        assert_eq!(
            req.validate(),
            Err(RequestValidationError::MissingProgrammingLevels)
        );

        req.programming_levels = Some(vec!["Mid".to_string()]);
        assert_eq!(req.validate(), Ok(()));
    }

    #[test]
    fn programming_levels_are_dropped_when_type_not_selected() {
        let mut req = request();
        req.programming_levels = Some(vec!["Easy".to_string()]);
        assert!(req.effective_programming_levels().is_none());

        req.question_types.push(PROGRAMMING_TYPE.to_string());
        assert_eq!(
            req.effective_programming_levels(),
            Some(&["Easy".to_string()][..])
        );
    }

    #[test]
    fn wire_request_uses_camel_case_and_the_counts_summary() {
        let mut req = request();
        req.question_types.push(PROGRAMMING_TYPE.to_string());
        req.programming_levels = Some(vec!["Easy".to_string(), "Hard".to_string()]);

        let wire = req.to_wire();
        assert_eq!(wire.num_questions, "MCQs: 5, Short Answers: 5, Programming codes: 5");

        let json = serde_json::to_value(&wire).unwrap();
        assert_eq!(json["subDomain"], "Class 10");
        assert_eq!(json["numQuestions"], wire.num_questions);
        assert_eq!(json["includeAnswers"], true);
        assert_eq!(json["programmingLevels"][1], "Hard");
    }

    #[test]
    fn wire_request_nulls_levels_when_programming_not_selected() {
        let mut req = request();
        req.programming_levels = Some(vec!["Mid".to_string()]);
        assert_eq!(req.to_wire().programming_levels, None);
    }

    #[test]
    fn paper_json_round_trips_with_camel_case_fields() {
        let paper = QuestionPaper {
            id: None,
            title: "Questify - Practice Paper".to_string(),
            domain_info: "School - Class 10".to_string(),
            instructions: "Attempt all questions.".to_string(),
            sections: vec![Section {
                kind: "MCQs".to_string(),
                questions: vec![Question {
                    id: 1,
                    text: "2+2=?".to_string(),
                    options: vec!["3".into(), "4".into()],
                    marks: 1,
                    answer: Some("4".to_string()),
                    explanation: None,
                }],
            }],
            created_at: None,
        };

        let json = serde_json::to_value(&paper).unwrap();
        assert!(json.get("domainInfo").is_some());
        assert_eq!(json["sections"][0]["type"], "MCQs");
        // Absent answer/explanation/id must not appear on the wire.
        assert!(json["sections"][0]["questions"][0].get("explanation").is_none());
        assert!(json.get("id").is_none());

        let back: QuestionPaper = serde_json::from_value(json).unwrap();
        assert_eq!(back, paper);
    }

    #[test]
    fn catalogs_offer_the_expected_choices() {
        assert_eq!(sub_domains(Domain::School).first().map(String::as_str), Some("Class 6"));
        assert_eq!(sub_domains(Domain::School).len(), 7);
        assert!(sub_domains(Domain::Competitive).iter().any(|e| e == "JEE Main"));

        let subjects = subjects_for_course("B.Tech").unwrap();
        assert!(subjects.contains(&"Computer Science"));
        assert!(subjects_for_course("Unknown Course").is_none());

        assert_eq!(QUESTION_TYPES.last(), Some(&PROGRAMMING_TYPE));
    }

    #[test]
    fn question_count_sums_across_sections() {
        let paper = QuestionPaper {
            id: None,
            title: "t".to_string(),
            domain_info: "d".to_string(),
            instructions: "i".to_string(),
            sections: vec![
                Section {
                    kind: "MCQs".to_string(),
                    questions: vec![
                        Question {
                            id: 1,
                            text: "a".to_string(),
                            options: vec![],
                            marks: 1,
                            answer: None,
                            explanation: None,
                        },
                        Question {
                            id: 2,
                            text: "b".to_string(),
                            options: vec![],
                            marks: 1,
                            answer: None,
                            explanation: None,
                        },
                    ],
                },
                Section {
                    kind: "Short Answers".to_string(),
                    questions: vec![Question {
                        id: 1,
                        text: "c".to_string(),
                        options: vec![],
                        marks: 3,
                        answer: None,
                        explanation: None,
                    }],
                },
            ],
            created_at: None,
        };
        assert_eq!(paper.question_count(), 3);
    }

    #[test]
    fn computer_selection_detection() {
        assert!(is_computer_selection(
            Domain::College,
            "B.Tech",
            Some("Computer Science")
        ));
        assert!(is_computer_selection(
            Domain::School,
            "Class 11",
            Some("Computer Applications")
        ));
        assert!(!is_computer_selection(Domain::School, "Class 11", Some("History")));
    }
}
