//! crates/questify_core/src/workflow.rs
//!
//! The client-side state machine driving the user journey: domain
//! selection, paper configuration, generation, preview/export, and the
//! history view. The workflow owns the current paper and the in-memory
//! history list; both are replaced whole, never partially mutated.
//!
//! The workflow is purely synchronous. Drivers call `submit` to obtain a
//! validated `GenerationRequest`, perform the asynchronous generation and
//! persistence themselves, and feed the outcome back through
//! `generation_succeeded` / `generation_failed`.

use crate::domain::{
    Domain, GenerationRequest, QuestionPaper, RequestValidationError, SavedPaper, User,
    DEFAULT_SECTION_COUNT, PROGRAMMING_TYPE,
};
use std::collections::BTreeMap;

/// The screen the user is currently on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Unauthenticated,
    DomainSelect,
    Configure,
    Preview,
    History,
}

/// The paper configuration being edited on the Configure screen.
///
/// `section_counts` deliberately keeps entries for disabled question
/// types: toggling a type off leaves its count untouched so re-enabling
/// restores the prior value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Draft {
    pub domain: Domain,
    pub sub_domain: String,
    pub subject: Option<String>,
    pub topics: String,
    pub question_types: Vec<String>,
    pub programming_levels: Vec<String>,
    pub section_counts: BTreeMap<String, u32>,
    pub include_answers: bool,
    pub include_explanations: bool,
}

impl Default for Draft {
    fn default() -> Self {
        Self {
            domain: Domain::School,
            sub_domain: String::new(),
            subject: None,
            topics: String::new(),
            question_types: vec!["MCQs".to_string(), "Short Answers".to_string()],
            programming_levels: vec!["Mid".to_string()],
            section_counts: BTreeMap::from([
                ("MCQs".to_string(), DEFAULT_SECTION_COUNT),
                ("Short Answers".to_string(), DEFAULT_SECTION_COUNT),
            ]),
            include_answers: true,
            include_explanations: false,
        }
    }
}

/// The workflow controller. Transitions that do not apply to the current
/// screen leave the state unchanged; in the real UI they are unreachable
/// because the corresponding controls are not rendered.
#[derive(Debug, Default)]
pub struct Workflow {
    screen: Screen,
    user: Option<User>,
    draft: Draft,
    current: Option<QuestionPaper>,
    history: Vec<SavedPaper>,
}

impl Workflow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn current_paper(&self) -> Option<&QuestionPaper> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[SavedPaper] {
        &self.history
    }

    //=====================================================================================
    // Identity lifecycle
    //=====================================================================================

    /// A sign-in or sign-up settled successfully.
    pub fn signed_in(&mut self, user: User) {
        self.user = Some(user);
        if self.screen == Screen::Unauthenticated {
            self.screen = Screen::DomainSelect;
        }
    }

    /// Sign-out from any screen drops the session and clears everything
    /// derived from it.
    pub fn signed_out(&mut self) {
        self.user = None;
        self.current = None;
        self.history.clear();
        self.screen = Screen::Unauthenticated;
    }

    //=====================================================================================
    // DomainSelect -> Configure
    //=====================================================================================

    pub fn choose_domain(&mut self, domain: Domain) {
        if self.screen != Screen::DomainSelect {
            return;
        }
        self.draft.domain = domain;
        self.screen = Screen::Configure;
    }

    //=====================================================================================
    // Configure-screen edits
    //=====================================================================================

    /// Picking a class/course/exam resets the subject, since subjects are
    /// course-specific.
    pub fn select_sub_domain(&mut self, sub_domain: impl Into<String>) {
        self.draft.sub_domain = sub_domain.into();
        self.draft.subject = None;
    }

    pub fn select_subject(&mut self, subject: impl Into<String>) {
        self.draft.subject = Some(subject.into());
    }

    pub fn set_topics(&mut self, topics: impl Into<String>) {
        self.draft.topics = topics.into();
    }

    pub fn set_include_answers(&mut self, on: bool) {
        self.draft.include_answers = on;
    }

    pub fn set_include_explanations(&mut self, on: bool) {
        self.draft.include_explanations = on;
    }

    pub fn set_programming_levels(&mut self, levels: Vec<String>) {
        self.draft.programming_levels = levels;
    }

    /// Toggles a question type on or off. Enabling a type seeds its
    /// section count with the default only when no count is stored;
    /// disabling leaves the stored count untouched, so toggling off and
    /// back on restores whatever the user had set.
    pub fn toggle_question_type(&mut self, kind: &str) {
        if let Some(pos) = self.draft.question_types.iter().position(|t| t == kind) {
            self.draft.question_types.remove(pos);
        } else {
            self.draft.question_types.push(kind.to_string());
            self.draft
                .section_counts
                .entry(kind.to_string())
                .or_insert(DEFAULT_SECTION_COUNT);
        }
    }

    pub fn set_section_count(&mut self, kind: &str, count: u32) {
        self.draft.section_counts.insert(kind.to_string(), count);
    }

    //=====================================================================================
    // Generation
    //=====================================================================================

    /// Validates the draft and, when valid, hands back the request to send
    /// to the generation service. A validation failure keeps the user on
    /// the Configure screen; the error message is user-visible.
    pub fn submit(&self) -> Result<GenerationRequest, RequestValidationError> {
        let levels = if self.draft.question_types.iter().any(|t| t == PROGRAMMING_TYPE) {
            Some(self.draft.programming_levels.clone())
        } else {
            None
        };
        let request = GenerationRequest {
            domain: self.draft.domain,
            sub_domain: self.draft.sub_domain.clone(),
            subject: self.draft.subject.clone(),
            topics: self.draft.topics.clone(),
            question_types: self.draft.question_types.clone(),
            programming_levels: levels,
            section_counts: self.draft.section_counts.clone(),
            include_answers: self.draft.include_answers,
            include_explanations: self.draft.include_explanations,
        };
        request.validate()?;
        Ok(request)
    }

    /// A generation settled successfully: the new paper replaces the
    /// current one and the user lands on Preview. Persistence happens on
    /// the side and never gates this transition.
    pub fn generation_succeeded(&mut self, paper: QuestionPaper) {
        self.current = Some(paper);
        self.screen = Screen::Preview;
    }

    /// The generation service failed; the user stays on Configure with the
    /// service's error message shown by the UI. Any previously generated
    /// paper is dropped so Preview can only ever show a paper the user
    /// just generated or explicitly selected from history.
    pub fn generation_failed(&mut self) {
        self.current = None;
    }

    //=====================================================================================
    // History
    //=====================================================================================

    pub fn open_history(&mut self) {
        if self.user.is_some() {
            self.screen = Screen::History;
        }
    }

    /// Replaces the in-memory history wholesale with a fresh fetch,
    /// keeping it ordered by creation time descending.
    pub fn set_history(&mut self, mut papers: Vec<SavedPaper>) {
        papers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        self.history = papers;
    }

    /// Opens a previously generated paper from the history view.
    pub fn select_paper(&mut self, paper_id: uuid::Uuid) -> bool {
        if self.screen != Screen::History {
            return false;
        }
        let Some(saved) = self.history.iter().find(|p| p.id == paper_id) else {
            return false;
        };
        let mut paper = saved.paper.clone();
        paper.id = Some(saved.id);
        paper.created_at = Some(saved.created_at);
        self.current = Some(paper);
        self.screen = Screen::Preview;
        true
    }

    /// "New paper" from the history view restarts the journey.
    pub fn start_new_paper(&mut self) {
        if self.screen == Screen::History {
            self.screen = Screen::DomainSelect;
        }
    }
}
