//! crates/questify_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or the
//! hosted generation model.

use crate::domain::{PaperRequest, QuestionPaper, SavedPaper, User, UserCredentials};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    /// A uniqueness constraint was violated, e.g. signing up with an
    /// email that already has an account.
    #[error("Already exists: {0}")]
    AlreadyExists(String),
    /// The generation model replied with something that is not the agreed
    /// JSON shape, even after code-fence stripping.
    #[error("Invalid response format from AI")]
    InvalidFormat(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The persistence collaborator: owns users, auth sessions, and saved papers.
/// Once a paper is written here, the store is the system of record and any
/// in-memory copy is a cache valid until the next fetch.
#[async_trait]
pub trait PaperStore: Send + Sync {
    // --- Auth Methods ---
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Paper Management ---
    /// Stores one row per generated paper, keyed by the owning user.
    async fn save_paper(
        &self,
        user_id: Uuid,
        domain: &str,
        sub_domain: &str,
        paper: &QuestionPaper,
    ) -> PortResult<SavedPaper>;

    /// All papers for a user, ordered by creation time descending.
    async fn papers_for_user(&self, user_id: Uuid) -> PortResult<Vec<SavedPaper>>;

    /// A single saved paper, checked against the owning user.
    async fn paper_by_id(&self, user_id: Uuid, paper_id: Uuid) -> PortResult<SavedPaper>;
}

/// The generation collaborator: turns a request into a structured paper by
/// prompting the hosted model. Single attempt, no retry policy.
#[async_trait]
pub trait PaperGenerator: Send + Sync {
    async fn generate(&self, request: &PaperRequest) -> PortResult<QuestionPaper>;
}
