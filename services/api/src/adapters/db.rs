//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `PaperStore` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use questify_core::domain::{QuestionPaper, SavedPaper, User, UserCredentials};
use questify_core::ports::{PaperStore, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `PaperStore` port.
#[derive(Clone)]
pub struct PgPaperStore {
    pool: PgPool,
}

impl PgPaperStore {
    /// Creates a new `PgPaperStore`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    email: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            email: Some(self.email),
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    email: String,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct PaperRecord {
    id: Uuid,
    title: String,
    domain: String,
    sub_domain: String,
    content: serde_json::Value,
    created_at: DateTime<Utc>,
}
impl PaperRecord {
    /// The `content` column holds the paper exactly as it was generated;
    /// a row that no longer parses is surfaced as a format error rather
    /// than silently dropped.
    fn to_domain(self) -> PortResult<SavedPaper> {
        let paper: QuestionPaper = serde_json::from_value(self.content)
            .map_err(|e| PortError::Unexpected(format!("corrupt paper row {}: {}", self.id, e)))?;
        Ok(SavedPaper {
            id: self.id,
            title: self.title,
            domain: self.domain,
            sub_domain: self.sub_domain,
            paper,
            created_at: self.created_at,
        })
    }
}

//=========================================================================================
// `PaperStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl PaperStore for PgPaperStore {
    async fn create_user_with_email(
        &self,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (user_id, email, hashed_password) VALUES ($1, $2, $3) \
             RETURNING user_id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                PortError::AlreadyExists(format!("User {} already exists", email))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            _ => PortError::Unexpected(e.to_string()),
        })?;

        Ok(record.to_domain())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id = sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > now()",
        )
        .bind(session_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::Unauthorized,
            _ => PortError::Unexpected(e.to_string()),
        })?;
        Ok(user_id)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn save_paper(
        &self,
        user_id: Uuid,
        domain: &str,
        sub_domain: &str,
        paper: &QuestionPaper,
    ) -> PortResult<SavedPaper> {
        let content = serde_json::to_value(paper)
            .map_err(|e| PortError::Unexpected(format!("failed to serialize paper: {}", e)))?;

        let record = sqlx::query_as::<_, PaperRecord>(
            "INSERT INTO question_papers (id, user_id, title, domain, sub_domain, content) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING id, title, domain, sub_domain, content, created_at",
        )
        .bind(Uuid::new_v4())
        .bind(user_id)
        .bind(&paper.title)
        .bind(domain)
        .bind(sub_domain)
        .bind(content)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        record.to_domain()
    }

    async fn papers_for_user(&self, user_id: Uuid) -> PortResult<Vec<SavedPaper>> {
        let records = sqlx::query_as::<_, PaperRecord>(
            "SELECT id, title, domain, sub_domain, content, created_at \
             FROM question_papers WHERE user_id = $1 ORDER BY created_at DESC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;

        records.into_iter().map(PaperRecord::to_domain).collect()
    }

    async fn paper_by_id(&self, user_id: Uuid, paper_id: Uuid) -> PortResult<SavedPaper> {
        let record = sqlx::query_as::<_, PaperRecord>(
            "SELECT id, title, domain, sub_domain, content, created_at \
             FROM question_papers WHERE id = $1 AND user_id = $2",
        )
        .bind(paper_id)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                PortError::NotFound(format!("Paper {} not found", paper_id))
            }
            _ => PortError::Unexpected(e.to_string()),
        })?;

        record.to_domain()
    }
}
