//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user signup, login, and logout.
//!
//! Both signup and login end the same way: a session row in the store and
//! a 30-day `session=` cookie on the response, so that part lives in
//! `open_session` and the handlers only differ in how they establish who
//! the user is.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::{Duration, Utc};
use questify_core::ports::PortError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::error;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::web::middleware::session_id_from_headers;
use crate::web::state::AppState;

const SESSION_DAYS: i64 = 30;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
}

#[derive(Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub email: String,
}

//=========================================================================================
// Shared Pieces
//=========================================================================================

fn hash_password(password: &str) -> Result<String, (StatusCode, String)> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            error!("Failed to hash password: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to hash password".to_string())
        })
}

fn password_matches(password: &str, stored_hash: &str) -> Result<bool, (StatusCode, String)> {
    let parsed_hash = PasswordHash::new(stored_hash).map_err(|e| {
        error!("Failed to parse password hash: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, "Authentication error".to_string())
    })?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

/// Creates a session row for the user and renders the cookie that carries
/// it back to the browser.
async fn open_session(
    state: &AppState,
    user_id: Uuid,
) -> Result<String, (StatusCode, String)> {
    let auth_session_id = Uuid::new_v4().to_string();
    let lifetime = Duration::days(SESSION_DAYS);

    state
        .store
        .create_auth_session(&auth_session_id, user_id, Utc::now() + lifetime)
        .await
        .map_err(|e| {
            error!("Failed to create auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create session".to_string())
        })?;

    Ok(format!(
        "session={}; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age={}",
        auth_session_id,
        lifetime.num_seconds()
    ))
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/signup - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "User created successfully", body = AuthResponse),
        (status = 409, description = "An account with this email already exists"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn signup_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SignupRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let password_hash = hash_password(&req.password)?;

    let user = state
        .store
        .create_user_with_email(&req.email, &password_hash)
        .await
        .map_err(|e| match e {
            PortError::AlreadyExists(_) => (
                StatusCode::CONFLICT,
                "An account with this email already exists".to_string(),
            ),
            other => {
                error!("Failed to create user: {:?}", other);
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to create user".to_string())
            }
        })?;

    let cookie = open_session(&state, user.user_id).await?;

    let response = AuthResponse {
        user_id: user.user_id,
        email: user.email.unwrap_or_default(),
    };

    Ok((
        StatusCode::CREATED,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /auth/login - Login with existing account
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = AuthResponse),
        (status = 401, description = "Invalid credentials"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    // An unknown email and a wrong password get the same answer.
    let user_creds = state
        .store
        .get_user_by_email(&req.email)
        .await
        .map_err(|e| {
            error!("Failed to get user: {:?}", e);
            (StatusCode::UNAUTHORIZED, "Invalid email or password".to_string())
        })?;

    if !password_matches(&req.password, &user_creds.hashed_password)? {
        return Err((StatusCode::UNAUTHORIZED, "Invalid email or password".to_string()));
    }

    let cookie = open_session(&state, user_creds.user_id).await?;

    let response = AuthResponse {
        user_id: user_creds.user_id,
        email: user_creds.email,
    };

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, cookie)],
        Json(response),
    ))
}

/// POST /auth/logout - Logout and invalidate session
#[utoipa::path(
    post,
    path = "/auth/logout",
    responses(
        (status = 200, description = "Logout successful"),
        (status = 401, description = "No active session")
    )
)]
pub async fn logout_handler(
    State(state): State<Arc<AppState>>,
    headers: axum::http::HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let auth_session_id = session_id_from_headers(&headers)
        .ok_or((StatusCode::UNAUTHORIZED, "No session found".to_string()))?;

    state
        .store
        .delete_auth_session(auth_session_id)
        .await
        .map_err(|e| {
            error!("Failed to delete auth session: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Failed to logout".to_string())
        })?;

    // Expire the cookie immediately.
    let cookie = "session=; HttpOnly; Secure; SameSite=Lax; Path=/; Max-Age=0";

    Ok((StatusCode::OK, [(header::SET_COOKIE, cookie.to_string())]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::http::HeaderMap;
    use axum::response::Response;
    use chrono::DateTime;
    use questify_core::domain::{QuestionPaper, SavedPaper, User, UserCredentials};
    use questify_core::ports::{PaperStore, PortResult};

    /// A store with exactly one known account. Session writes succeed;
    /// the paper methods are never reached from the auth handlers.
    struct OneUserStore {
        user_id: Uuid,
        email: String,
        hashed_password: String,
        email_taken: bool,
    }

    #[async_trait]
    impl PaperStore for OneUserStore {
        async fn create_user_with_email(&self, email: &str, _: &str) -> PortResult<User> {
            if self.email_taken {
                return Err(PortError::AlreadyExists(format!(
                    "User {} already exists",
                    email
                )));
            }
            Ok(User {
                user_id: self.user_id,
                email: Some(email.to_string()),
            })
        }
        async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
            if email == self.email {
                Ok(UserCredentials {
                    user_id: self.user_id,
                    email: self.email.clone(),
                    hashed_password: self.hashed_password.clone(),
                })
            } else {
                Err(PortError::NotFound(format!("User {} not found", email)))
            }
        }
        async fn create_auth_session(
            &self,
            _: &str,
            _: Uuid,
            _: DateTime<Utc>,
        ) -> PortResult<()> {
            Ok(())
        }
        async fn validate_auth_session(&self, _: &str) -> PortResult<Uuid> {
            Ok(self.user_id)
        }
        async fn delete_auth_session(&self, _: &str) -> PortResult<()> {
            Ok(())
        }
        async fn save_paper(
            &self,
            _: Uuid,
            _: &str,
            _: &str,
            _: &QuestionPaper,
        ) -> PortResult<SavedPaper> {
            Err(PortError::Unexpected("not under test".into()))
        }
        async fn papers_for_user(&self, _: Uuid) -> PortResult<Vec<SavedPaper>> {
            Err(PortError::Unexpected("not under test".into()))
        }
        async fn paper_by_id(&self, _: Uuid, _: Uuid) -> PortResult<SavedPaper> {
            Err(PortError::Unexpected("not under test".into()))
        }
    }

    fn store_with_password(password: &str) -> OneUserStore {
        OneUserStore {
            user_id: Uuid::new_v4(),
            email: "student@example.com".to_string(),
            hashed_password: hash_password(password).unwrap(),
            email_taken: false,
        }
    }

    fn state(store: OneUserStore) -> Arc<AppState> {
        Arc::new(AppState {
            store: Arc::new(store),
            generator: None,
            config: Arc::new(crate::config::Config {
                bind_address: "127.0.0.1:0".parse().unwrap(),
                database_url: "postgres://unused".to_string(),
                log_level: tracing::Level::INFO,
                generation_api_key: None,
                generation_api_base: String::new(),
                paper_model: String::new(),
                cors_origin: String::new(),
            }),
        })
    }

    fn set_cookie(response: &Response) -> String {
        response
            .headers()
            .get(header::SET_COOKIE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_string()
    }

    #[tokio::test]
    async fn signup_issues_a_thirty_day_session_cookie() {
        let response = signup_handler(
            State(state(store_with_password("pw"))),
            Json(SignupRequest {
                email: "new@example.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await
        .ok()
        .unwrap()
        .into_response();

        assert_eq!(response.status(), StatusCode::CREATED);
        let cookie = set_cookie(&response);
        assert!(cookie.starts_with("session="));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("SameSite=Lax"));
        assert!(cookie.contains("Max-Age=2592000"));
    }

    #[tokio::test]
    async fn signup_with_a_taken_email_is_a_conflict() {
        let mut store = store_with_password("pw");
        store.email_taken = true;

        let result = signup_handler(
            State(state(store)),
            Json(SignupRequest {
                email: "student@example.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await;

        let (status, message) = result.err().unwrap();
        assert_eq!(status, StatusCode::CONFLICT);
        assert!(message.contains("already exists"));
    }

    #[tokio::test]
    async fn login_with_the_right_password_sets_the_cookie() {
        let response = login_handler(
            State(state(store_with_password("correct horse"))),
            Json(LoginRequest {
                email: "student@example.com".to_string(),
                password: "correct horse".to_string(),
            }),
        )
        .await
        .ok()
        .unwrap()
        .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).starts_with("session="));
    }

    #[tokio::test]
    async fn login_with_a_wrong_password_is_unauthorized() {
        let result = login_handler(
            State(state(store_with_password("correct"))),
            Json(LoginRequest {
                email: "student@example.com".to_string(),
                password: "wrong".to_string(),
            }),
        )
        .await;

        let (status, message) = result.err().unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid email or password");
    }

    #[tokio::test]
    async fn login_with_an_unknown_email_is_unauthorized() {
        let result = login_handler(
            State(state(store_with_password("pw"))),
            Json(LoginRequest {
                email: "nobody@example.com".to_string(),
                password: "pw".to_string(),
            }),
        )
        .await;

        // Same answer as a wrong password; the email must not be probeable.
        let (status, message) = result.err().unwrap();
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(message, "Invalid email or password");
    }

    #[tokio::test]
    async fn logout_expires_the_cookie() {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, "session=abc".parse().unwrap());

        let response = logout_handler(State(state(store_with_password("pw"))), headers)
            .await
            .ok()
            .unwrap()
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(set_cookie(&response).contains("Max-Age=0"));
    }

    #[tokio::test]
    async fn logout_without_a_session_is_unauthorized() {
        let result =
            logout_handler(State(state(store_with_password("pw"))), HeaderMap::new()).await;
        assert_eq!(result.err().unwrap().0, StatusCode::UNAUTHORIZED);
    }
}
