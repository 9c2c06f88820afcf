//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the REST API endpoints and the master
//! definition for the OpenAPI specification.

use crate::config::MISSING_KEY_MESSAGE;
use crate::web::middleware::session_id_from_headers;
use crate::web::protocol::{ErrorBody, GenerateBody};
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use questify_core::domain::{PaperRequest, QuestionPaper, SavedPaper};
use questify_core::export;
use questify_core::ports::PortError;
use std::sync::Arc;
use tracing::{error, info, warn};
use utoipa::OpenApi;
use uuid::Uuid;

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        generate_paper_handler,
        list_papers_handler,
        export_paper_handler,
        crate::web::auth::signup_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
    ),
    components(
        schemas(
            GenerateBody,
            ErrorBody,
            crate::web::auth::SignupRequest,
            crate::web::auth::LoginRequest,
            crate::web::auth::AuthResponse,
        )
    ),
    tags(
        (name = "Questify API", description = "API endpoints for generating and revisiting practice question papers.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// REST API Handlers
//=========================================================================================

/// Generate a question paper from the user's configuration.
///
/// Works without a session; when a valid session cookie is present the
/// generated paper is also saved to the user's history in the background.
#[utoipa::path(
    post,
    path = "/api/generate",
    request_body = GenerateBody,
    responses(
        (status = 200, description = "The generated paper as JSON"),
        (status = 500, description = "Missing credential or generation failure", body = ErrorBody)
    )
)]
pub async fn generate_paper_handler(
    State(app_state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(body): Json<GenerateBody>,
) -> Result<Json<QuestionPaper>, (StatusCode, Json<ErrorBody>)> {
    // Without a credential the endpoint fails up front, before any model call.
    let Some(generator) = app_state.generator.clone() else {
        return Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new(MISSING_KEY_MESSAGE)),
        ));
    };

    let request = PaperRequest::from(body);
    info!("generating paper for {}", request.context_line());

    let paper = generator.generate(&request).await.map_err(|e| {
        error!("Gemini Generation Error: {}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorBody::new(e.to_string())))
    })?;

    // Persistence is fire-and-forget: a signed-in user gets the paper in
    // their history, but a save failure never blocks or fails the response.
    if let Some(session_id) = session_id_from_headers(&headers) {
        match app_state.store.validate_auth_session(session_id).await {
            Ok(user_id) => {
                let store = app_state.store.clone();
                let domain = request.domain.to_string();
                let sub_domain = request.sub_domain.clone();
                let paper = paper.clone();
                tokio::spawn(async move {
                    if let Err(e) = store.save_paper(user_id, &domain, &sub_domain, &paper).await {
                        error!("Failed to save generated paper for {}: {:?}", user_id, e);
                    }
                });
            }
            Err(e) => {
                warn!("Session on generate request did not validate: {:?}", e);
            }
        }
    }

    Ok(Json(paper))
}

/// List the signed-in user's saved papers, newest first.
#[utoipa::path(
    get,
    path = "/api/papers",
    responses(
        (status = 200, description = "The user's papers, newest first"),
        (status = 401, description = "No valid session"),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_papers_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<QuestionPaper>>, (StatusCode, Json<ErrorBody>)> {
    let saved = app_state.store.papers_for_user(user_id).await.map_err(|e| {
        error!("Failed to list papers for {}: {:?}", user_id, e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorBody::new("Failed to load history")),
        )
    })?;

    let papers = saved.into_iter().map(saved_into_paper).collect();
    Ok(Json(papers))
}

/// Export a saved paper as a plain-text file download.
#[utoipa::path(
    get,
    path = "/api/papers/{id}/export.txt",
    params(
        ("id" = Uuid, Path, description = "The ID of the saved paper")
    ),
    responses(
        (status = 200, description = "The paper rendered as plain text", content_type = "text/plain"),
        (status = 401, description = "No valid session"),
        (status = 404, description = "No such paper for this user", body = ErrorBody)
    )
)]
pub async fn export_paper_handler(
    State(app_state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(paper_id): Path<Uuid>,
) -> Result<impl IntoResponse, (StatusCode, Json<ErrorBody>)> {
    let saved = app_state
        .store
        .paper_by_id(user_id, paper_id)
        .await
        .map_err(|e| match e {
            PortError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(ErrorBody::new("Paper not found")),
            ),
            other => {
                error!("Failed to load paper {} for {}: {:?}", paper_id, user_id, other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorBody::new("Failed to load paper")),
                )
            }
        })?;

    let file_name = export::export_file_name(&saved.domain, &saved.sub_domain, "txt");
    let body = export::plain_text(&saved.paper);

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    ))
}

/// Stamps the saved row's identity onto the embedded paper so the client
/// can address and sort it.
fn saved_into_paper(saved: SavedPaper) -> QuestionPaper {
    let mut paper = saved.paper;
    paper.id = Some(saved.id);
    paper.created_at = Some(saved.created_at);
    paper
}
