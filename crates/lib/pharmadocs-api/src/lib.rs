//! HTTP API server for pharmadocs.
//!
//! Serves the ask endpoint consumed by the research ask bar, plus read and
//! feedback endpoints over the session's document collection.

use std::net::SocketAddr;
use std::time::Duration;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{DefaultBodyLimit, Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, patch, post};
use pharmadocs_core::ask::{AskAnswer, AskError};
use pharmadocs_core::control::{ControlError, PharmaControlPlane};
use pharmadocs_core::store::StoreError;
use pharmadocs_store::models::{Document, FeedbackPatch, Molecule, Preference, Rating, Tag, User};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

pub const QUESTION_REQUIRED: &str = "Question is required";

/// Configuration for the API HTTP server.
#[derive(Debug, Clone)]
pub struct ApiServerConfig {
    pub addr: SocketAddr,
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl ApiServerConfig {
    #[must_use]
    pub const fn new(addr: SocketAddr) -> Self {
        Self {
            addr,
            max_body_bytes: 1024 * 1024,
            request_timeout: Duration::from_secs(30),
        }
    }

    #[must_use]
    pub const fn with_max_body_bytes(mut self, max_body_bytes: usize) -> Self {
        self.max_body_bytes = max_body_bytes;
        self
    }

    #[must_use]
    pub const fn with_request_timeout(mut self, request_timeout: Duration) -> Self {
        self.request_timeout = request_timeout;
        self
    }
}

impl Default for ApiServerConfig {
    fn default() -> Self {
        Self::new(SocketAddr::from(([127, 0, 0, 1], 3001)))
    }
}

/// HTTP API server wrapper.
pub struct ApiServer {
    config: ApiServerConfig,
    state: AppState,
}

impl ApiServer {
    #[must_use]
    pub const fn new(control: PharmaControlPlane, config: ApiServerConfig) -> Self {
        let state = AppState {
            control,
            request_timeout: config.request_timeout,
        };
        Self { config, state }
    }

    /// Binds the configured address and serves until shutdown.
    ///
    /// # Errors
    /// Returns any listener or server error.
    pub async fn serve(self) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let listener = TcpListener::bind(self.config.addr).await?;
        self.serve_with_listener(listener).await
    }

    /// Serves on an already bound listener.
    ///
    /// # Errors
    /// Returns any server error.
    pub async fn serve_with_listener(
        self,
        listener: TcpListener,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        let addr = listener.local_addr()?;
        let app = build_router(self.state, self.config.max_body_bytes);

        info!("pharmadocs-api listening on {addr}");
        axum::serve(listener, app).await?;
        Ok(())
    }
}

/// Builds the API router without binding a socket.
#[must_use]
pub fn router(control: PharmaControlPlane, config: &ApiServerConfig) -> Router {
    let state = AppState {
        control,
        request_timeout: config.request_timeout,
    };
    build_router(state, config.max_body_bytes)
}

#[derive(Clone)]
struct AppState {
    control: PharmaControlPlane,
    request_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug)]
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn bad_gateway(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_GATEWAY,
            message: message.into(),
        }
    }

    fn timeout() -> Self {
        Self {
            status: StatusCode::GATEWAY_TIMEOUT,
            message: "ask request timed out".to_string(),
        }
    }

    /// Oversized bodies keep their 413; any other rejection is a bad request.
    fn rejected(rejection: &JsonRejection) -> Self {
        let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            StatusCode::PAYLOAD_TOO_LARGE
        } else {
            StatusCode::BAD_REQUEST
        };
        Self {
            status,
            message: rejection.body_text(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl From<ControlError> for ApiError {
    fn from(err: ControlError) -> Self {
        match err {
            ControlError::NotFound(id) | ControlError::Store(StoreError::NotFound(id)) => {
                Self::not_found(format!("document not found: {id}"))
            }
            ControlError::Store(StoreError::InvalidInput(message)) => Self::bad_request(message),
            ControlError::Ask(AskError::EmptyQuestion) => Self::bad_request(QUESTION_REQUIRED),
            ControlError::Ask(err) => Self::bad_gateway(err.to_string()),
            ControlError::Seed(err) => Self::internal(err.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let payload = Json(ErrorResponse { error: self.message });
        (self.status, payload).into_response()
    }
}

#[derive(Debug, Deserialize)]
struct AskPayload {
    #[serde(default)]
    question: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct DocumentQuery {
    #[serde(default)]
    q: Option<String>,
    #[serde(default)]
    tags: Option<String>,
}

/// Feedback fields a client may edit. The comment thread only grows through
/// the comments route.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FeedbackUpdate {
    #[serde(default)]
    rating: Option<Rating>,
    #[serde(default)]
    preference: Option<Preference>,
    #[serde(default)]
    comment: Option<String>,
}

impl From<FeedbackUpdate> for FeedbackPatch {
    fn from(update: FeedbackUpdate) -> Self {
        Self {
            rating: update.rating,
            preference: update.preference,
            comment: update.comment,
            comments: None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct PreferencePayload {
    preference: Preference,
}

#[derive(Debug, Deserialize)]
struct CommentPayload {
    #[serde(default)]
    text: String,
}

fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/ask", post(ask))
        .route("/api/ask/suggestions", get(suggested_questions))
        .route("/api/documents", get(list_documents))
        .route("/api/documents/:id", get(get_document))
        .route("/api/documents/:id/feedback", patch(update_feedback))
        .route("/api/documents/:id/preference", post(set_preference))
        .route("/api/documents/:id/comments", post(add_comment))
        .route("/api/tags", get(list_tags))
        .route("/api/users", get(list_users))
        .route("/api/molecules", get(list_molecules))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

async fn health() -> &'static str {
    "ok"
}

async fn ask(
    State(state): State<AppState>,
    payload: Result<Json<AskPayload>, JsonRejection>,
) -> Result<Json<AskAnswer>, ApiError> {
    let question = match payload {
        Ok(Json(payload)) => payload.question.unwrap_or_default(),
        Err(rejection) if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE => {
            return Err(ApiError::rejected(&rejection));
        }
        Err(_) => String::new(),
    };
    if question.trim().is_empty() {
        return Err(ApiError::bad_request(QUESTION_REQUIRED));
    }

    let answer = tokio::time::timeout(state.request_timeout, state.control.ask(&question))
        .await
        .map_err(|_| ApiError::timeout())??;

    Ok(Json(answer))
}

async fn suggested_questions(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.control.suggested_questions())
}

async fn list_documents(
    State(state): State<AppState>,
    Query(query): Query<DocumentQuery>,
) -> Json<Vec<Document>> {
    let tag_ids = parse_tag_ids(query.tags.as_deref());
    let text = query.q.unwrap_or_default();
    Json(state.control.search_documents(&text, &tag_ids).await)
}

async fn get_document(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, ApiError> {
    Ok(Json(state.control.get_document(&id).await?))
}

async fn update_feedback(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<FeedbackUpdate>, JsonRejection>,
) -> Result<Json<Document>, ApiError> {
    let Json(update) = payload.map_err(|rejection| ApiError::rejected(&rejection))?;
    Ok(Json(
        state.control.update_feedback(&id, update.into()).await?,
    ))
}

async fn set_preference(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<PreferencePayload>, JsonRejection>,
) -> Result<Json<Document>, ApiError> {
    let Json(payload) =
        payload.map_err(|rejection| ApiError::rejected(&rejection))?;
    Ok(Json(
        state.control.set_preference(&id, payload.preference).await?,
    ))
}

async fn add_comment(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<CommentPayload>, JsonRejection>,
) -> Result<Json<Document>, ApiError> {
    let Json(payload) =
        payload.map_err(|rejection| ApiError::rejected(&rejection))?;
    Ok(Json(state.control.add_comment(&id, &payload.text).await?))
}

async fn list_tags(State(state): State<AppState>) -> Json<Vec<Tag>> {
    Json(state.control.list_tags())
}

async fn list_users(State(state): State<AppState>) -> Json<Vec<User>> {
    Json(state.control.list_users())
}

async fn list_molecules(State(state): State<AppState>) -> Json<Vec<Molecule>> {
    Json(state.control.list_molecules())
}

fn parse_tag_ids(raw: Option<&str>) -> Vec<String> {
    raw.map(|raw| {
        raw.split(',')
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(str::to_string)
            .collect()
    })
    .unwrap_or_default()
}
