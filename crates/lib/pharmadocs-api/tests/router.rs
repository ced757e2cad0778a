use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Method, Request, StatusCode, header};
use pharmadocs_api::{ApiServerConfig, QUESTION_REQUIRED, router};
use pharmadocs_core::ask::{
    AskAnswer, AskError, FixedAnswerService, QuestionAnsweringService,
};
use pharmadocs_core::control::PharmaControlPlane;
use pharmadocs_core::seed::SeedData;
use serde_json::{Value, json};
use tower::ServiceExt;

fn app_with(answers: Arc<dyn QuestionAnsweringService>, config: &ApiServerConfig) -> Router {
    let control = PharmaControlPlane::new(SeedData::demo().with_current_user("user-2"), answers)
        .expect("seed user exists");
    router(control, config)
}

fn app() -> Router {
    app_with(
        Arc::new(FixedAnswerService::default()),
        &ApiServerConfig::default(),
    )
}

async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    if body.is_some() {
        request = request.header(header::CONTENT_TYPE, "application/json");
    }
    let request = request
        .body(body.map_or_else(Body::empty, |body| Body::from(body.to_string())))
        .expect("request");

    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

#[tokio::test]
async fn ask_returns_fixed_answer_with_sources() {
    let (status, body) = send(
        app(),
        Method::POST,
        "/api/ask",
        Some(r#"{"question":"What models was BTZ-043 tested on?"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "answer": "BTZ-043 showed bactericidal activity in mice.",
            "sources": [
                {"id": "doc-1", "title": "Preclinical Evaluation of BTZ-043 Against MDR-TB"},
                {"id": "doc-3", "title": "Murine TB Model Efficacy Studies"}
            ]
        })
    );
}

#[tokio::test]
async fn ask_rejects_missing_blank_and_malformed_questions() {
    for body in [r"{}", r#"{"question":"   "}"#, r#"{"question":42}"#, "not json"] {
        let (status, value) = send(app(), Method::POST, "/api/ask", Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body:?}");
        assert_eq!(value, json!({ "error": QUESTION_REQUIRED }), "body {body:?}");
    }

    let (status, value) = send(app(), Method::POST, "/api/ask", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["error"], QUESTION_REQUIRED);
}

struct UnreachableBackend;

#[async_trait]
impl QuestionAnsweringService for UnreachableBackend {
    async fn ask(&self, _question: &str) -> Result<AskAnswer, AskError> {
        Err(AskError::Transport("connection refused".to_string()))
    }
}

struct StalledBackend;

#[async_trait]
impl QuestionAnsweringService for StalledBackend {
    async fn ask(&self, _question: &str) -> Result<AskAnswer, AskError> {
        tokio::time::sleep(Duration::from_secs(3600)).await;
        Ok(AskAnswer::new("too late"))
    }
}

#[tokio::test]
async fn backend_failure_surfaces_as_bad_gateway() {
    let app = app_with(Arc::new(UnreachableBackend), &ApiServerConfig::default());
    let (status, body) = send(app, Method::POST, "/api/ask", Some(r#"{"question":"q"}"#)).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "connection refused");
}

#[tokio::test(start_paused = true)]
async fn stalled_backend_times_out() {
    let config = ApiServerConfig::default().with_request_timeout(Duration::from_millis(50));
    let app = app_with(Arc::new(StalledBackend), &config);
    let (status, _) = send(app, Method::POST, "/api/ask", Some(r#"{"question":"q"}"#)).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
}

#[tokio::test]
async fn document_listing_honours_query_and_tags() {
    let (status, body) = send(app(), Method::GET, "/api/documents?q=btz-043", None).await;
    assert_eq!(status, StatusCode::OK);
    let ids: Vec<_> = body
        .as_array()
        .expect("array")
        .iter()
        .map(|document| document["id"].clone())
        .collect();
    assert_eq!(ids, [json!("doc-1")]);

    let (_, body) = send(app(), Method::GET, "/api/documents?tags=tag-5,tag-4", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));

    let (_, body) = send(app(), Method::GET, "/api/documents", None).await;
    assert_eq!(body.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn unknown_document_is_not_found() {
    let (status, body) = send(app(), Method::GET, "/api/documents/doc-404", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "document not found: doc-404");
}

#[tokio::test]
async fn feedback_patch_is_attributed_to_current_user() {
    let (status, body) = send(
        app(),
        Method::PATCH,
        "/api/documents/doc-2/feedback",
        Some(r#"{"rating":5,"preference":"like"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback"]["rating"], 5);
    assert_eq!(body["feedback"]["preference"], "like");
    assert_eq!(body["lastEditedBy"]["name"], "James Miller");
    assert!(body["lastEditedAt"].is_string());
}

#[tokio::test]
async fn out_of_range_rating_is_rejected() {
    let (status, body) = send(
        app(),
        Method::PATCH,
        "/api/documents/doc-2/feedback",
        Some(r#"{"rating":9}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn preference_and_comment_routes_update_document() {
    let app = app();

    let (status, body) = send(
        app.clone(),
        Method::POST,
        "/api/documents/doc-3/preference",
        Some(r#"{"preference":"maybe"}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["feedback"]["preference"], "maybe");

    let (status, body) = send(
        app.clone(),
        Method::POST,
        "/api/documents/doc-3/comments",
        Some(r#"{"text":"  Needs a control arm.  "}"#),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let comments = body["feedback"]["comments"].as_array().expect("comments");
    let added = comments.last().expect("new comment");
    assert_eq!(added["text"], "Needs a control arm.");
    assert_eq!(added["author"]["id"], "user-2");

    // State is shared across requests on the same router.
    let (_, body) = send(app, Method::GET, "/api/documents/doc-3", None).await;
    assert_eq!(body["feedback"]["preference"], "maybe");
}

#[tokio::test]
async fn catalog_routes_list_seed_data() {
    let (status, tags) = send(app(), Method::GET, "/api/tags", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tags.as_array().map(Vec::len), Some(6));
    assert_eq!(tags[0]["type"], "protein");

    let (_, users) = send(app(), Method::GET, "/api/users", None).await;
    assert_eq!(users.as_array().map(Vec::len), Some(3));
}

#[tokio::test]
async fn feedback_route_cannot_rewrite_comment_thread() {
    let app = app();
    let (_, before) = send(app.clone(), Method::GET, "/api/documents/doc-1", None).await;
    let thread = before["feedback"]["comments"].clone();
    assert_eq!(thread.as_array().map(Vec::len), Some(1));

    let (status, body) = send(
        app.clone(),
        Method::PATCH,
        "/api/documents/doc-1/feedback",
        Some(r#"{"comments":[]}"#),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (_, after) = send(app, Method::GET, "/api/documents/doc-1", None).await;
    assert_eq!(after["feedback"]["comments"], thread);
}

#[tokio::test]
async fn empty_feedback_patch_leaves_edit_metadata_alone() {
    let app = app();
    let (_, before) = send(app.clone(), Method::GET, "/api/documents/doc-2", None).await;

    let (status, body) = send(app, Method::PATCH, "/api/documents/doc-2/feedback", Some("{}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, before);
    assert_eq!(body["lastEditedBy"]["name"], "Emily Watson");
}

#[tokio::test]
async fn oversized_ask_body_is_payload_too_large() {
    let config = ApiServerConfig::default().with_max_body_bytes(32);
    let app = app_with(Arc::new(FixedAnswerService::default()), &config);
    let body = json!({ "question": "What models was BTZ-043 tested on?" }).to_string();

    let (status, value) = send(app, Method::POST, "/api/ask", Some(&body)).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_ne!(value["error"], QUESTION_REQUIRED);
}

#[tokio::test]
async fn molecules_and_suggested_questions_are_listed() {
    let (status, molecules) = send(app(), Method::GET, "/api/molecules", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(molecules.as_array().map(Vec::len), Some(5));
    assert_eq!(molecules[0]["name"], "Aspirin");

    let (status, suggestions) = send(app(), Method::GET, "/api/ask/suggestions", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        suggestions,
        json!([
            "What models was BTZ-043 tested on?",
            "List all studies targeting InhA",
            "Show me molecules effective against MDR-TB"
        ])
    );
}
