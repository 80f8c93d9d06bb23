//! REST endpoints for sessions, chat turns, and guideline lookup.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::{HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tracing::warn;

use super::engine::IntakeEngine;
use crate::checker::check_symptoms;
use crate::error::IntakeError;

/// Shared state for intake routes.
#[derive(Clone)]
pub struct IntakeRouteState {
    pub engine: Arc<IntakeEngine>,
}

/// Build the intake REST routes.
pub fn intake_routes(engine: Arc<IntakeEngine>) -> Router {
    let state = IntakeRouteState { engine };

    Router::new()
        .route("/", get(banner))
        .route("/health", get(health))
        .route("/api/session/start", post(start_session))
        .route("/api/session/{id}", get(get_session))
        .route("/api/chat", post(chat))
        .route("/api/guideline", post(guideline))
        .route("/api/guidelines", get(list_guidelines))
        .route("/api/check-symptoms", post(legacy_check))
        .with_state(state)
}

/// CORS policy for the given origins. An empty list allows any origin.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|o| match HeaderValue::from_str(o) {
            Ok(v) => Some(v),
            Err(_) => {
                warn!(origin = %o, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::permissive().allow_origin(AllowOrigin::list(allowed))
}

fn error_response(err: IntakeError) -> Response {
    let status = match &err {
        IntakeError::MissingInput { .. } => StatusCode::BAD_REQUEST,
        IntakeError::InvalidSession { .. } => StatusCode::NOT_FOUND,
    };
    (status, Json(serde_json::json!({"error": err.to_string()}))).into_response()
}

// ── Service ─────────────────────────────────────────────────────────────

async fn banner() -> &'static str {
    "Symptom Intake API is running. Start with POST /api/session/start"
}

async fn health(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "symptom-intake",
        "templates": state.engine.template_count(),
        "guidelines": state.engine.guideline_count(),
        "sessions": state.engine.session_count().await,
    }))
}

// ── Sessions ────────────────────────────────────────────────────────────

/// POST /api/session/start
async fn start_session(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    let session_id = state.engine.create_session().await;
    (
        StatusCode::CREATED,
        Json(serde_json::json!({"session_id": session_id})),
    )
}

/// GET /api/session/{id}
async fn get_session(
    State(state): State<IntakeRouteState>,
    Path(id): Path<String>,
) -> Response {
    match state.engine.session_snapshot(&id).await {
        Some(snapshot) => Json(snapshot).into_response(),
        None => error_response(IntakeError::InvalidSession { id }),
    }
}

#[derive(Deserialize)]
struct ChatRequest {
    #[serde(default, alias = "sessionId")]
    session_id: String,
    #[serde(default)]
    message: String,
}

/// POST /api/chat
async fn chat(State(state): State<IntakeRouteState>, Json(body): Json<ChatRequest>) -> Response {
    match state.engine.advance(&body.session_id, &body.message).await {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => error_response(e),
    }
}

// ── Guidelines ──────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct GuidelineRequest {
    #[serde(default, alias = "label")]
    symptom: String,
}

/// POST /api/guideline
async fn guideline(
    State(state): State<IntakeRouteState>,
    Json(body): Json<GuidelineRequest>,
) -> Response {
    match state.engine.lookup_guideline(&body.symptom) {
        Ok(reply) => Json(reply).into_response(),
        Err(e) => error_response(e),
    }
}

/// GET /api/guidelines
async fn list_guidelines(State(state): State<IntakeRouteState>) -> impl IntoResponse {
    Json(state.engine.guideline_labels())
}

#[derive(Deserialize)]
struct CheckRequest {
    #[serde(default)]
    symptoms: String,
}

/// POST /api/check-symptoms
async fn legacy_check(Json(body): Json<CheckRequest>) -> Response {
    match check_symptoms(&body.symptoms) {
        Ok(resp) => Json(resp).into_response(),
        Err(e) => error_response(e),
    }
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::Request;
    use serde_json::Value;
    use tower::ServiceExt;

    use super::*;
    use crate::dataset::{GuidelineTable, ScriptCorpus};
    use crate::intake::greeting::FixedPicker;
    use crate::store::InMemorySessionStore;

    fn app() -> Router {
        let engine = IntakeEngine::new(
            Arc::new(ScriptCorpus::empty()),
            Arc::new(GuidelineTable::builtin()),
            Arc::new(InMemorySessionStore::new()),
            Arc::new(FixedPicker(0)),
        );
        intake_routes(Arc::new(engine))
    }

    async fn post_json(app: Router, uri: &str, body: Value) -> (StatusCode, Value) {
        let request = Request::post(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn guideline_lookup_by_substring() {
        let (status, body) = post_json(
            app(),
            "/api/guideline",
            serde_json::json!({"symptom": "I have a really bad cold"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["guideline"].as_str().unwrap().contains("common cold"));
    }

    #[tokio::test]
    async fn guideline_without_symptom_is_bad_request() {
        let (status, body) = post_json(app(), "/api/guideline", serde_json::json!({})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("symptom"));
    }

    #[tokio::test]
    async fn chat_with_unknown_session_is_not_found() {
        let (status, _) = post_json(
            app(),
            "/api/chat",
            serde_json::json!({"session_id": "missing", "message": "hello"}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn legacy_check_returns_fixed_results() {
        let (status, body) = post_json(
            app(),
            "/api/check-symptoms",
            serde_json::json!({"symptoms": "fever"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["results"].as_array().unwrap().len(), 3);
    }

    #[test]
    fn cors_layer_accepts_explicit_origins() {
        let _ = cors_layer(&[]);
        let _ = cors_layer(&["http://localhost:3000".to_string()]);
    }
}
