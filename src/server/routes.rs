//! Axum route handlers for the reading service.
//!
//! # Routes
//!
//! - `GET  /health`                   — Liveness probe with model/rule status
//! - `POST /api/readings`             — Submit birth details, open a session
//! - `GET  /api/sessions/:id`         — Session details and history
//! - `DELETE /api/sessions/:id`       — End a session and free it
//! - `POST /api/sessions/:id/messages` — Ask a follow-up question
//! - `GET  /api/sessions/:id/report`  — Download the conversation as text
//! - `POST /predict`, `POST /chat`    — Placeholder routes, see [`super::stub`]

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::chart::{BirthDetails, BirthDetailsForm, ChartRecord};
use crate::pipeline::{Astrologer, PipelineError};
use crate::session::{render_report, report_file_name, ConversationTurn, SessionError, SessionStore};

use super::stub;

/// Shared application state for the HTTP server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Reading pipeline over the loaded rules and model.
    pub astrologer: Astrologer,
    /// Live sessions.
    pub sessions: SessionStore,
}

impl AppState {
    pub fn new(astrologer: Astrologer) -> Self {
        Self {
            astrologer,
            sessions: SessionStore::new(),
        }
    }
}

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl std::fmt::Display) -> ApiError {
    (status, Json(serde_json::json!({"error": message.to_string()})))
}

impl From<SessionError> for ApiError {
    fn from(err: SessionError) -> Self {
        let status = match err {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::StorePoisoned | SessionError::Report(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        api_error(status, err)
    }
}

impl From<PipelineError> for ApiError {
    fn from(err: PipelineError) -> Self {
        api_error(StatusCode::UNPROCESSABLE_ENTITY, err)
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/api/readings", post(create_reading_handler))
        .route(
            "/api/sessions/:id",
            get(get_session_handler).delete(delete_session_handler),
        )
        .route("/api/sessions/:id/messages", post(post_message_handler))
        .route("/api/sessions/:id/report", get(report_handler))
        .merge(stub::stub_router())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Request / response bodies
// ---------------------------------------------------------------------------

/// Response to a successful birth-detail submission.
#[derive(Debug, Serialize)]
pub struct ReadingResponse {
    pub session_id: Uuid,
    pub chart: ChartRecord,
    pub predictions: Vec<String>,
    pub interpretation: String,
}

/// Follow-up question body.
#[derive(Debug, Deserialize)]
pub struct MessageRequest {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub session_id: Uuid,
    pub reply: String,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub birth_details: BirthDetails,
    pub history: Vec<ConversationTurn>,
    pub created_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /health — liveness probe.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let rewriter = state.astrologer.rewriter();
    let categories: Vec<&str> = state.astrologer.rules().categories().collect();
    Json(serde_json::json!({
        "status": "ok",
        "service": "jyotish",
        "version": crate::VERSION,
        "model_available": rewriter.is_available(),
        "model": rewriter.model_name(),
        "rule_categories": categories,
    }))
}

/// POST /api/readings — validate birth details, run the pipeline, open a session.
///
/// Missing or malformed fields are rejected with 422 before any chart or
/// model work.
async fn create_reading_handler(
    State(state): State<AppState>,
    Json(form): Json<BirthDetailsForm>,
) -> Result<(StatusCode, Json<ReadingResponse>), ApiError> {
    let (session, reading) = state.astrologer.begin_session(&form).await.map_err(|e| {
        log::info!("Rejected birth details: {}", e);
        ApiError::from(e)
    })?;
    let session_id = state.sessions.insert(session)?;

    log::info!("Session {} started", session_id);

    Ok((
        StatusCode::CREATED,
        Json(ReadingResponse {
            session_id,
            chart: reading.chart,
            predictions: reading.predictions,
            interpretation: reading.interpretation,
        }),
    ))
}

/// GET /api/sessions/:id — birth details and full history.
async fn get_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    Ok(Json(SessionResponse {
        session_id: session.id(),
        birth_details: session.birth_details().clone(),
        history: session.history().to_vec(),
        created_at: session.created_at(),
    }))
}

/// DELETE /api/sessions/:id — drop a finished session.
async fn delete_session_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if state.sessions.remove(id)? {
        log::info!("Session {} ended", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(SessionError::NotFound(id).into())
    }
}

/// POST /api/sessions/:id/messages — answer a follow-up question.
///
/// The session stays locked for the whole exchange.
async fn post_message_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<MessageRequest>,
) -> Result<Json<MessageResponse>, ApiError> {
    let handle = state.sessions.get(id)?;
    let mut session = handle.lock().await;
    let reply = state
        .astrologer
        .follow_up(&mut session, &request.message)
        .await?;

    Ok(Json(MessageResponse {
        session_id: id,
        reply,
    }))
}

/// GET /api/sessions/:id/report — conversation as a text attachment.
async fn report_handler(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let handle = state.sessions.get(id)?;
    let session = handle.lock().await;
    let report = render_report(&session)?;
    let disposition = format!("attachment; filename=\"{}\"", report_file_name(&session));

    Ok((
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        report,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use crate::llms::testing::ScriptedGenerator;
    use crate::llms::SharedGenerator;
    use crate::narrative::{NarrativeRewriter, UNAVAILABLE_MESSAGE};
    use crate::rules::RuleSet;

    fn state_with(generator: Option<Arc<ScriptedGenerator>>) -> AppState {
        let mut rules = RuleSet::new();
        rules.insert(
            "house_rules",
            serde_json::json!({"moon_in_cancer": {"effect": "quiet strength"}}),
        );
        let model = generator.map(|g| -> SharedGenerator { g });
        AppState::new(Astrologer::new(
            Arc::new(rules),
            NarrativeRewriter::new(model),
        ))
    }

    fn birth_body() -> Value {
        serde_json::json!({
            "name": "Asha",
            "gender": "Female",
            "dob": "1992-03-08",
            "tob": "06:45",
            "pob": "Kolkata, India",
            "timezone": "Asia/Kolkata"
        })
    }

    fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(serde_json::to_string(body).unwrap()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }

    async fn start_session(app: &Router) -> (Uuid, Value) {
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/readings", &birth_body()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let json = body_json(response).await;
        let id = json["session_id"].as_str().unwrap().parse().unwrap();
        (id, json)
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = app_router(state_with(None));

        let request = Request::builder()
            .uri("/health")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["model_available"], false);
        assert_eq!(json["rule_categories"], serde_json::json!(["house_rules"]));
    }

    #[tokio::test]
    async fn test_create_reading() {
        let generator = Arc::new(ScriptedGenerator::continuing(" Your Moon is a lantern."));
        let state = state_with(Some(generator.clone()));
        let app = app_router(state.clone());

        let (id, json) = start_session(&app).await;
        assert_eq!(json["interpretation"], "Your Moon is a lantern.");
        assert_eq!(json["chart"]["birth_details"]["name"], "Asha");
        assert!(json["predictions"]
            .as_array()
            .unwrap()
            .iter()
            .any(|p| p.as_str().unwrap().contains("quiet strength")));
        assert!(state.sessions.get(id).is_ok());
        assert_eq!(generator.calls(), 1);
    }

    #[tokio::test]
    async fn test_create_reading_rejects_missing_field() {
        let generator = Arc::new(ScriptedGenerator::continuing(" unused"));
        let state = state_with(Some(generator.clone()));
        let app = app_router(state.clone());

        let mut body = birth_body();
        body["name"] = Value::String(String::new());
        let response = app
            .oneshot(json_request("POST", "/api/readings", &body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(response).await;
        assert!(json["error"].as_str().unwrap().contains("name"));
        assert_eq!(generator.calls(), 0);
        assert!(state.sessions.is_empty());
    }

    #[tokio::test]
    async fn test_reading_without_model_is_unavailable() {
        let app = app_router(state_with(None));
        let (_, json) = start_session(&app).await;
        assert_eq!(json["interpretation"], UNAVAILABLE_MESSAGE);
    }

    #[tokio::test]
    async fn test_follow_up_and_history() {
        let generator = Arc::new(ScriptedGenerator::continuing(" The stars favour patience."));
        let app = app_router(state_with(Some(generator)));
        let (id, _) = start_session(&app).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/messages", id),
                &serde_json::json!({"message": "When will I marry?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["reply"], "The stars favour patience.");

        let request = Request::builder()
            .uri(format!("/api/sessions/{}", id))
            .body(Body::empty())
            .unwrap();
        let json = body_json(app.oneshot(request).await.unwrap()).await;
        let history = json["history"].as_array().unwrap();
        assert_eq!(history.len(), 4);
        assert_eq!(history[2]["role"], "user");
        assert_eq!(history[2]["content"], "When will I marry?");
        assert_eq!(history[3]["role"], "assistant");
    }

    #[tokio::test]
    async fn test_follow_up_rejects_blank_message() {
        let app = app_router(state_with(None));
        let (id, _) = start_session(&app).await;

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/messages", id),
                &serde_json::json!({"message": "  "}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_session_is_404() {
        let app = app_router(state_with(None));
        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/sessions/{}/messages", Uuid::new_v4()),
                &serde_json::json!({"message": "Hello?"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_report_download() {
        let generator = Arc::new(ScriptedGenerator::continuing(" Walk gently."));
        let app = app_router(state_with(Some(generator)));
        let (id, _) = start_session(&app).await;

        let request = Request::builder()
            .uri(format!("/api/sessions/{}/report", id))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"Asha_Astrology_Report.txt\""
        );

        let body = axum::body::to_bytes(response.into_body(), 1 << 20)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.starts_with("Astrology Report for Asha"));
        assert!(text.contains("Assistant: Walk gently."));
    }

    #[tokio::test]
    async fn test_delete_session() {
        let state = state_with(None);
        let app = app_router(state.clone());
        let (id, _) = start_session(&app).await;

        let delete = || {
            Request::builder()
                .method("DELETE")
                .uri(format!("/api/sessions/{}", id))
                .body(Body::empty())
                .unwrap()
        };

        let response = app.clone().oneshot(delete()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert!(state.sessions.is_empty());

        let response = app.clone().oneshot(delete()).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let request = Request::builder()
            .uri(format!("/api/sessions/{}", id))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_report_file_name_is_ascii() {
        let app = app_router(state_with(None));
        let mut body = birth_body();
        body["name"] = Value::String("Aarav Śarmā".into());
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/readings", &body))
            .await
            .unwrap();
        let id = body_json(response).await["session_id"]
            .as_str()
            .unwrap()
            .to_string();

        let request = Request::builder()
            .uri(format!("/api/sessions/{}/report", id))
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let disposition = response.headers()[header::CONTENT_DISPOSITION]
            .to_str()
            .unwrap();
        assert_eq!(
            disposition,
            "attachment; filename=\"Aarav__arm__Astrology_Report.txt\""
        );
    }
}
