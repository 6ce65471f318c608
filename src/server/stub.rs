//! Placeholder routes kept for clients written against the early API.
//!
//! Both accept any JSON body, log it, and answer with a fixed response.

use axum::{routing::post, Json, Router};
use serde_json::Value;

/// Routes that need no application state.
pub fn stub_router<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new()
        .route("/predict", post(predict_stub))
        .route("/chat", post(chat_stub))
}

/// POST /predict
async fn predict_stub(Json(payload): Json<Value>) -> Json<Value> {
    log::debug!("Received /predict payload: {}", payload);
    Json(serde_json::json!({
        "status": "success",
        "message": "Prediction will go here!",
    }))
}

/// POST /chat
async fn chat_stub(Json(payload): Json<Value>) -> Json<Value> {
    log::debug!("Received /chat payload: {}", payload);
    Json(serde_json::json!({
        "status": "success",
        "message": "Chat response will go here!",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    async fn post_json(uri: &str, body: &str) -> (StatusCode, Value) {
        let app: Router = stub_router();
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 1 << 16)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_predict_stub() {
        let (status, json) = post_json("/predict", r#"{"name":"Asha"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Prediction will go here!");
    }

    #[tokio::test]
    async fn test_chat_stub() {
        let (status, json) = post_json("/chat", r#"{"message":"hi"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["status"], "success");
        assert_eq!(json["message"], "Chat response will go here!");
    }

    #[tokio::test]
    async fn test_stub_rejects_non_json() {
        let (status, _) = post_json("/predict", "not json").await;
        assert!(status.is_client_error());
    }
}
