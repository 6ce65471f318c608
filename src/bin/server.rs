//! Jyotish HTTP server binary.
//!
//! Loads the rule documents and probes the text-generation server once, then
//! serves the reading API.
//!
//! # Environment Variables
//!
//! See [`jyotish::config`]; `RUST_LOG` sets the tracing filter
//! (default: "info,jyotish=debug").
//!
//! # Usage
//!
//! ```bash
//! JYOTISH_MODEL_URL=http://127.0.0.1:8081 cargo run --bin server
//! ```

use std::sync::Arc;

use anyhow::Context;
use jyotish::server::{app_router, AppState};
use jyotish::{load_model, load_rules, AppConfig, Astrologer, NarrativeRewriter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jyotish=debug".into()),
        )
        .init();

    let config = AppConfig::from_env();
    let bind_addr = config.bind_addr();

    let rules = load_rules(&config.rules_dir);
    if rules.is_empty() {
        tracing::warn!(dir = %config.rules_dir.display(), "No rules loaded; readings will only contain fixed insights");
    }

    let model = load_model(&config.model).await;
    if model.is_none() {
        tracing::warn!("Model unavailable; readings will carry a placeholder interpretation");
    }

    let astrologer = Astrologer::new(Arc::new(rules), NarrativeRewriter::new(model));
    let app = app_router(AppState::new(astrologer));

    tracing::info!("jyotish server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET  /health                    — liveness probe");
    tracing::info!("  POST /api/readings              — start a reading");
    tracing::info!("  POST /api/sessions/:id/messages — follow-up question");
    tracing::info!("  GET  /api/sessions/:id/report   — text report");

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", bind_addr))?;

    axum::serve(listener, app).await.context("Server failed")?;
    Ok(())
}
