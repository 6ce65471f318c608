//! HTTP surface for readings and follow-up conversations.
//!
//! # Endpoints
//!
//! - `GET  /health`                    — Liveness probe
//! - `POST /api/readings`              — Start a reading session
//! - `GET  /api/sessions/:id`          — Session history
//! - `DELETE /api/sessions/:id`        — End a session
//! - `POST /api/sessions/:id/messages` — Follow-up question
//! - `GET  /api/sessions/:id/report`   — Text report download

pub mod routes;
pub mod stub;

pub use routes::{app_router, AppState};
