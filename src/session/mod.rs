//! Conversation sessions.
//!
//! A session is created when birth details are accepted. It owns the
//! details (fixed from then on) and the ordered conversation history that
//! follow-up questions are answered against.
//!
//! - [`store`] - In-memory [`SessionStore`] with per-session locking
//! - [`report`] - Plain-text report export

pub mod report;
pub mod store;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::chart::BirthDetails;

pub use report::{render_report, report_file_name};
pub use store::SessionStore;

/// Opening assistant turn of every session.
pub const WELCOME_MESSAGE: &str = "Welcome, seeker! Please provide your birth details, and I shall unveil the celestial wisdom guiding your path. ✨";

/// Errors from session lookup and export.
#[derive(Debug, Error)]
pub enum SessionError {
    /// No session with this id.
    #[error("Session not found: {0}")]
    NotFound(Uuid),

    /// The session map lock was poisoned by a panicking writer.
    #[error("Session store lock poisoned")]
    StorePoisoned,

    /// Report rendering failed.
    #[error("Failed to render report: {0}")]
    Report(String),
}

// ---------------------------------------------------------------------------
// Conversation turns
// ---------------------------------------------------------------------------

/// Who authored a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// Birth details plus the conversation built on them.
///
/// History is unbounded; every follow-up prompt includes all of it.
#[derive(Debug, Clone, Serialize)]
pub struct Session {
    id: Uuid,
    birth_details: BirthDetails,
    history: Vec<ConversationTurn>,
    created_at: DateTime<Utc>,
}

impl Session {
    /// Start a session; history opens with [`WELCOME_MESSAGE`].
    pub fn new(birth_details: BirthDetails) -> Self {
        Self {
            id: Uuid::new_v4(),
            birth_details,
            history: vec![ConversationTurn::assistant(WELCOME_MESSAGE)],
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn birth_details(&self) -> &BirthDetails {
        &self.birth_details
    }

    pub fn history(&self) -> &[ConversationTurn] {
        &self.history
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Append a turn to the end of the history.
    pub fn push(&mut self, turn: ConversationTurn) {
        self.history.push(turn);
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    pub(crate) fn sample_details() -> BirthDetails {
        BirthDetails {
            name: "Asha".into(),
            gender: "Female".into(),
            dob: NaiveDate::from_ymd_opt(1992, 3, 8).unwrap(),
            tob: NaiveTime::from_hms_opt(6, 45, 0).unwrap(),
            pob: "Kolkata, India".into(),
            timezone: "Asia/Kolkata".into(),
        }
    }

    #[test]
    fn test_new_session_opens_with_welcome() {
        let session = Session::new(sample_details());
        assert_eq!(
            session.history(),
            &[ConversationTurn::assistant(WELCOME_MESSAGE)]
        );
        assert_eq!(session.birth_details().name, "Asha");
    }

    #[test]
    fn test_push_keeps_order() {
        let mut session = Session::new(sample_details());
        session.push(ConversationTurn::assistant("Your reading."));
        session.push(ConversationTurn::user("Will I travel?"));
        let roles: Vec<Role> = session.history().iter().map(|t| t.role).collect();
        assert_eq!(roles, vec![Role::Assistant, Role::Assistant, Role::User]);
    }

    #[test]
    fn test_role_serializes_lowercase() {
        let json = serde_json::to_value(ConversationTurn::user("hi")).unwrap();
        assert_eq!(json, serde_json::json!({"role": "user", "content": "hi"}));
    }
}
