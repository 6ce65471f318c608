//! The reading pipeline.
//!
//! Birth details → chart → rule matches → narrative, and afterwards
//! follow-up questions answered against the session history without
//! recomputing the chart.

use std::sync::Arc;

use serde::Serialize;
use thiserror::Error;

use crate::chart::{calculate_chart, BirthDetails, BirthDetailsError, BirthDetailsForm, ChartRecord};
use crate::narrative::NarrativeRewriter;
use crate::rules::{match_rules, Prediction, RuleSet};
use crate::session::{ConversationTurn, Session};

/// Errors raised before any chart or model work starts.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// The submitted birth details were incomplete or malformed.
    #[error(transparent)]
    BirthDetails(#[from] BirthDetailsError),

    /// A follow-up question was blank.
    #[error("Question must not be empty")]
    EmptyQuestion,
}

/// Output of the first pass over a chart.
#[derive(Debug, Clone, Serialize)]
pub struct Reading {
    pub chart: ChartRecord,
    pub predictions: Prediction,
    pub interpretation: String,
}

/// Runs readings over a fixed rule set and a (possibly absent) model.
///
/// Both resources are loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct Astrologer {
    rules: Arc<RuleSet>,
    rewriter: NarrativeRewriter,
}

impl Astrologer {
    pub fn new(rules: Arc<RuleSet>, rewriter: NarrativeRewriter) -> Self {
        Self { rules, rewriter }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn rewriter(&self) -> &NarrativeRewriter {
        &self.rewriter
    }

    /// Produce a reading for validated birth details.
    pub async fn reading(&self, details: &BirthDetails) -> Reading {
        let chart = calculate_chart(details);
        let predictions = match_rules(&chart, &self.rules);
        let interpretation = self.rewriter.rewrite(&predictions, &[], None).await;

        log::info!(
            "Reading generated for {} ({} predictions)",
            details.name,
            predictions.len()
        );

        Reading {
            chart,
            predictions,
            interpretation,
        }
    }

    /// Validate a submission, produce its reading and open a session on it.
    ///
    /// The interpretation is appended to the session as an assistant turn.
    pub async fn begin_session(
        &self,
        form: &BirthDetailsForm,
    ) -> Result<(Session, Reading), PipelineError> {
        let details = form.validate()?;
        let reading = self.reading(&details).await;

        let mut session = Session::new(details);
        session.push(ConversationTurn::assistant(reading.interpretation.clone()));
        Ok((session, reading))
    }

    /// Answer a follow-up question and record both turns in the session.
    pub async fn follow_up(
        &self,
        session: &mut Session,
        question: &str,
    ) -> Result<String, PipelineError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(PipelineError::EmptyQuestion);
        }

        let reply = self
            .rewriter
            .rewrite(&[], session.history(), Some(question))
            .await;

        session.push(ConversationTurn::user(question));
        session.push(ConversationTurn::assistant(reply.clone()));
        Ok(reply)
    }
}
