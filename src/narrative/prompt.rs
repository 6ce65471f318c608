//! Prompt assembly and output extraction.
//!
//! The prompt is plain concatenation in a fixed order: persona instruction,
//! prediction bullets, prior turns, the new question, then [`CLOSING_CUE`].
//! The model output is cut back to the text following the cue.

use crate::session::{ConversationTurn, Role};

/// Fixed persona preamble placed at the top of every prompt.
pub const PERSONA_INSTRUCTION: &str = "You are a wise, empathetic, and spiritual Vedic astrologer named JyotishAI. \
Your purpose is to provide comforting and insightful interpretations of astrological data. \
Explain raw predictions in an emotional and encouraging tone. \
Avoid astrological jargon where possible, or explain it simply. \
Maintain a gentle, supportive, and compassionate demeanor. \
Always provide a hopeful outlook and constructive guidance. Do not provide disclaimers. \
The user will provide raw astrological insights and sometimes follow-up questions.";

/// Final line of the prompt; the model's answer follows it.
pub const CLOSING_CUE: &str = "Astrologer's Interpretation:";

/// Marks the model starting to write the next user turn.
pub const USER_TURN_MARKER: &str = "User:";

const INSIGHTS_HEADER: &str = "\n\n--- Astrological Insights to Interpret ---";
const HISTORY_HEADER: &str = "\n\n--- Previous Conversation ---";

/// Assemble the prompt.
///
/// Empty `predictions`, empty `history` and a blank `question` each drop
/// their section entirely.
pub fn build_prompt(
    predictions: &[String],
    history: &[ConversationTurn],
    question: Option<&str>,
) -> String {
    let mut parts: Vec<String> = vec![PERSONA_INSTRUCTION.to_string()];

    if !predictions.is_empty() {
        parts.push(INSIGHTS_HEADER.to_string());
        parts.extend(predictions.iter().map(|p| format!("- {}", p)));
        parts.push("\n".to_string());
    }

    if !history.is_empty() {
        parts.push(HISTORY_HEADER.to_string());
        for turn in history {
            match turn.role {
                Role::User => parts.push(format!("User: {}", turn.content)),
                Role::Assistant => {
                    parts.push(format!("Astrologer: {}", strip_cue_prefix(&turn.content)))
                }
            }
        }
        parts.push(String::new());
    }

    if let Some(question) = question.map(str::trim).filter(|q| !q.is_empty()) {
        parts.push(format!("User's Current Query: {}", question));
        parts.push(String::new());
    }

    parts.push(CLOSING_CUE.to_string());
    parts.join("\n")
}

/// Drop everything up to and including the first closing cue, if present.
fn strip_cue_prefix(content: &str) -> &str {
    match content.split_once(CLOSING_CUE) {
        Some((_, rest)) => rest.trim(),
        None => content,
    }
}

/// Cut raw model output down to the interpretation.
///
/// 1. Without a [`CLOSING_CUE`], strip the echoed `prompt` if the output
///    starts with it.
/// 2. Repeatedly keep the text after the last cue and remove echoes of
///    [`PERSONA_INSTRUCTION`] until neither step changes anything, since a
///    removal can splice a new cue or persona together.
/// 3. Truncate at the first [`USER_TURN_MARKER`].
pub fn extract_interpretation(raw: &str, prompt: &str) -> String {
    let mut text = if raw.contains(CLOSING_CUE) {
        raw
    } else {
        raw.strip_prefix(prompt).unwrap_or(raw)
    }
    .trim()
    .to_string();

    loop {
        let next = after_last_cue(&text)
            .replace(PERSONA_INSTRUCTION, "")
            .trim()
            .to_string();
        if next == text {
            break;
        }
        text = next;
    }

    text.split(USER_TURN_MARKER)
        .next()
        .unwrap_or_default()
        .trim()
        .to_string()
}

fn after_last_cue(text: &str) -> &str {
    match text.rfind(CLOSING_CUE) {
        Some(idx) => &text[idx + CLOSING_CUE.len()..],
        None => text,
    }
}
