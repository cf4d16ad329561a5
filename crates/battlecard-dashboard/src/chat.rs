//! Conversation state scoped to the selected competitor.

use battlecard_gemini::CHAT_FALLBACK;
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// Context sent when the selected profile has no `aiContext`.
pub const NO_CONTEXT: &str = "No context available.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatRole {
    User,
    Model,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub role: ChatRole,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    fn new(role: ChatRole, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            role,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Snapshot of the current transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatTranscript {
    pub competitor_id: String,
    pub messages: Vec<ChatMessage>,
    pub pending: bool,
}

/// Handle for a question in flight. Answers only land in the session that
/// issued them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PendingQuestion {
    session: Uuid,
}

/// Transcript for one competitor. Replaced wholesale when the selection
/// moves to another competitor.
#[derive(Debug, Clone)]
pub struct ChatSession {
    session: Uuid,
    competitor_id: String,
    messages: Vec<ChatMessage>,
    in_flight: usize,
}

impl ChatSession {
    /// Fresh session seeded with a single greeting naming the competitor.
    #[must_use]
    pub fn new(competitor_id: &str, competitor_name: &str) -> Self {
        Self {
            session: Uuid::new_v4(),
            competitor_id: competitor_id.to_string(),
            messages: vec![ChatMessage::new(ChatRole::Model, greeting(competitor_name))],
            in_flight: 0,
        }
    }

    #[must_use]
    pub fn competitor_id(&self) -> &str {
        &self.competitor_id
    }

    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// `true` while an answer for this session is outstanding.
    #[must_use]
    pub fn pending(&self) -> bool {
        self.in_flight > 0
    }

    #[must_use]
    pub fn transcript(&self) -> ChatTranscript {
        ChatTranscript {
            competitor_id: self.competitor_id.clone(),
            messages: self.messages.clone(),
            pending: self.pending(),
        }
    }

    pub(crate) fn begin(&mut self, question: &str) -> PendingQuestion {
        self.messages.push(ChatMessage::new(ChatRole::User, question));
        self.in_flight += 1;
        PendingQuestion {
            session: self.session,
        }
    }

    /// Append the answer if `pending` belongs to this session; otherwise the
    /// answer is dropped and `None` returned.
    pub(crate) fn finish(&mut self, pending: PendingQuestion, answer: String) -> Option<ChatMessage> {
        if pending.session != self.session {
            return None;
        }
        self.in_flight = self.in_flight.saturating_sub(1);
        let message = ChatMessage::new(ChatRole::Model, answer);
        self.messages.push(message.clone());
        Some(message)
    }

    /// Settle a question whose answer will never arrive. The transcript gets
    /// the chat fallback so the question does not hang unanswered.
    pub(crate) fn abandon(&mut self, pending: PendingQuestion) {
        if pending.session == self.session {
            self.in_flight = self.in_flight.saturating_sub(1);
            self.messages.push(ChatMessage::new(ChatRole::Model, CHAT_FALLBACK));
        }
    }
}

#[must_use]
pub fn greeting(competitor_name: &str) -> String {
    format!(
        "Hi! I'm your battle card assistant for {competitor_name}. \
         Do you have questions about their weaknesses or need arguments?"
    )
}
