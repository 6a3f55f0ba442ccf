//! Chat Transcript - the append-only record of incident chat.

mod summary;

pub use summary::*;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for chat messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MessageId(pub Uuid);

impl MessageId {
    /// Create a new random message ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for MessageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MessageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Who produced a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Operators, field staff, police liaison.
    Human,
    /// Notifications emitted by the engine itself.
    System,
    /// Inbound messages from automated agents outside the engine.
    Agent,
}

/// A single chat message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: MessageId,
    pub source: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
    pub kind: MessageKind,
}

impl ChatMessage {
    /// Create a new message.
    pub fn new(
        source: impl Into<String>,
        text: impl Into<String>,
        kind: MessageKind,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::new(),
            source: source.into(),
            text: text.into(),
            timestamp,
            kind,
        }
    }

    /// Create a message from a human participant.
    pub fn human(source: impl Into<String>, text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new(source, text, MessageKind::Human, timestamp)
    }

    /// Create an engine notification.
    pub fn system(text: impl Into<String>, timestamp: DateTime<Utc>) -> Self {
        Self::new("System", text, MessageKind::System, timestamp)
    }
}

/// Ordered chat history. Messages can only be appended.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    messages: Vec<ChatMessage>,
}

impl Transcript {
    /// Create an empty transcript.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message and return its ID.
    pub fn push(&mut self, message: ChatMessage) -> MessageId {
        let id = message.id;
        self.messages.push(message);
        id
    }

    /// All messages in arrival order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Iterate over messages in arrival order.
    pub fn iter(&self) -> impl Iterator<Item = &ChatMessage> {
        self.messages.iter()
    }

    /// The most recent message.
    pub fn last(&self) -> Option<&ChatMessage> {
        self.messages.last()
    }

    /// The most recent `n` messages, oldest first.
    pub fn tail(&self, n: usize) -> &[ChatMessage] {
        let start = self.messages.len().saturating_sub(n);
        &self.messages[start..]
    }

    /// Number of messages.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Check if the transcript is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transcript_append_order() {
        let now = Utc::now();
        let mut transcript = Transcript::new();
        let first = transcript.push(ChatMessage::human("Ops", "first", now));
        let second = transcript.push(ChatMessage::human("Ops", "second", now));

        assert_eq!(transcript.len(), 2);
        assert_eq!(transcript.messages()[0].id, first);
        assert_eq!(transcript.last().unwrap().id, second);
    }

    #[test]
    fn test_transcript_tail() {
        let now = Utc::now();
        let mut transcript = Transcript::new();
        for i in 0..5 {
            transcript.push(ChatMessage::human("Ops", format!("msg {}", i), now));
        }

        let tail: Vec<_> = transcript.tail(2).iter().map(|m| m.text.as_str()).collect();
        assert_eq!(tail, vec!["msg 3", "msg 4"]);
        assert_eq!(transcript.tail(10).len(), 5);
    }

    #[test]
    fn test_system_message_kind() {
        let message = ChatMessage::system("Signal updated", Utc::now());
        assert_eq!(message.kind, MessageKind::System);
        assert_eq!(message.source, "System");
    }
}
