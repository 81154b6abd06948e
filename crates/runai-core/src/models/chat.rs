use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
pub struct QueryRequest<'a> {
    pub query: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
pub struct QueryResponse {
    pub answer: String,
    /// Name of the model that produced the answer, when the backend reports it
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Single-letter avatar shown beside each message
    pub fn avatar(&self) -> char {
        match self {
            Role::User => 'U',
            Role::Assistant => 'A',
        }
    }
}

/// One entry of the chat transcript
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    /// Set on assistant entries that report a failed request
    pub is_error: bool,
    pub sent_at: DateTime<Local>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content.into(), false)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), false)
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content.into(), true)
    }

    fn new(role: Role, content: String, is_error: bool) -> Self {
        Self {
            role,
            content,
            is_error,
            sent_at: Local::now(),
        }
    }
}
