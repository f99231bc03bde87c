//! Data model shared by the backend clients and the views
//!
//! Field names follow the backend's JSON (camelCase, MongoDB-style `_id`).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of an exchange a message belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    /// Asked by the user
    Question,
    /// Produced by the AI
    Answer,
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Question => write!(f, "question"),
            Self::Answer => write!(f, "answer"),
        }
    }
}

/// One entry of a conversation transcript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    /// Question or answer
    #[serde(rename = "type")]
    pub kind: MessageKind,
    /// Text content
    pub content: String,
    /// When the message was produced
    pub timestamp: DateTime<Utc>,
}

impl Message {
    /// Create a question stamped with the current time
    pub fn question(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Question,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an answer stamped with the current time
    pub fn answer(content: impl Into<String>) -> Self {
        Self {
            kind: MessageKind::Answer,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A persisted analysis session tied to one URL
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    /// Backend identifier
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Analysed URL
    pub url: String,
    /// Title of the analysed page
    #[serde(default)]
    pub website_title: String,
    /// AI-generated summary of the page
    #[serde(default)]
    pub summary: String,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Transcript in chronological order
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl Conversation {
    /// Title to display, falling back to the URL
    pub fn display_title(&self) -> &str {
        if self.website_title.trim().is_empty() {
            &self.url
        } else {
            &self.website_title
        }
    }
}

/// The signed-in user, as reported by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Backend identifier
    #[serde(alias = "_id")]
    pub id: String,
    /// Display name
    pub full_name: String,
    /// Email address
    pub email: String,
    /// Whether the email address has been confirmed
    #[serde(default)]
    pub is_email_verified: bool,
}

impl User {
    /// Up to two uppercase initials of the display name
    ///
    /// # Examples
    ///
    /// ```
    /// use synapse::models::User;
    ///
    /// let user = User {
    ///     id: "u1".into(),
    ///     full_name: "ada lovelace byron".into(),
    ///     email: "ada@example.com".into(),
    ///     is_email_verified: true,
    /// };
    /// assert_eq!(user.initials(), "AL");
    /// ```
    pub fn initials(&self) -> String {
        self.full_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .flat_map(char::to_uppercase)
            .take(2)
            .collect()
    }
}

/// Response of register, login and verify-email
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    /// New session token
    pub token: String,
    /// The authenticated user
    pub user: User,
    /// Human-readable status from the backend
    #[serde(default)]
    pub message: String,
}

/// Response of the profile endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    /// The authenticated user
    pub user: User,
}

/// Response carrying only a status message
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    /// Human-readable status from the backend
    #[serde(default)]
    pub message: String,
}

/// Result of analysing a website
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResponse {
    /// AI-generated summary
    pub summary: String,
    /// Conversation created for follow-up questions
    pub conversation_id: String,
    /// Title of the analysed page
    #[serde(default)]
    pub website_title: String,
    /// The URL that was analysed
    pub url: String,
}

/// Result of asking a question
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatResponse {
    /// AI answer
    pub answer: String,
    /// The question as recorded by the backend
    #[serde(default)]
    pub question: String,
    /// Conversation the exchange was appended to
    #[serde(default)]
    pub conversation_id: String,
}

/// Response of the conversation list endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationsResponse {
    /// Conversations in server order
    #[serde(default)]
    pub conversations: Vec<Conversation>,
}

/// Response of the single conversation endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConversationResponse {
    /// The requested conversation
    pub conversation: Conversation,
}
