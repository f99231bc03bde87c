//! Conversation history list
//!
//! The list is fetched once. Deletion is confirm-then-remove: an entry
//! leaves the local list only after the backend has confirmed the delete.

use crate::client::ConversationBackend;
use crate::error::{user_message, Result};
use crate::models::Conversation;

/// Local copy of the user's conversations
#[derive(Debug, Clone, Default)]
pub struct HistoryView {
    conversations: Vec<Conversation>,
    error: Option<String>,
}

impl HistoryView {
    /// Build a view from an already fetched list
    pub fn new(conversations: Vec<Conversation>) -> Self {
        Self {
            conversations,
            error: None,
        }
    }

    /// Fetch the list from the backend, propagating failures
    pub async fn fetch(backend: &dyn ConversationBackend) -> Result<Self> {
        let conversations = backend.list_conversations().await?;
        tracing::debug!("Loaded {} conversations", conversations.len());
        Ok(Self::new(conversations))
    }

    /// Fetch the list from the backend
    ///
    /// A failed fetch yields an empty view carrying the error message.
    pub async fn load(backend: &dyn ConversationBackend) -> Self {
        match Self::fetch(backend).await {
            Ok(view) => view,
            Err(e) => Self {
                conversations: Vec::new(),
                error: Some(user_message(&e, "Failed to load conversations")),
            },
        }
    }

    /// Conversations in server order
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    /// Number of conversations
    pub fn len(&self) -> usize {
        self.conversations.len()
    }

    /// Whether the list is empty
    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
    }

    /// Error from the last failed load or delete
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Find a conversation by id
    pub fn find(&self, id: &str) -> Option<&Conversation> {
        self.conversations.iter().find(|c| c.id == id)
    }

    /// Resolve a full id from a unique prefix
    ///
    /// Returns `None` when nothing or more than one conversation matches.
    pub fn resolve_prefix(&self, prefix: &str) -> Option<&str> {
        if let Some(exact) = self.find(prefix) {
            return Some(&exact.id);
        }
        let mut matches = self.conversations.iter().filter(|c| c.id.starts_with(prefix));
        match (matches.next(), matches.next()) {
            (Some(only), None) if !prefix.is_empty() => Some(&only.id),
            _ => None,
        }
    }

    /// Delete a conversation
    ///
    /// On success exactly the entry with `id` is removed and the backend's
    /// confirmation message is returned. On failure the list is left
    /// untouched, the message is recorded in [`HistoryView::error`] and the
    /// error is returned.
    pub async fn delete(&mut self, backend: &dyn ConversationBackend, id: &str) -> Result<String> {
        match backend.delete_conversation(id).await {
            Ok(message) => {
                if let Some(pos) = self.conversations.iter().position(|c| c.id == id) {
                    self.conversations.remove(pos);
                }
                self.error = None;
                Ok(message)
            }
            Err(e) => {
                self.error = Some(user_message(&e, "Failed to delete conversation"));
                Err(e)
            }
        }
    }
}
