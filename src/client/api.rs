//! Conversation API client
//!
//! Wraps the `/api/ai/*` endpoints. Every call carries the session token.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::client::transport::{Auth, HttpTransport};
use crate::client::ConversationBackend;
use crate::error::Result;
use crate::models::{
    AnalysisResponse, ChatResponse, Conversation, ConversationResponse, ConversationsResponse,
    MessageResponse,
};

/// Client for analysis and conversation calls
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<HttpTransport>,
}

impl ApiClient {
    /// Create a client on a shared transport
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Check that the backend is reachable
    pub async fn health_check(&self) -> Result<String> {
        let response: MessageResponse = self
            .transport
            .get(&["api", "health"], "Health check failed")
            .await?;
        Ok(response.message)
    }
}

#[async_trait]
impl ConversationBackend for ApiClient {
    async fn analyze_website(&self, url: &str, use_javascript: bool) -> Result<AnalysisResponse> {
        tracing::info!("Analyzing {} (javascript={})", url, use_javascript);
        self.transport
            .post(
                &["api", "ai", "analyze"],
                &json!({ "url": url, "useJavaScript": use_javascript }),
                Auth::Bearer,
                "Analysis failed",
            )
            .await
    }

    async fn ask_question(&self, conversation_id: &str, question: &str) -> Result<ChatResponse> {
        tracing::debug!("Asking question in conversation {}", conversation_id);
        self.transport
            .post(
                &["api", "ai", "chat", conversation_id],
                &json!({ "question": question }),
                Auth::Bearer,
                "Failed to get answer",
            )
            .await
    }

    async fn list_conversations(&self) -> Result<Vec<Conversation>> {
        let response: ConversationsResponse = self
            .transport
            .get(
                &["api", "ai", "conversations"],
                "Failed to load conversations",
            )
            .await?;
        Ok(response.conversations)
    }

    async fn get_conversation(&self, id: &str) -> Result<Conversation> {
        let response: ConversationResponse = self
            .transport
            .get(
                &["api", "ai", "conversations", id],
                "Failed to load conversation",
            )
            .await?;
        Ok(response.conversation)
    }

    async fn delete_conversation(&self, id: &str) -> Result<String> {
        tracing::info!("Deleting conversation {}", id);
        let response: MessageResponse = self
            .transport
            .delete(
                &["api", "ai", "conversations", id],
                "Failed to delete conversation",
            )
            .await?;
        Ok(response.message)
    }
}
