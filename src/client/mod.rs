//! Backend clients
//!
//! [`HttpTransport`] owns the HTTP client, the base URL and the token store,
//! and translates every non-success response into a [`SynapseError`].
//! [`AuthClient`] and [`ApiClient`] are thin request builders on top of it.
//!
//! [`SynapseError`]: crate::error::SynapseError

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::Config;
use crate::error::Result;
use crate::models::{AnalysisResponse, ChatResponse, Conversation};
use crate::session::token_store::{self, TokenStore};

pub mod api;
pub mod auth;
pub mod transport;

pub use api::ApiClient;
pub use auth::AuthClient;
pub use transport::{Auth, HttpTransport};

/// Conversation operations the views depend on
///
/// [`ApiClient`] is the production implementation; tests substitute
/// scripted backends.
#[async_trait]
pub trait ConversationBackend: Send + Sync {
    /// Analyse a website and open a conversation about it
    async fn analyze_website(&self, url: &str, use_javascript: bool) -> Result<AnalysisResponse>;

    /// Ask a follow-up question in a conversation
    async fn ask_question(&self, conversation_id: &str, question: &str) -> Result<ChatResponse>;

    /// List the user's conversations in server order
    async fn list_conversations(&self) -> Result<Vec<Conversation>>;

    /// Fetch one conversation with its transcript
    async fn get_conversation(&self, id: &str) -> Result<Conversation>;

    /// Delete a conversation, returning the backend's confirmation message
    async fn delete_conversation(&self, id: &str) -> Result<String>;
}

/// Both clients sharing one transport and token store
#[derive(Clone)]
pub struct Clients {
    /// Authentication calls
    pub auth: AuthClient,
    /// Conversation calls
    pub api: ApiClient,
}

impl Clients {
    /// Build clients from configuration, opening the configured token store
    pub fn from_config(config: &Config) -> Result<Self> {
        let tokens = token_store::open(&config.session)?;
        Self::with_store(config, tokens)
    }

    /// Build clients around an explicit token store
    pub fn with_store(config: &Config, tokens: Arc<dyn TokenStore>) -> Result<Self> {
        let transport = Arc::new(HttpTransport::new(&config.api, tokens)?);
        Ok(Self {
            auth: AuthClient::new(Arc::clone(&transport)),
            api: ApiClient::new(transport),
        })
    }
}
