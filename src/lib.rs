//! Synapse - terminal client for the website-analysis service
//!
//! This library provides the clients, view state and command handlers used
//! by the `synapse` binary.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `client`: HTTP transport plus the auth and conversation API clients
//! - `session`: session token storage and the authentication gate
//! - `views`: per-view state, including the optimistic chat exchange
//! - `commands`: terminal rendering of each view
//! - `models`: data exchanged with the backend
//! - `config`: configuration management and validation
//! - `error`: error types and result aliases
//! - `cli`: command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use synapse::client::{Clients, ConversationBackend};
//! use synapse::Config;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let clients = Clients::from_config(&config)?;
//!     clients.auth.login("ada@example.com", "secret").await?;
//!     for conv in clients.api.list_conversations().await? {
//!         println!("{} {}", conv.id, conv.display_title());
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod session;
pub mod views;

// Re-export commonly used types
pub use client::{ApiClient, AuthClient, Clients, ConversationBackend};
pub use config::Config;
pub use error::{Result, SynapseError};
pub use models::{Conversation, Message, MessageKind, User};
pub use views::ChatSession;
