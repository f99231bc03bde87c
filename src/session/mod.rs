//! Session state: token persistence and the authentication gate

pub mod gate;
pub mod token_store;

pub use gate::{check, Gate, RedirectReason};
pub use token_store::{FileTokenStore, KeyringTokenStore, MemoryTokenStore, TokenStore};
