//! View state, independent of how it is rendered
//!
//! Each view owns its own copy of the data it fetched. The terminal
//! rendering lives in [`crate::commands`].

pub mod chat;
pub mod dashboard;
pub mod history;
pub mod nav;
pub mod profile;

pub use chat::{ChatSession, ExchangeOutcome, ExchangeState, RejectReason, Submission};
pub use dashboard::DashboardView;
pub use history::HistoryView;
pub use nav::NavShell;
pub use profile::ProfileView;
