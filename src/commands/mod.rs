/*!
Command handlers for the CLI

Each handler renders one view in the terminal:

- `auth`: register, login, logout, email verification
- `dashboard`: analyse a website
- `history`: list, show and delete conversations
- `chat`: interactive question/answer loop
- `profile`: profile and navigation shell
- `health`: backend reachability

Protected handlers call [`require_session`] first and stop before any
data is fetched when the gate redirects.
*/

use chrono::{DateTime, Local, Utc};
use colored::Colorize;

use crate::client::AuthClient;
use crate::error::{ErrorCategory, Result, SynapseError};
use crate::models::User;
use crate::session::{self, Gate, RedirectReason};

pub mod auth;
pub mod chat;
pub mod dashboard;
pub mod health;
pub mod history;
pub mod profile;
pub mod special_commands;

/// Run the session gate, printing where to go when it redirects
///
/// # Errors
///
/// Returns [`SynapseError::NotAuthenticated`] on redirect.
pub async fn require_session(auth: &AuthClient) -> Result<User> {
    let gate = session::check(auth).await;
    if let Gate::Redirect(reason) = &gate {
        eprintln!("{}", format!("{}.", reason).yellow());
        if let RedirectReason::ProfileUnavailable(_) = reason {
            eprintln!("Check the backend with {}.", "synapse health".cyan());
        }
    }
    gate.into_result()
}

/// Replace transport-level detail with a generic per-operation message
///
/// Authorization and business failures pass through unchanged so their
/// message reaches the user verbatim; everything else is wrapped so the
/// top-level display shows `fallback` (the cause stays in the chain).
pub fn surface(err: anyhow::Error, fallback: &str) -> anyhow::Error {
    match err.downcast_ref::<SynapseError>().map(SynapseError::category) {
        Some(ErrorCategory::Authorization) | Some(ErrorCategory::Business) => err,
        _ => err.context(fallback.to_string()),
    }
}

/// Local date and time for listings
pub fn format_datetime(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string()
}

/// Local time of day for chat messages
pub fn format_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Shorten `text` to at most `max` characters, adding an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(3);
    format!("{}...", text.chars().take(keep).collect::<String>())
}

/// Print a line in the success color
pub(crate) fn print_success(message: &str) {
    println!("{}", message.green());
}
