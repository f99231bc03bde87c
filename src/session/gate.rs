//! Session gating for protected views
//!
//! Every protected command calls [`check`] before fetching anything. The
//! gate is re-evaluated from scratch each time; nothing is cached between
//! commands.

use std::fmt;

use crate::client::AuthClient;
use crate::error::{user_message, SynapseError};
use crate::models::User;

/// Why a protected view refused to render
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirectReason {
    /// No token is stored; the backend was not contacted
    NoToken,
    /// The backend rejected the token (HTTP 401); the token was cleared
    SessionExpired,
    /// The profile could not be fetched for another reason
    ProfileUnavailable(String),
}

impl fmt::Display for RedirectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoToken => write!(f, "You are not logged in"),
            Self::SessionExpired => write!(f, "Your session has expired"),
            Self::ProfileUnavailable(msg) => write!(f, "Could not load your profile: {}", msg),
        }
    }
}

/// Outcome of the session gate
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Gate {
    /// The token is valid; the view may render
    Authenticated(User),
    /// The view must not render; send the user to login
    Redirect(RedirectReason),
}

impl Gate {
    /// The authenticated user, if any
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Authenticated(user) => Some(user),
            Self::Redirect(_) => None,
        }
    }

    /// Convert into a result, turning a redirect into
    /// [`SynapseError::NotAuthenticated`]
    pub fn into_result(self) -> crate::error::Result<User> {
        match self {
            Self::Authenticated(user) => Ok(user),
            Self::Redirect(reason) => {
                tracing::info!("Redirecting to login: {}", reason);
                Err(SynapseError::NotAuthenticated.into())
            }
        }
    }
}

/// Validate the stored session
///
/// 1. No token: redirect without any backend call.
/// 2. Token present: fetch the profile.
/// 3. Profile fetched: authenticated.
/// 4. HTTP 401: the transport has cleared the token; redirect.
/// 5. Any other failure: redirect, keeping the token.
pub async fn check(auth: &AuthClient) -> Gate {
    if !auth.is_authenticated() {
        tracing::debug!("No session token stored");
        return Gate::Redirect(RedirectReason::NoToken);
    }

    match auth.profile().await {
        Ok(user) => {
            tracing::debug!("Session valid for {}", user.email);
            Gate::Authenticated(user)
        }
        Err(e) => match e.downcast_ref::<SynapseError>() {
            Some(SynapseError::Unauthorized(_)) | Some(SynapseError::NotAuthenticated) => {
                Gate::Redirect(RedirectReason::SessionExpired)
            }
            _ => Gate::Redirect(RedirectReason::ProfileUnavailable(user_message(
                &e,
                "Failed to get profile",
            ))),
        },
    }
}
