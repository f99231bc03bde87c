//! Authentication client
//!
//! Wraps the `/api/auth/*` endpoints and owns the session token lifecycle:
//! the token is stored after a successful register, login or email
//! verification, and removed on logout or whenever the backend answers 401
//! (the latter is done by the transport).

use std::sync::Arc;

use serde_json::json;

use crate::client::transport::{Auth, HttpTransport};
use crate::error::{Result, SynapseError};
use crate::models::{AuthResponse, MessageResponse, ProfileResponse, User};

/// Client for registration, login and profile calls
#[derive(Clone)]
pub struct AuthClient {
    transport: Arc<HttpTransport>,
}

impl AuthClient {
    /// Create a client on a shared transport
    pub fn new(transport: Arc<HttpTransport>) -> Self {
        Self { transport }
    }

    /// Create an account and start a session
    pub async fn register(
        &self,
        full_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthResponse> {
        let full_name = required(full_name, "Full name is required")?;
        let email = required(email, "Email is required")?;
        if password.is_empty() {
            return Err(SynapseError::InvalidInput("Password is required".to_string()).into());
        }

        let body = json!({ "fullName": full_name, "email": email, "password": password });
        let response: AuthResponse = self
            .transport
            .post(
                &["api", "auth", "register"],
                &body,
                Auth::Anonymous,
                "Registration failed",
            )
            .await?;

        self.store_token(&response.token)?;
        tracing::info!("Registered {}", response.user.email);
        Ok(response)
    }

    /// Log in and start a session
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse> {
        let email = required(email, "Email is required")?;
        if password.is_empty() {
            return Err(SynapseError::InvalidInput("Password is required".to_string()).into());
        }

        let body = json!({ "email": email, "password": password });
        let response: AuthResponse = self
            .transport
            .post(&["api", "auth", "login"], &body, Auth::Anonymous, "Login failed")
            .await?;

        self.store_token(&response.token)?;
        tracing::info!("Logged in as {}", response.user.email);
        Ok(response)
    }

    /// Fetch the signed-in user
    ///
    /// Fails with [`SynapseError::NotAuthenticated`] without touching the
    /// network when no token is stored. A 401 clears the token.
    pub async fn profile(&self) -> Result<User> {
        if !self.is_authenticated() {
            return Err(SynapseError::NotAuthenticated.into());
        }

        let response: ProfileResponse = self
            .transport
            .get(&["api", "auth", "profile"], "Failed to get profile")
            .await?;
        Ok(response.user)
    }

    /// Confirm an email address with the token from the verification link
    ///
    /// The backend answers with a fresh session token, which is stored.
    pub async fn verify_email(&self, token: &str) -> Result<AuthResponse> {
        let token = required(
            token,
            "Invalid verification link. Please check your email for the correct link.",
        )?;

        let response: AuthResponse = self
            .transport
            .post(
                &["api", "auth", "verify-email"],
                &json!({ "token": token }),
                Auth::Bearer,
                "Email verification failed",
            )
            .await?;

        self.store_token(&response.token)?;
        tracing::info!("Verified email for {}", response.user.email);
        Ok(response)
    }

    /// Ask the backend to send the verification email again
    pub async fn resend_verification(&self, email: &str) -> Result<String> {
        let email = required(email, "Email is required")?;

        let response: MessageResponse = self
            .transport
            .post(
                &["api", "auth", "resend-verification"],
                &json!({ "email": email }),
                Auth::Bearer,
                "Failed to resend verification",
            )
            .await?;
        Ok(response.message)
    }

    /// End the session by forgetting the stored token
    pub fn logout(&self) -> Result<()> {
        self.transport.tokens().clear()?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Whether a session token is stored locally
    ///
    /// This does not validate the token with the backend; see
    /// [`crate::session::gate`] for that.
    pub fn is_authenticated(&self) -> bool {
        self.transport.tokens().has_token()
    }

    /// The stored session token, if any
    pub fn token(&self) -> Result<Option<String>> {
        self.transport.tokens().load()
    }

    fn store_token(&self, token: &str) -> Result<()> {
        if token.is_empty() {
            return Err(SynapseError::InvalidResponse("Backend returned an empty token".into()).into());
        }
        self.transport.tokens().save(token)
    }
}

fn required<'a>(value: &'a str, message: &str) -> Result<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        return Err(SynapseError::InvalidInput(message.to_string()).into());
    }
    Ok(value)
}
