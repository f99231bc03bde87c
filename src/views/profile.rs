//! Account profile

use crate::client::AuthClient;
use crate::error::{Result, SynapseError};
use crate::models::User;

/// Profile of the signed-in user
#[derive(Debug, Clone)]
pub struct ProfileView {
    user: User,
}

impl ProfileView {
    /// Wrap a user returned by the session gate
    pub fn new(user: User) -> Self {
        Self { user }
    }

    /// The user being shown
    pub fn user(&self) -> &User {
        &self.user
    }

    /// Human-readable verification status
    pub fn verification_status(&self) -> &'static str {
        if self.user.is_email_verified {
            "Verified"
        } else {
            "Not verified"
        }
    }

    /// Whether a verification email can be requested
    pub fn can_resend(&self) -> bool {
        !self.user.is_email_verified
    }

    /// Request a new verification email for this user's address
    pub async fn resend_verification(&self, auth: &AuthClient) -> Result<String> {
        if !self.can_resend() {
            return Err(
                SynapseError::InvalidInput("Email is already verified".to_string()).into(),
            );
        }
        auth.resend_verification(&self.user.email).await
    }
}
