//! Register, login, logout and email verification

use colored::Colorize;

use crate::client::AuthClient;
use crate::commands::{print_success, require_session, surface};
use crate::error::Result;

/// Create an account and start a session
pub async fn register(auth: &AuthClient, name: &str, email: &str, password: &str) -> Result<()> {
    let response = auth
        .register(name, email, password)
        .await
        .map_err(|e| surface(e, "Registration failed"))?;

    print_success(&format!("Welcome, {}!", response.user.full_name));
    if !response.message.is_empty() {
        println!("{}", response.message);
    }
    if !response.user.is_email_verified {
        println!(
            "Check {} for a verification link, then run {}.",
            response.user.email.cyan(),
            "synapse verify-email <LINK>".cyan()
        );
    }
    Ok(())
}

/// Log in and start a session
pub async fn login(auth: &AuthClient, email: &str, password: &str) -> Result<()> {
    let response = auth
        .login(email, password)
        .await
        .map_err(|e| surface(e, "Login failed"))?;

    print_success(&format!("Logged in as {}", response.user.full_name));
    println!("Analyse a site with {}.", "synapse analyze <URL>".cyan());
    Ok(())
}

/// Forget the stored session
pub fn logout(auth: &AuthClient) -> Result<()> {
    auth.logout()?;
    print_success("Logged out");
    Ok(())
}

/// Confirm an email address from a verification token or link
pub async fn verify_email(auth: &AuthClient, link: &str) -> Result<()> {
    let token = extract_verification_token(link).unwrap_or_default();
    let response = auth
        .verify_email(&token)
        .await
        .map_err(|e| surface(e, "Email verification failed"))?;

    print_success("Email verified!");
    if !response.message.is_empty() {
        println!("{}", response.message);
    }
    println!("You are now logged in as {}.", response.user.full_name);
    Ok(())
}

/// Send the verification email again
///
/// Without an explicit address the signed-in user's address is used, which
/// requires a valid session.
pub async fn resend_verification(auth: &AuthClient, email: Option<&str>) -> Result<()> {
    let email = match email {
        Some(e) => e.to_string(),
        None => require_session(auth).await?.email,
    };

    let message = auth
        .resend_verification(&email)
        .await
        .map_err(|e| surface(e, "Failed to send verification email"))?;

    print_success("Verification email sent");
    if !message.is_empty() {
        println!("{}", message);
    }
    Ok(())
}

/// Pull the verification token out of user input
///
/// Accepts either the raw token or the full link from the email (any URL
/// carrying a `token` query parameter). Returns `None` when no token can
/// be found.
///
/// # Examples
///
/// ```
/// use synapse::commands::auth::extract_verification_token;
///
/// assert_eq!(
///     extract_verification_token("https://app.example.com/verify-email?token=abc123").as_deref(),
///     Some("abc123")
/// );
/// assert_eq!(extract_verification_token("abc123").as_deref(), Some("abc123"));
/// assert_eq!(extract_verification_token("https://app.example.com/verify-email"), None);
/// ```
pub fn extract_verification_token(input: &str) -> Option<String> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    match url::Url::parse(input) {
        Ok(link) if link.has_host() => link
            .query_pairs()
            .find(|(k, _)| k == "token")
            .map(|(_, v)| v.into_owned())
            .filter(|v| !v.is_empty()),
        _ => Some(input.to_string()),
    }
}
