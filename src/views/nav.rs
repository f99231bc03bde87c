//! Navigation shell
//!
//! Shows who is signed in and where the user can go next. It is
//! independent of page content and never fails: any problem looking up
//! the profile renders the signed-out shell.

use crate::client::AuthClient;
use crate::models::User;

/// A link between views
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavLink {
    /// Label shown to the user
    pub label: &'static str,
    /// Command that opens the view
    pub command: &'static str,
}

const SIGNED_IN_LINKS: &[NavLink] = &[
    NavLink {
        label: "Dashboard",
        command: "synapse analyze <URL>",
    },
    NavLink {
        label: "History",
        command: "synapse history list",
    },
    NavLink {
        label: "Profile",
        command: "synapse profile",
    },
    NavLink {
        label: "Logout",
        command: "synapse logout",
    },
];

const SIGNED_OUT_LINKS: &[NavLink] = &[
    NavLink {
        label: "Login",
        command: "synapse login --email <EMAIL>",
    },
    NavLink {
        label: "Get Started",
        command: "synapse register --name <NAME> --email <EMAIL>",
    },
];

/// Identity and links for the current session
#[derive(Debug, Clone, Default)]
pub struct NavShell {
    user: Option<User>,
}

impl NavShell {
    /// Shell for a known user (or none)
    pub fn new(user: Option<User>) -> Self {
        Self { user }
    }

    /// Look up the signed-in user, if any
    pub async fn load(auth: &AuthClient) -> Self {
        if !auth.is_authenticated() {
            return Self::default();
        }

        match auth.profile().await {
            Ok(user) => Self::new(Some(user)),
            Err(e) => {
                tracing::debug!("Rendering signed-out navigation: {}", e);
                Self::default()
            }
        }
    }

    /// The signed-in user
    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    /// Links available in this state
    pub fn links(&self) -> &'static [NavLink] {
        if self.user.is_some() {
            SIGNED_IN_LINKS
        } else {
            SIGNED_OUT_LINKS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_out_links() {
        let shell = NavShell::default();
        assert!(shell.user().is_none());
        let labels: Vec<_> = shell.links().iter().map(|l| l.label).collect();
        assert_eq!(labels, vec!["Login", "Get Started"]);
    }

    #[test]
    fn test_signed_in_links() {
        let shell = NavShell::new(Some(User {
            id: "1".into(),
            full_name: "Ada".into(),
            email: "ada@example.com".into(),
            is_email_verified: true,
        }));
        assert!(shell.links().iter().any(|l| l.label == "History"));
        assert!(shell.links().iter().any(|l| l.command == "synapse logout"));
    }
}
