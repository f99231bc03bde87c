//! Command-line interface definition for Synapse
//!
//! This module defines the CLI structure using clap's derive API. Each
//! subcommand corresponds to one view of the service: dashboard (analyze),
//! history, chat, profile and the authentication screens.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Synapse - analyse websites and chat about them
#[derive(Parser, Debug, Clone)]
#[command(name = "synapse")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides config and SYNAPSE_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands for Synapse
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Create an account and log in
    Register {
        /// Full name
        #[arg(short, long)]
        name: String,

        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(long, env = "SYNAPSE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Log in with email and password
    Login {
        /// Email address
        #[arg(short, long)]
        email: String,

        /// Password
        #[arg(long, env = "SYNAPSE_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Forget the stored session
    Logout,

    /// Confirm an email address
    VerifyEmail {
        /// Verification token, or the full link from the email
        link: String,
    },

    /// Send the verification email again
    ResendVerification {
        /// Address to send to (defaults to the signed-in user's)
        #[arg(short, long)]
        email: Option<String>,
    },

    /// Show the signed-in user's profile
    Profile {
        /// Request a new verification email if unverified
        #[arg(long)]
        resend: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show who is signed in and where to go next
    Whoami,

    /// Analyse a website
    Analyze {
        /// Website URL (https:// is assumed when no scheme is given)
        url: String,

        /// Render JavaScript before analysing
        #[arg(short = 'j', long)]
        javascript: bool,

        /// Start chatting about the site right after the analysis
        #[arg(long)]
        chat: bool,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Browse past conversations
    History {
        /// History subcommand
        #[command(subcommand)]
        command: HistoryCommand,
    },

    /// Chat about an analysed website
    Chat {
        /// Conversation ID (or a unique prefix of one)
        id: String,
    },

    /// Check that the backend is reachable
    Health,
}

/// History management subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum HistoryCommand {
    /// List conversations
    List {
        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show one conversation with its transcript
    Show {
        /// Conversation ID (or a unique prefix of one)
        id: String,
    },

    /// Delete a conversation
    Delete {
        /// Conversation ID (or a unique prefix of one)
        id: String,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self {
            config: None,
            api_url: None,
            verbose: false,
            command: Commands::Whoami,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default() {
        let cli = Cli::default();
        assert!(cli.config.is_none());
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Whoami));
    }

    #[test]
    fn test_cli_parse_login() {
        let cli =
            Cli::try_parse_from(["synapse", "login", "--email", "a@b.c", "--password", "pw"])
                .unwrap();
        if let Commands::Login { email, password } = cli.command {
            assert_eq!(email, "a@b.c");
            assert_eq!(password, "pw");
        } else {
            panic!("Expected Login command");
        }
    }

    #[test]
    fn test_cli_parse_register() {
        let cli = Cli::try_parse_from([
            "synapse",
            "register",
            "--name",
            "Ada Lovelace",
            "--email",
            "ada@example.com",
            "--password",
            "secret",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Register { .. }));
    }

    #[test]
    fn test_cli_parse_analyze_flags() {
        let cli =
            Cli::try_parse_from(["synapse", "analyze", "example.com", "-j", "--chat"]).unwrap();
        if let Commands::Analyze {
            url,
            javascript,
            chat,
            json,
        } = cli.command
        {
            assert_eq!(url, "example.com");
            assert!(javascript);
            assert!(chat);
            assert!(!json);
        } else {
            panic!("Expected Analyze command");
        }
    }

    #[test]
    fn test_cli_parse_history_delete() {
        let cli = Cli::try_parse_from(["synapse", "history", "delete", "64f0c"]).unwrap();
        if let Commands::History {
            command: HistoryCommand::Delete { id },
        } = cli.command
        {
            assert_eq!(id, "64f0c");
        } else {
            panic!("Expected History Delete command");
        }
    }

    #[test]
    fn test_cli_parse_chat() {
        let cli = Cli::try_parse_from(["synapse", "chat", "abc"]).unwrap();
        assert!(matches!(cli.command, Commands::Chat { id } if id == "abc"));
    }

    #[test]
    fn test_cli_global_api_url_after_subcommand() {
        let cli =
            Cli::try_parse_from(["synapse", "health", "--api-url", "http://x:1"]).unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://x:1"));
    }

    #[test]
    fn test_cli_chat_requires_id() {
        assert!(Cli::try_parse_from(["synapse", "chat"]).is_err());
    }

    #[test]
    fn test_cli_parse_verify_email() {
        let cli = Cli::try_parse_from([
            "synapse",
            "verify-email",
            "https://app.example.com/verify-email?token=abc",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::VerifyEmail { .. }));
    }
}
