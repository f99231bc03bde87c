//! Special commands parser for interactive chat
//!
//! Lines starting with `/` are handled locally instead of being sent as
//! questions. Commands are case-insensitive.

use colored::Colorize;
use thiserror::Error;

/// Errors that can occur when parsing special commands
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Unknown command was entered
    #[error("Unknown command: {0}\n\nType '/help' to see available commands")]
    UnknownCommand(String),
}

/// Special commands available during a chat session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpecialCommand {
    /// Show available commands
    Help,
    /// Print the initial analysis again
    Summary,
    /// Print the whole transcript again
    Transcript,
    /// Reload the conversation from the backend
    Refresh,
    /// Leave the chat
    Exit,
    /// Not a special command; send the line as a question
    None,
}

/// Parse a line of chat input
///
/// # Examples
///
/// ```
/// use synapse::commands::special_commands::{parse_special_command, SpecialCommand};
///
/// assert_eq!(parse_special_command("/EXIT").unwrap(), SpecialCommand::Exit);
/// assert_eq!(parse_special_command("What is this?").unwrap(), SpecialCommand::None);
/// ```
pub fn parse_special_command(input: &str) -> Result<SpecialCommand, CommandError> {
    let trimmed = input.trim();

    if trimmed.eq_ignore_ascii_case("exit") || trimmed.eq_ignore_ascii_case("quit") {
        return Ok(SpecialCommand::Exit);
    }

    if !trimmed.starts_with('/') {
        return Ok(SpecialCommand::None);
    }

    match trimmed.to_lowercase().as_str() {
        "/help" | "/?" => Ok(SpecialCommand::Help),
        "/summary" => Ok(SpecialCommand::Summary),
        "/transcript" | "/history" => Ok(SpecialCommand::Transcript),
        "/refresh" | "/reload" => Ok(SpecialCommand::Refresh),
        "/exit" | "/quit" | "/back" => Ok(SpecialCommand::Exit),
        _ => Err(CommandError::UnknownCommand(trimmed.to_string())),
    }
}

/// Print help for the chat special commands
pub fn print_help() {
    println!();
    println!("{}", "Chat commands".bold());
    println!("  {}        Show this help", "/help".cyan());
    println!("  {}     Show the initial analysis", "/summary".cyan());
    println!("  {}  Show the whole conversation", "/transcript".cyan());
    println!("  {}     Reload the conversation from the server", "/refresh".cyan());
    println!("  {}        Leave the chat (also: exit, Ctrl-D)", "/exit".cyan());
    println!();
    println!("Anything else is sent as a question about the website.");
    println!();
}
