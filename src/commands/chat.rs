//! Interactive chat about an analysed website.
//!
//! Loads the conversation, prints the initial analysis and the transcript,
//! and runs a readline loop. Each question goes through
//! [`ChatSession`](crate::views::ChatSession): it is shown immediately and
//! withdrawn again if the backend fails to answer.

use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{Config as EditorConfig, DefaultEditor};

use crate::client::{Clients, ConversationBackend};
use crate::commands::special_commands::{self, parse_special_command, SpecialCommand};
use crate::commands::{format_time, history, require_session, surface};
use crate::config::Config;
use crate::error::{Result, SynapseError};
use crate::models::{Conversation, Message, MessageKind};
use crate::views::{ChatSession, ExchangeOutcome, Submission};

/// Start interactive chat on conversation `id`
///
/// `id` may be a unique prefix of a conversation id.
pub async fn run_chat(config: &Config, clients: &Clients, id: &str) -> Result<()> {
    let user = require_session(&clients.auth).await?;
    tracing::info!("Starting chat for {}", user.email);

    let id = history::resolve_id(clients, id).await?;
    println!("{}", "Loading conversation...".dimmed());
    let conversation = clients
        .api
        .get_conversation(&id)
        .await
        .map_err(|e| surface(e, "Failed to load conversation"))?;

    let show_timestamps = config.chat.show_timestamps;
    let mut session = ChatSession::new(conversation);

    let editor_config = EditorConfig::builder()
        .max_history_size(config.chat.history_size)?
        .auto_add_history(false)
        .build();
    let mut rl = DefaultEditor::with_config(editor_config)?;

    print_header(session.conversation());
    print_transcript(session.transcript(), show_timestamps);
    println!("Type '/help' for available commands, 'exit' to quit\n");

    loop {
        let prompt = format!("{} ", "you>".blue().bold());
        let line = match rl.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) => {
                println!("CTRL-C");
                break;
            }
            Err(ReadlineError::Eof) => {
                println!("CTRL-D");
                break;
            }
            Err(err) => {
                tracing::error!("Readline error: {:?}", err);
                break;
            }
        };

        match parse_special_command(&line) {
            Ok(SpecialCommand::None) => {}
            Ok(SpecialCommand::Help) => {
                special_commands::print_help();
                continue;
            }
            Ok(SpecialCommand::Summary) => {
                print_summary(session.conversation());
                continue;
            }
            Ok(SpecialCommand::Transcript) => {
                print_transcript(session.transcript(), show_timestamps);
                continue;
            }
            Ok(SpecialCommand::Refresh) => {
                match clients.api.get_conversation(&id).await {
                    Ok(conv) => {
                        session = ChatSession::new(conv);
                        print_transcript(session.transcript(), show_timestamps);
                    }
                    Err(e) => eprintln!(
                        "{}",
                        surface(e, "Failed to load conversation").to_string().red()
                    ),
                }
                continue;
            }
            Ok(SpecialCommand::Exit) => break,
            Err(e) => {
                eprintln!("{}", e.to_string().red());
                continue;
            }
        }

        let pending = match session.begin(&line) {
            Submission::Rejected(_) => continue,
            Submission::Started(pending) => pending,
        };
        rl.add_history_entry(pending.question.as_str())?;

        println!("{}", "AI is thinking...".dimmed());
        let result = clients
            .api
            .ask_question(&pending.conversation_id, &pending.question)
            .await;

        match session.settle(result) {
            Some(ExchangeOutcome::Answered(answer)) => {
                println!();
                print_message(&answer, show_timestamps);
            }
            Some(ExchangeOutcome::Failed(error)) => {
                eprintln!("{}\n", format!("Error: {}", error).red());
                if !clients.auth.is_authenticated() {
                    eprintln!(
                        "{}",
                        "Your session has expired. Run `synapse login` and try again.".yellow()
                    );
                    return Err(SynapseError::NotAuthenticated.into());
                }
            }
            Some(ExchangeOutcome::Rejected(_)) | None => {}
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_header(conv: &Conversation) {
    println!();
    println!("{}", conv.display_title().bold());
    println!("{}", conv.url.dimmed());
    print_summary(conv);
}

fn print_summary(conv: &Conversation) {
    if conv.summary.is_empty() {
        return;
    }
    println!();
    println!("{} {}", "AI".green().bold(), "Initial Analysis".bold());
    println!("{}\n", conv.summary);
}

fn print_transcript(messages: &[Message], show_timestamps: bool) {
    for message in messages {
        print_message(message, show_timestamps);
    }
}

fn print_message(message: &Message, show_timestamps: bool) {
    let who = match message.kind {
        MessageKind::Question => "You".blue().bold(),
        MessageKind::Answer => "AI".green().bold(),
    };
    if show_timestamps {
        println!("{} {}", who, format_time(&message.timestamp).dimmed());
    } else {
        println!("{}", who);
    }
    println!("{}\n", message.content);
}
