use colored::Colorize;
use prettytable::{format, Table};

use crate::cli::HistoryCommand;
use crate::client::{Clients, ConversationBackend};
use crate::commands::{format_datetime, print_success, require_session, surface, truncate};
use crate::error::Result;
use crate::models::{Conversation, MessageKind};
use crate::views::HistoryView;

/// Handle history commands
pub async fn handle_history(clients: &Clients, command: HistoryCommand) -> Result<()> {
    require_session(&clients.auth).await?;

    match command {
        HistoryCommand::List { json } => {
            let view = load(clients).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(view.conversations())?);
                return Ok(());
            }

            if view.is_empty() {
                println!("{}", "No conversations yet.".yellow());
                println!("Start one with {}.", "synapse analyze <URL>".cyan());
                return Ok(());
            }

            let mut table = Table::new();
            table.set_format(*format::consts::FORMAT_BORDERS_ONLY);

            table.add_row(prettytable::row![
                "ID".bold(),
                "Title".bold(),
                "URL".bold(),
                "Messages".bold(),
                "Created".bold()
            ]);

            for conv in view.conversations() {
                table.add_row(prettytable::row![
                    conv.id.cyan(),
                    truncate(conv.display_title(), 40),
                    truncate(&conv.url, 40),
                    conv.messages.len(),
                    format_datetime(&conv.created_at)
                ]);
            }

            println!("\nConversation History ({}):", view.len());
            table.printstd();
            println!();
            println!(
                "Use {} to continue a conversation.",
                "synapse chat <ID>".cyan()
            );
            println!();
        }
        HistoryCommand::Show { id } => {
            let id = resolve_id(clients, &id).await?;
            let conv = clients
                .api
                .get_conversation(&id)
                .await
                .map_err(|e| surface(e, "Failed to load conversation"))?;
            print_conversation(&conv);
        }
        HistoryCommand::Delete { id } => {
            let mut view = load(clients).await?;
            let id = view
                .resolve_prefix(&id)
                .map(str::to_string)
                .unwrap_or(id);

            let message = view
                .delete(&clients.api, &id)
                .await
                .map_err(|e| surface(e, "Failed to delete conversation"))?;

            print_success(&format!("Deleted conversation {}", id));
            if !message.is_empty() {
                println!("{}", message);
            }
            println!("{} conversation(s) left.", view.len());
        }
    }

    Ok(())
}

async fn load(clients: &Clients) -> Result<HistoryView> {
    HistoryView::fetch(&clients.api)
        .await
        .map_err(|e| surface(e, "Failed to load conversations"))
}

/// Expand a unique id prefix using the conversation list
///
/// Full ids pass through without listing.
pub(crate) async fn resolve_id(clients: &Clients, id: &str) -> Result<String> {
    // Backend ids are 24 hex chars (MongoDB ObjectId).
    if id.len() >= 24 {
        return Ok(id.to_string());
    }
    let view = HistoryView::load(&clients.api).await;
    Ok(view
        .resolve_prefix(id)
        .map(str::to_string)
        .unwrap_or_else(|| id.to_string()))
}

fn print_conversation(conv: &Conversation) {
    println!();
    println!("{}", conv.display_title().bold());
    println!("{}", conv.url.dimmed());
    println!("Created {}", format_datetime(&conv.created_at));
    println!();
    println!("{}", "Initial Analysis".bold());
    println!("{}", conv.summary);
    println!();

    for message in &conv.messages {
        let who = match message.kind {
            MessageKind::Question => "You".blue().bold(),
            MessageKind::Answer => "AI".green().bold(),
        };
        println!("{} {}", who, format_datetime(&message.timestamp).dimmed());
        println!("{}\n", message.content);
    }
}
