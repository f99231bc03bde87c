//! Dashboard: analyse a website

use colored::Colorize;

use crate::client::Clients;
use crate::commands::{chat, require_session, surface};
use crate::config::Config;
use crate::error::Result;
use crate::views::DashboardView;

/// Analyse `url`, print the summary and optionally continue in chat
pub async fn analyze(
    config: &Config,
    clients: &Clients,
    url: &str,
    use_javascript: bool,
    start_chat: bool,
    json: bool,
) -> Result<()> {
    let user = require_session(&clients.auth).await?;
    tracing::debug!("Dashboard opened for {}", user.email);

    if !json {
        println!("{}", "Analyzing website...".cyan());
    }

    let mut view = DashboardView::new();
    let analysis = view
        .analyze(&clients.api, url, use_javascript)
        .await
        .map_err(|e| surface(e, "Analysis failed"))?
        .clone();

    if json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
    } else {
        println!();
        println!("{}", "Analysis Complete!".green().bold());
        println!("{} {}", "Title:".bold(), analysis.website_title);
        println!("{} {}", "URL:".bold(), analysis.url);
        println!();
        println!("{}", analysis.summary);
        println!();
    }

    if start_chat {
        return chat::run_chat(config, clients, &analysis.conversation_id).await;
    }

    if !json {
        println!(
            "Ask follow-up questions with {}.",
            format!("synapse chat {}", analysis.conversation_id).cyan()
        );
    }
    Ok(())
}
