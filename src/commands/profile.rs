//! Profile page and navigation shell

use colored::Colorize;

use crate::client::Clients;
use crate::commands::{print_success, require_session, surface};
use crate::error::Result;
use crate::views::{NavShell, ProfileView};

/// Show the signed-in user's profile
pub async fn show_profile(clients: &Clients, resend: bool, json: bool) -> Result<()> {
    let view = ProfileView::new(require_session(&clients.auth).await?);
    let user = view.user();

    if json {
        println!("{}", serde_json::to_string_pretty(user)?);
    } else {
        println!();
        println!("{}", "Profile".bold());
        println!("  {:<10} {}", "Name:", user.full_name);
        println!("  {:<10} {}", "Email:", user.email);
        let status = if user.is_email_verified {
            view.verification_status().green()
        } else {
            view.verification_status().yellow()
        };
        println!("  {:<10} {}", "Status:", status);
        println!();
    }

    if resend {
        let message = view
            .resend_verification(&clients.auth)
            .await
            .map_err(|e| surface(e, "Failed to send verification email"))?;
        print_success("Verification email sent");
        if !message.is_empty() {
            println!("{}", message);
        }
    } else if view.can_resend() && !json {
        println!(
            "Your email is not verified. Run {} to get a new link.",
            "synapse profile --resend".cyan()
        );
    }

    Ok(())
}

/// Show who is signed in and the available commands
pub async fn whoami(clients: &Clients) -> Result<()> {
    let shell = NavShell::load(&clients.auth).await;

    println!();
    match shell.user() {
        Some(user) => {
            println!(
                "{} {} <{}>",
                format!("[{}]", user.initials()).cyan().bold(),
                user.full_name.bold(),
                user.email
            );
        }
        None => println!("{}", "Not signed in".yellow()),
    }
    println!();

    for link in shell.links() {
        println!("  {:<12} {}", link.label, link.command.cyan());
    }
    println!();
    Ok(())
}
