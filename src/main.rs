//! Synapse - terminal client for the website-analysis service
//!
//! Main entry point for the `synapse` binary.

use anyhow::Result;
use colored::Colorize;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use synapse::cli::{Cli, Commands};
use synapse::client::Clients;
use synapse::commands;
use synapse::config::Config;
use synapse::error::is_unauthorized;

#[tokio::main]
async fn main() {
    let cli = Cli::parse_args();
    init_tracing(cli.verbose);

    let verbose = cli.verbose;
    if let Err(e) = run(cli).await {
        if verbose {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
        } else {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        if is_unauthorized(&e) {
            eprintln!("Sign in with {}.", "synapse login --email <EMAIL>".cyan());
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = Config::load(&config_path, &cli)?;
    config.validate()?;

    let clients = Clients::from_config(&config)?;

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => {
            tracing::info!("Registering {}", email);
            commands::auth::register(&clients.auth, &name, &email, &password).await
        }
        Commands::Login { email, password } => {
            tracing::info!("Logging in as {}", email);
            commands::auth::login(&clients.auth, &email, &password).await
        }
        Commands::Logout => commands::auth::logout(&clients.auth),
        Commands::VerifyEmail { link } => commands::auth::verify_email(&clients.auth, &link).await,
        Commands::ResendVerification { email } => {
            commands::auth::resend_verification(&clients.auth, email.as_deref()).await
        }
        Commands::Profile { resend, json } => {
            commands::profile::show_profile(&clients, resend, json).await
        }
        Commands::Whoami => commands::profile::whoami(&clients).await,
        Commands::Analyze {
            url,
            javascript,
            chat,
            json,
        } => {
            tracing::info!("Starting analysis of {}", url);
            if javascript {
                tracing::debug!("JavaScript rendering requested");
            }
            commands::dashboard::analyze(&config, &clients, &url, javascript, chat, json).await
        }
        Commands::History { command } => {
            tracing::info!("Starting history command");
            commands::history::handle_history(&clients, command).await
        }
        Commands::Chat { id } => {
            tracing::info!("Starting interactive chat for {}", id);
            commands::chat::run_chat(&config, &clients, &id).await
        }
        Commands::Health => commands::health::check_health(&clients, &config.api.base_url).await,
    }
}

/// Initialize tracing subscriber with environment filter
///
/// Logs go to stderr so command output stays pipeable.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "synapse=debug"
    } else {
        "synapse=warn"
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
