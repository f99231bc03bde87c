//! Backend reachability check

use colored::Colorize;

use crate::client::Clients;
use crate::commands::surface;
use crate::error::Result;

/// Ping the backend and print its status message
pub async fn check_health(clients: &Clients, base_url: &str) -> Result<()> {
    let message = clients
        .api
        .health_check()
        .await
        .map_err(|e| surface(e, &format!("Backend at {} is not reachable", base_url)))?;

    println!("{} {}", "OK".green().bold(), base_url);
    if !message.is_empty() {
        println!("{}", message);
    }
    Ok(())
}
