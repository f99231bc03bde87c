use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use serde_json::{json, Value};
use tempfile::TempDir;

use synapse::client::Clients;
use synapse::config::{ApiConfig, Config};
use synapse::session::{MemoryTokenStore, TokenStore};

#[allow(dead_code)]
pub const TOKEN: &str = "tok-abc123";

#[allow(dead_code)]
pub const CONVERSATION_ID: &str = "64b7f0c2a1e4d3b2c1a09f8e";

/// Clients pointed at a mock server, sharing the returned token store
#[allow(dead_code)]
pub fn clients_for(base_url: &str, store: MemoryTokenStore) -> (Clients, Arc<dyn TokenStore>) {
    let config = Config {
        api: ApiConfig {
            base_url: base_url.to_string(),
            timeout_seconds: 5,
        },
        ..Config::default()
    };
    let tokens: Arc<dyn TokenStore> = Arc::new(store);
    let clients =
        Clients::with_store(&config, Arc::clone(&tokens)).expect("failed to build clients");
    (clients, tokens)
}

#[allow(dead_code)]
pub fn user_json(verified: bool) -> Value {
    json!({
        "id": "u-1",
        "fullName": "Ada Lovelace",
        "email": "ada@example.com",
        "isEmailVerified": verified
    })
}

#[allow(dead_code)]
pub fn conversation_json(id: &str, messages: Value) -> Value {
    json!({
        "_id": id,
        "url": "https://blog.example.com",
        "websiteTitle": "Example Blog",
        "summary": "A blog about examples.",
        "createdAt": "2024-05-01T10:00:00Z",
        "messages": messages
    })
}

#[allow(dead_code)]
pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
