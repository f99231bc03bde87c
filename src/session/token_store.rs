//! Session token persistence
//!
//! The session token is a single opaque string stored under a fixed key.
//! Three interchangeable stores implement [`TokenStore`]:
//!
//! - [`FileTokenStore`]: a small JSON document in the user's data directory
//! - [`KeyringTokenStore`]: the OS native credential store (Keychain on
//!   macOS, Secret Service on Linux, Windows Credential Manager on Windows)
//! - [`MemoryTokenStore`]: process memory, used by tests and `backend: memory`

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use directories::ProjectDirs;
use serde_json::{Map, Value};

use crate::config::{SessionConfig, TokenBackend};
use crate::error::{Result, SynapseError};

/// Keyring service name the token is filed under
const KEYRING_SERVICE: &str = "synapse";

/// Storage for the session token
///
/// Implementations must treat a missing token as `Ok(None)` and make
/// [`TokenStore::clear`] a no-op when nothing is stored.
pub trait TokenStore: Send + Sync {
    /// Load the stored token, if any
    fn load(&self) -> Result<Option<String>>;

    /// Persist `token`, replacing any previous value
    fn save(&self, token: &str) -> Result<()>;

    /// Remove the stored token
    fn clear(&self) -> Result<()>;

    /// Whether a token is currently stored
    ///
    /// Storage errors count as "no token".
    fn has_token(&self) -> bool {
        matches!(self.load(), Ok(Some(_)))
    }
}

/// Open the store selected by the session configuration
///
/// # Errors
///
/// Returns [`SynapseError::Storage`] when the file store has no explicit
/// path and the data directory cannot be determined.
pub fn open(config: &SessionConfig) -> Result<Arc<dyn TokenStore>> {
    let store: Arc<dyn TokenStore> = match config.backend {
        TokenBackend::File => {
            let path = match &config.token_path {
                Some(p) => p.clone(),
                None => FileTokenStore::default_path()?,
            };
            tracing::debug!("Using file token store at {}", path.display());
            Arc::new(FileTokenStore::new(path, &config.token_key))
        }
        TokenBackend::Keyring => {
            tracing::debug!("Using keyring token store");
            Arc::new(KeyringTokenStore::new(&config.token_key))
        }
        TokenBackend::Memory => Arc::new(MemoryTokenStore::new()),
    };
    Ok(store)
}

// ---------------------------------------------------------------------------
// FileTokenStore
// ---------------------------------------------------------------------------

/// Token store backed by a JSON object on disk
///
/// The file holds `{ "<key>": "<token>" }`. Other keys are preserved so
/// several profiles can share one file.
///
/// # Examples
///
/// ```
/// use synapse::session::token_store::{FileTokenStore, TokenStore};
///
/// let dir = tempfile::tempdir().unwrap();
/// let store = FileTokenStore::new(dir.path().join("session.json"), "synapse_token");
/// store.save("abc").unwrap();
/// assert_eq!(store.load().unwrap().as_deref(), Some("abc"));
/// store.clear().unwrap();
/// assert!(store.load().unwrap().is_none());
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
    key: String,
}

impl FileTokenStore {
    /// Create a store writing to `path` under `key`
    pub fn new<P: Into<PathBuf>>(path: P, key: &str) -> Self {
        Self {
            path: path.into(),
            key: key.to_string(),
        }
    }

    /// `$DATA_DIR/synapse/session.json`
    pub fn default_path() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "synapse", "synapse")
            .ok_or_else(|| SynapseError::Storage("Could not determine data directory".into()))?;
        Ok(proj_dirs.data_dir().join("session.json"))
    }

    /// Location of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_map(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let contents = std::fs::read_to_string(&self.path)?;
        if contents.trim().is_empty() {
            return Ok(Map::new());
        }

        match serde_json::from_str::<Value>(&contents)? {
            Value::Object(map) => Ok(map),
            _ => Err(SynapseError::Storage(format!(
                "Session file {} is not a JSON object",
                self.path.display()
            ))
            .into()),
        }
    }

    fn write_map(&self, map: &Map<String, Value>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(map)?;
        std::fs::write(&self.path, json)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            std::fs::set_permissions(&self.path, std::fs::Permissions::from_mode(0o600))?;
        }

        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<String>> {
        let map = self.read_map()?;
        Ok(map
            .get(&self.key)
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .map(str::to_string))
    }

    fn save(&self, token: &str) -> Result<()> {
        let mut map = self.read_map()?;
        map.insert(self.key.clone(), Value::String(token.to_string()));
        self.write_map(&map)
    }

    fn clear(&self) -> Result<()> {
        let mut map = self.read_map()?;
        if map.remove(&self.key).is_none() {
            return Ok(());
        }

        if map.is_empty() {
            std::fs::remove_file(&self.path)?;
            Ok(())
        } else {
            self.write_map(&map)
        }
    }
}

// ---------------------------------------------------------------------------
// KeyringTokenStore
// ---------------------------------------------------------------------------

/// Token store backed by the OS native keyring
///
/// The token is filed under service `synapse`, account `key`.
#[derive(Debug, Clone)]
pub struct KeyringTokenStore {
    key: String,
}

impl KeyringTokenStore {
    /// Create a store for the given account key
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn entry(&self) -> Result<keyring::Entry> {
        Ok(keyring::Entry::new(KEYRING_SERVICE, &self.key).map_err(SynapseError::Keyring)?)
    }
}

impl TokenStore for KeyringTokenStore {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(SynapseError::Keyring(e).into()),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .map_err(SynapseError::Keyring)?;
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match self.entry()?.delete_password() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(SynapseError::Keyring(e).into()),
        }
    }
}

// ---------------------------------------------------------------------------
// MemoryTokenStore
// ---------------------------------------------------------------------------

/// Token store that lives only as long as the process
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: Mutex<Option<String>>,
}

impl MemoryTokenStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that already holds `token`
    pub fn with_token(token: &str) -> Self {
        Self {
            token: Mutex::new(Some(token.to_string())),
        }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>> {
        self.token
            .lock()
            .map_err(|_| SynapseError::Storage("Token store lock poisoned".to_string()).into())
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<String>> {
        Ok(self.lock()?.clone())
    }

    fn save(&self, token: &str) -> Result<()> {
        *self.lock()? = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.lock()? = None;
        Ok(())
    }
}
