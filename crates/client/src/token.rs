//! Bearer token persistence.
//!
//! The token is the only client state that outlives a session. It is stored
//! under the fixed key [`TOKEN_KEY`], read before every request, and removed
//! on logout.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use thiserror::Error;
use tokio::sync::RwLock;

/// Key the token is stored under.
pub const TOKEN_KEY: &str = "token";

/// Errors from reading or writing the token.
#[derive(Debug, Error)]
pub enum TokenStoreError {
    /// Filesystem error.
    #[error("token storage I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The token file exists but is not a JSON object of strings.
    #[error("corrupt token file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Persistent storage for the bearer token.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// The stored token, if any.
    async fn load(&self) -> Result<Option<SecretString>, TokenStoreError>;

    /// Store `token`, replacing any previous one.
    async fn save(&self, token: &SecretString) -> Result<(), TokenStoreError>;

    /// Remove the stored token. Removing a missing token is not an error.
    async fn clear(&self) -> Result<(), TokenStoreError>;
}

/// Token kept in memory only; gone when the process exits.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<SecretString>>,
}

impl MemoryTokenStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store already holding `token`.
    #[must_use]
    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(SecretString::from(token.into()))),
        }
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<SecretString>, TokenStoreError> {
        Ok(self.token.read().await.clone())
    }

    async fn save(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        *self.token.write().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        *self.token.write().await = None;
        Ok(())
    }
}

/// Token persisted to a small JSON file: `{"token": "..."}`.
///
/// Other keys in the file are preserved on save and clear.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    /// Store the token at `path`. The file is created on first save.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Location of the token file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_entries(&self) -> Result<BTreeMap<String, String>, TokenStoreError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Ok(BTreeMap::new()),
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| TokenStoreError::Corrupt {
                path: self.path.clone(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(BTreeMap::new()),
            Err(source) => Err(self.io_error(source)),
        }
    }

    async fn write_entries(
        &self,
        entries: &BTreeMap<String, String>,
    ) -> Result<(), TokenStoreError> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|source| self.io_error(source))?;
        }

        let bytes = serde_json::to_vec_pretty(entries).map_err(|source| TokenStoreError::Corrupt {
            path: self.path.clone(),
            source,
        })?;
        tokio::fs::write(&self.path, bytes)
            .await
            .map_err(|source| self.io_error(source))
    }

    fn io_error(&self, source: std::io::Error) -> TokenStoreError {
        TokenStoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

#[async_trait]
impl TokenStore for FileTokenStore {
    async fn load(&self) -> Result<Option<SecretString>, TokenStoreError> {
        let mut entries = self.read_entries().await?;
        Ok(entries
            .remove(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .map(SecretString::from))
    }

    async fn save(&self, token: &SecretString) -> Result<(), TokenStoreError> {
        let mut entries = self.read_entries().await?;
        entries.insert(TOKEN_KEY.to_owned(), token.expose_secret().to_owned());
        self.write_entries(&entries).await
    }

    async fn clear(&self) -> Result<(), TokenStoreError> {
        let mut entries = match self.read_entries().await {
            Ok(entries) => entries,
            // A corrupt file holds no usable token; replace it.
            Err(TokenStoreError::Corrupt { .. }) => BTreeMap::new(),
            Err(e) => return Err(e),
        };
        if entries.remove(TOKEN_KEY).is_none() && entries.is_empty() {
            return match tokio::fs::remove_file(&self.path).await {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
                Err(source) => Err(self.io_error(source)),
            };
        }
        self.write_entries(&entries).await
    }
}
