//! The locally stored bearer token.
//!
//! The token is kept in a file next to the config, readable only by the
//! current user. Nothing else about the session is persisted: expiry and
//! renewal are left to the backend, which answers `401` once a token stops
//! being valid.

use std::path::{Path, PathBuf};

use agency_api::Token;
use color_eyre::{Result, eyre::Context};
use tracing::{debug, instrument, warn};

/// Reads and writes the stored token.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TokenStore {
    path: PathBuf,
}

impl TokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The stored token, if there is one.
    ///
    /// A file that exists but holds no token is treated as no token.
    #[instrument]
    pub async fn load(&self) -> Result<Option<Token>> {
        let content = match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(err).with_context(|| format!("read token file: {:?}", self.path));
            }
        };
        match Token::new(&content) {
            Ok(token) => Ok(Some(token)),
            Err(err) => {
                warn!(path = ?self.path, %err, "ignoring stored token");
                Ok(None)
            }
        }
    }

    /// Store the token, replacing any previous one.
    #[instrument]
    pub async fn save(&self, token: &Token) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("create dir: {dir:?}"))?;
        }

        let mut options = tokio::fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        options.mode(0o600);

        let mut file = options
            .open(&self.path)
            .await
            .with_context(|| format!("open token file: {:?}", self.path))?;
        tokio::io::AsyncWriteExt::write_all(&mut file, token.expose().as_bytes())
            .await
            .with_context(|| format!("write token file: {:?}", self.path))?;

        // `mode` only applies when the file is created.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt as _;
            let permissions = std::fs::Permissions::from_mode(0o600);
            tokio::fs::set_permissions(&self.path, permissions)
                .await
                .with_context(|| format!("restrict token file: {:?}", self.path))?;
        }

        debug!(path = ?self.path, "stored token");
        Ok(())
    }

    /// Remove the stored token. Returns whether there was one.
    #[instrument]
    pub async fn clear(&self) -> Result<bool> {
        match tokio::fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = ?self.path, "removed token");
                Ok(true)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("remove token file: {:?}", self.path)),
        }
    }
}
