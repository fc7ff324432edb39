//! Credential record and its single-slot file store

use crate::config::timeouts::TOKEN_EXPIRY_MARGIN_SECS;
use crate::error::{SpicyError, SpicyResult};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Current time as epoch seconds
pub fn now_epoch_secs() -> f64 {
    chrono::Utc::now().timestamp_millis() as f64 / 1000.0
}

/// Cached session credential
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenData {
    /// Bearer token for API calls
    pub access_token: String,
    /// Lifetime in seconds as issued by the provider
    pub expires_in: i64,
    pub id_token: String,
    pub refresh_token: String,
    pub scope: String,
    pub token_type: String,
    /// Epoch seconds, stamped locally when the token was received
    pub created_at: f64,
}

impl TokenData {
    /// Usable iff `now - created_at < expires_in - 300`; the boundary itself is expired
    pub fn is_valid_at(&self, now: f64) -> bool {
        now - self.created_at < self.usable_lifetime()
    }

    /// Check validity against the wall clock
    pub fn is_valid(&self) -> bool {
        self.is_valid_at(now_epoch_secs())
    }

    /// Seconds until the record stops being usable (negative once expired)
    pub fn remaining_lifetime(&self) -> i64 {
        let usable_until = self.created_at + self.usable_lifetime();
        (usable_until - now_epoch_secs()).floor() as i64
    }

    fn usable_lifetime(&self) -> f64 {
        self.expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS) as f64
    }
}

impl std::fmt::Debug for TokenData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenData")
            .field("token_type", &self.token_type)
            .field("scope", &self.scope)
            .field("expires_in", &self.expires_in)
            .field("created_at", &self.created_at)
            .finish_non_exhaustive()
    }
}

/// Token storage interface.
///
/// Holds at most one credential. `load` never fails: unreadable or corrupt
/// state is reported as absent so it cannot block a fresh login.
pub trait TokenStorage: Send + Sync {
    /// Persist the credential, replacing any previous one
    fn save(&self, token: &TokenData) -> SpicyResult<()>;

    /// Load the stored credential, if any
    fn load(&self) -> Option<TokenData>;

    /// Remove the stored credential
    fn clear(&self) -> SpicyResult<()>;
}

/// File-based token storage
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Create storage backed by `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Storage at `~/.config/spicychat-api/tokens.json`
    pub fn default_location() -> Self {
        Self::new(crate::config::default_token_file())
    }

    /// Path of the token file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "tokens.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(&self, e: std::io::Error) -> SpicyError {
        SpicyError::io_with_path(e.to_string(), self.path.display().to_string())
    }
}

impl TokenStorage for FileTokenStorage {
    fn save(&self, token: &TokenData) -> SpicyResult<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
            }
        }

        let content = serde_json::to_vec(token)?;
        let temp = self.temp_path();
        let written =
            write_private(&temp, &content).and_then(|()| std::fs::rename(&temp, &self.path));
        if let Err(e) = written {
            let _ = std::fs::remove_file(&temp);
            return Err(self.io_error(e));
        }

        debug!("Saved credential to {}", self.path.display());
        Ok(())
    }

    fn load(&self) -> Option<TokenData> {
        if !self.path.exists() {
            return None;
        }

        let content = match std::fs::read(&self.path) {
            Ok(content) => content,
            Err(e) => {
                warn!("Failed to read token file {}: {}", self.path.display(), e);
                return None;
            }
        };

        match serde_json::from_slice(&content) {
            Ok(token) => Some(token),
            Err(e) => {
                warn!(
                    "Discarding corrupt token file {}: {}",
                    self.path.display(),
                    e
                );
                if let Err(e) = std::fs::remove_file(&self.path) {
                    warn!("Failed to remove corrupt token file: {}", e);
                }
                None
            }
        }
    }

    fn clear(&self) -> SpicyResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(self.io_error(e)),
        }
    }
}

/// Create `path` readable by the owner only, then write `content`
fn write_private(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let mut file = options.open(path)?;
    // mode() only applies on creation; a leftover temp file keeps its bits
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(std::fs::Permissions::from_mode(0o600))?;
    }
    file.write_all(content)?;
    file.sync_all()
}

#[cfg(test)]
pub(crate) fn sample_token(created_at: f64, expires_in: i64) -> TokenData {
    TokenData {
        access_token: "access-abc".to_string(),
        expires_in,
        id_token: "id-abc".to_string(),
        refresh_token: "refresh-abc".to_string(),
        scope: "openid profile email offline".to_string(),
        token_type: "bearer".to_string(),
        created_at,
    }
}
