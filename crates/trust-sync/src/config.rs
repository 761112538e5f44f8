//! Trust policy and key directory configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrustError};

/// Settings consumed by the trust layer and its filesystem key store.
///
/// JSON form:
/// ```json
/// { "auto_accept": false, "open_mode": false, "key_directory": "/etc/node/pki" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrustConfig {
    /// Accept first-seen peers without passing through pending.
    #[serde(default)]
    pub auto_accept: bool,
    /// Accept every key and overwrite stored records without comparison.
    #[serde(default)]
    pub open_mode: bool,
    /// Root directory of the key store.
    pub key_directory: PathBuf,
}

impl TrustConfig {
    pub fn new(key_directory: impl Into<PathBuf>) -> Self {
        Self {
            auto_accept: false,
            open_mode: false,
            key_directory: key_directory.into(),
        }
    }

    pub fn with_auto_accept(mut self, auto_accept: bool) -> Self {
        self.auto_accept = auto_accept;
        self
    }

    pub fn with_open_mode(mut self, open_mode: bool) -> Self {
        self.open_mode = open_mode;
        self
    }

    /// Read a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::Io` if the file cannot be read, or
    /// `TrustError::InvalidFileFormat` if it is not a valid configuration.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            TrustError::InvalidFileFormat(format!(
                "failed to parse config file {}: {e}",
                path.display()
            ))
        })
    }
}
