//! The transport layer's own persisted estate data.
//!
//! The transport keeps its local estate and one file per remote estate in a
//! directory of its own, separate from the key store:
//!
//! ```text
//! {base_dir}/
//! ├── local/
//! │   └── {file}.json
//! └── remote/
//!     └── {file}.json
//! ```
//!
//! The trust layer only ever clears this data, during a full reset.

use std::path::{Path, PathBuf};

use crate::error::{Result, TrustError};

const LOCAL_DIR: &str = "local";
const REMOTE_DIR: &str = "remote";

/// Clearing operations on the transport layer's estate store.
pub trait TransportKeep {
    fn clear_local_data(&self) -> Result<()>;

    fn clear_all_remote_data(&self) -> Result<()>;
}

/// Directory-backed [`TransportKeep`].
#[derive(Debug, Clone)]
pub struct DirTransportKeep {
    base_dir: PathBuf,
}

impl DirTransportKeep {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn local_dir(&self) -> PathBuf {
        self.base_dir.join(LOCAL_DIR)
    }

    pub fn remote_dir(&self) -> PathBuf {
        self.base_dir.join(REMOTE_DIR)
    }
}

impl TransportKeep for DirTransportKeep {
    fn clear_local_data(&self) -> Result<()> {
        clear_json_files(&self.local_dir())
    }

    fn clear_all_remote_data(&self) -> Result<()> {
        clear_json_files(&self.remote_dir())
    }
}

/// Remove every `*.json` file in `dir`. A missing directory is already clear.
fn clear_json_files(dir: &Path) -> Result<()> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(()),
        Err(e) => return Err(TrustError::Io(e)),
    };
    for entry in entries {
        let path = entry?.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext == "json") {
            match std::fs::remove_file(&path) {
                Ok(()) => {}
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(TrustError::Io(e)),
            }
        }
    }
    Ok(())
}
