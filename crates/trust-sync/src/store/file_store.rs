//! Filesystem key store.
//!
//! One JSON file per peer, named by the peer's name, inside the bucket
//! directory matching its acceptance:
//!
//! ```text
//! {base_dir}/
//! ├── local.key         {"priv": hex, "sign": hex}
//! ├── pending/
//! │   └── {name}        {"minion_id", "device_id", "verify", "pub"}
//! ├── accepted/
//! │   └── {name}
//! └── rejected/
//!     └── {name}
//! ```
//!
//! Every write goes to a hidden sibling temp file first and is renamed into
//! place, so readers never see a partial record.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::config::TrustConfig;
use crate::error::{Result, TrustError};
use crate::identity::Acceptance;

use super::{check_name, KeyStore, LocalKeyData, RemoteKeyData};

const LOCAL_KEY_FILE: &str = "local.key";

/// Filesystem-backed [`KeyStore`].
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    base_dir: PathBuf,
    auto_accept: bool,
    open_mode: bool,
}

impl FileKeyStore {
    /// Open the store described by `config`.
    ///
    /// Creates the three bucket directories if they do not already exist.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::Io` if any directory cannot be created.
    pub fn open(config: &TrustConfig) -> Result<Self> {
        let base_dir = config.key_directory.clone();
        for bucket in Acceptance::ALL {
            std::fs::create_dir_all(base_dir.join(bucket.as_str()))?;
        }
        Ok(Self {
            base_dir,
            auto_accept: config.auto_accept,
            open_mode: config.open_mode,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    // ── Internal helpers ──────────────────────────────────────────────────────

    fn remote_path(&self, name: &str, bucket: Acceptance) -> PathBuf {
        self.base_dir.join(bucket.as_str()).join(name)
    }

    fn write_remote(&self, bucket: Acceptance, data: &RemoteKeyData) -> Result<()> {
        let json = serde_json::to_vec_pretty(data)
            .map_err(|e| TrustError::SerializationError(e.to_string()))?;
        write_atomic(&self.remote_path(&data.name, bucket), &json)
    }

    fn read_path(&self, path: &Path) -> Result<Option<RemoteKeyData>> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TrustError::Io(e)),
        };
        let data = serde_json::from_slice(&bytes).map_err(|e| {
            TrustError::InvalidFileFormat(format!(
                "failed to parse key file {}: {e}",
                path.display()
            ))
        })?;
        Ok(Some(data))
    }

    /// Move `name` into `target` from the first source bucket holding it.
    /// Copies left in later source buckets are removed.
    fn move_into(&self, name: &str, target: Acceptance, sources: &[Acceptance]) -> Result<()> {
        check_name(name)?;
        let target_path = self.remote_path(name, target);
        let mut moved = false;
        for source in sources {
            let source_path = self.remote_path(name, *source);
            if !source_path.exists() {
                continue;
            }
            if moved {
                remove_if_exists(&source_path)?;
            } else {
                std::fs::rename(&source_path, &target_path)?;
                moved = true;
            }
        }
        Ok(())
    }
}

impl KeyStore for FileKeyStore {
    fn read_local(&self) -> Result<Option<LocalKeyData>> {
        let path = self.base_dir.join(LOCAL_KEY_FILE);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(TrustError::Io(e)),
        };
        let data = serde_json::from_slice(&bytes).map_err(|e| {
            TrustError::InvalidFileFormat(format!("failed to parse local key file: {e}"))
        })?;
        Ok(Some(data))
    }

    fn write_local(&self, private_key_hex: &str, signing_key_hex: &str) -> Result<()> {
        let data = LocalKeyData {
            private: private_key_hex.to_string(),
            signing: signing_key_hex.to_string(),
        };
        let json = serde_json::to_vec_pretty(&data)
            .map_err(|e| TrustError::SerializationError(e.to_string()))?;
        write_atomic(&self.base_dir.join(LOCAL_KEY_FILE), &json)
    }

    fn evaluate_status(
        &self,
        name: &str,
        uid: u64,
        public_key_hex: &str,
        verify_key_hex: &str,
    ) -> Result<u8> {
        check_name(name)?;
        let mut presented = RemoteKeyData {
            name: name.to_string(),
            uid,
            verify: verify_key_hex.to_string(),
            public: public_key_hex.to_string(),
        };

        if self.open_mode {
            // Keys not supplied now are carried over from any stored record.
            for bucket in Acceptance::ALL {
                if let Some(stored) = self.read_remote(name, bucket)? {
                    if presented.verify.is_empty() {
                        presented.verify = stored.verify;
                    }
                    if presented.public.is_empty() {
                        presented.public = stored.public;
                    }
                    break;
                }
            }
            if presented.verify.is_empty() || presented.public.is_empty() {
                return Ok(Acceptance::Accepted.code());
            }
            self.write_remote(Acceptance::Accepted, &presented)?;
            remove_if_exists(&self.remote_path(name, Acceptance::Pending))?;
            remove_if_exists(&self.remote_path(name, Acceptance::Rejected))?;
            return Ok(Acceptance::Accepted.code());
        }

        if self.remote_path(name, Acceptance::Rejected).exists() {
            log::debug!("{name}: key already rejected");
            return Ok(Acceptance::Rejected.code());
        }

        let known = [Acceptance::Accepted, Acceptance::Pending];
        for bucket in known {
            if let Some(stored) = self.read_remote(name, bucket)? {
                if stored.keys_match(public_key_hex, verify_key_hex) {
                    return Ok(bucket.code());
                }
                log::debug!("{name}: keys do not match the {bucket} record");
                return Ok(Acceptance::Rejected.code());
            }
        }

        // Nothing is recorded until both keys are known.
        if presented.verify.is_empty() || presented.public.is_empty() {
            log::debug!("{name}: first sighting without both keys; not recorded");
            return Ok(Acceptance::Pending.code());
        }

        let status = if self.auto_accept {
            Acceptance::Accepted
        } else {
            Acceptance::Pending
        };
        self.write_remote(status, &presented)?;
        Ok(status.code())
    }

    fn read_remote(&self, name: &str, bucket: Acceptance) -> Result<Option<RemoteKeyData>> {
        check_name(name)?;
        self.read_path(&self.remote_path(name, bucket))
    }

    fn list_keys(&self) -> Result<HashMap<Acceptance, Vec<String>>> {
        let mut keys = HashMap::new();
        for bucket in Acceptance::ALL {
            let mut names = Vec::new();
            for entry in std::fs::read_dir(self.base_dir.join(bucket.as_str()))? {
                let entry = entry?;
                if !entry.file_type()?.is_file() {
                    continue;
                }
                let name = entry.file_name().to_string_lossy().into_owned();
                // Temp files from in-flight writes are hidden, and files no
                // peer could be named after are not ours.
                if check_name(&name).is_ok() {
                    names.push(name);
                }
            }
            keys.insert(bucket, names);
        }
        Ok(keys)
    }

    fn delete_all_remote(&self) -> Result<()> {
        for (bucket, names) in self.list_keys()? {
            for name in names {
                remove_if_exists(&self.remote_path(&name, bucket))?;
            }
        }
        Ok(())
    }

    fn delete_remote(&self, name: &str) -> Result<()> {
        check_name(name)?;
        for bucket in Acceptance::ALL {
            remove_if_exists(&self.remote_path(name, bucket))?;
        }
        Ok(())
    }

    fn move_to_accepted(&self, name: &str, include_rejected: bool) -> Result<()> {
        let sources: &[Acceptance] = if include_rejected {
            &[Acceptance::Pending, Acceptance::Rejected]
        } else {
            &[Acceptance::Pending]
        };
        self.move_into(name, Acceptance::Accepted, sources)
    }

    fn move_to_rejected(&self, name: &str, include_accepted: bool) -> Result<()> {
        let sources: &[Acceptance] = if include_accepted {
            &[Acceptance::Pending, Acceptance::Accepted]
        } else {
            &[Acceptance::Pending]
        };
        self.move_into(name, Acceptance::Rejected, sources)
    }

    fn move_to_pending(&self, name: &str) -> Result<()> {
        self.move_into(
            name,
            Acceptance::Pending,
            &[Acceptance::Accepted, Acceptance::Rejected],
        )
    }
}

/// Write `data` to a hidden sibling temp file, then rename it over `path`.
fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let file_name = path
        .file_name()
        .ok_or_else(|| TrustError::Store(format!("not a file path: {}", path.display())))?;
    let tmp_path = path.with_file_name(format!(".{}.tmp", file_name.to_string_lossy()));
    std::fs::write(&tmp_path, data)?;
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

fn remove_if_exists(path: &Path) -> Result<()> {
    match std::fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(TrustError::Io(e)),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
