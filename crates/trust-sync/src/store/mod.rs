//! Key store capability and its filesystem implementations.
//!
//! [`KeyStore`] is the physical layer under the trust reconciler: it lists,
//! reads, writes, moves and deletes key records per acceptance bucket, and it
//! owns the status decision for freshly observed key material.
//!
//! # Modules
//!
//! - [`file_store`]: [`FileKeyStore`], one JSON file per peer per bucket.
//! - [`transport_keep`]: the transport layer's own estate files, cleared on
//!   full reset.

pub mod file_store;
pub mod transport_keep;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, TrustError};
use crate::identity::Acceptance;

pub use file_store::FileKeyStore;
pub use transport_keep::{DirTransportKeep, TransportKeep};

// ── Physical records ──────────────────────────────────────────────────────────

/// Local key file contents, `{"priv": .., "sign": ..}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct LocalKeyData {
    #[serde(rename = "priv")]
    pub private: String,
    #[serde(rename = "sign")]
    pub signing: String,
}

/// Remote key file contents, `{"minion_id", "device_id", "verify", "pub"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteKeyData {
    #[serde(rename = "minion_id")]
    pub name: String,
    #[serde(rename = "device_id")]
    pub uid: u64,
    pub verify: String,
    #[serde(rename = "pub")]
    pub public: String,
}

impl RemoteKeyData {
    /// `true` if every presented key equals the stored one. An empty
    /// presented key is not supplied and matches anything.
    pub fn keys_match(&self, public_key_hex: &str, verify_key_hex: &str) -> bool {
        (public_key_hex.is_empty() || self.public == public_key_hex)
            && (verify_key_hex.is_empty() || self.verify == verify_key_hex)
    }
}

// ── KeyStore ──────────────────────────────────────────────────────────────────

/// Bucketed key storage used by [`crate::sync::TrustSync`].
///
/// Implementations must be safe to call from several threads at once for
/// distinct peer names. Serializing work on the same name is the caller's job.
pub trait KeyStore: Send + Sync {
    /// Read the local key pair, `None` if none has been written.
    fn read_local(&self) -> Result<Option<LocalKeyData>>;

    /// Overwrite the local key pair.
    fn write_local(&self, private_key_hex: &str, signing_key_hex: &str) -> Result<()>;

    /// Decide the raw acceptance code for a peer presenting these keys.
    ///
    /// A name seen for the first time is recorded as a side effect, in the
    /// bucket matching the returned code, once both keys are supplied. An
    /// empty key means "not supplied".
    fn evaluate_status(
        &self,
        name: &str,
        uid: u64,
        public_key_hex: &str,
        verify_key_hex: &str,
    ) -> Result<u8>;

    /// Read the record for `name` from one bucket.
    fn read_remote(&self, name: &str, bucket: Acceptance) -> Result<Option<RemoteKeyData>>;

    /// Names held in every bucket. Order within a bucket is unspecified.
    fn list_keys(&self) -> Result<HashMap<Acceptance, Vec<String>>>;

    /// Delete every remote record in every bucket.
    fn delete_all_remote(&self) -> Result<()>;

    /// Delete the record for `name` from whichever bucket holds it.
    fn delete_remote(&self, name: &str) -> Result<()>;

    /// Move a pending record into accepted, or a rejected one too when allowed.
    fn move_to_accepted(&self, name: &str, include_rejected: bool) -> Result<()>;

    /// Move a pending record into rejected, or an accepted one too when allowed.
    fn move_to_rejected(&self, name: &str, include_accepted: bool) -> Result<()>;

    /// Move an accepted or rejected record back into pending.
    ///
    /// Only used to place a record the store filed moments ago under its own
    /// policy; never to undo an earlier decision.
    fn move_to_pending(&self, name: &str) -> Result<()>;
}

/// Check that `name` is usable as a single file name.
///
/// # Errors
///
/// Returns `TrustError::InvalidName` for empty names, names starting with a
/// dot, and names containing path separators or NUL.
pub fn check_name(name: &str) -> Result<()> {
    let bad = name.is_empty()
        || name.starts_with('.')
        || name.contains(['/', '\\', '\0']);
    if bad {
        return Err(TrustError::InvalidName(name.to_string()));
    }
    Ok(())
}
