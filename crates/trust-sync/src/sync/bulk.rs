//! Whole-store operations: enumerate, clear, full reset.

use std::collections::HashMap;
use std::path::Path;

use crate::config::TrustConfig;
use crate::error::Result;
use crate::identity::RemoteIdentity;
use crate::store::{DirTransportKeep, KeyStore, TransportKeep};

use super::reconcile::canonical;
use super::TrustSync;

impl<S: KeyStore> TrustSync<S> {
    /// Every persisted remote identity, keyed by stringified uid.
    ///
    /// Names listed by the store but gone by the time they are read are
    /// skipped.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn load_all_remote_identities(&self) -> Result<HashMap<String, RemoteIdentity>> {
        let mut identities = HashMap::new();
        for (bucket, names) in self.store.list_keys()? {
            for name in names {
                if let Some(data) = self.store.read_remote(&name, bucket)? {
                    let record = canonical(data, bucket);
                    identities.insert(record.uid.to_string(), record.into_identity());
                }
            }
        }
        Ok(identities)
    }

    /// Delete every persisted remote record.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn clear_all_remote_identities(&self) -> Result<()> {
        self.store.delete_all_remote()?;
        self.console.info("all remote identities cleared");
        Ok(())
    }
}

/// Clear the transport keep at `store_directory`, then the trust state
/// described by `config`.
///
/// # Errors
///
/// Stops at and returns the first failure.
pub fn clear_all_trust_state(store_directory: &Path, config: &TrustConfig) -> Result<()> {
    let keep = DirTransportKeep::new(store_directory);
    let sync = TrustSync::open(config)?;
    clear_all_trust_state_with(&keep, &sync)
}

/// Clear transport local, transport remote, trust local and trust remote
/// state, in that order.
///
/// # Errors
///
/// Stops at and returns the first failure.
pub fn clear_all_trust_state_with<K, S>(keep: &K, sync: &TrustSync<S>) -> Result<()>
where
    K: TransportKeep,
    S: KeyStore,
{
    keep.clear_local_data()?;
    keep.clear_all_remote_data()?;
    sync.clear_local_identity()?;
    sync.clear_all_remote_identities()
}
