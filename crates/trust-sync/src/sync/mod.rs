//! Trust-state synchronization between live peer identities and the key store.
//!
//! [`TrustSync`] is the entry point the transport layer calls whenever it
//! observes key material for a peer. It decides acceptance through the
//! store's status evaluator, mirrors the outcome into the in-memory
//! [`RemoteIdentity`](crate::identity::RemoteIdentity), and persists
//! canonical records after they pass the schema gate.
//!
//! # Modules
//!
//! - [`local`]: load/dump of the node's own key pair.
//! - [`reconcile`]: the acceptance state machine and explicit transitions.
//! - [`rename`]: migrating a record when a peer's name changes.
//! - [`bulk`]: enumerate and clear all records, full reset.

pub mod bulk;
pub mod local;
mod locks;
pub mod reconcile;
pub mod rename;

use std::sync::Arc;

use crate::config::TrustConfig;
use crate::console::{Console, LogConsole};
use crate::error::Result;
use crate::store::{FileKeyStore, KeyStore};

use locks::NameLocks;

pub use bulk::{clear_all_trust_state, clear_all_trust_state_with};

/// Reconciles peer trust state with a [`KeyStore`].
///
/// Work on the same peer name is serialized; different names proceed
/// concurrently.
pub struct TrustSync<S: KeyStore = FileKeyStore> {
    store: S,
    auto_accept: bool,
    console: Arc<dyn Console>,
    locks: NameLocks,
}

impl TrustSync<FileKeyStore> {
    /// Open a filesystem store from `config`, logging through `log`.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::Io` if the key directory cannot be prepared.
    pub fn open(config: &TrustConfig) -> Result<Self> {
        Self::open_with_console(config, Arc::new(LogConsole))
    }

    /// Open a filesystem store from `config` with an explicit console.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::Io` if the key directory cannot be prepared.
    pub fn open_with_console(config: &TrustConfig, console: Arc<dyn Console>) -> Result<Self> {
        let store = FileKeyStore::open(config)?;
        Ok(Self::new(store, config.auto_accept, console))
    }
}

impl<S: KeyStore> TrustSync<S> {
    pub fn new(store: S, auto_accept: bool, console: Arc<dyn Console>) -> Self {
        Self {
            store,
            auto_accept,
            console,
            locks: NameLocks::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// The configured auto-accept policy flag.
    pub fn auto_accept(&self) -> bool {
        self.auto_accept
    }

    pub fn console(&self) -> &dyn Console {
        self.console.as_ref()
    }
}
