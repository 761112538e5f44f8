//! Migrating a peer's record after its name changes.

use crate::error::Result;
use crate::identity::{Acceptance, RemoteIdentity};
use crate::store::KeyStore;

use super::TrustSync;

impl<S: KeyStore> TrustSync<S> {
    /// Move the record stored under `old_name` to `remote`'s current name,
    /// keeping its acceptance. Does nothing if the name is unchanged.
    ///
    /// The caller guarantees the new name does not belong to another peer.
    ///
    /// # Errors
    ///
    /// Propagates store failures. The old record is only deleted after the
    /// new one has been written.
    pub fn replace_remote(&self, remote: &mut RemoteIdentity, old_name: &str) -> Result<()> {
        let new_name = remote.name().to_string();
        if new_name == old_name {
            return Ok(());
        }

        self.locks.with_names(&new_name, old_name, || -> Result<()> {
            self.dump_remote_locked(remote)?;
            match remote.acceptance() {
                Acceptance::Accepted => self.accept_locked(remote)?,
                Acceptance::Rejected => self.reject_locked(remote)?,
                Acceptance::Pending => {}
            }
            self.store.delete_remote(old_name)?;
            self.console.info(&format!(
                "{} ({}) renamed from {old_name}",
                new_name,
                remote.uid()
            ));
            Ok(())
        })
    }
}
