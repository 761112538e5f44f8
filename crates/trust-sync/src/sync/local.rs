//! Persistence of the node's own identity.
//!
//! The store holds only the two private keys. The auto-accept flag always
//! comes from configuration, both when dumping and when loading.

use crate::error::{Result, TrustError};
use crate::identity::LocalIdentity;
use crate::schema::{self, LocalRecord, Record};
use crate::store::KeyStore;

use super::TrustSync;

impl<S: KeyStore> TrustSync<S> {
    /// Load the local identity, `None` if the store holds none.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn load_local_identity(&self) -> Result<Option<LocalIdentity>> {
        let Some(data) = self.store.read_local()? else {
            return Ok(None);
        };
        let record = LocalRecord {
            signing_key_hex: data.signing.clone(),
            private_key_hex: data.private.clone(),
            auto_accept: self.auto_accept,
        };
        Ok(Some(record.into_identity()))
    }

    /// Persist the local identity's key pair.
    ///
    /// Returns `Ok(false)` without writing when the canonical record fails
    /// the schema check.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn dump_local_identity(&self, local: &LocalIdentity) -> Result<bool> {
        self.dump_local_record(&LocalRecord::new(local, self.auto_accept).to_record()?)
    }

    /// Persist a local record supplied as a raw JSON object.
    ///
    /// Returns `Ok(false)` without writing when the record's field set is
    /// not exactly the local identity fields.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::InvalidFileFormat` when a field has the wrong
    /// type, and propagates store failures.
    pub fn dump_local_record(&self, record: &Record) -> Result<bool> {
        if !schema::validate_local(record) {
            self.console.warn(&format!(
                "local record with fields {:?} failed schema check; not persisted",
                record.keys().collect::<Vec<_>>()
            ));
            return Ok(false);
        }
        let record: LocalRecord =
            serde_json::from_value(serde_json::Value::Object(record.clone()))
                .map_err(|e| TrustError::InvalidFileFormat(format!("local record: {e}")))?;
        self.store
            .write_local(&record.private_key_hex, &record.signing_key_hex)?;
        self.console.debug("local identity persisted");
        Ok(true)
    }

    /// Does nothing. The node's own keys are only removed by wiping the
    /// store directly.
    pub fn clear_local_identity(&self) -> Result<()> {
        Ok(())
    }
}
