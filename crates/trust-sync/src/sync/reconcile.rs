//! The acceptance state machine.
//!
//! `evaluate` asks the store for a status and mirrors it into the live
//! identity. Key material is only adopted when the peer is not rejected.
//! `accept_remote` and `reject_remote` are administrative overrides that
//! move the persisted record between buckets. Pending is never forced.

use crate::error::Result;
use crate::identity::remote::fingerprint;
use crate::identity::{Acceptance, RemoteIdentity};
use crate::schema::{self, Record, RemoteRecord};
use crate::store::{KeyStore, RemoteKeyData};

use super::TrustSync;

impl<S: KeyStore> TrustSync<S> {
    /// Decide the acceptance status of `remote` presenting these keys.
    ///
    /// Unless the result is rejected, non-empty keys that differ from the
    /// held ones replace them. The acceptance is recorded either way.
    ///
    /// # Errors
    ///
    /// Propagates store failures and unknown status codes; `remote` is left
    /// untouched in that case.
    pub fn evaluate(
        &self,
        remote: &mut RemoteIdentity,
        verify_key_hex: &str,
        public_key_hex: &str,
    ) -> Result<Acceptance> {
        let name = remote.name().to_string();
        self.locks
            .with_name(&name, || self.evaluate_locked(remote, verify_key_hex, public_key_hex))
    }

    /// [`evaluate`](Self::evaluate) followed by [`dump_remote`](Self::dump_remote)
    /// as one unit under the peer's name lock.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn evaluate_and_dump(
        &self,
        remote: &mut RemoteIdentity,
        verify_key_hex: &str,
        public_key_hex: &str,
    ) -> Result<Acceptance> {
        let name = remote.name().to_string();
        self.locks.with_name(&name, || -> Result<Acceptance> {
            let status = self.evaluate_locked(remote, verify_key_hex, public_key_hex)?;
            self.dump_remote_locked(remote)?;
            Ok(status)
        })
    }

    /// Persist the canonical record of `remote`.
    ///
    /// The record is written through the store's status evaluator. A name
    /// the store did not hold before lands in the bucket matching the held
    /// acceptance, whatever the store's own policy filed it as. A known name
    /// filed as pending is moved to accepted or rejected if that is what is
    /// held; otherwise the store's bucket stands. Returns `Ok(false)`
    /// without writing when the record fails the schema check.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn dump_remote(&self, remote: &RemoteIdentity) -> Result<bool> {
        self.locks
            .with_name(remote.name(), || self.dump_remote_locked(remote))
    }

    /// Persist a remote record supplied as a raw JSON object.
    ///
    /// Returns `Ok(false)` without writing when the record's field set is
    /// not exactly the remote identity fields.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::InvalidFileFormat` when a field has the wrong
    /// type, and propagates store failures.
    pub fn dump_remote_record(&self, record: &Record) -> Result<bool> {
        let Some(record) = self.checked_remote(record)? else {
            return Ok(false);
        };
        self.locks.with_name(&record.name, || -> Result<bool> {
            self.persist_remote(&record)?;
            Ok(true)
        })
    }

    /// Find the persisted record for `remote`'s name in any bucket.
    ///
    /// Buckets are searched accepted, pending, rejected; the first hit wins.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn load_remote(&self, remote: &RemoteIdentity) -> Result<Option<RemoteIdentity>> {
        for bucket in Acceptance::ALL {
            if let Some(data) = self.store.read_remote(remote.name(), bucket)? {
                return Ok(Some(canonical(data, bucket).into_identity()));
            }
        }
        Ok(None)
    }

    /// Force `remote` to accepted and move its record into the accepted
    /// bucket, out of rejected if it sits there.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn accept_remote(&self, remote: &mut RemoteIdentity) -> Result<()> {
        let name = remote.name().to_string();
        self.locks.with_name(&name, || self.accept_locked(remote))
    }

    /// Force `remote` to rejected and move its record into the rejected
    /// bucket, out of accepted if it sits there.
    ///
    /// # Errors
    ///
    /// Propagates store failures.
    pub fn reject_remote(&self, remote: &mut RemoteIdentity) -> Result<()> {
        let name = remote.name().to_string();
        self.locks.with_name(&name, || self.reject_locked(remote))
    }

    /// Does nothing. Pending is only reached through [`evaluate`](Self::evaluate),
    /// so an earlier accept or reject decision is never masked.
    pub fn pend_remote(&self, _remote: &mut RemoteIdentity) -> Result<()> {
        Ok(())
    }

    /// Does nothing. Persisted trust records outlive in-memory cache eviction.
    pub fn clear_remote(&self, _remote: &RemoteIdentity) -> Result<()> {
        Ok(())
    }

    // ── Lock-held bodies ──────────────────────────────────────────────────────

    fn evaluate_locked(
        &self,
        remote: &mut RemoteIdentity,
        verify_key_hex: &str,
        public_key_hex: &str,
    ) -> Result<Acceptance> {
        let code = self.store.evaluate_status(
            remote.name(),
            remote.uid(),
            public_key_hex,
            verify_key_hex,
        )?;
        let status = Acceptance::try_from(code)?;

        if status == Acceptance::Rejected {
            self.console.info(&format!(
                "{} ({}) rejected; presented verify key {} not adopted",
                remote.name(),
                remote.uid(),
                fingerprint(verify_key_hex)
            ));
        } else {
            if !verify_key_hex.is_empty() && verify_key_hex != remote.verify_key_hex() {
                remote.set_verify_key_hex(verify_key_hex);
            }
            if !public_key_hex.is_empty() && public_key_hex != remote.public_key_hex() {
                remote.set_public_key_hex(public_key_hex);
            }
            self.console.debug(&format!(
                "{} ({}) evaluated {status}, verify key {}",
                remote.name(),
                remote.uid(),
                remote.fingerprint()
            ));
        }
        remote.set_acceptance(status);
        Ok(status)
    }

    pub(super) fn dump_remote_locked(&self, remote: &RemoteIdentity) -> Result<bool> {
        let Some(record) = self.checked_remote(&RemoteRecord::from(remote).to_record()?)? else {
            return Ok(false);
        };
        self.persist_remote(&record)?;
        Ok(true)
    }

    /// Parse `record` if it passes the schema check, `None` if it does not.
    fn checked_remote(&self, record: &Record) -> Result<Option<RemoteRecord>> {
        if !schema::validate_remote(record) {
            self.console.warn(&format!(
                "remote record with fields {:?} failed schema check; not persisted",
                record.keys().collect::<Vec<_>>()
            ));
            return Ok(None);
        }
        RemoteRecord::from_record(record.clone()).map(Some)
    }

    fn persist_remote(&self, record: &RemoteRecord) -> Result<()> {
        let known = self.held_bucket(&record.name)?.is_some();

        let code = self.store.evaluate_status(
            &record.name,
            record.uid,
            &record.public_key_hex,
            &record.verify_key_hex,
        )?;
        let filed = Acceptance::try_from(code)?;

        match (filed, record.acceptance) {
            (filed, held) if filed == held => {}
            (_, Acceptance::Accepted) if !known || filed == Acceptance::Pending => {
                self.store.move_to_accepted(&record.name, true)?;
            }
            (_, Acceptance::Rejected) if !known || filed == Acceptance::Pending => {
                self.store.move_to_rejected(&record.name, true)?;
            }
            (_, Acceptance::Pending) if !known => {
                self.store.move_to_pending(&record.name)?;
            }
            (filed, held) => {
                self.console.info(&format!(
                    "{} ({}) held as {held} but stored as {filed}; store kept",
                    record.name, record.uid
                ));
            }
        }
        Ok(())
    }

    /// Bucket currently holding `name`, if any.
    fn held_bucket(&self, name: &str) -> Result<Option<Acceptance>> {
        for bucket in Acceptance::ALL {
            if self.store.read_remote(name, bucket)?.is_some() {
                return Ok(Some(bucket));
            }
        }
        Ok(None)
    }

    pub(super) fn accept_locked(&self, remote: &mut RemoteIdentity) -> Result<()> {
        remote.set_acceptance(Acceptance::Accepted);
        self.store.move_to_accepted(remote.name(), true)?;
        self.console
            .info(&format!("{} ({}) accepted", remote.name(), remote.uid()));
        Ok(())
    }

    pub(super) fn reject_locked(&self, remote: &mut RemoteIdentity) -> Result<()> {
        remote.set_acceptance(Acceptance::Rejected);
        self.store.move_to_rejected(remote.name(), true)?;
        self.console
            .info(&format!("{} ({}) rejected", remote.name(), remote.uid()));
        Ok(())
    }
}

/// Translate a physical key record found in `bucket` to canonical form.
pub(crate) fn canonical(data: RemoteKeyData, bucket: Acceptance) -> RemoteRecord {
    RemoteRecord {
        uid: data.uid,
        name: data.name,
        acceptance: bucket,
        verify_key_hex: data.verify,
        public_key_hex: data.public,
    }
}
