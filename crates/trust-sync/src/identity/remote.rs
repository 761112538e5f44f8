//! A remote peer's trust record as held in memory.
//!
//! The transport layer owns the value and may rename it; key material and
//! acceptance are changed only by [`crate::sync::TrustSync`].

use sha2::{Digest, Sha256};

use super::Acceptance;

/// Live view of a peer's identity and acceptance status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteIdentity {
    uid: u64,
    name: String,
    acceptance: Acceptance,
    verify_key_hex: String,
    public_key_hex: String,
}

impl RemoteIdentity {
    /// A freshly sighted peer. Starts out pending.
    pub fn new(
        uid: u64,
        name: impl Into<String>,
        verify_key_hex: impl Into<String>,
        public_key_hex: impl Into<String>,
    ) -> Self {
        Self::from_parts(
            uid,
            name,
            Acceptance::Pending,
            verify_key_hex,
            public_key_hex,
        )
    }

    /// Rebuild an identity from all of its parts, e.g. from a persisted record.
    pub fn from_parts(
        uid: u64,
        name: impl Into<String>,
        acceptance: Acceptance,
        verify_key_hex: impl Into<String>,
        public_key_hex: impl Into<String>,
    ) -> Self {
        Self {
            uid,
            name: name.into(),
            acceptance,
            verify_key_hex: verify_key_hex.into(),
            public_key_hex: public_key_hex.into(),
        }
    }

    pub fn uid(&self) -> u64 {
        self.uid
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Change the human-readable name. Follow with
    /// [`crate::sync::TrustSync::replace_remote`] to migrate the record.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn acceptance(&self) -> Acceptance {
        self.acceptance
    }

    pub fn verify_key_hex(&self) -> &str {
        &self.verify_key_hex
    }

    pub fn public_key_hex(&self) -> &str {
        &self.public_key_hex
    }

    /// SHA-256 of the verify key hex, safe to show in logs.
    pub fn fingerprint(&self) -> String {
        fingerprint(&self.verify_key_hex)
    }

    pub(crate) fn set_acceptance(&mut self, acceptance: Acceptance) {
        self.acceptance = acceptance;
    }

    pub(crate) fn set_verify_key_hex(&mut self, verify_key_hex: &str) {
        self.verify_key_hex = verify_key_hex.to_string();
    }

    pub(crate) fn set_public_key_hex(&mut self, public_key_hex: &str) {
        self.public_key_hex = public_key_hex.to_string();
    }
}

/// Hex SHA-256 of a key's hex form.
pub fn fingerprint(key_hex: &str) -> String {
    hex::encode(Sha256::digest(key_hex.as_bytes()))
}
