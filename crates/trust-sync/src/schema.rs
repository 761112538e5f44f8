//! Canonical record shapes and the field-set gate applied before every dump.
//!
//! A record is valid only when its field set equals the required list
//! exactly. Missing fields and unknown extra fields both fail.

use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{Result, TrustError};
use crate::identity::{Acceptance, LocalIdentity, RemoteIdentity};

/// A record as a JSON object, the unit the validator inspects.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Required fields of a persisted local identity record.
pub const LOCAL_FIELDS: [&str; 3] = ["signing_key_hex", "private_key_hex", "auto_accept"];

/// Required fields of a persisted remote identity record.
pub const REMOTE_FIELDS: [&str; 5] = [
    "uid",
    "name",
    "acceptance",
    "verify_key_hex",
    "public_key_hex",
];

/// `true` iff `record` carries exactly the local identity fields.
pub fn validate_local(record: &Record) -> bool {
    has_exact_fields(record, &LOCAL_FIELDS)
}

/// `true` iff `record` carries exactly the remote identity fields.
pub fn validate_remote(record: &Record) -> bool {
    has_exact_fields(record, &REMOTE_FIELDS)
}

fn has_exact_fields(record: &Record, fields: &[&str]) -> bool {
    record.len() == fields.len() && fields.iter().all(|f| record.contains_key(*f))
}

// ── Canonical records ─────────────────────────────────────────────────────────

/// Canonical local identity record. Zeroized on drop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(deny_unknown_fields)]
pub struct LocalRecord {
    pub signing_key_hex: String,
    pub private_key_hex: String,
    pub auto_accept: bool,
}

impl LocalRecord {
    /// Build the record from live key material and the configured policy flag.
    pub fn new(local: &LocalIdentity, auto_accept: bool) -> Self {
        Self {
            signing_key_hex: local.signing_key_hex().to_string(),
            private_key_hex: local.private_key_hex().to_string(),
            auto_accept,
        }
    }

    pub fn to_record(&self) -> Result<Record> {
        to_record(self)
    }

    pub fn into_identity(self) -> LocalIdentity {
        LocalIdentity::new(
            self.signing_key_hex.as_str(),
            self.private_key_hex.as_str(),
            self.auto_accept,
        )
    }
}

/// Canonical remote identity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RemoteRecord {
    pub uid: u64,
    pub name: String,
    pub acceptance: Acceptance,
    pub verify_key_hex: String,
    pub public_key_hex: String,
}

impl RemoteRecord {
    pub fn to_record(&self) -> Result<Record> {
        to_record(self)
    }

    /// Parse a record that has already passed [`validate_remote`].
    ///
    /// # Errors
    ///
    /// Returns `TrustError::InvalidFileFormat` when the field set is wrong or a
    /// value has the wrong type.
    pub fn from_record(record: Record) -> Result<Self> {
        if !validate_remote(&record) {
            return Err(TrustError::InvalidFileFormat(format!(
                "remote record fields {:?} do not match {:?}",
                record.keys().collect::<Vec<_>>(),
                REMOTE_FIELDS
            )));
        }
        serde_json::from_value(serde_json::Value::Object(record))
            .map_err(|e| TrustError::InvalidFileFormat(format!("remote record: {e}")))
    }

    pub fn into_identity(self) -> RemoteIdentity {
        RemoteIdentity::from_parts(
            self.uid,
            self.name,
            self.acceptance,
            self.verify_key_hex,
            self.public_key_hex,
        )
    }
}

impl From<&RemoteIdentity> for RemoteRecord {
    fn from(remote: &RemoteIdentity) -> Self {
        Self {
            uid: remote.uid(),
            name: remote.name().to_string(),
            acceptance: remote.acceptance(),
            verify_key_hex: remote.verify_key_hex().to_string(),
            public_key_hex: remote.public_key_hex().to_string(),
        }
    }
}

fn to_record<T: Serialize>(value: &T) -> Result<Record> {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::Object(map)) => Ok(map),
        Ok(other) => Err(TrustError::SerializationError(format!(
            "expected an object, got {other}"
        ))),
        Err(e) => Err(TrustError::SerializationError(e.to_string())),
    }
}
