//! The node's own identity: a signing key and an encryption key.
//!
//! Both keys are carried as hex strings. The signing key is Ed25519, the
//! encryption key is X25519. The auto-accept flag is process-wide policy
//! carried alongside the keys; it is never read back from disk.

use ed25519_dalek::SigningKey;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret};
use zeroize::Zeroize;

use crate::error::{Result, TrustError};

/// The local node's key material plus the auto-accept policy flag.
///
/// Private hex strings are zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct LocalIdentity {
    signing_key_hex: String,
    private_key_hex: String,
    auto_accept: bool,
}

impl LocalIdentity {
    pub fn new(
        signing_key_hex: impl Into<String>,
        private_key_hex: impl Into<String>,
        auto_accept: bool,
    ) -> Self {
        Self {
            signing_key_hex: signing_key_hex.into(),
            private_key_hex: private_key_hex.into(),
            auto_accept,
        }
    }

    /// Generate a fresh identity with random Ed25519 and X25519 keys.
    pub fn generate(auto_accept: bool) -> Self {
        let signing_key = SigningKey::generate(&mut rand::thread_rng());
        let mut signing_bytes = signing_key.to_bytes();
        let signing_key_hex = hex::encode(signing_bytes);
        signing_bytes.zeroize();

        let secret = StaticSecret::random_from_rng(rand::thread_rng());
        let mut secret_bytes = secret.to_bytes();
        let private_key_hex = hex::encode(secret_bytes);
        secret_bytes.zeroize();

        Self {
            signing_key_hex,
            private_key_hex,
            auto_accept,
        }
    }

    pub fn signing_key_hex(&self) -> &str {
        &self.signing_key_hex
    }

    pub fn private_key_hex(&self) -> &str {
        &self.private_key_hex
    }

    pub fn auto_accept(&self) -> bool {
        self.auto_accept
    }

    /// Hex of the Ed25519 verifying key matching the signing key.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::InvalidKey` if the signing key is not 32 bytes of hex.
    pub fn verify_key_hex(&self) -> Result<String> {
        let mut bytes = decode_key(&self.signing_key_hex, "signing")?;
        let signing_key = SigningKey::from_bytes(&bytes);
        bytes.zeroize();
        Ok(hex::encode(signing_key.verifying_key().to_bytes()))
    }

    /// Hex of the X25519 public key matching the private key.
    ///
    /// # Errors
    ///
    /// Returns `TrustError::InvalidKey` if the private key is not 32 bytes of hex.
    pub fn public_key_hex(&self) -> Result<String> {
        let bytes = decode_key(&self.private_key_hex, "private")?;
        let secret = StaticSecret::from(bytes);
        Ok(hex::encode(X25519PublicKey::from(&secret).as_bytes()))
    }
}

fn decode_key(key_hex: &str, kind: &str) -> Result<[u8; 32]> {
    let mut raw = hex::decode(key_hex)
        .map_err(|e| TrustError::InvalidKey(format!("{kind} key is not hex: {e}")))?;
    let bytes: [u8; 32] = raw
        .as_slice()
        .try_into()
        .map_err(|_| TrustError::InvalidKey(format!("{kind} key must be 32 bytes")))?;
    raw.zeroize();
    Ok(bytes)
}

impl std::fmt::Debug for LocalIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LocalIdentity")
            .field("signing_key_hex", &"<redacted>")
            .field("private_key_hex", &"<redacted>")
            .field("auto_accept", &self.auto_accept)
            .finish()
    }
}

impl Drop for LocalIdentity {
    fn drop(&mut self) {
        self.signing_key_hex.zeroize();
        self.private_key_hex.zeroize();
    }
}
