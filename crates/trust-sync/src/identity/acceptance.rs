//! Acceptance status of a remote peer.
//!
//! Every sighted peer is in exactly one of three states. The state also
//! names the storage bucket its persisted record lives in.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TrustError};

/// Acceptance status of a remote identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acceptance {
    Pending,
    Accepted,
    Rejected,
}

impl Acceptance {
    /// Every acceptance state, in bucket search order.
    pub const ALL: [Acceptance; 3] = [
        Acceptance::Accepted,
        Acceptance::Pending,
        Acceptance::Rejected,
    ];

    /// Raw status code used by key stores.
    pub fn code(self) -> u8 {
        match self {
            Acceptance::Pending => 0,
            Acceptance::Accepted => 1,
            Acceptance::Rejected => 2,
        }
    }

    /// Bucket / display name.
    pub fn as_str(self) -> &'static str {
        match self {
            Acceptance::Pending => "pending",
            Acceptance::Accepted => "accepted",
            Acceptance::Rejected => "rejected",
        }
    }
}

impl TryFrom<u8> for Acceptance {
    type Error = TrustError;

    fn try_from(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Acceptance::Pending),
            1 => Ok(Acceptance::Accepted),
            2 => Ok(Acceptance::Rejected),
            other => Err(TrustError::InvalidStatusCode(other)),
        }
    }
}

impl std::str::FromStr for Acceptance {
    type Err = TrustError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "pending" => Ok(Acceptance::Pending),
            "accepted" => Ok(Acceptance::Accepted),
            "rejected" => Ok(Acceptance::Rejected),
            other => Err(TrustError::InvalidAcceptance(other.to_string())),
        }
    }
}

impl std::fmt::Display for Acceptance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
