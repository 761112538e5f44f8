//! Trust-state synchronization for peer key material.
//!
//! Keeps a live view of each remote peer's keys and acceptance status in
//! step with an authoritative key store partitioned into pending, accepted
//! and rejected buckets. Every persisted record passes an exact field-set
//! check first; acceptance decisions come from the store's status evaluator.

pub mod config;
pub mod console;
pub mod error;
pub mod identity;
pub mod schema;
pub mod store;
pub mod sync;

// Re-export primary types
pub use config::TrustConfig;
pub use console::{Console, LogConsole, RecordingConsole};
pub use error::{Result, TrustError};
pub use identity::{Acceptance, LocalIdentity, RemoteIdentity};
pub use schema::{validate_local, validate_remote, LocalRecord, Record, RemoteRecord};
pub use store::{DirTransportKeep, FileKeyStore, KeyStore, TransportKeep};
pub use sync::{clear_all_trust_state, clear_all_trust_state_with, TrustSync};
