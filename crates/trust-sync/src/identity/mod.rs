//! Identity types: the node's own key pair and the trust records of peers.

pub mod acceptance;
pub mod local;
pub mod remote;

pub use acceptance::Acceptance;
pub use local::LocalIdentity;
pub use remote::RemoteIdentity;
