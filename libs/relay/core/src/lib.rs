//! # Relay Core - Shared Infrastructure
//!
//! ## Purpose
//!
//! Everything the AM and SDP routers have in common but neither owns: the
//! storage port the host chain's keyed tables hide behind, the single
//! role-based authorization gate, the collaborator ports of the host chain
//! (cross-contract calls, event log, attestation verifier), the error
//! taxonomy, and the deployment configuration shape.
//!
//! ## Architecture Role
//!
//! ```text
//! relay-am ─┐
//!           ├─> relay-core ─> codec ─> types
//! relay-sdp ┘
//! ```
//!
//! Nothing here encodes bytes or advances sequences; this crate only defines
//! the seams the routers plug into.

pub mod auth;
pub mod config;
pub mod error;
pub mod ports;
pub mod storage;

pub use auth::{authorize, authorize_exact, Acl, Role};
pub use config::{ConfigError, NodeConfig};
pub use error::{RelayError, RelayResult};
pub use ports::{
    AcceptAll, AttestationVerifier, ContractBus, EventSink, OutboundEvent, ProtocolSink,
    RecordedEvents,
};
pub use storage::{MemoryTable, Table};
