//! # Authentication Message Layer
//!
//! ## Purpose
//!
//! The relay-facing half of the bridge. Relayers push proof batches into
//! [`AmRouter::submit`]; each proof is decoded (and, for notarized shapes,
//! verified through the external hub), unwrapped into an AM package, and
//! forwarded to whatever protocol handler is registered for the package's
//! protocol type. The reverse path wraps a local protocol's payload into an
//! AM package and emits it into the host chain's event log for relayers to
//! carry away.
//!
//! ## Control Flow
//!
//! ```text
//! relayer ─ submit ─> [batch] ─> proof ─> (domain, am package)
//!                                   │           │
//!                             verifier hub   protocol registry
//!                                               │
//!                                        registered handler
//! ```

pub mod registry;
pub mod router;

pub use registry::ProtocolRegistry;
pub use router::AmRouter;
