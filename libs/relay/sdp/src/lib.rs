//! # Session Data Protocol
//!
//! ## Purpose
//!
//! Point-to-point messaging between chain domains with exactly-once-in-order
//! delivery on ordered channels and fire-and-forget semantics on unordered
//! ones. Business contracts hand payloads to [`SdpRouter`]; the router
//! stamps them with per-channel sequence numbers on the way out and enforces
//! those numbers on the way in.
//!
//! The ordering guarantee lives entirely in the [`ledger::SequenceLedger`]'s
//! compare-and-increment: two transactions racing to deliver the same slot
//! can never both succeed, whatever order the chain's block producer picks.
//!
//! ## Architecture Role
//!
//! ```text
//! business contract ─ build_ordered ─> AM router ─> relayer ─> far chain
//! far chain ─> relayer ─> AM router ─ receive ─> business contract
//! ```

pub mod ledger;
pub mod router;

pub use ledger::SequenceLedger;
pub use router::SdpRouter;
