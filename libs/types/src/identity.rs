//! Fixed-width chain identities.
//!
//! An [`Identity`] names an account or contract on some chain. It is opaque:
//! the bridge compares identities for equality and copies them onto the wire,
//! nothing else. Chains with shorter native addresses left-pad with zeros
//! before they reach this layer.

use std::fmt;

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::IDENTITY_LEN;

/// Errors from parsing an identity out of its text form.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IdentityError {
    /// Input was not valid hex.
    #[error("identity is not valid hex: {0}")]
    InvalidHex(String),

    /// Decoded byte length was not exactly 32.
    #[error("identity must be {IDENTITY_LEN} bytes, got {0}")]
    BadLength(usize),
}

/// 32-byte opaque account/contract identifier.
///
/// Used both as an authorization subject (registry membership) and as a
/// routing target (receiver of a message). Value equality only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity([u8; IDENTITY_LEN]);

impl Identity {
    /// All-zero identity, useful as an explicit "unset" marker in tests.
    pub const ZERO: Identity = Identity([0u8; IDENTITY_LEN]);

    pub const fn from_bytes(bytes: [u8; IDENTITY_LEN]) -> Self {
        Identity(bytes)
    }

    /// Parse from exactly 64 hex digits (no `0x` prefix).
    pub fn from_hex(s: &str) -> Result<Self, IdentityError> {
        let raw = hex::decode(s).map_err(|e| IdentityError::InvalidHex(e.to_string()))?;
        Self::from_slice(&raw)
    }

    /// Copy from a slice that must be exactly 32 bytes long.
    pub fn from_slice(raw: &[u8]) -> Result<Self, IdentityError> {
        let bytes: [u8; IDENTITY_LEN] =
            raw.try_into().map_err(|_| IdentityError::BadLength(raw.len()))?;
        Ok(Identity(bytes))
    }

    pub fn as_bytes(&self) -> &[u8; IDENTITY_LEN] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl From<[u8; IDENTITY_LEN]> for Identity {
    fn from(bytes: [u8; IDENTITY_LEN]) -> Self {
        Identity(bytes)
    }
}

impl AsRef<[u8]> for Identity {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Identity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Identity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Identity::from_hex(&s).map_err(D::Error::custom)
    }
}
