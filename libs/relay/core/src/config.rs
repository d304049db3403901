//! Deployment configuration.
//!
//! Configuration feeds the constructors and the admin bootstrap; it is not
//! protocol logic. A node operator writes something like:
//!
//! ```toml
//! local_domain = "chainB"
//! am_identity = "11…(64 hex digits)…11"
//! admins = ["22…22"]
//! relayers = ["33…33"]
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use types::Identity;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse node config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Per-deployment settings for one bridge node.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Domain name this node answers to; envelopes addressed elsewhere are
    /// rejected.
    pub local_domain: String,

    /// The AM router identity allowed into the SDP inbound endpoint.
    pub am_identity: Option<Identity>,

    /// Identities seeded into the admin registry at deployment.
    #[serde(default)]
    pub admins: Vec<Identity>,

    /// Identities seeded into the relayer registry at deployment.
    #[serde(default)]
    pub relayers: Vec<Identity>,
}

impl NodeConfig {
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(raw)?)
    }
}
