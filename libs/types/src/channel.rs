//! Channel keys.
//!
//! A channel is the ordered delivery context between one sender identity and
//! one receiver identity across a domain boundary. The key is a Keccak-256
//! digest over the order-sensitive concatenation of the triple, so the send
//! side (`local_sender, receiver_domain, receiver`) and the receive side
//! (`sender_domain, sender, local_receiver`) can never share a record even
//! when the identities coincide.

use sha3::{Digest, Keccak256};

use crate::Identity;

/// Digest naming one directed ordered channel. Used only as a storage key;
/// it never crosses the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ChannelKey([u8; 32]);

impl ChannelKey {
    /// Digest the three channel parts in order. Order sensitivity is the
    /// point: swapping any two parts yields an unrelated key.
    fn derive(parts: [&[u8]; 3]) -> Self {
        let mut hasher = Keccak256::new();
        for part in parts {
            hasher.update(part);
        }
        ChannelKey(hasher.finalize().into())
    }

    /// Send-side key: `(local_sender, receiver_domain, receiver)`.
    pub fn for_send(local_sender: &Identity, receiver_domain: &str, receiver: &Identity) -> Self {
        Self::derive([
            local_sender.as_bytes(),
            receiver_domain.as_bytes(),
            receiver.as_bytes(),
        ])
    }

    /// Receive-side key: `(sender_domain, sender, local_receiver)`.
    pub fn for_recv(sender_domain: &str, sender: &Identity, local_receiver: &Identity) -> Self {
        Self::derive([
            sender_domain.as_bytes(),
            sender.as_bytes(),
            local_receiver.as_bytes(),
        ])
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}
