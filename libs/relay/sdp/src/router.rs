//! Session router.
//!
//! Builds outbound envelopes, enforces sequencing on inbound ones, and
//! crosses into the receiving business contract through the
//! [`ContractBus`]. The inbound endpoint is open to exactly one caller: the
//! configured AM router identity.

use sha3::{Digest, Keccak256};
use tracing::{debug, info, instrument, warn};

use codec::{decode_sdp_envelope, encode_sdp_envelope};
use relay_core::{
    authorize, authorize_exact, Acl, ContractBus, MemoryTable, RelayError, RelayResult, Role,
    Table,
};
use types::{ChannelKey, Identity, SdpEnvelope, UNORDERED_SEQUENCE};

use crate::ledger::SequenceLedger;

/// The SDP layer's router for one deployment.
///
/// Holds the deployment configuration (local domain, AM identity, admin
/// set) and the two direction ledgers. All state mutation happens inside
/// single host-chain transactions; the router itself never spawns work.
pub struct SdpRouter<
    B: ContractBus,
    S: Table<ChannelKey, u32> = MemoryTable<ChannelKey, u32>,
    R: Table<ChannelKey, u32> = MemoryTable<ChannelKey, u32>,
> {
    local_domain: Option<String>,
    am_identity: Option<Identity>,
    admins: Acl,
    send_ledger: SequenceLedger<S>,
    recv_ledger: SequenceLedger<R>,
    bus: B,
}

impl<B: ContractBus> SdpRouter<B> {
    /// Router over in-memory tables, seeded with its first admin.
    pub fn new(initial_admin: Identity, bus: B) -> Self {
        Self::with_tables(initial_admin, bus, MemoryTable::new(), MemoryTable::new())
    }
}

impl<B, S, R> SdpRouter<B, S, R>
where
    B: ContractBus,
    S: Table<ChannelKey, u32>,
    R: Table<ChannelKey, u32>,
{
    pub fn with_tables(initial_admin: Identity, bus: B, send_table: S, recv_table: R) -> Self {
        let mut admins = Acl::in_memory();
        admins.grant(initial_admin);
        SdpRouter {
            local_domain: None,
            am_identity: None,
            admins,
            send_ledger: SequenceLedger::new(send_table),
            recv_ledger: SequenceLedger::new(recv_table),
            bus,
        }
    }

    fn local_domain(&self) -> RelayResult<&str> {
        self.local_domain
            .as_deref()
            .ok_or(RelayError::NotConfigured("local domain"))
    }

    /// The contract-call port, for embedders that observe deliveries
    /// through it.
    pub fn bus(&self) -> &B {
        &self.bus
    }

    pub fn bus_mut(&mut self) -> &mut B {
        &mut self.bus
    }

    // ---- administrative surface ----

    pub fn add_admin(&mut self, caller: &Identity, id: Identity) -> RelayResult<()> {
        authorize(&self.admins, caller, Role::Admin)?;
        self.admins.grant(id);
        info!(admin = %id, "admin granted");
        Ok(())
    }

    pub fn set_local_domain(&mut self, caller: &Identity, domain: String) -> RelayResult<()> {
        authorize(&self.admins, caller, Role::Admin)?;
        info!(%domain, "local domain set");
        self.local_domain = Some(domain);
        Ok(())
    }

    pub fn set_am_identity(&mut self, caller: &Identity, id: Identity) -> RelayResult<()> {
        authorize(&self.admins, caller, Role::Admin)?;
        info!(am = %id, "am identity set");
        self.am_identity = Some(id);
        Ok(())
    }

    // ---- outbound ----

    /// Build an ordered envelope for the send channel
    /// `(sender, receiver_domain, receiver)`: read the channel's current
    /// sequence, stamp it into the envelope, then advance the channel.
    /// Returns the envelope bytes and the sequence they carry.
    #[instrument(skip_all, fields(sender = %sender, receiver_domain = %receiver_domain))]
    pub fn build_ordered(
        &mut self,
        sender: &Identity,
        receiver_domain: &str,
        receiver: &Identity,
        payload: &[u8],
    ) -> RelayResult<(Vec<u8>, u32)> {
        let key = ChannelKey::for_send(sender, receiver_domain, receiver);
        let sequence = self.send_ledger.get_or_init(&key);
        let bytes = encode_sdp_envelope(&SdpEnvelope {
            receiver_domain: receiver_domain.to_string(),
            receiver: *receiver,
            sequence,
            payload: payload.to_vec(),
        })?;
        self.send_ledger.advance(&key, sequence)?;
        debug!(sequence, "ordered envelope built");
        Ok((bytes, sequence))
    }

    /// Build an unordered envelope. Carries the sentinel sequence and never
    /// reads or writes any ledger record.
    pub fn build_unordered(
        &mut self,
        _sender: &Identity,
        receiver_domain: &str,
        receiver: &Identity,
        payload: &[u8],
    ) -> RelayResult<(Vec<u8>, u32)> {
        let bytes = encode_sdp_envelope(&SdpEnvelope {
            receiver_domain: receiver_domain.to_string(),
            receiver: *receiver,
            sequence: UNORDERED_SEQUENCE,
            payload: payload.to_vec(),
        })?;
        Ok((bytes, UNORDERED_SEQUENCE))
    }

    // ---- inbound ----

    /// Deliver one envelope from the AM layer.
    ///
    /// Ordered envelopes must carry exactly the receive channel's current
    /// sequence; the ledger is advanced *before* the callback runs, and a
    /// failing callback does not roll it back. The ordered slot is spent
    /// either way, so a receiver that rejected the payload must recover via
    /// a new message, never a replay of the slot. (Inherited behavior,
    /// kept deliberately; see DESIGN.md.)
    #[instrument(skip_all, fields(sender_domain = %sender_domain, sender = %sender))]
    pub fn receive(
        &mut self,
        caller: &Identity,
        sender_domain: &str,
        sender: &Identity,
        envelope_bytes: &[u8],
    ) -> RelayResult<()> {
        authorize_exact(self.am_identity.as_ref(), caller, Role::AmClient)?;

        let envelope = decode_sdp_envelope(envelope_bytes)?;
        let local = self.local_domain()?;
        if envelope.receiver_domain != local {
            return Err(RelayError::DomainMismatch {
                expected: local.to_string(),
                got: envelope.receiver_domain,
            });
        }

        let status = if envelope.is_unordered() {
            self.bus.on_unordered_message(
                &envelope.receiver,
                sender_domain,
                sender,
                &envelope.payload,
            )
        } else {
            let key = ChannelKey::for_recv(sender_domain, sender, &envelope.receiver);
            self.recv_ledger.advance(&key, envelope.sequence)?;
            self.bus.on_ordered_message(
                &envelope.receiver,
                sender_domain,
                sender,
                &envelope.payload,
            )
        };

        if !status.is_ok() {
            warn!(
                code = status.code,
                receiver = %envelope.receiver,
                sequence = envelope.sequence,
                "receiving contract rejected the message; delivery stands"
            );
        }
        info!(
            receiver = %envelope.receiver,
            sequence = envelope.sequence,
            code = status.code,
            "message received"
        );
        Ok(())
    }

    /// Spend the current ordered slot of a receive channel without invoking
    /// the callback. Manual recovery for a channel stuck on a message the
    /// receiver can never process.
    pub fn reject(
        &mut self,
        caller: &Identity,
        sender_domain: &str,
        sender: &Identity,
        receiver: &Identity,
        sequence: u32,
    ) -> RelayResult<()> {
        authorize(&self.admins, caller, Role::Admin)?;
        let key = ChannelKey::for_recv(sender_domain, sender, receiver);
        let next = self.recv_ledger.advance(&key, sequence)?;
        info!(sequence, next, "ordered slot rejected by operator");
        Ok(())
    }

    /// Overwrite a receive channel's sequence outright. Operator recovery
    /// only; bypasses the compare-and-increment.
    pub fn force_receive_sequence(
        &mut self,
        caller: &Identity,
        sender_domain: &str,
        sender: &Identity,
        receiver: &Identity,
        new_sequence: u32,
    ) -> RelayResult<()> {
        authorize(&self.admins, caller, Role::Admin)?;
        let key = ChannelKey::for_recv(sender_domain, sender, receiver);
        self.recv_ledger.force_set(&key, new_sequence)?;
        warn!(new_sequence, "receive sequence forced by operator");
        Ok(())
    }

    /// Current receive-channel sequence, 0 for untouched channels.
    pub fn recv_sequence(
        &self,
        sender_domain: &str,
        sender: &Identity,
        receiver: &Identity,
    ) -> u32 {
        self.recv_ledger
            .peek(&ChannelKey::for_recv(sender_domain, sender, receiver))
    }

    /// Keccak-256 of the configured local domain name.
    pub fn local_domain_hash(&self) -> RelayResult<[u8; 32]> {
        let domain = self.local_domain()?;
        Ok(Keccak256::digest(domain.as_bytes()).into())
    }
}
