//! AM router.
//!
//! Inbound: relayer batches in, decoded payloads out to registered protocol
//! handlers. Outbound: protocol payloads wrapped into AM packages and
//! emitted as events. Verification of notarized proofs is a per-entry
//! policy: `submit` verifies, `submit_trusted` does not.

use tracing::{debug, info, instrument};

use codec::{decode_am_packet, encode_am_packet, BatchReader, ProofEnvelope};
use relay_core::{
    authorize, Acl, AttestationVerifier, EventSink, MemoryTable, OutboundEvent, ProtocolSink,
    RelayError, RelayResult, Role, Table,
};
use types::{AmPacket, Identity};

use crate::registry::ProtocolRegistry;

/// Event name outbound AM packages are logged under.
pub const OUTBOUND_EVENT: &str = "SendAuthMessage";

/// The AM layer's router for one deployment.
pub struct AmRouter<
    V: AttestationVerifier,
    E: EventSink,
    P: ProtocolSink,
    ByType: Table<u32, Identity> = MemoryTable<u32, Identity>,
    ByIdent: Table<Identity, u32> = MemoryTable<Identity, u32>,
> {
    admins: Acl,
    relayers: Acl,
    protocols: ProtocolRegistry<ByType, ByIdent>,
    verifier: V,
    events: E,
    sink: P,
}

impl<V, E, P> AmRouter<V, E, P>
where
    V: AttestationVerifier,
    E: EventSink,
    P: ProtocolSink,
{
    /// Router over in-memory registries, seeded with its first admin.
    pub fn new(initial_admin: Identity, verifier: V, events: E, sink: P) -> Self {
        Self::with_registry(
            initial_admin,
            verifier,
            events,
            sink,
            ProtocolRegistry::in_memory(),
        )
    }
}

impl<V, E, P, ByType, ByIdent> AmRouter<V, E, P, ByType, ByIdent>
where
    V: AttestationVerifier,
    E: EventSink,
    P: ProtocolSink,
    ByType: Table<u32, Identity>,
    ByIdent: Table<Identity, u32>,
{
    pub fn with_registry(
        initial_admin: Identity,
        verifier: V,
        events: E,
        sink: P,
        protocols: ProtocolRegistry<ByType, ByIdent>,
    ) -> Self {
        let mut admins = Acl::in_memory();
        admins.grant(initial_admin);
        AmRouter {
            admins,
            relayers: Acl::in_memory(),
            protocols,
            verifier,
            events,
            sink,
        }
    }

    /// Recorded events, for embedders that poll instead of watching a log.
    pub fn events(&self) -> &E {
        &self.events
    }

    /// The protocol dispatch port, for embedders that own downstream state
    /// through it.
    pub fn sink(&self) -> &P {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut P {
        &mut self.sink
    }

    // ---- administrative surface ----

    pub fn add_admin(&mut self, caller: &Identity, id: Identity) -> RelayResult<()> {
        authorize(&self.admins, caller, Role::Admin)?;
        self.admins.grant(id);
        info!(admin = %id, "admin granted");
        Ok(())
    }

    pub fn add_relayer(&mut self, caller: &Identity, id: Identity) -> RelayResult<()> {
        authorize(&self.admins, caller, Role::Admin)?;
        self.relayers.grant(id);
        info!(relayer = %id, "relayer granted");
        Ok(())
    }

    pub fn remove_relayer(&mut self, caller: &Identity, id: &Identity) -> RelayResult<()> {
        authorize(&self.admins, caller, Role::Admin)?;
        self.relayers.revoke(id);
        info!(relayer = %id, "relayer revoked");
        Ok(())
    }

    pub fn set_protocol(
        &mut self,
        caller: &Identity,
        handler: Identity,
        protocol_type: u32,
    ) -> RelayResult<()> {
        authorize(&self.admins, caller, Role::Admin)?;
        self.protocols.register(protocol_type, handler);
        info!(%handler, protocol_type, "protocol route set");
        Ok(())
    }

    pub fn remove_protocol(&mut self, caller: &Identity, protocol_type: u32) -> RelayResult<()> {
        authorize(&self.admins, caller, Role::Admin)?;
        self.protocols.deregister(protocol_type)?;
        info!(protocol_type, "protocol route removed");
        Ok(())
    }

    // ---- inbound ----

    /// Process a relayer batch, verifying notarized proofs through the
    /// external hub.
    #[instrument(skip_all, fields(relayer = %caller))]
    pub fn submit(&mut self, caller: &Identity, batch: &[u8]) -> RelayResult<()> {
        self.process_batch(caller, batch, true)
    }

    /// Process a relayer batch with the verifier bypassed. For deployments
    /// whose relayer set is itself trusted.
    #[instrument(skip_all, fields(relayer = %caller))]
    pub fn submit_trusted(&mut self, caller: &Identity, batch: &[u8]) -> RelayResult<()> {
        self.process_batch(caller, batch, false)
    }

    fn process_batch(&mut self, caller: &Identity, batch: &[u8], verify: bool) -> RelayResult<()> {
        authorize(&self.relayers, caller, Role::Relayer)?;

        let mut reader = BatchReader::new(batch);
        let mut entries = 0usize;
        while let Some((_hints, proof)) = reader.next_pair()? {
            entries += 1;
            let envelope = ProofEnvelope::decode(proof)?;
            if verify {
                if let ProofEnvelope::Notarized(notary) = &envelope {
                    let code = self.verifier.verify_attestation(&notary.raw_proof);
                    if code != 0 {
                        return Err(RelayError::VerifierRejected { code });
                    }
                }
            }
            let domain = envelope.sender_domain().to_string();
            let package = envelope.message()?;
            self.forward(&domain, &package)?;
        }
        debug!(entries, "relayer batch processed");
        Ok(())
    }

    /// Unwrap one AM package and hand it to its registered handler.
    fn forward(&mut self, sender_domain: &str, package_bytes: &[u8]) -> RelayResult<()> {
        let packet = decode_am_packet(package_bytes)?;
        let handler = self.protocols.handler_for(packet.protocol_type)?;
        debug!(
            protocol_type = packet.protocol_type,
            %handler,
            sender = %packet.sender,
            "forwarding am package"
        );
        self.sink
            .deliver(&handler, sender_domain, &packet.sender, &packet.payload)
    }

    // ---- outbound ----

    /// Wrap a registered protocol's payload into an AM package and emit it
    /// for relayers. `sender` is the originating business identity carried
    /// end to end; the caller is the protocol contract itself.
    #[instrument(skip_all, fields(protocol = %caller, sender = %sender))]
    pub fn notify_outbound(
        &mut self,
        caller: &Identity,
        sender: &Identity,
        payload: &[u8],
    ) -> RelayResult<()> {
        if !self.protocols.is_protocol(caller) {
            return Err(RelayError::Unauthorized {
                role: Role::Protocol,
                caller: *caller,
            });
        }
        let protocol_type = self.protocols.type_of(caller)?;
        let bytes = encode_am_packet(&AmPacket::new(*sender, protocol_type, payload.to_vec()))?;
        info!(protocol_type, size = bytes.len(), "outbound am package emitted");
        self.events.emit(OutboundEvent {
            name: OUTBOUND_EVENT,
            payload: bytes,
        });
        Ok(())
    }
}
