//! In-process harness for end-to-end bridge scenarios.
//!
//! Wires a full receiving node out of the real routers and memory-backed
//! ports: relayer batch -> [`relay_am::AmRouter`] -> [`SdpSink`] ->
//! [`relay_sdp::SdpRouter`] -> [`RecordingBus`]. The host chain is played
//! by plain function calls; its transaction rollback is *not* simulated,
//! which the batch-abort scenario relies on to observe pre-abort state.

use std::collections::HashMap;

use codec::{encode_am_packet, BatchWriter, TlvItem, TlvPacket};
use relay_am::AmRouter;
use relay_core::{
    AttestationVerifier, ContractBus, NodeConfig, ProtocolSink, RecordedEvents, RelayResult,
};
use relay_sdp::SdpRouter;
use types::{AmPacket, CallStatus, Identity};

/// Deterministic identity from a filler byte.
pub fn id(b: u8) -> Identity {
    Identity::from_bytes([b; 32])
}

pub const ADMIN: u8 = 0xA0;
pub const AM_IDENTITY: u8 = 0xA1;
pub const SDP_IDENTITY: u8 = 0xA2;
pub const RELAYER: u8 = 0xB0;

/// Protocol type the SDP router is registered under.
pub const SDP_PROTOCOL_TYPE: u32 = 0;

/// One callback invocation observed by the bus.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Delivery {
    pub receiver: Identity,
    pub sender_domain: String,
    pub sender: Identity,
    pub message: Vec<u8>,
}

/// Records every callback and answers with a scripted per-receiver status.
#[derive(Debug, Default)]
pub struct RecordingBus {
    pub ordered: Vec<Delivery>,
    pub unordered: Vec<Delivery>,
    pub fail_receivers: HashMap<Identity, u32>,
}

impl RecordingBus {
    fn status_for(&self, receiver: &Identity) -> CallStatus {
        match self.fail_receivers.get(receiver) {
            Some(code) => CallStatus::error(*code, "scripted receiver failure"),
            None => CallStatus::ok(),
        }
    }
}

impl ContractBus for RecordingBus {
    fn on_ordered_message(
        &mut self,
        receiver: &Identity,
        sender_domain: &str,
        sender: &Identity,
        message: &[u8],
    ) -> CallStatus {
        self.ordered.push(Delivery {
            receiver: *receiver,
            sender_domain: sender_domain.to_string(),
            sender: *sender,
            message: message.to_vec(),
        });
        self.status_for(receiver)
    }

    fn on_unordered_message(
        &mut self,
        receiver: &Identity,
        sender_domain: &str,
        sender: &Identity,
        message: &[u8],
    ) -> CallStatus {
        self.unordered.push(Delivery {
            receiver: *receiver,
            sender_domain: sender_domain.to_string(),
            sender: *sender,
            message: message.to_vec(),
        });
        self.status_for(receiver)
    }
}

/// Verifier with a scripted verdict.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScriptedVerifier {
    pub reject_with: Option<u32>,
}

impl AttestationVerifier for ScriptedVerifier {
    fn verify_attestation(&self, _raw_proof: &[u8]) -> u32 {
        self.reject_with.unwrap_or(0)
    }
}

/// The host chain's dispatch from the AM router into the SDP router's
/// inbound endpoint. Owns the SDP router the way the host chain "owns" the
/// ability to call a handler's entry point.
pub struct SdpSink {
    pub sdp: SdpRouter<RecordingBus>,
    am_identity: Identity,
}

impl ProtocolSink for SdpSink {
    fn deliver(
        &mut self,
        handler: &Identity,
        sender_domain: &str,
        sender: &Identity,
        message: &[u8],
    ) -> RelayResult<()> {
        // Only one handler is deployed on this test chain.
        assert_eq!(handler, &id(SDP_IDENTITY), "unexpected dispatch target");
        self.sdp
            .receive(&self.am_identity, sender_domain, sender, message)
    }
}

/// A complete receiving node on one domain.
pub struct TestNode {
    pub am: AmRouter<ScriptedVerifier, RecordedEvents, SdpSink>,
}

impl TestNode {
    pub fn new(local_domain: &str) -> Self {
        Self::with_verifier(local_domain, ScriptedVerifier::default())
    }

    pub fn with_verifier(local_domain: &str, verifier: ScriptedVerifier) -> Self {
        // Bootstrap from the same config shape a deployment would ship.
        let config = NodeConfig::from_toml_str(&format!(
            "local_domain = \"{local_domain}\"\n\
             am_identity = \"{}\"\n\
             admins = [\"{}\"]\n\
             relayers = [\"{}\"]\n",
            id(AM_IDENTITY),
            id(ADMIN),
            id(RELAYER),
        ))
        .expect("valid node config");

        let admin = config.admins[0];
        let am_identity = config.am_identity.expect("config carries am identity");
        let mut sdp = SdpRouter::new(admin, RecordingBus::default());
        sdp.set_local_domain(&admin, config.local_domain.clone())
            .expect("seeded admin");
        sdp.set_am_identity(&admin, am_identity).expect("seeded admin");

        let sink = SdpSink { sdp, am_identity };
        let mut am = AmRouter::new(admin, verifier, RecordedEvents::default(), sink);
        for relayer in &config.relayers {
            am.add_relayer(&admin, *relayer).expect("seeded admin");
        }
        am.set_protocol(&admin, id(SDP_IDENTITY), SDP_PROTOCOL_TYPE)
            .expect("seeded admin");

        TestNode { am }
    }

    pub fn sdp(&self) -> &SdpRouter<RecordingBus> {
        &self.am.sink().sdp
    }

    pub fn sdp_mut(&mut self) -> &mut SdpRouter<RecordingBus> {
        &mut self.am.sink_mut().sdp
    }

    pub fn bus(&self) -> &RecordingBus {
        self.sdp().bus()
    }

    pub fn bus_mut(&mut self) -> &mut RecordingBus {
        self.sdp_mut().bus_mut()
    }
}

// ---- fixture builders (the relayer side of the wire) ----

/// AM package wrapping `payload` for the SDP protocol.
pub fn sdp_am_package(sender: Identity, payload: &[u8]) -> Vec<u8> {
    encode_am_packet(&AmPacket::new(sender, SDP_PROTOCOL_TYPE, payload.to_vec()))
        .expect("package encodes")
}

/// Legacy oracle proof carrying `package` from `domain`.
pub fn legacy_proof(domain: &str, package: &[u8]) -> Vec<u8> {
    TlvPacket::new(
        1,
        vec![
            TlvItem::new(9, domain.as_bytes().to_vec()),
            TlvItem::new(5, codec::proof::legacy_response_body(package)),
            TlvItem::new(7, 0u32.to_le_bytes().to_vec()),
            TlvItem::new(10, 1u16.to_le_bytes().to_vec()),
        ],
    )
    .encode()
}

/// Notarized proof carrying `package` from `domain` plus raw attestation
/// bytes for the verifier.
pub fn notary_proof(domain: &str, package: &[u8], raw: &[u8]) -> Vec<u8> {
    let channel = TlvPacket::new(1, vec![TlvItem::new(0, domain.as_bytes().to_vec())]);
    let lane = TlvPacket::new(
        1,
        vec![
            TlvItem::new(0, channel.encode()),
            TlvItem::new(1, vec![0x11; 32]),
            TlvItem::new(2, vec![0x22; 32]),
        ],
    );
    let inner = TlvPacket::new(1, vec![TlvItem::new(0, package.to_vec())]);
    TlvPacket::new(
        1,
        vec![
            TlvItem::new(0x0100, 1u32.to_le_bytes().to_vec()),
            TlvItem::new(0x0101, lane.encode()),
            TlvItem::new(5, inner.encode()),
            TlvItem::new(0x01FF, raw.to_vec()),
        ],
    )
    .encode()
}

/// Batch of proofs with empty hints.
pub fn batch_of(proofs: &[Vec<u8>]) -> Vec<u8> {
    let mut writer = BatchWriter::new();
    for proof in proofs {
        writer = writer.push_pair(b"", proof);
    }
    writer.finish()
}
