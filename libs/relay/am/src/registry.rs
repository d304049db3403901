//! Protocol handler registry.
//!
//! Two tables kept in lockstep: protocol type to handler identity (the
//! routing direction) and handler identity to protocol type (the
//! authorization direction, used when a handler calls back in). Mutated
//! only through admin-gated router operations.

use relay_core::{MemoryTable, RelayError, RelayResult, Table};
use types::Identity;

#[derive(Debug)]
pub struct ProtocolRegistry<
    ByType: Table<u32, Identity> = MemoryTable<u32, Identity>,
    ByIdent: Table<Identity, u32> = MemoryTable<Identity, u32>,
> {
    by_type: ByType,
    by_identity: ByIdent,
}

impl ProtocolRegistry<MemoryTable<u32, Identity>, MemoryTable<Identity, u32>> {
    pub fn in_memory() -> Self {
        ProtocolRegistry {
            by_type: MemoryTable::new(),
            by_identity: MemoryTable::new(),
        }
    }
}

impl<ByType, ByIdent> ProtocolRegistry<ByType, ByIdent>
where
    ByType: Table<u32, Identity>,
    ByIdent: Table<Identity, u32>,
{
    pub fn new(by_type: ByType, by_identity: ByIdent) -> Self {
        ProtocolRegistry {
            by_type,
            by_identity,
        }
    }

    /// Register or replace the handler for a protocol type. A replaced
    /// handler loses its protocol role entirely.
    pub fn register(&mut self, protocol_type: u32, handler: Identity) {
        if let Some(previous) = self.by_type.get(&protocol_type) {
            self.by_identity.remove(&previous);
        }
        self.by_type.insert(protocol_type, handler);
        self.by_identity.insert(handler, protocol_type);
    }

    pub fn deregister(&mut self, protocol_type: u32) -> RelayResult<()> {
        let handler = self
            .by_type
            .remove(&protocol_type)
            .ok_or(RelayError::UnregisteredRoute { protocol_type })?;
        self.by_identity.remove(&handler);
        Ok(())
    }

    pub fn handler_for(&self, protocol_type: u32) -> RelayResult<Identity> {
        self.by_type
            .get(&protocol_type)
            .ok_or(RelayError::UnregisteredRoute { protocol_type })
    }

    pub fn type_of(&self, handler: &Identity) -> RelayResult<u32> {
        self.by_identity
            .get(handler)
            .ok_or(RelayError::NotAProtocol { identity: *handler })
    }

    pub fn is_protocol(&self, handler: &Identity) -> bool {
        self.by_identity.contains(handler)
    }
}
