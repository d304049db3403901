//! Role-based entry-point authorization.
//!
//! Every public router operation is gated by exactly one of the two
//! functions here, parameterized by the required [`Role`]. The caller
//! identity comes from the host chain's transaction-authorization
//! primitive; this layer only does the membership test.

use std::fmt;

use types::Identity;

use crate::error::{RelayError, RelayResult};
use crate::storage::{MemoryTable, Table};

/// Roles enforced across the bridge's entry points.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// May mutate registries and override sequence state.
    Admin,
    /// May submit proof batches into the AM router.
    Relayer,
    /// A registered protocol handler; may ask the AM router to emit
    /// outbound packages.
    Protocol,
    /// The single AM router identity allowed into an SDP router's inbound
    /// endpoint.
    AmClient,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Role::Admin => "admin",
            Role::Relayer => "relayer",
            Role::Protocol => "protocol",
            Role::AmClient => "am-client",
        };
        f.write_str(name)
    }
}

/// An identity set backing one role, stored behind the [`Table`] port.
#[derive(Debug)]
pub struct Acl<T: Table<Identity, ()> = MemoryTable<Identity, ()>> {
    table: T,
}

impl Acl<MemoryTable<Identity, ()>> {
    pub fn in_memory() -> Self {
        Acl {
            table: MemoryTable::new(),
        }
    }
}

impl<T: Table<Identity, ()>> Acl<T> {
    pub fn new(table: T) -> Self {
        Acl { table }
    }

    pub fn grant(&mut self, id: Identity) {
        self.table.insert(id, ());
    }

    pub fn revoke(&mut self, id: &Identity) {
        self.table.remove(id);
    }

    pub fn contains(&self, id: &Identity) -> bool {
        self.table.contains(id)
    }
}

/// Membership test against a role's registry.
pub fn authorize<T: Table<Identity, ()>>(
    acl: &Acl<T>,
    caller: &Identity,
    role: Role,
) -> RelayResult<()> {
    if acl.contains(caller) {
        Ok(())
    } else {
        tracing::debug!(%caller, %role, "authorization refused");
        Err(RelayError::Unauthorized {
            role,
            caller: *caller,
        })
    }
}

/// Equality test against a single configured identity (the AM-client gate).
pub fn authorize_exact(
    expected: Option<&Identity>,
    caller: &Identity,
    role: Role,
) -> RelayResult<()> {
    match expected {
        None => Err(RelayError::NotConfigured("am identity")),
        Some(expected) if expected == caller => Ok(()),
        Some(_) => {
            tracing::debug!(%caller, %role, "authorization refused");
            Err(RelayError::Unauthorized {
                role,
                caller: *caller,
            })
        }
    }
}
