//! Per-channel sequence ledger.
//!
//! One monotonic counter per channel key, starting at 0 on first touch and
//! moving only through [`SequenceLedger::advance`]'s compare-and-increment
//! or an operator's [`SequenceLedger::force_set`]. The compare-and-increment
//! is the concurrency story of the whole bridge: the host chain serializes
//! transactions, so the second of two racing deliveries for the same slot
//! always sees the advanced value and fails. Records are never removed.

use relay_core::{MemoryTable, RelayError, RelayResult, Table};
use types::{ChannelKey, UNORDERED_SEQUENCE};

/// Monotonic per-channel counters over an injected storage table.
#[derive(Debug)]
pub struct SequenceLedger<T: Table<ChannelKey, u32> = MemoryTable<ChannelKey, u32>> {
    table: T,
}

impl SequenceLedger<MemoryTable<ChannelKey, u32>> {
    pub fn in_memory() -> Self {
        SequenceLedger {
            table: MemoryTable::new(),
        }
    }
}

impl<T: Table<ChannelKey, u32>> SequenceLedger<T> {
    pub fn new(table: T) -> Self {
        SequenceLedger { table }
    }

    /// Current value for the channel, creating the record at 0 on first
    /// access.
    pub fn get_or_init(&mut self, key: &ChannelKey) -> u32 {
        match self.table.get(key) {
            Some(sequence) => sequence,
            None => {
                self.table.insert(*key, 0);
                0
            }
        }
    }

    /// Read without creating the record; absent channels report 0.
    pub fn peek(&self, key: &ChannelKey) -> u32 {
        self.table.get(key).unwrap_or(0)
    }

    /// Compare-and-increment: succeeds only if the stored value equals
    /// `expected`, then stores and returns `expected + 1`. Never a blind
    /// increment, so stale or replayed numbers are rejected with the record
    /// left untouched.
    pub fn advance(&mut self, key: &ChannelKey, expected: u32) -> RelayResult<u32> {
        if expected == UNORDERED_SEQUENCE {
            return Err(RelayError::SentinelSequence);
        }
        let current = self.get_or_init(key);
        if current != expected {
            return Err(RelayError::SequenceMismatch {
                expected: current,
                got: expected,
            });
        }
        let next = expected + 1;
        // The counter must never reach the sentinel.
        if next == UNORDERED_SEQUENCE {
            return Err(RelayError::SentinelSequence);
        }
        self.table.insert(*key, next);
        Ok(next)
    }

    /// Operator override for manual recovery. Bypasses the comparison; the
    /// caller is responsible for authorization and for logging the action.
    pub fn force_set(&mut self, key: &ChannelKey, value: u32) -> RelayResult<()> {
        if value == UNORDERED_SEQUENCE {
            return Err(RelayError::SentinelSequence);
        }
        self.table.insert(*key, value);
        Ok(())
    }
}
