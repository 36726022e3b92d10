//! Save supersession ledger.
//!
//! Every persistence request carries a monotonically increasing sequence
//! number. A settlement takes effect only when it belongs to the newest
//! issued request; everything else is superseded, so a slow response can
//! never clobber newer local state regardless of arrival order. A naive
//! "last response wins" is the bug class this exists to rule out.

use std::collections::BTreeSet;

/// Sequence tag handed out when a save is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveTicket {
    pub seq: u64,
}

/// Terminal result of one persistence attempt. Timeouts are failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveResult {
    Saved,
    Failed { reason: String },
}

/// What a settlement meant once sequenced against the ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettleOutcome {
    /// This settlement belongs to the newest issued save and takes effect.
    Applied(SaveResult),
    /// A newer save was issued in the meantime, or the ticket was already
    /// settled; the response is dropped.
    Superseded,
}

/// Tracks issued and settled saves for one dashboard view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SaveLedger {
    next_seq: u64,
    open: BTreeSet<u64>,
    applied_seq: Option<u64>,
    last_applied: Option<SaveResult>,
}

impl SaveLedger {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue the next save; its ticket supersedes every earlier one.
    pub fn issue(&mut self) -> SaveTicket {
        self.next_seq += 1;
        self.open.insert(self.next_seq);
        SaveTicket { seq: self.next_seq }
    }

    /// Sequence a settlement. Applied only when the ticket is the newest
    /// issued and has not been settled before.
    pub fn settle(&mut self, ticket: SaveTicket, result: SaveResult) -> SettleOutcome {
        if !self.open.remove(&ticket.seq) {
            return SettleOutcome::Superseded;
        }
        if ticket.seq != self.next_seq {
            return SettleOutcome::Superseded;
        }
        self.applied_seq = Some(ticket.seq);
        self.last_applied = Some(result.clone());
        SettleOutcome::Applied(result)
    }

    /// Issued saves that have not settled yet.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.open.len()
    }

    #[must_use]
    pub fn applied_seq(&self) -> Option<u64> {
        self.applied_seq
    }

    #[must_use]
    pub fn last_applied(&self) -> Option<&SaveResult> {
        self.last_applied.as_ref()
    }
}
