//! Append-only event log
//!
//! Every state transition (deposit, packet creation, claim) is recorded for
//! external observation: history views, audit, conservation checks. Entries
//! are write-once and kept in append order.

use crate::types::{Amount, PacketId, UserId};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Value entered a custodial balance
    Deposit,
    /// Value moved from a balance into packet escrow
    PacketCreated,
    /// Value moved from packet escrow to a claimer's balance
    PacketClaimed,
}

/// A single write-once log entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    /// Unique event ID (UUIDv7 for time-ordering)
    pub event_id: Uuid,

    /// Transition kind
    pub kind: EventKind,

    /// Identity the transition applies to (depositor, creator, or claimer)
    pub user: UserId,

    /// Amount moved
    pub amount: Amount,

    /// Packet involved, if any
    pub packet_id: Option<PacketId>,

    /// Event timestamp
    pub timestamp: DateTime<Utc>,
}

/// Append-only record of state transitions
#[derive(Debug, Default)]
pub struct EventLog {
    entries: RwLock<Vec<EventRecord>>,
}

impl EventLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry, returning its event id
    pub fn append(
        &self,
        kind: EventKind,
        user: &UserId,
        amount: Amount,
        packet_id: Option<PacketId>,
    ) -> Uuid {
        let record = EventRecord {
            event_id: Uuid::now_v7(),
            kind,
            user: user.clone(),
            amount,
            packet_id,
            timestamp: Utc::now(),
        };
        let event_id = record.event_id;
        self.entries.write().push(record);
        event_id
    }

    /// All entries in append order
    pub fn snapshot(&self) -> Vec<EventRecord> {
        self.entries.read().clone()
    }

    /// Entries for one identity, in append order
    pub fn for_user(&self, user: &UserId) -> Vec<EventRecord> {
        self.entries
            .read()
            .iter()
            .filter(|e| &e.user == user)
            .cloned()
            .collect()
    }

    /// Entries touching one packet, in append order
    pub fn for_packet(&self, packet_id: PacketId) -> Vec<EventRecord> {
        self.entries
            .read()
            .iter()
            .filter(|e| e.packet_id == Some(packet_id))
            .cloned()
            .collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_append_order_preserved() {
        let log = EventLog::new();
        let alice = UserId::new("alice");

        log.append(EventKind::Deposit, &alice, 100, None);
        log.append(EventKind::PacketCreated, &alice, 60, Some(PacketId::new(1)));
        log.append(EventKind::PacketClaimed, &alice, 15, Some(PacketId::new(1)));

        let entries = log.snapshot();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].kind, EventKind::Deposit);
        assert_eq!(entries[1].kind, EventKind::PacketCreated);
        assert_eq!(entries[2].kind, EventKind::PacketClaimed);
        assert!(entries[0].timestamp <= entries[2].timestamp);
    }

    #[test]
    fn test_filter_by_user_and_packet() {
        let log = EventLog::new();
        let alice = UserId::new("alice");
        let bob = UserId::new("bob");
        let packet = PacketId::new(7);

        log.append(EventKind::Deposit, &alice, 100, None);
        log.append(EventKind::Deposit, &bob, 50, None);
        log.append(EventKind::PacketCreated, &alice, 60, Some(packet));
        log.append(EventKind::PacketClaimed, &bob, 20, Some(packet));

        assert_eq!(log.for_user(&alice).len(), 2);
        assert_eq!(log.for_user(&bob).len(), 2);
        assert_eq!(log.for_packet(packet).len(), 2);
        assert_eq!(log.len(), 4);
    }

    #[test]
    fn test_event_ids_unique() {
        let log = EventLog::new();
        let alice = UserId::new("alice");

        let a = log.append(EventKind::Deposit, &alice, 1, None);
        let b = log.append(EventKind::Deposit, &alice, 1, None);
        assert_ne!(a, b);
    }
}
