//! Packet storage
//!
//! Owns the set of packets and hands out sequential ids. Mutations run under
//! the packet's map entry lock via [`PacketStore::update`], which gives each
//! packet the single-writer-at-a-time discipline the claim algorithm needs:
//! concurrent claims against the same packet serialize, claims against
//! different packets proceed in parallel. Packets are never deleted, only
//! drained (retained for audit and history).

use crate::types::{Amount, DistributionMode, Packet, PacketId, PacketSnapshot, UserId};
use crate::{Error, Result};
use chrono::Utc;
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::atomic::{AtomicU64, Ordering};

/// Owner of all packet records
#[derive(Debug)]
pub struct PacketStore {
    packets: DashMap<PacketId, Packet>,
    next_id: AtomicU64,
}

impl Default for PacketStore {
    fn default() -> Self {
        Self {
            packets: DashMap::new(),
            next_id: AtomicU64::new(1),
        }
    }
}

impl PacketStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate a new packet under the next sequential id.
    ///
    /// The caller (engine) has already debited the escrowed amount; the new
    /// packet starts fully funded with an empty claim set.
    pub fn allocate(
        &self,
        creator: &UserId,
        amount: Amount,
        recipient_limit: u32,
        mode: DistributionMode,
    ) -> PacketId {
        let id = PacketId::new(self.next_id.fetch_add(1, Ordering::SeqCst));
        let packet = Packet {
            id,
            creator: creator.clone(),
            total_amount: amount,
            remaining_amount: amount,
            recipient_limit,
            mode,
            claimed_by: HashSet::new(),
            created_at: Utc::now(),
        };
        self.packets.insert(id, packet);
        id
    }

    /// Run a closure against a packet under its entry lock.
    ///
    /// The closure sees the packet's read-check-write as one atomic unit; a
    /// returned error leaves whatever the closure did not touch unchanged.
    pub fn update<T>(
        &self,
        id: PacketId,
        f: impl FnOnce(&mut Packet) -> Result<T>,
    ) -> Result<T> {
        match self.packets.get_mut(&id) {
            Some(mut entry) => f(entry.value_mut()),
            None => Err(Error::PacketNotFound(id)),
        }
    }

    /// External read view of a packet
    pub fn snapshot(&self, id: PacketId) -> Result<PacketSnapshot> {
        self.packets
            .get(&id)
            .map(|p| p.snapshot())
            .ok_or(Error::PacketNotFound(id))
    }

    /// Whether a packet exists
    pub fn contains(&self, id: PacketId) -> bool {
        self.packets.contains_key(&id)
    }

    /// Number of packets ever created
    pub fn packet_count(&self) -> usize {
        self.packets.len()
    }

    /// Sum of unclaimed escrow across all packets, for conservation audits
    pub fn total_remaining(&self) -> Result<Amount> {
        let mut total: Amount = 0;
        for entry in self.packets.iter() {
            total = total
                .checked_add(entry.remaining_amount)
                .ok_or(Error::ArithmeticOverflow)?;
        }
        Ok(total)
    }
}
