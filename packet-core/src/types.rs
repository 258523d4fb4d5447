//! Core types for the packet ledger
//!
//! All types are designed for:
//! - Serde-friendly external views (history/display layers)
//! - Memory safety (no unsafe code)
//! - Exact arithmetic (u128 smallest-unit amounts)

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Amount of value in the smallest indivisible unit.
///
/// 128 bits so that compounding deposits cannot overflow in practice;
/// every mutation still goes through checked arithmetic.
pub type Amount = u128;

/// Opaque user identity key, independent of the proof mechanism.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(String);

impl UserId {
    /// Create new user ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Packet identifier: sequential, monotonically assigned, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PacketId(u64);

impl PacketId {
    /// Wrap a raw id
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw id value (opaque token for sharing layers)
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for PacketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How a packet's escrowed value is split among claimers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionMode {
    /// Fixed per-claimer share: `total_amount / recipient_limit` (floor)
    Equal,
    /// Variable share drawn from the remaining pool
    Random,
}

impl fmt::Display for DistributionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistributionMode::Equal => write!(f, "equal"),
            DistributionMode::Random => write!(f, "random"),
        }
    }
}

/// An escrowed pool of value pending distribution.
///
/// Created atomically with a ledger debit from the creator, mutated only by
/// successful claims, never deleted (drained packets are retained for audit).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Packet {
    /// Unique sequential id
    pub id: PacketId,

    /// Identity that funded the packet
    pub creator: UserId,

    /// Original escrowed amount, fixed at creation, always > 0
    pub total_amount: Amount,

    /// Amount not yet claimed; monotonically non-increasing
    pub remaining_amount: Amount,

    /// Maximum number of distinct claimers, in `[1, 100]`
    pub recipient_limit: u32,

    /// Split mode
    pub mode: DistributionMode,

    /// Identities that have claimed from this packet (at most once each)
    pub claimed_by: HashSet<UserId>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Packet {
    /// Number of claims recorded so far
    pub fn claim_count(&self) -> u32 {
        self.claimed_by.len() as u32
    }

    /// Whether the packet is in its terminal state.
    ///
    /// Exhaustion is reached when either the pool is drained or every
    /// recipient slot is taken; it rejects all further claims.
    pub fn is_exhausted(&self) -> bool {
        self.remaining_amount == 0 || self.claim_count() >= self.recipient_limit
    }

    /// Derive the lifecycle phase from current state
    pub fn phase(&self) -> PacketPhase {
        if self.is_exhausted() {
            PacketPhase::Exhausted
        } else if self.claimed_by.is_empty() {
            PacketPhase::Funded
        } else {
            // Covers remaining == total with claims present (zero-share claims).
            PacketPhase::PartiallyClaimed
        }
    }

    /// External read view. Omits `claimed_by` membership (the claim list is
    /// private to the core).
    pub fn snapshot(&self) -> PacketSnapshot {
        PacketSnapshot {
            id: self.id,
            creator: self.creator.clone(),
            total_amount: self.total_amount,
            remaining_amount: self.remaining_amount,
            recipient_limit: self.recipient_limit,
            mode: self.mode,
            claim_count: self.claim_count(),
            phase: self.phase(),
            created_at: self.created_at,
        }
    }
}

/// Packet lifecycle phase, derived from state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PacketPhase {
    /// No claims yet, full pool available
    Funded,
    /// At least one claim, pool and slots still open
    PartiallyClaimed,
    /// Terminal: pool drained or recipient limit reached
    Exhausted,
}

/// Read-only packet view exposed to callers and display layers.
///
/// Deliberately does not carry the set of claimers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PacketSnapshot {
    /// Packet id
    pub id: PacketId,
    /// Funding identity
    pub creator: UserId,
    /// Original escrowed amount
    pub total_amount: Amount,
    /// Unclaimed amount
    pub remaining_amount: Amount,
    /// Maximum distinct claimers
    pub recipient_limit: u32,
    /// Split mode
    pub mode: DistributionMode,
    /// Number of claims so far
    pub claim_count: u32,
    /// Lifecycle phase
    pub phase: PacketPhase,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet(total: Amount, remaining: Amount, limit: u32, claims: &[&str]) -> Packet {
        Packet {
            id: PacketId::new(1),
            creator: UserId::new("alice"),
            total_amount: total,
            remaining_amount: remaining,
            recipient_limit: limit,
            mode: DistributionMode::Equal,
            claimed_by: claims.iter().map(|c| UserId::new(*c)).collect(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_phase_funded() {
        let p = packet(100, 100, 4, &[]);
        assert_eq!(p.phase(), PacketPhase::Funded);
        assert!(!p.is_exhausted());
    }

    #[test]
    fn test_phase_partially_claimed() {
        let p = packet(100, 75, 4, &["bob"]);
        assert_eq!(p.phase(), PacketPhase::PartiallyClaimed);
    }

    #[test]
    fn test_phase_partially_claimed_zero_share() {
        // A zero-value claim leaves remaining == total but the packet has moved on.
        let p = packet(1, 1, 4, &["bob"]);
        assert_eq!(p.phase(), PacketPhase::PartiallyClaimed);
    }

    #[test]
    fn test_phase_exhausted_by_drain() {
        let p = packet(100, 0, 4, &["bob", "carol"]);
        assert_eq!(p.phase(), PacketPhase::Exhausted);
        assert!(p.is_exhausted());
    }

    #[test]
    fn test_phase_exhausted_by_limit() {
        let p = packet(100, 10, 2, &["bob", "carol"]);
        assert_eq!(p.phase(), PacketPhase::Exhausted);
    }

    #[test]
    fn test_snapshot_hides_claimers() {
        let p = packet(100, 50, 4, &["bob", "carol"]);
        let snap = p.snapshot();
        assert_eq!(snap.claim_count, 2);
        let json = serde_json::to_string(&snap).unwrap();
        assert!(!json.contains("bob"));
        assert!(!json.contains("claimed_by"));
    }
}
