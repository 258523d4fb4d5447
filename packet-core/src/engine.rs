//! Packet engine
//!
//! This module ties the identity gate, ledger, packet store, and event log
//! into the high-level API: deposits, packet creation, and the claim
//! algorithm.
//!
//! # Atomicity
//!
//! Every multi-step effect is all-or-nothing. Packet creation's only fallible
//! effect is the creator debit, which runs first; allocation and the event
//! append cannot fail afterwards. A claim computes its new remainder and
//! credits the claimer *before* mutating the packet, all inside the packet's
//! entry lock, so no rejection leaves a half-applied claim and no two
//! concurrent claims can overspend the same packet.
//!
//! # Value conservation
//!
//! At all times `sum(balances) + sum(packet remainders) == sum(deposits)`.
//! Packet operations only move value between a creator's balance, a packet's
//! escrow, and claimers' balances. [`PacketEngine::check_value_conservation`]
//! audits the invariant against the event log.

use crate::events::{EventKind, EventLog, EventRecord};
use crate::gate::IdentityGate;
use crate::ledger::Ledger;
use crate::metrics::Metrics;
use crate::rng::{SplitRng, SystemDraw};
use crate::store::PacketStore;
use crate::types::{Amount, DistributionMode, Packet, PacketId, PacketSnapshot, UserId};
use crate::{Config, Error, Result};
use std::fmt;
use std::sync::Arc;

/// High-level packet ledger interface
pub struct PacketEngine {
    /// Identity verification gate
    gate: Arc<IdentityGate>,

    /// Balance ledger
    ledger: Arc<Ledger>,

    /// Packet records
    store: Arc<PacketStore>,

    /// Append-only transition log
    events: Arc<EventLog>,

    /// Draw source for random-mode splits
    rng: Arc<dyn SplitRng>,

    /// Metrics collector
    metrics: Metrics,

    /// Configuration
    config: Config,
}

impl fmt::Debug for PacketEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PacketEngine")
            .field("config", &self.config)
            .field("packets", &self.store.packet_count())
            .field("events", &self.events.len())
            .finish_non_exhaustive()
    }
}

impl PacketEngine {
    /// Build an engine with fresh components and the system draw source
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        let metrics = Metrics::new()
            .map_err(|e| Error::Config(format!("metrics initialization failed: {}", e)))?;

        Ok(Self {
            gate: Arc::new(IdentityGate::new()),
            ledger: Arc::new(Ledger::new()),
            store: Arc::new(PacketStore::new()),
            events: Arc::new(EventLog::new()),
            rng: Arc::new(SystemDraw),
            metrics,
            config,
        })
    }

    /// Replace the draw source (deterministic sources for tests/replay)
    pub fn with_rng(mut self, rng: Arc<dyn SplitRng>) -> Self {
        self.rng = rng;
        self
    }

    /// Identity gate handle
    pub fn gate(&self) -> &IdentityGate {
        &self.gate
    }

    /// Ledger handle (balance reads, direct deposits without event logging)
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Metrics collector
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Deposit value into an identity's custodial balance.
    ///
    /// No verification precondition: funding is allowed before identity
    /// proof. Returns the new balance.
    pub fn deposit(&self, user: &UserId, amount: Amount) -> Result<Amount> {
        let new_balance = self.ledger.deposit(user, amount)?;
        self.events.append(EventKind::Deposit, user, amount, None);
        self.metrics.record_deposit();
        Ok(new_balance)
    }

    /// Create a packet, escrowing `amount` from the creator's balance.
    ///
    /// Preconditions, first failure wins: creator verified, amount at least
    /// the configured minimum, recipient limit in range, sufficient balance.
    pub fn create_packet(
        &self,
        creator: &UserId,
        amount: Amount,
        recipient_limit: u32,
        mode: DistributionMode,
    ) -> Result<PacketId> {
        self.gate.require_verified(creator)?;

        let minimum = Amount::from(self.config.min_packet_amount);
        if amount < minimum {
            return Err(Error::BelowMinimum { amount, minimum });
        }

        if recipient_limit == 0 || recipient_limit > self.config.max_recipients {
            return Err(Error::InvalidRecipientCount(recipient_limit));
        }

        // The debit is the only fallible effect; it checks and subtracts the
        // balance under the creator's entry lock.
        self.ledger.debit(creator, amount)?;

        let id = self.store.allocate(creator, amount, recipient_limit, mode);
        self.events
            .append(EventKind::PacketCreated, creator, amount, Some(id));
        self.metrics.record_packet_created();

        tracing::info!(
            packet = %id,
            creator = %creator,
            amount,
            recipient_limit,
            mode = %mode,
            "packet created"
        );
        Ok(id)
    }

    /// Claim a share from a packet. Each verified identity may claim at most
    /// once per packet. Returns the claimed amount.
    pub fn claim_packet(&self, claimer: &UserId, packet_id: PacketId) -> Result<Amount> {
        let result = self.try_claim(claimer, packet_id);

        match &result {
            Ok((amount, exhausted)) => {
                self.metrics.record_claim();
                if *exhausted {
                    self.metrics.record_packet_exhausted();
                }
                tracing::info!(
                    packet = %packet_id,
                    claimer = %claimer,
                    amount,
                    exhausted,
                    "packet claimed"
                );
            }
            Err(err) => {
                self.metrics.record_claim_rejection();
                tracing::warn!(packet = %packet_id, claimer = %claimer, %err, "claim rejected");
            }
        }

        result.map(|(amount, _)| amount)
    }

    fn try_claim(&self, claimer: &UserId, packet_id: PacketId) -> Result<(Amount, bool)> {
        self.gate.require_verified(claimer)?;

        let min_claim = Amount::from(self.config.min_claim_amount);

        // The whole read-check-write runs under the packet's entry lock;
        // the ledger credit inside only takes the claimer's balance lock,
        // and ledger operations never take packet locks, so no cycle.
        self.store.update(packet_id, |packet| {
            if packet.remaining_amount == 0 {
                return Err(Error::PacketExhausted(packet_id));
            }
            if packet.claimed_by.contains(claimer) {
                return Err(Error::AlreadyClaimed {
                    user: claimer.clone(),
                    packet: packet_id,
                });
            }
            if packet.claim_count() >= packet.recipient_limit {
                return Err(Error::RecipientLimitReached(packet_id));
            }

            let amount = split_amount(packet, min_claim, self.rng.as_ref());

            // Computed before any mutation; a failure here or in the credit
            // leaves the packet untouched.
            let new_remaining = packet.remaining_amount.checked_sub(amount).ok_or(
                Error::ClaimExceedsRemainder {
                    claimed: amount,
                    remaining: packet.remaining_amount,
                },
            )?;
            self.ledger.credit(claimer, amount)?;

            packet.remaining_amount = new_remaining;
            packet.claimed_by.insert(claimer.clone());
            self.events
                .append(EventKind::PacketClaimed, claimer, amount, Some(packet_id));

            Ok((amount, packet.is_exhausted()))
        })
    }

    /// External read view of a packet. Never exposes the claim list.
    pub fn get_packet(&self, packet_id: PacketId) -> Result<PacketSnapshot> {
        self.store.snapshot(packet_id)
    }

    /// Full event history in append order (display/audit layer)
    pub fn history(&self) -> Vec<EventRecord> {
        self.events.snapshot()
    }

    /// Event history for one identity
    pub fn history_for(&self, user: &UserId) -> Vec<EventRecord> {
        self.events.for_user(user)
    }

    /// Verify value conservation against the event log:
    /// `sum(balances) + sum(packet remainders) == sum(deposits)`.
    pub fn check_value_conservation(&self) -> Result<bool> {
        let mut deposited: Amount = 0;
        for event in self.events.snapshot() {
            if event.kind == EventKind::Deposit {
                deposited = deposited
                    .checked_add(event.amount)
                    .ok_or(Error::ArithmeticOverflow)?;
            }
        }

        let held = self
            .ledger
            .total_balance()?
            .checked_add(self.store.total_remaining()?)
            .ok_or(Error::ArithmeticOverflow)?;

        Ok(held == deposited)
    }
}

/// Compute the claim amount for the next claimer.
///
/// The claim filling the final recipient slot takes the full remainder in
/// both modes, so a fully-claimed packet strands no dust. Otherwise the equal
/// mode pays the fixed floor share and the random mode draws from the
/// remaining pool, with sub-minimum draws raised to the configured floor
/// (never above the remainder).
fn split_amount(packet: &Packet, min_claim: Amount, rng: &dyn SplitRng) -> Amount {
    if packet.claim_count() + 1 == packet.recipient_limit {
        return packet.remaining_amount;
    }

    match packet.mode {
        DistributionMode::Equal => packet.total_amount / Amount::from(packet.recipient_limit),
        DistributionMode::Random => {
            let draw = rng.draw(packet.remaining_amount);
            if draw < min_claim {
                min_claim.min(packet.remaining_amount)
            } else {
                draw
            }
        }
    }
}
