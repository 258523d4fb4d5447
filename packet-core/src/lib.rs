//! Packet ledger core
//!
//! Custodial balances plus shareable value packets: verified users deposit
//! value, escrow a portion into a packet split among up to a bounded number
//! of recipients (evenly or pseudo-randomly), and other verified users claim
//! a share exactly once each.
//!
//! # Architecture
//!
//! - **IdentityGate**: verification precondition for state-mutating calls
//! - **Ledger**: per-identity spendable balances, checked arithmetic
//! - **PacketStore**: packet records under per-packet entry locks
//! - **PacketEngine**: creation invariants and the claim algorithm
//! - **EventLog**: append-only transition record for history and audit
//!
//! # Invariants
//!
//! - Value conservation: Σ(balances) + Σ(packet remainders) == Σ(deposits)
//! - At most one claim per identity per packet
//! - Exhaustion is terminal: a drained or fully-claimed packet rejects all
//!   further claims
//! - No operation leaves state partially mutated

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod config;
pub mod engine;
pub mod error;
pub mod events;
pub mod gate;
pub mod ledger;
pub mod metrics;
pub mod rng;
pub mod store;
pub mod types;

// Re-exports
pub use config::Config;
pub use engine::PacketEngine;
pub use error::{Error, Result};
pub use events::{EventKind, EventLog, EventRecord};
pub use gate::{IdentityGate, ProofVerifier};
pub use ledger::Ledger;
pub use rng::{SeededDraw, SplitRng, SystemDraw};
pub use store::PacketStore;
pub use types::{
    Amount, DistributionMode, Packet, PacketId, PacketPhase, PacketSnapshot, UserId,
};
