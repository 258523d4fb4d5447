//! Metrics collection for observability
//!
//! Prometheus metrics for monitoring the packet ledger:
//!
//! - `packet_deposits_total` - Total deposits recorded
//! - `packet_created_total` - Total packets created
//! - `packet_claims_total` - Total successful claims
//! - `packet_claim_rejections_total` - Claims rejected by a precondition
//! - `packet_open` - Packets not yet exhausted
//!
//! Counters are registered on an owned registry (not the process-global
//! default, which rejects duplicate names when multiple collectors exist).

use prometheus::{IntCounter, IntGauge, Opts, Registry};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Total deposits recorded
    pub deposits_total: IntCounter,

    /// Total packets created
    pub packets_created_total: IntCounter,

    /// Total successful claims
    pub claims_total: IntCounter,

    /// Claims rejected by a precondition
    pub claim_rejections_total: IntCounter,

    /// Packets not yet exhausted
    pub open_packets: IntGauge,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let deposits_total = IntCounter::with_opts(Opts::new(
            "packet_deposits_total",
            "Total deposits recorded",
        ))?;
        registry.register(Box::new(deposits_total.clone()))?;

        let packets_created_total = IntCounter::with_opts(Opts::new(
            "packet_created_total",
            "Total packets created",
        ))?;
        registry.register(Box::new(packets_created_total.clone()))?;

        let claims_total = IntCounter::with_opts(Opts::new(
            "packet_claims_total",
            "Total successful claims",
        ))?;
        registry.register(Box::new(claims_total.clone()))?;

        let claim_rejections_total = IntCounter::with_opts(Opts::new(
            "packet_claim_rejections_total",
            "Claims rejected by a precondition",
        ))?;
        registry.register(Box::new(claim_rejections_total.clone()))?;

        let open_packets =
            IntGauge::with_opts(Opts::new("packet_open", "Packets not yet exhausted"))?;
        registry.register(Box::new(open_packets.clone()))?;

        Ok(Self {
            deposits_total,
            packets_created_total,
            claims_total,
            claim_rejections_total,
            open_packets,
            registry,
        })
    }

    /// Record a deposit
    pub fn record_deposit(&self) {
        self.deposits_total.inc();
    }

    /// Record packet creation
    pub fn record_packet_created(&self) {
        self.packets_created_total.inc();
        self.open_packets.inc();
    }

    /// Record a successful claim
    pub fn record_claim(&self) {
        self.claims_total.inc();
    }

    /// Record a rejected claim
    pub fn record_claim_rejection(&self) {
        self.claim_rejections_total.inc();
    }

    /// Record a packet reaching exhaustion
    pub fn record_packet_exhausted(&self) {
        self.open_packets.dec();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
