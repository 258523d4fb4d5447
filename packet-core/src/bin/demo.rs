//! Packet ledger walkthrough binary
//!
//! Verifies a handful of identities, funds a creator, and drains one packet
//! in each distribution mode, then prints the event history as JSON.

use packet_core::{Config, DistributionMode, PacketEngine, UserId};

fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("starting packet-core demo");

    let config = Config::from_env()?;
    let engine = PacketEngine::new(config)?;

    let alice = UserId::new("alice");
    let friends: Vec<UserId> = ["bob", "carol", "dave", "erin"]
        .iter()
        .map(|name| UserId::new(*name))
        .collect();

    engine.gate().mark_verified(&alice)?;
    for friend in &friends {
        engine.gate().mark_verified(friend)?;
    }

    engine.deposit(&alice, 10_000)?;
    tracing::info!(balance = engine.ledger().balance_of(&alice), "alice funded");

    let equal = engine.create_packet(&alice, 100, 4, DistributionMode::Equal)?;
    for friend in &friends {
        let amount = engine.claim_packet(friend, equal)?;
        tracing::info!(user = %friend, amount, "equal-mode claim");
    }

    let random = engine.create_packet(&alice, 1_000, 4, DistributionMode::Random)?;
    for friend in &friends {
        let amount = engine.claim_packet(friend, random)?;
        tracing::info!(user = %friend, amount, "random-mode claim");
    }

    anyhow::ensure!(
        engine.check_value_conservation()?,
        "value conservation violated"
    );

    for packet_id in [equal, random] {
        let snapshot = engine.get_packet(packet_id)?;
        tracing::info!(
            packet = %packet_id,
            phase = ?snapshot.phase,
            remaining = snapshot.remaining_amount,
            "final packet state"
        );
    }

    println!("{}", serde_json::to_string_pretty(&engine.history())?);
    Ok(())
}
