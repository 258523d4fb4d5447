//! Property-based conservation tests
//!
//! For any sequence of deposit/create/claim operations, the value held in
//! balances plus the value escrowed in packets equals the value ever
//! deposited. Rejected operations must not disturb the invariant either.

use packet_core::{Config, DistributionMode, PacketEngine, PacketId, SeededDraw, UserId};
use proptest::prelude::*;
use std::sync::Arc;

const NUM_USERS: usize = 6;

#[derive(Debug, Clone)]
enum Op {
    Deposit { user: usize, amount: u128 },
    Create { user: usize, amount: u128, limit: u32, equal: bool },
    Claim { user: usize, packet: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..NUM_USERS, 1u128..=1_000).prop_map(|(user, amount)| Op::Deposit { user, amount }),
        (0..NUM_USERS, 1u128..=500, 1u32..=10, any::<bool>())
            .prop_map(|(user, amount, limit, equal)| Op::Create { user, amount, limit, equal }),
        (0..NUM_USERS, 0..32usize).prop_map(|(user, packet)| Op::Claim { user, packet }),
    ]
}

proptest! {
    #[test]
    fn conservation_holds_for_any_op_sequence(
        ops in proptest::collection::vec(op_strategy(), 1..80),
        seed in any::<u64>(),
    ) {
        let engine = PacketEngine::new(Config::default())
            .unwrap()
            .with_rng(Arc::new(SeededDraw::new(seed)));

        let users: Vec<UserId> = (0..NUM_USERS)
            .map(|i| UserId::new(format!("user-{}", i)))
            .collect();
        for user in &users {
            engine.gate().mark_verified(user).unwrap();
        }

        let mut packets: Vec<PacketId> = Vec::new();

        for op in ops {
            match op {
                Op::Deposit { user, amount } => {
                    let _ = engine.deposit(&users[user], amount);
                }
                Op::Create { user, amount, limit, equal } => {
                    let mode = if equal {
                        DistributionMode::Equal
                    } else {
                        DistributionMode::Random
                    };
                    if let Ok(id) = engine.create_packet(&users[user], amount, limit, mode) {
                        packets.push(id);
                    }
                }
                Op::Claim { user, packet } => {
                    if !packets.is_empty() {
                        let id = packets[packet % packets.len()];
                        let _ = engine.claim_packet(&users[user], id);
                    }
                }
            }

            // The invariant holds after every step, success or rejection.
            prop_assert!(engine.check_value_conservation().unwrap());
        }
    }

    #[test]
    fn claims_never_exceed_prior_remainder(
        amount in 1u128..=10_000,
        limit in 1u32..=20,
        seed in any::<u64>(),
    ) {
        let engine = PacketEngine::new(Config::default())
            .unwrap()
            .with_rng(Arc::new(SeededDraw::new(seed)));

        let alice = UserId::new("alice");
        engine.gate().mark_verified(&alice).unwrap();
        engine.deposit(&alice, amount).unwrap();
        let id = engine
            .create_packet(&alice, amount, limit, DistributionMode::Random)
            .unwrap();

        for i in 0..limit {
            let claimer = UserId::new(format!("claimer-{}", i));
            engine.gate().mark_verified(&claimer).unwrap();

            let before = engine.get_packet(id).unwrap().remaining_amount;
            match engine.claim_packet(&claimer, id) {
                Ok(claimed) => {
                    prop_assert!(claimed >= 1);
                    prop_assert!(claimed <= before);
                }
                Err(_) => prop_assert_eq!(before, 0),
            }
        }

        // Slots exhausted: the final sweep drains the packet exactly.
        let snapshot = engine.get_packet(id).unwrap();
        prop_assert_eq!(snapshot.remaining_amount, 0);
        prop_assert!(engine.check_value_conservation().unwrap());
    }
}
