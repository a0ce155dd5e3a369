//! Property test: whatever sequence of wallet and bet operations is
//! thrown at an account, its balance equals the sum of its transaction
//! amounts and never goes negative.

use std::sync::Arc;

use proptest::prelude::*;
use rust_decimal::Decimal;

use wager_engine::domain::{BetId, BetOutcome, EventStatus, LedgerStore};
use wager_engine::{BetEngine, MemoryCatalog, MemoryLedger, Wallet};

#[derive(Debug, Clone)]
enum Op {
    Deposit(i64),
    Withdraw(i64),
    Place(i64),
    Settle(usize, u8),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (1i64..=500_00).prop_map(Op::Deposit),
        (1i64..=500_00).prop_map(Op::Withdraw),
        (1i64..=200_00).prop_map(Op::Place),
        (any::<usize>(), 0u8..3).prop_map(|(index, outcome)| Op::Settle(index, outcome)),
    ]
}

proptest! {
    #[test]
    fn balance_always_equals_transaction_sum(ops in prop::collection::vec(op_strategy(), 1..60)) {
        let store = Arc::new(MemoryLedger::new());
        store.create_account(1, Decimal::new(100_00, 2)).unwrap();
        let catalog = Arc::new(MemoryCatalog::new());
        let event = catalog.add_event(
            "Football",
            "Barcelona",
            "Real Madrid",
            chrono::Utc::now(),
            EventStatus::Live,
        );
        let option = catalog
            .add_option(event.id, "win", "home", Decimal::new(191, 2))
            .unwrap();
        let wallet = Wallet::new(store.clone());
        let engine = BetEngine::new(store.clone(), catalog);
        let mut bets: Vec<BetId> = Vec::new();

        for op in ops {
            match op {
                Op::Deposit(cents) => {
                    let _ = wallet.deposit(1, Decimal::new(cents, 2), "deposit via card");
                }
                Op::Withdraw(cents) => {
                    let _ = wallet.withdraw(1, Decimal::new(cents, 2), "withdrawal via bank");
                }
                Op::Place(cents) => {
                    if let Ok(bet) = engine.place_bet(1, option.id, Decimal::new(cents, 2)) {
                        bets.push(bet.id);
                    }
                }
                Op::Settle(index, outcome) => {
                    if !bets.is_empty() {
                        let bet_id = bets[index % bets.len()];
                        let outcome = match outcome {
                            0 => BetOutcome::Won,
                            1 => BetOutcome::Lost,
                            _ => BetOutcome::Cancelled,
                        };
                        let _ = engine.settle_bet(bet_id, outcome);
                    }
                }
            }

            let balance = wallet.balance(1).unwrap();
            prop_assert!(balance >= Decimal::ZERO);

            let page = wallet.transactions(1, None, 1, usize::MAX).unwrap();
            let sum: Decimal = page.transactions.iter().map(|t| t.amount).sum();
            prop_assert_eq!(balance, sum);
        }
    }
}
