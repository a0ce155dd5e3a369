//! Races the wallet and bet engine from plain threads: per-account
//! serialization must not lose updates, and a bet must settle exactly
//! once no matter how many callers try.

use std::sync::Arc;
use std::thread;

use chrono::Utc;
use rust_decimal::Decimal;

use wager_engine::domain::{BetOutcome, EventStatus, LedgerStore, OptionId, TransactionKind};
use wager_engine::{BetEngine, MemoryCatalog, MemoryLedger, Wallet};

fn dec(s: &str) -> Decimal {
    s.parse().unwrap()
}

fn seeded_option(catalog: &MemoryCatalog) -> OptionId {
    let event = catalog.add_event(
        "Football",
        "Chelsea",
        "Arsenal",
        Utc::now(),
        EventStatus::Live,
    );
    catalog
        .add_option(event.id, "win", "home", dec("2.10"))
        .unwrap()
        .id
}

#[test]
fn simultaneous_deposits_are_never_lost() {
    const THREADS: usize = 8;
    const DEPOSITS_PER_THREAD: usize = 25;

    let store = Arc::new(MemoryLedger::new());
    store.create_account(1, Decimal::ZERO).unwrap();
    let wallet = Arc::new(Wallet::new(store.clone()));

    thread::scope(|scope| {
        for _ in 0..THREADS {
            let wallet = Arc::clone(&wallet);
            scope.spawn(move || {
                for _ in 0..DEPOSITS_PER_THREAD {
                    wallet.deposit(1, dec("10.00"), "deposit via card").unwrap();
                }
            });
        }
    });

    let expected = dec("10.00") * Decimal::from((THREADS * DEPOSITS_PER_THREAD) as u64);
    assert_eq!(wallet.balance(1).unwrap(), expected);

    let page = wallet.transactions(1, None, 1, usize::MAX).unwrap();
    assert_eq!(page.total, THREADS * DEPOSITS_PER_THREAD);
    let sum: Decimal = page.transactions.iter().map(|t| t.amount).sum();
    assert_eq!(sum, expected);
}

#[test]
fn concurrent_settlements_pick_exactly_one_winner() {
    let store = Arc::new(MemoryLedger::new());
    store.create_account(1, dec("1000.00")).unwrap();
    let catalog = Arc::new(MemoryCatalog::new());
    let option_id = seeded_option(&catalog);
    let wallet = Wallet::new(store.clone());
    let engine = Arc::new(BetEngine::new(store.clone(), catalog));

    let bet = engine.place_bet(1, option_id, dec("100.00")).unwrap();

    let outcomes: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                scope.spawn(move || engine.settle_bet(bet.id, BetOutcome::Won))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let wins = outcomes.iter().filter(|r| r.is_ok()).count();
    assert_eq!(wins, 1);
    for result in outcomes.iter().filter(|r| r.is_err()) {
        assert!(matches!(
            result,
            Err(wager_engine::Error::BetAlreadySettled(_))
        ));
    }

    assert_eq!(wallet.balance(1).unwrap(), dec("1110.00"));
    let payouts = wallet
        .transactions(1, Some(TransactionKind::PayoutCredit), 1, 10)
        .unwrap();
    assert_eq!(payouts.total, 1);
}

#[test]
fn concurrent_placements_respect_the_shared_balance() {
    let store = Arc::new(MemoryLedger::new());
    store.create_account(1, dec("100.00")).unwrap();
    let catalog = Arc::new(MemoryCatalog::new());
    let option_id = seeded_option(&catalog);
    let wallet = Wallet::new(store.clone());
    let engine = Arc::new(BetEngine::new(store.clone(), catalog));

    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = Arc::clone(&engine);
                scope.spawn(move || engine.place_bet(1, option_id, dec("30.00")))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Only three 30.00 stakes fit into 100.00.
    let placed = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(placed, 3);
    assert_eq!(wallet.balance(1).unwrap(), dec("10.00"));
    assert!(results.iter().any(|r| matches!(
        r,
        Err(wager_engine::Error::InsufficientBalance { .. })
    )));
}
