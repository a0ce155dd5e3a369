//! Betting-exchange wallet/ledger and bet-settlement core.
//!
//! The crate moves money between an account's balance and its append-only
//! transaction history in a way that stays consistent and auditable under
//! concurrent requests. It has three layers:
//!
//! - [`ledger`]: the store — accounts, transactions, and bets behind
//!   per-account atomic units
//! - [`wallet`]: the only sanctioned path to a balance (deposits,
//!   withdrawals, history, summaries)
//! - [`engine`]: bet placement and the one-way settlement state machine
//!
//! The request-handling layer lives elsewhere and calls in-process; the
//! core performs no authentication and exposes no network surface. The
//! binary target is a runner that feeds CSV instructions through the same
//! entry points, standing in for the request layer and the external
//! results feed.
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//! use wager_engine::domain::{BetOutcome, EventStatus, LedgerStore};
//! use wager_engine::{BetEngine, MemoryCatalog, MemoryLedger, Wallet};
//!
//! # fn main() -> Result<(), wager_engine::Error> {
//! let store = Arc::new(MemoryLedger::new());
//! let catalog = Arc::new(MemoryCatalog::new());
//! let wallet = Wallet::new(store.clone());
//! let engine = BetEngine::new(store.clone(), catalog.clone());
//!
//! store.create_account(1, "1000.00".parse().unwrap())?;
//! let event = catalog.add_event(
//!     "Football",
//!     "Manchester United",
//!     "Liverpool",
//!     chrono::Utc::now(),
//!     EventStatus::Upcoming,
//! );
//! let option = catalog.add_option(event.id, "win", "home", "2.10".parse().unwrap())?;
//!
//! let bet = engine.place_bet(1, option.id, "100.00".parse().unwrap())?;
//! engine.settle_bet(bet.id, BetOutcome::Won)?;
//! let expected: rust_decimal::Decimal = "1110.00".parse().unwrap();
//! assert_eq!(wallet.balance(1)?, expected);
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod dlq;
pub mod domain;
pub mod engine;
pub mod ingestion;
pub mod ledger;
pub mod processor;
pub mod retry;
pub mod wallet;

pub use catalog::MemoryCatalog;
pub use dlq::TracingDlq;
pub use domain::Error;
pub use engine::BetEngine;
pub use ingestion::CsvReader;
pub use ledger::MemoryLedger;
pub use processor::Processor;
pub use wallet::{Receipt, Wallet, WalletSummary};
