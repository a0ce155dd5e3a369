pub mod account;
pub mod bet;
pub mod catalog;
pub mod error;
pub mod instruction;
pub mod money;
pub mod traits;
pub mod transaction;

pub use account::{Account, AccountId};
pub use bet::{Bet, BetId, BetOutcome, BetStatus};
pub use catalog::{BettingOption, Event, EventId, EventStatus, OptionId};
pub use error::Error;
pub use instruction::Instruction;
pub use traits::{AccountUnit, Catalog, DeadLetterQueue, InstructionStream, LedgerStore};
pub use transaction::{Transaction, TransactionId, TransactionKind, TransactionPage};
