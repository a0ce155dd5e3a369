use futures::Stream;
use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountId, Bet, BetId, BettingOption, Error, Event, EventId, Instruction, OptionId,
    Transaction, TransactionKind, TransactionPage,
};

/// Feed of runner instructions (the stand-in for the request layer and
/// the external results feed).
pub trait InstructionStream {
    type Feed: Stream<Item = Result<Instruction, Error>> + Send + Unpin + 'static;
    fn stream(&mut self) -> Self::Feed;
}

pub trait DeadLetterQueue {
    fn report(&self, error: &Error);
}

/// Handle to one account's open critical section. Everything done
/// through it commits together; implementations order checks before
/// writes so an `Err` leaves no partial effect.
pub trait AccountUnit {
    fn account_id(&self) -> AccountId;

    fn balance(&self) -> Decimal;

    /// Append an immutable transaction row and apply its signed amount
    /// to the balance in the same atomic unit. Fails with
    /// `InsufficientBalance` if the amount would drive the balance
    /// negative.
    fn append_transaction(
        &mut self,
        kind: TransactionKind,
        amount: Decimal,
        description: &str,
    ) -> Result<Transaction, Error>;

    /// Insert a new pending bet owned by this account.
    fn insert_bet(
        &mut self,
        option_id: OptionId,
        stake: Decimal,
        odds: Decimal,
        potential_payout: Decimal,
    ) -> Result<Bet, Error>;

    fn bet_mut(&mut self, bet_id: BetId) -> Result<&mut Bet, Error>;
}

/// Storage seam for accounts, transactions, and bets. All mutation runs
/// inside [`LedgerStore::with_account`], which serializes operations on
/// one account while leaving other accounts free to proceed.
pub trait LedgerStore {
    type HistoryStream: Stream<Item = Transaction> + Send + Unpin + 'static;

    fn create_account(
        &self,
        account_id: AccountId,
        initial_balance: Decimal,
    ) -> Result<Account, Error>;

    fn with_account<T, F>(&self, account_id: AccountId, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut dyn AccountUnit) -> Result<T, Error>;

    fn account(&self, account_id: AccountId) -> Result<Account, Error>;

    fn list_transactions(
        &self,
        account_id: AccountId,
        filter: Option<TransactionKind>,
        page: usize,
        page_size: usize,
    ) -> Result<TransactionPage, Error>;

    /// Lazy, finite, restartable newest-first sequence over a snapshot
    /// of the account's history.
    fn transaction_stream(
        &self,
        account_id: AccountId,
        filter: Option<TransactionKind>,
    ) -> Result<Self::HistoryStream, Error>;

    fn sum_by_type(&self, account_id: AccountId, kind: TransactionKind) -> Result<Decimal, Error>;

    fn bet(&self, bet_id: BetId) -> Result<Bet, Error>;

    fn bet_account(&self, bet_id: BetId) -> Result<AccountId, Error>;
}

/// Read side of the event/option catalog supplied by the collaborating
/// catalog layer.
pub trait Catalog {
    fn event(&self, event_id: EventId) -> Result<Event, Error>;
    fn betting_option(&self, option_id: OptionId) -> Result<BettingOption, Error>;
}
