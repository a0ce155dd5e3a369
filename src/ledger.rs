use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use futures::stream;
use rust_decimal::Decimal;

use crate::domain::{
    Account, AccountId, AccountUnit, Bet, BetId, BetStatus, Error, LedgerStore, OptionId,
    Transaction, TransactionKind, TransactionPage, money,
};

/// Everything owned by one account, guarded by one mutex: the account
/// row, its append-only transaction history, and its bets. Locking the
/// entry is the per-account critical section from which every atomic
/// unit is built.
#[derive(Debug)]
struct AccountEntry {
    account: Account,
    transactions: Vec<Transaction>,
    bets: HashMap<BetId, Bet>,
}

/// In-memory ledger store.
///
/// Lock order: an account entry mutex may be held while taking the bet
/// index write lock, never the reverse; lookups that only read the index
/// take no account lock. Operations on different accounts share nothing
/// but the outer map's read lock and proceed independently.
#[derive(Debug, Default)]
pub struct MemoryLedger {
    accounts: RwLock<HashMap<AccountId, Arc<Mutex<AccountEntry>>>>,
    bet_owners: RwLock<HashMap<BetId, AccountId>>,
    next_transaction_id: AtomicU64,
    next_bet_id: AtomicU64,
}

fn poisoned(what: &str) -> Error {
    Error::Storage(format!("{what} lock poisoned"))
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self {
            accounts: RwLock::new(HashMap::new()),
            bet_owners: RwLock::new(HashMap::new()),
            next_transaction_id: AtomicU64::new(1),
            next_bet_id: AtomicU64::new(1),
        }
    }

    /// All known account ids, ascending. Used by the runner's final
    /// report.
    pub fn account_ids(&self) -> Vec<AccountId> {
        let accounts = match self.accounts.read() {
            Ok(accounts) => accounts,
            Err(_) => return Vec::new(),
        };
        let mut ids: Vec<AccountId> = accounts.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn entry(&self, account_id: AccountId) -> Result<Arc<Mutex<AccountEntry>>, Error> {
        let accounts = self.accounts.read().map_err(|_| poisoned("account map"))?;
        accounts
            .get(&account_id)
            .cloned()
            .ok_or(Error::AccountNotFound(account_id))
    }

    fn filtered_newest_first(
        entry: &AccountEntry,
        filter: Option<TransactionKind>,
    ) -> Vec<Transaction> {
        // Append order is chronological, so newest-first is the reverse
        // (ties on created_at break by descending id).
        let mut items: Vec<Transaction> = entry
            .transactions
            .iter()
            .filter(|t| filter.is_none_or(|kind| t.kind == kind))
            .cloned()
            .collect();
        items.reverse();
        items
    }
}

struct MemoryUnit<'a> {
    entry: &'a mut AccountEntry,
    ledger: &'a MemoryLedger,
}

impl AccountUnit for MemoryUnit<'_> {
    fn account_id(&self) -> AccountId {
        self.entry.account.id
    }

    fn balance(&self) -> Decimal {
        self.entry.account.balance
    }

    fn append_transaction(
        &mut self,
        kind: TransactionKind,
        amount: Decimal,
        description: &str,
    ) -> Result<Transaction, Error> {
        let balance = self.entry.account.balance;
        let new_balance = balance + amount;
        if new_balance < Decimal::ZERO {
            return Err(Error::InsufficientBalance {
                available: balance,
                required: amount.abs(),
            });
        }
        let transaction = Transaction {
            id: self
                .ledger
                .next_transaction_id
                .fetch_add(1, Ordering::Relaxed),
            account_id: self.entry.account.id,
            kind,
            amount,
            description: description.to_owned(),
            created_at: Utc::now(),
        };
        self.entry.account.balance = new_balance;
        self.entry.transactions.push(transaction.clone());
        Ok(transaction)
    }

    fn insert_bet(
        &mut self,
        option_id: OptionId,
        stake: Decimal,
        odds: Decimal,
        potential_payout: Decimal,
    ) -> Result<Bet, Error> {
        let mut owners = self
            .ledger
            .bet_owners
            .write()
            .map_err(|_| poisoned("bet index"))?;
        let bet = Bet {
            id: self.ledger.next_bet_id.fetch_add(1, Ordering::Relaxed),
            account_id: self.entry.account.id,
            option_id,
            stake,
            odds,
            potential_payout,
            status: BetStatus::Pending,
            placed_at: Utc::now(),
            settled_at: None,
        };
        owners.insert(bet.id, bet.account_id);
        drop(owners);
        self.entry.bets.insert(bet.id, bet.clone());
        Ok(bet)
    }

    fn bet_mut(&mut self, bet_id: BetId) -> Result<&mut Bet, Error> {
        self.entry
            .bets
            .get_mut(&bet_id)
            .ok_or(Error::BetNotFound(bet_id))
    }
}

impl LedgerStore for MemoryLedger {
    type HistoryStream = stream::Iter<std::vec::IntoIter<Transaction>>;

    fn create_account(
        &self,
        account_id: AccountId,
        initial_balance: Decimal,
    ) -> Result<Account, Error> {
        if initial_balance < Decimal::ZERO || !money::is_canonical(initial_balance) {
            return Err(Error::InvalidAmount(initial_balance));
        }
        let initial_balance = money::canonical(initial_balance);
        let mut accounts = self.accounts.write().map_err(|_| poisoned("account map"))?;
        match accounts.entry(account_id) {
            Entry::Occupied(_) => Err(Error::DuplicateAccount(account_id)),
            Entry::Vacant(slot) => {
                let mut entry = AccountEntry {
                    account: Account::new(account_id, money::canonical(Decimal::ZERO)),
                    transactions: Vec::new(),
                    bets: HashMap::new(),
                };
                // A non-zero opening balance is itself a ledger row, so
                // balance == sum(amounts) holds from the first read.
                if initial_balance > Decimal::ZERO {
                    entry.transactions.push(Transaction {
                        id: self.next_transaction_id.fetch_add(1, Ordering::Relaxed),
                        account_id,
                        kind: TransactionKind::Deposit,
                        amount: initial_balance,
                        description: "opening balance".to_owned(),
                        created_at: Utc::now(),
                    });
                    entry.account.balance = initial_balance;
                }
                let account = entry.account.clone();
                slot.insert(Arc::new(Mutex::new(entry)));
                Ok(account)
            }
        }
    }

    fn with_account<T, F>(&self, account_id: AccountId, f: F) -> Result<T, Error>
    where
        F: FnOnce(&mut dyn AccountUnit) -> Result<T, Error>,
    {
        let entry = self.entry(account_id)?;
        let mut guard = entry.lock().map_err(|_| poisoned("account entry"))?;
        let mut unit = MemoryUnit {
            entry: &mut *guard,
            ledger: self,
        };
        f(&mut unit)
    }

    fn account(&self, account_id: AccountId) -> Result<Account, Error> {
        let entry = self.entry(account_id)?;
        let guard = entry.lock().map_err(|_| poisoned("account entry"))?;
        Ok(guard.account.clone())
    }

    fn list_transactions(
        &self,
        account_id: AccountId,
        filter: Option<TransactionKind>,
        page: usize,
        page_size: usize,
    ) -> Result<TransactionPage, Error> {
        let entry = self.entry(account_id)?;
        let guard = entry.lock().map_err(|_| poisoned("account entry"))?;
        let page = page.max(1);
        let page_size = page_size.max(1);
        let items = Self::filtered_newest_first(&guard, filter);
        let total = items.len();
        let pages = total.div_ceil(page_size);
        let transactions = items
            .into_iter()
            .skip((page - 1).saturating_mul(page_size))
            .take(page_size)
            .collect();
        Ok(TransactionPage {
            transactions,
            total,
            pages,
            page,
        })
    }

    fn transaction_stream(
        &self,
        account_id: AccountId,
        filter: Option<TransactionKind>,
    ) -> Result<Self::HistoryStream, Error> {
        let entry = self.entry(account_id)?;
        let guard = entry.lock().map_err(|_| poisoned("account entry"))?;
        let items = Self::filtered_newest_first(&guard, filter);
        Ok(stream::iter(items))
    }

    fn sum_by_type(&self, account_id: AccountId, kind: TransactionKind) -> Result<Decimal, Error> {
        let entry = self.entry(account_id)?;
        let guard = entry.lock().map_err(|_| poisoned("account entry"))?;
        let sum = guard
            .transactions
            .iter()
            .filter(|t| t.kind == kind)
            .map(|t| t.amount)
            .sum();
        Ok(money::canonical(sum))
    }

    fn bet(&self, bet_id: BetId) -> Result<Bet, Error> {
        let account_id = self.bet_account(bet_id)?;
        let entry = self.entry(account_id)?;
        let guard = entry.lock().map_err(|_| poisoned("account entry"))?;
        guard
            .bets
            .get(&bet_id)
            .cloned()
            .ok_or(Error::BetNotFound(bet_id))
    }

    fn bet_account(&self, bet_id: BetId) -> Result<AccountId, Error> {
        let owners = self.bet_owners.read().map_err(|_| poisoned("bet index"))?;
        owners
            .get(&bet_id)
            .copied()
            .ok_or(Error::BetNotFound(bet_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn transaction_sum(ledger: &MemoryLedger, account_id: AccountId) -> Decimal {
        let page = ledger
            .list_transactions(account_id, None, 1, usize::MAX)
            .unwrap();
        page.transactions.iter().map(|t| t.amount).sum()
    }

    #[test]
    fn opening_balance_is_a_ledger_row() {
        let ledger = MemoryLedger::new();
        let account = ledger.create_account(1, dec("1000.00")).unwrap();
        assert_eq!(account.balance, dec("1000.00"));

        let page = ledger.list_transactions(1, None, 1, 10).unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.transactions[0].kind, TransactionKind::Deposit);
        assert_eq!(page.transactions[0].description, "opening balance");
        assert_eq!(transaction_sum(&ledger, 1), account.balance);
    }

    #[test]
    fn duplicate_account_is_rejected() {
        let ledger = MemoryLedger::new();
        ledger.create_account(7, Decimal::ZERO).unwrap();
        assert!(matches!(
            ledger.create_account(7, dec("5.00")),
            Err(Error::DuplicateAccount(7))
        ));
    }

    #[test]
    fn negative_opening_balance_is_rejected() {
        let ledger = MemoryLedger::new();
        assert!(matches!(
            ledger.create_account(1, dec("-1.00")),
            Err(Error::InvalidAmount(_))
        ));
    }

    #[test]
    fn unknown_account_fails_lookups() {
        let ledger = MemoryLedger::new();
        assert!(matches!(
            ledger.account(42),
            Err(Error::AccountNotFound(42))
        ));
        assert!(matches!(
            ledger.with_account(42, |_| Ok(())),
            Err(Error::AccountNotFound(42))
        ));
    }

    #[test]
    fn append_updates_balance_and_history_atomically() {
        let ledger = MemoryLedger::new();
        ledger.create_account(1, dec("100.00")).unwrap();
        ledger
            .with_account(1, |unit| {
                unit.append_transaction(TransactionKind::Withdrawal, dec("-40.00"), "test")
            })
            .unwrap();
        assert_eq!(ledger.account(1).unwrap().balance, dec("60.00"));
        assert_eq!(transaction_sum(&ledger, 1), dec("60.00"));
    }

    #[test]
    fn overdraw_fails_inside_the_unit_with_no_effect() {
        let ledger = MemoryLedger::new();
        ledger.create_account(1, dec("10.00")).unwrap();
        let result = ledger.with_account(1, |unit| {
            unit.append_transaction(TransactionKind::Withdrawal, dec("-10.01"), "test")
        });
        assert!(matches!(result, Err(Error::InsufficientBalance { .. })));
        assert_eq!(ledger.account(1).unwrap().balance, dec("10.00"));
        assert_eq!(ledger.list_transactions(1, None, 1, 10).unwrap().total, 1);
    }

    #[test]
    fn pagination_is_newest_first_with_totals() {
        let ledger = MemoryLedger::new();
        ledger.create_account(1, Decimal::ZERO).unwrap();
        for i in 1..=5 {
            ledger
                .with_account(1, |unit| {
                    unit.append_transaction(
                        TransactionKind::Deposit,
                        Decimal::new(i, 0),
                        &format!("deposit {i}"),
                    )
                })
                .unwrap();
        }

        let page = ledger.list_transactions(1, None, 1, 2).unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.pages, 3);
        assert_eq!(page.transactions[0].description, "deposit 5");
        assert_eq!(page.transactions[1].description, "deposit 4");

        let last = ledger.list_transactions(1, None, 3, 2).unwrap();
        assert_eq!(last.transactions.len(), 1);
        assert_eq!(last.transactions[0].description, "deposit 1");

        // Out-of-range pages come back empty, not as an error.
        let beyond = ledger.list_transactions(1, None, 9, 2).unwrap();
        assert!(beyond.transactions.is_empty());
        assert_eq!(beyond.total, 5);
    }

    #[test]
    fn filter_and_sum_by_type() {
        let ledger = MemoryLedger::new();
        ledger.create_account(1, Decimal::ZERO).unwrap();
        ledger
            .with_account(1, |unit| {
                unit.append_transaction(TransactionKind::Deposit, dec("50.00"), "d")?;
                unit.append_transaction(TransactionKind::BetDebit, dec("-20.00"), "b")?;
                unit.append_transaction(TransactionKind::Deposit, dec("25.00"), "d")
            })
            .unwrap();

        let deposits = ledger
            .list_transactions(1, Some(TransactionKind::Deposit), 1, 10)
            .unwrap();
        assert_eq!(deposits.total, 2);
        assert_eq!(
            ledger.sum_by_type(1, TransactionKind::Deposit).unwrap(),
            dec("75.00")
        );
        assert_eq!(
            ledger.sum_by_type(1, TransactionKind::BetDebit).unwrap(),
            dec("-20.00")
        );
        assert_eq!(
            ledger.sum_by_type(1, TransactionKind::Withdrawal).unwrap(),
            dec("0.00")
        );
    }

    #[tokio::test]
    async fn transaction_stream_is_restartable() {
        let ledger = MemoryLedger::new();
        ledger.create_account(1, dec("10.00")).unwrap();
        for _ in 0..2 {
            let stream = ledger.transaction_stream(1, None).unwrap();
            let items: Vec<Transaction> = stream.collect().await;
            assert_eq!(items.len(), 1);
            assert_eq!(items[0].amount, dec("10.00"));
        }
    }

    #[test]
    fn bets_are_routed_through_the_owner_index() {
        let ledger = MemoryLedger::new();
        ledger.create_account(3, dec("100.00")).unwrap();
        let bet = ledger
            .with_account(3, |unit| {
                unit.insert_bet(1, dec("10.00"), dec("2.10"), dec("21.00"))
            })
            .unwrap();
        assert_eq!(ledger.bet_account(bet.id).unwrap(), 3);
        assert_eq!(ledger.bet(bet.id).unwrap().status, BetStatus::Pending);
        assert!(matches!(ledger.bet(99), Err(Error::BetNotFound(99))));
    }
}
