use std::sync::Arc;

use rust_decimal::Decimal;
use serde::Serialize;

use crate::domain::{
    AccountId, AccountUnit, Error, LedgerStore, Transaction, TransactionKind, TransactionPage,
    money,
};
use crate::retry;

/// Result of a balance mutation: the transaction that was appended and
/// the balance it produced.
#[derive(Debug, Clone, Serialize)]
pub struct Receipt {
    pub balance: Decimal,
    pub transaction: Transaction,
}

/// Aggregate view over an account's history. `net_profit` is payouts
/// received minus stakes risked.
#[derive(Debug, Clone, Serialize)]
pub struct WalletSummary {
    pub balance: Decimal,
    pub total_deposits: Decimal,
    pub total_withdrawals: Decimal,
    pub total_bet_debits: Decimal,
    pub total_payout_credits: Decimal,
    pub net_profit: Decimal,
}

/// The only sanctioned path to an account's balance. Every mutation is
/// one atomic unit: the balance change and its ledger row commit
/// together or not at all.
#[derive(Debug)]
pub struct Wallet<S> {
    store: Arc<S>,
    retry: retry::Policy,
}

impl<S> Clone for Wallet<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            retry: self.retry,
        }
    }
}

fn positive(amount: Decimal) -> Result<Decimal, Error> {
    if amount <= Decimal::ZERO || !money::is_canonical(amount) {
        return Err(Error::InvalidAmount(amount));
    }
    Ok(money::canonical(amount))
}

impl<S: LedgerStore> Wallet<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            retry: retry::Policy::default(),
        }
    }

    pub fn deposit(
        &self,
        account_id: AccountId,
        amount: Decimal,
        description: &str,
    ) -> Result<Receipt, Error> {
        let amount = positive(amount)?;
        let receipt = self.retry.run(|| {
            self.store.with_account(account_id, |unit| {
                let transaction =
                    unit.append_transaction(TransactionKind::Deposit, amount, description)?;
                Ok(Receipt {
                    balance: unit.balance(),
                    transaction,
                })
            })
        })?;
        tracing::info!(account_id, row = %receipt.transaction, balance = %receipt.balance, "deposit applied");
        Ok(receipt)
    }

    pub fn withdraw(
        &self,
        account_id: AccountId,
        amount: Decimal,
        description: &str,
    ) -> Result<Receipt, Error> {
        let amount = positive(amount)?;
        let receipt = self.retry.run(|| {
            self.store.with_account(account_id, |unit| {
                let transaction =
                    unit.append_transaction(TransactionKind::Withdrawal, -amount, description)?;
                Ok(Receipt {
                    balance: unit.balance(),
                    transaction,
                })
            })
        })?;
        tracing::info!(account_id, row = %receipt.transaction, balance = %receipt.balance, "withdrawal applied");
        Ok(receipt)
    }

    pub fn balance(&self, account_id: AccountId) -> Result<Decimal, Error> {
        Ok(self.store.account(account_id)?.balance)
    }

    pub fn transactions(
        &self,
        account_id: AccountId,
        filter: Option<TransactionKind>,
        page: usize,
        page_size: usize,
    ) -> Result<TransactionPage, Error> {
        self.store
            .list_transactions(account_id, filter, page, page_size)
    }

    pub fn summary(&self, account_id: AccountId) -> Result<WalletSummary, Error> {
        let balance = self.store.account(account_id)?.balance;
        let total_deposits = self.store.sum_by_type(account_id, TransactionKind::Deposit)?;
        let total_withdrawals = self
            .store
            .sum_by_type(account_id, TransactionKind::Withdrawal)?
            .abs();
        let total_bet_debits = self
            .store
            .sum_by_type(account_id, TransactionKind::BetDebit)?
            .abs();
        let total_payout_credits = self
            .store
            .sum_by_type(account_id, TransactionKind::PayoutCredit)?;
        Ok(WalletSummary {
            balance,
            total_deposits,
            total_withdrawals,
            total_bet_debits,
            total_payout_credits,
            net_profit: money::canonical(total_payout_credits - total_bet_debits),
        })
    }
}

/// Stake debit posted inside a bet-placement atomic unit. Withdraw
/// semantics, logged as `bet_debit`; only the bet engine calls this.
pub(crate) fn post_bet_debit(
    unit: &mut dyn AccountUnit,
    amount: Decimal,
    description: &str,
) -> Result<Transaction, Error> {
    let amount = positive(amount)?;
    unit.append_transaction(TransactionKind::BetDebit, -amount, description)
}

/// Payout credit posted inside a settlement atomic unit. Deposit
/// semantics, logged as `payout_credit`; only the bet engine calls this.
pub(crate) fn post_payout_credit(
    unit: &mut dyn AccountUnit,
    amount: Decimal,
    description: &str,
) -> Result<Transaction, Error> {
    let amount = positive(amount)?;
    unit.append_transaction(TransactionKind::PayoutCredit, amount, description)
}
