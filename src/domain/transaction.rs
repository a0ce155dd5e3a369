use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountId;

pub type TransactionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Deposit,
    Withdrawal,
    BetDebit,
    PayoutCredit,
}

impl core::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let repr = match self {
            TransactionKind::Deposit => "deposit",
            TransactionKind::Withdrawal => "withdrawal",
            TransactionKind::BetDebit => "bet_debit",
            TransactionKind::PayoutCredit => "payout_credit",
        };
        write!(f, "{repr}")
    }
}

/// An immutable ledger row. The amount is the signed balance delta:
/// positive for deposits and payout credits, negative for withdrawals
/// and bet debits.
#[derive(Debug, Clone, Serialize)]
pub struct Transaction {
    pub id: TransactionId,
    pub account_id: AccountId,
    pub kind: TransactionKind,
    pub amount: Decimal,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl core::fmt::Display for Transaction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "{},account={},tx={},amount={}",
            self.kind, self.account_id, self.id, self.amount
        )
    }
}

/// One page of newest-first transaction history plus pagination totals.
#[derive(Debug, Clone, Serialize)]
pub struct TransactionPage {
    pub transactions: Vec<Transaction>,
    pub total: usize,
    pub pages: usize,
    pub page: usize,
}
