use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

pub type AccountId = u64;

/// A user's cash account. The balance is derived state: it always equals
/// the sum of the account's transaction amounts and is mutated only
/// through the wallet entry points.
#[derive(Debug, Clone, Serialize)]
pub struct Account {
    pub id: AccountId,
    pub balance: Decimal,
    pub created_at: DateTime<Utc>,
}

impl Account {
    pub fn new(id: AccountId, balance: Decimal) -> Self {
        Self {
            id,
            balance,
            created_at: Utc::now(),
        }
    }
}
