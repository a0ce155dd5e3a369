use rust_decimal::Decimal;

use super::account::AccountId;
use super::bet::BetId;
use super::catalog::OptionId;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("account {0} already exists")]
    DuplicateAccount(AccountId),

    #[error("invalid amount: {0}")]
    InvalidAmount(Decimal),

    #[error("insufficient balance: available {available}, required {required}")]
    InsufficientBalance {
        available: Decimal,
        required: Decimal,
    },

    #[error("betting option {0} not found")]
    OptionNotFound(OptionId),

    #[error("betting option {0} is not open for bets")]
    OptionInactive(OptionId),

    #[error("invalid stake: {0}")]
    InvalidStake(Decimal),

    #[error("bet {0} not found")]
    BetNotFound(BetId),

    #[error("bet {0} already settled")]
    BetAlreadySettled(BetId),

    #[error("ingestion failed with: {0}")]
    Ingestion(String),

    #[error("storage failed with: {0}")]
    Storage(String),
}

impl Error {
    /// Stable machine-readable code for the collaborator boundary.
    /// Storage detail never leaks past the short cause string in the
    /// `Storage` message, which the crate itself generates.
    pub fn code(&self) -> &'static str {
        match self {
            Error::AccountNotFound(_) => "account_not_found",
            Error::DuplicateAccount(_) => "duplicate_account",
            Error::InvalidAmount(_) => "invalid_amount",
            Error::InsufficientBalance { .. } => "insufficient_balance",
            Error::OptionNotFound(_) => "option_not_found",
            Error::OptionInactive(_) => "option_inactive",
            Error::InvalidStake(_) => "invalid_stake",
            Error::BetNotFound(_) => "bet_not_found",
            Error::BetAlreadySettled(_) => "bet_already_settled",
            Error::Ingestion(_) => "ingestion",
            Error::Storage(_) => "storage",
        }
    }

    /// Transient failures are worth retrying; everything else is a
    /// deterministic rejection of the requested operation.
    pub fn is_transient(&self) -> bool {
        matches!(self, Error::Storage(_))
    }
}
