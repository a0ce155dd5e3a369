use rust_decimal::Decimal;

use super::account::AccountId;
use super::bet::{BetId, BetOutcome};
use super::catalog::OptionId;

/// One operation submitted to the runner by the instruction feed.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    OpenAccount {
        account_id: AccountId,
        initial_balance: Decimal,
    },
    Deposit {
        account_id: AccountId,
        amount: Decimal,
    },
    Withdraw {
        account_id: AccountId,
        amount: Decimal,
    },
    PlaceBet {
        account_id: AccountId,
        option_id: OptionId,
        stake: Decimal,
    },
    SettleBet {
        bet_id: BetId,
        outcome: BetOutcome,
    },
}

impl core::fmt::Display for Instruction {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Instruction::OpenAccount {
                account_id,
                initial_balance,
            } => write!(f, "open,account={account_id},amount={initial_balance}"),
            Instruction::Deposit { account_id, amount } => {
                write!(f, "deposit,account={account_id},amount={amount}")
            }
            Instruction::Withdraw { account_id, amount } => {
                write!(f, "withdraw,account={account_id},amount={amount}")
            }
            Instruction::PlaceBet {
                account_id,
                option_id,
                stake,
            } => write!(
                f,
                "place,account={account_id},option={option_id},stake={stake}"
            ),
            Instruction::SettleBet { bet_id, outcome } => {
                write!(f, "settle,bet={bet_id},outcome={outcome}")
            }
        }
    }
}
