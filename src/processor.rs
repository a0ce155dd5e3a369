use std::sync::Arc;

use futures::StreamExt;

use crate::catalog::MemoryCatalog;
use crate::domain::{DeadLetterQueue, Error, Instruction, InstructionStream, LedgerStore};
use crate::engine::BetEngine;
use crate::ledger::MemoryLedger;
use crate::wallet::Wallet;

/// Drives an instruction feed against the wallet and bet engine. Each
/// rejected instruction goes to the dead-letter queue; processing always
/// continues with the next one.
pub struct Processor<I, D>
where
    I: InstructionStream,
    D: DeadLetterQueue,
{
    instructions: I,
    wallet: Wallet<MemoryLedger>,
    engine: BetEngine<MemoryLedger, MemoryCatalog>,
    store: Arc<MemoryLedger>,
    dlq: D,
}

impl<I, D> Processor<I, D>
where
    I: InstructionStream,
    D: DeadLetterQueue,
{
    pub fn new(
        instructions: I,
        wallet: Wallet<MemoryLedger>,
        engine: BetEngine<MemoryLedger, MemoryCatalog>,
        store: Arc<MemoryLedger>,
        dlq: D,
    ) -> Self {
        Self {
            instructions,
            wallet,
            engine,
            store,
            dlq,
        }
    }

    pub async fn process(&mut self) -> Result<(), Error> {
        let mut feed = self.instructions.stream();

        while let Some(next) = feed.next().await {
            match next {
                Ok(instruction) => {
                    if let Err(e) = self.apply(&instruction) {
                        self.dlq.report(&e);
                    }
                }
                Err(e) => self.dlq.report(&e),
            }
        }

        Ok(())
    }

    fn apply(&self, instruction: &Instruction) -> Result<(), Error> {
        tracing::debug!(%instruction, "applying instruction");
        match *instruction {
            Instruction::OpenAccount {
                account_id,
                initial_balance,
            } => {
                self.store.create_account(account_id, initial_balance)?;
            }
            Instruction::Deposit { account_id, amount } => {
                self.wallet.deposit(account_id, amount, "deposit via card")?;
            }
            Instruction::Withdraw { account_id, amount } => {
                self.wallet
                    .withdraw(account_id, amount, "withdrawal via bank")?;
            }
            Instruction::PlaceBet {
                account_id,
                option_id,
                stake,
            } => {
                self.engine.place_bet(account_id, option_id, stake)?;
            }
            Instruction::SettleBet { bet_id, outcome } => {
                self.engine.settle_bet(bet_id, outcome)?;
            }
        }
        Ok(())
    }

    /// Print a final per-account summary as CSV on stdout.
    pub fn flush(&self) {
        println!("account,balance,deposits,withdrawals,bet_debits,payout_credits,net_profit");
        for account_id in self.store.account_ids() {
            match self.wallet.summary(account_id) {
                Ok(s) => println!(
                    "{},{},{},{},{},{},{}",
                    account_id,
                    s.balance,
                    s.total_deposits,
                    s.total_withdrawals,
                    s.total_bet_debits,
                    s.total_payout_credits,
                    s.net_profit
                ),
                Err(e) => self.dlq.report(&e),
            }
        }
    }
}
