use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;

use crate::domain::{
    AccountId, Bet, BetId, BetOutcome, Catalog, Error, LedgerStore, OptionId, money,
};
use crate::{retry, wallet};

/// Bet placement and settlement. Placement validates the option against
/// the catalog, snapshots its odds, and debits the stake in the same
/// atomic unit that creates the pending bet. Settlement is a one-way
/// state machine: `pending` transitions exactly once to `won`, `lost`,
/// or `cancelled`.
#[derive(Debug)]
pub struct BetEngine<S, C> {
    store: Arc<S>,
    catalog: Arc<C>,
    retry: retry::Policy,
}

impl<S: LedgerStore, C: Catalog> BetEngine<S, C> {
    pub fn new(store: Arc<S>, catalog: Arc<C>) -> Self {
        Self {
            store,
            catalog,
            retry: retry::Policy::default(),
        }
    }

    pub fn place_bet(
        &self,
        account_id: AccountId,
        option_id: OptionId,
        stake: Decimal,
    ) -> Result<Bet, Error> {
        if stake <= Decimal::ZERO || !money::is_canonical(stake) {
            return Err(Error::InvalidStake(stake));
        }
        let stake = money::canonical(stake);

        let option = self.catalog.betting_option(option_id)?;
        if !option.is_active {
            return Err(Error::OptionInactive(option_id));
        }
        let event = self.catalog.event(option.event_id)?;
        if !event.status.accepts_bets() {
            return Err(Error::OptionInactive(option_id));
        }

        // Odds snapshot: later catalog changes must not move this bet.
        let odds = option.odds;
        let potential_payout = money::canonical(stake * odds);

        let bet = self.retry.run(|| {
            self.store.with_account(account_id, |unit| {
                wallet::post_bet_debit(unit, stake, &format!("bet on option {option_id}"))?;
                unit.insert_bet(option_id, stake, odds, potential_payout)
            })
        })?;
        tracing::info!(
            account_id,
            option_id,
            bet_id = bet.id,
            stake = %stake,
            payout = %potential_payout,
            "bet placed"
        );
        Ok(bet)
    }

    pub fn settle_bet(&self, bet_id: BetId, outcome: BetOutcome) -> Result<Bet, Error> {
        let account_id = self.store.bet_account(bet_id)?;
        let bet = self.retry.run(|| {
            self.store.with_account(account_id, |unit| {
                let (status, stake, potential_payout) = {
                    let bet = unit.bet_mut(bet_id)?;
                    (bet.status, bet.stake, bet.potential_payout)
                };
                if status.is_terminal() {
                    return Err(Error::BetAlreadySettled(bet_id));
                }

                // The credit is the only fallible step and stake/payout
                // were validated positive at placement, so transition
                // and credit commit together or not at all.
                match outcome {
                    BetOutcome::Won => {
                        wallet::post_payout_credit(
                            unit,
                            potential_payout,
                            &format!("payout for bet {bet_id}"),
                        )?;
                    }
                    BetOutcome::Cancelled => {
                        wallet::post_payout_credit(unit, stake, "bet cancellation refund")?;
                    }
                    BetOutcome::Lost => {}
                }

                let bet = unit.bet_mut(bet_id)?;
                bet.status = outcome.into();
                bet.settled_at = Some(Utc::now());
                Ok(bet.clone())
            })
        })?;
        tracing::info!(bet_id, account_id, outcome = %outcome, "bet settled");
        Ok(bet)
    }
}
