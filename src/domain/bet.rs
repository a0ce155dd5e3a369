use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::account::AccountId;
use super::catalog::OptionId;
use super::error::Error;

pub type BetId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Pending,
    Won,
    Lost,
    Cancelled,
}

impl BetStatus {
    /// Terminal statuses admit no further transitions.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BetStatus::Pending)
    }
}

impl core::fmt::Display for BetStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let repr = match self {
            BetStatus::Pending => "pending",
            BetStatus::Won => "won",
            BetStatus::Lost => "lost",
            BetStatus::Cancelled => "cancelled",
        };
        write!(f, "{repr}")
    }
}

/// Settlement instruction delivered by the results feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetOutcome {
    Won,
    Lost,
    Cancelled,
}

impl From<BetOutcome> for BetStatus {
    fn from(outcome: BetOutcome) -> Self {
        match outcome {
            BetOutcome::Won => BetStatus::Won,
            BetOutcome::Lost => BetStatus::Lost,
            BetOutcome::Cancelled => BetStatus::Cancelled,
        }
    }
}

impl std::str::FromStr for BetOutcome {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "won" => Ok(BetOutcome::Won),
            "lost" => Ok(BetOutcome::Lost),
            "cancelled" => Ok(BetOutcome::Cancelled),
            other => Err(Error::Ingestion(format!("invalid outcome: {other}"))),
        }
    }
}

impl core::fmt::Display for BetOutcome {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        BetStatus::from(*self).fmt(f)
    }
}

/// A placed bet. The odds are snapshotted at placement time; later
/// catalog changes never affect the stored potential payout.
#[derive(Debug, Clone, Serialize)]
pub struct Bet {
    pub id: BetId,
    pub account_id: AccountId,
    pub option_id: OptionId,
    pub stake: Decimal,
    pub odds: Decimal,
    pub potential_payout: Decimal,
    pub status: BetStatus,
    pub placed_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}
