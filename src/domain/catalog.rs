use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub type EventId = u64;
pub type OptionId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Upcoming,
    Live,
    Finished,
    Cancelled,
}

impl EventStatus {
    /// Whether events in this status still accept new bets.
    pub fn accepts_bets(&self) -> bool {
        matches!(self, EventStatus::Upcoming | EventStatus::Live)
    }
}

impl core::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let repr = match self {
            EventStatus::Upcoming => "upcoming",
            EventStatus::Live => "live",
            EventStatus::Finished => "finished",
            EventStatus::Cancelled => "cancelled",
        };
        write!(f, "{repr}")
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Event {
    pub id: EventId,
    pub sport: String,
    pub home_team: String,
    pub away_team: String,
    pub start_time: DateTime<Utc>,
    pub status: EventStatus,
}

/// A priced outcome offered on an event. Once bets reference an option
/// only its active flag may change.
#[derive(Debug, Clone, Serialize)]
pub struct BettingOption {
    pub id: OptionId,
    pub event_id: EventId,
    pub option_type: String,
    pub option_value: String,
    pub odds: Decimal,
    pub is_active: bool,
}
