use std::collections::HashMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::domain::{BettingOption, Catalog, Error, Event, EventId, EventStatus, OptionId};

/// In-memory event/option catalog. The core only reads it through the
/// [`Catalog`] trait; the mutators below are the admin surface the
/// request layer uses to maintain sample data and to close markets.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    events: RwLock<HashMap<EventId, Event>>,
    options: RwLock<HashMap<OptionId, BettingOption>>,
    next_event_id: AtomicU64,
    next_option_id: AtomicU64,
}

fn poisoned(what: &str) -> Error {
    Error::Storage(format!("{what} lock poisoned"))
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            options: RwLock::new(HashMap::new()),
            next_event_id: AtomicU64::new(1),
            next_option_id: AtomicU64::new(1),
        }
    }

    pub fn add_event(
        &self,
        sport: &str,
        home_team: &str,
        away_team: &str,
        start_time: DateTime<Utc>,
        status: EventStatus,
    ) -> Event {
        let event = Event {
            id: self.next_event_id.fetch_add(1, Ordering::Relaxed),
            sport: sport.to_owned(),
            home_team: home_team.to_owned(),
            away_team: away_team.to_owned(),
            start_time,
            status,
        };
        if let Ok(mut events) = self.events.write() {
            events.insert(event.id, event.clone());
        }
        event
    }

    pub fn add_option(
        &self,
        event_id: EventId,
        option_type: &str,
        option_value: &str,
        odds: Decimal,
    ) -> Result<BettingOption, Error> {
        if odds < Decimal::ONE {
            return Err(Error::InvalidAmount(odds));
        }
        self.event(event_id)?;
        let option = BettingOption {
            id: self.next_option_id.fetch_add(1, Ordering::Relaxed),
            event_id,
            option_type: option_type.to_owned(),
            option_value: option_value.to_owned(),
            odds,
            is_active: true,
        };
        let mut options = self.options.write().map_err(|_| poisoned("option map"))?;
        options.insert(option.id, option.clone());
        Ok(option)
    }

    pub fn set_event_status(&self, event_id: EventId, status: EventStatus) -> Result<(), Error> {
        let mut events = self.events.write().map_err(|_| poisoned("event map"))?;
        let event = events
            .get_mut(&event_id)
            .ok_or_else(|| Error::Storage(format!("event {event_id} not found in catalog")))?;
        event.status = status;
        Ok(())
    }

    pub fn set_option_active(&self, option_id: OptionId, active: bool) -> Result<(), Error> {
        let mut options = self.options.write().map_err(|_| poisoned("option map"))?;
        let option = options
            .get_mut(&option_id)
            .ok_or(Error::OptionNotFound(option_id))?;
        option.is_active = active;
        Ok(())
    }

    pub fn options_for_event(&self, event_id: EventId) -> Vec<BettingOption> {
        let options = match self.options.read() {
            Ok(options) => options,
            Err(_) => return Vec::new(),
        };
        let mut found: Vec<BettingOption> = options
            .values()
            .filter(|option| option.event_id == event_id)
            .cloned()
            .collect();
        found.sort_by_key(|option| option.id);
        found
    }
}

impl Catalog for MemoryCatalog {
    fn event(&self, event_id: EventId) -> Result<Event, Error> {
        let events = self.events.read().map_err(|_| poisoned("event map"))?;
        events
            .get(&event_id)
            .cloned()
            .ok_or_else(|| Error::Storage(format!("event {event_id} not found in catalog")))
    }

    fn betting_option(&self, option_id: OptionId) -> Result<BettingOption, Error> {
        let options = self.options.read().map_err(|_| poisoned("option map"))?;
        options
            .get(&option_id)
            .cloned()
            .ok_or(Error::OptionNotFound(option_id))
    }
}
