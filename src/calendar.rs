//! Calendar helpers for a single business day made of whole-hour slots.
//!
//! Dates are plain calendar dates (`NaiveDate`), so the weekday of a date
//! never depends on the time zone of the running process.

use crate::error::{BookingError, ConfigError};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

const LAST_HOUR_OF_DAY: u32 = 24;

/// An hour label within a day, rendered as `HH:00`.
///
/// `24:00` is representable so that an appointment may end exactly at
/// midnight; crossing into the next day is not modeled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Slot(u32);

impl Slot {
    pub fn new(hour: u32) -> Result<Self, BookingError> {
        if hour > LAST_HOUR_OF_DAY {
            return Err(BookingError::InvalidInput(format!(
                "hour {hour} is not within a day"
            )));
        }
        Ok(Self(hour))
    }

    pub fn hour(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:00", self.0)
    }
}

impl FromStr for Slot {
    type Err = BookingError;

    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let invalid = || BookingError::InvalidInput(format!("`{label}` is not a slot label"));
        let (hour, minute) = label.split_once(':').ok_or_else(invalid)?;
        if hour.len() != 2 || minute != "00" || !hour.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let hour = hour.parse::<u32>().map_err(|_| invalid())?;
        Slot::new(hour).map_err(|_| invalid())
    }
}

impl TryFrom<String> for Slot {
    type Error = BookingError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        label.parse()
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.to_string()
    }
}

/// Opening hours and weekly rest day of the business.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessHours {
    open_hour: u32,
    close_hour: u32,
    closed_day: Weekday,
}

impl BusinessHours {
    pub fn new(open_hour: u32, close_hour: u32, closed_day: Weekday) -> Result<Self, ConfigError> {
        if open_hour >= close_hour || close_hour > LAST_HOUR_OF_DAY {
            return Err(ConfigError::InvalidBusinessHours {
                open_hour,
                close_hour,
            });
        }
        Ok(Self {
            open_hour,
            close_hour,
            closed_day,
        })
    }

    pub fn open_hour(&self) -> u32 {
        self.open_hour
    }

    pub fn close_hour(&self) -> u32 {
        self.close_hour
    }

    pub fn closed_day(&self) -> Weekday {
        self.closed_day
    }

    /// Whether `slot` starts inside `[open_hour, close_hour)`.
    pub fn contains(&self, slot: Slot) -> bool {
        (self.open_hour..self.close_hour).contains(&slot.hour())
    }

    pub fn slots(&self) -> Vec<Slot> {
        enumerate_slots(self.open_hour, self.close_hour)
    }

    pub fn is_closed_day(&self, date: NaiveDate) -> bool {
        is_closed_day(date, self.closed_day)
    }
}

impl Default for BusinessHours {
    fn default() -> Self {
        Self {
            open_hour: 7,
            close_hour: 19,
            closed_day: Weekday::Sun,
        }
    }
}

/// One slot per whole hour in `[open_hour, close_hour)`.
pub fn enumerate_slots(open_hour: u32, close_hour: u32) -> Vec<Slot> {
    (open_hour..close_hour.min(LAST_HOUR_OF_DAY))
        .map(Slot)
        .collect()
}

/// The next whole-hour label. Saturates at `24:00`.
pub fn successor_slot(slot: Slot) -> Slot {
    Slot((slot.0 + 1).min(LAST_HOUR_OF_DAY))
}

/// The slot `count` hours after `slot`. Saturates at `24:00`.
pub fn slot_after(slot: Slot, count: u32) -> Slot {
    Slot(slot.0.saturating_add(count).min(LAST_HOUR_OF_DAY))
}

/// 0 for Sunday through 6 for Saturday.
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

pub fn is_closed_day(date: NaiveDate, closed_day: Weekday) -> bool {
    day_of_week(date) == closed_day.num_days_from_sunday()
}

/// Parses a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Result<NaiveDate, BookingError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| BookingError::InvalidInput(format!("`{value}` is not a YYYY-MM-DD date")))
}
