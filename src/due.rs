use crate::error::{Error, Result};
use chrono::{Duration, NaiveDateTime};
use std::fmt::Display;

const SECONDS_PER_MINUTE: i64 = 60;
const SECONDS_PER_HOUR: i64 = 60 * SECONDS_PER_MINUTE;
const SECONDS_PER_DAY: i64 = 24 * SECONDS_PER_HOUR;

/// Human readable time remaining until `due`, measured from `now`.
pub(crate) fn countdown(due: NaiveDateTime, now: NaiveDateTime) -> String {
    format_seconds_left((due - now).num_seconds())
}

/// Reports `seconds` in the largest unit it fills. Overdue (negative)
/// values fall through to seconds.
pub(crate) fn format_seconds_left(seconds: i64) -> String {
    if seconds >= SECONDS_PER_DAY {
        format!("{} days left", seconds / SECONDS_PER_DAY)
    } else if seconds >= SECONDS_PER_HOUR {
        format!("{} hours left", seconds / SECONDS_PER_HOUR)
    } else if seconds >= SECONDS_PER_MINUTE {
        format!("{} minutes left", seconds / SECONDS_PER_MINUTE)
    } else {
        format!("{seconds} seconds left")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimeUnit {
    Days,
    Hours,
    Minutes,
}

fn too_large(unit: TimeUnit, amount: u32) -> Error {
    Error::Time(format!("adding {amount} {unit:?} overflows the due date"))
}

/// Relative due date built up on the create screen.
///
/// Always normalized: `minutes < 60` and `hours < 24`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DueOffset {
    days: u32,
    hours: u32,
    minutes: u32,
}

impl DueOffset {
    pub(crate) fn days(&self) -> u32 {
        self.days
    }

    pub(crate) fn hours(&self) -> u32 {
        self.hours
    }

    pub(crate) fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Adds `amount` of `unit` and carries into the larger units. An
    /// addition that no longer fits leaves the offset unchanged.
    pub(crate) fn add(&mut self, unit: TimeUnit, amount: u32) -> Result<()> {
        let (mut days, mut hours, mut minutes) = (self.days, self.hours, self.minutes);
        let slot = match unit {
            TimeUnit::Days => &mut days,
            TimeUnit::Hours => &mut hours,
            TimeUnit::Minutes => &mut minutes,
        };
        *slot = slot.checked_add(amount).ok_or_else(|| too_large(unit, amount))?;
        hours = hours
            .checked_add(minutes / 60)
            .ok_or_else(|| too_large(unit, amount))?;
        days = days
            .checked_add(hours / 24)
            .ok_or_else(|| too_large(unit, amount))?;
        *self = DueOffset {
            days,
            hours: hours % 24,
            minutes: minutes % 60,
        };
        Ok(())
    }

    pub(crate) fn clear(&mut self) {
        *self = DueOffset::default();
    }

    pub(crate) fn is_zero(&self) -> bool {
        self.days == 0 && self.hours == 0 && self.minutes == 0
    }

    pub(crate) fn duration(&self) -> Duration {
        Duration::days(i64::from(self.days))
            + Duration::hours(i64::from(self.hours))
            + Duration::minutes(i64::from(self.minutes))
    }

    /// Absolute due date for a task created at `now`, or `None` when no
    /// offset was picked.
    pub(crate) fn to_absolute(&self, now: NaiveDateTime) -> Result<Option<NaiveDateTime>> {
        if self.is_zero() {
            return Ok(None);
        }
        now.checked_add_signed(self.duration())
            .map(Some)
            .ok_or_else(|| Error::Time(format!("{self} is past the end of the calendar")))
    }
}

impl Display for DueOffset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "No due date");
        }
        write!(
            f,
            "Due in {} days, {} hours, {} minutes",
            self.days(),
            self.hours(),
            self.minutes()
        )
    }
}
