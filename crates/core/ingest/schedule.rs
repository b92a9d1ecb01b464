//! Wall-clock cadence: the top of every hour in a named timezone.

use crate::error::{DockwatchError, Result};
use chrono::{DateTime, TimeDelta, Timelike, Utc};
use chrono_tz::Tz;
use std::time::Duration;

/// Fires once per hour, at minute zero of the local hour in `timezone`.
///
/// Timezones with a non-whole-hour UTC offset (for example `Asia/Kolkata`)
/// fire at a non-zero UTC minute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HourlySchedule {
    timezone: Tz,
}

impl HourlySchedule {
    pub fn new(timezone: Tz) -> Self {
        Self { timezone }
    }

    /// Schedule in the IANA timezone `name`.
    pub fn parse(name: &str) -> Result<Self> {
        name.parse::<Tz>()
            .map(Self::new)
            .map_err(|_| DockwatchError::UnknownTimezone(name.to_string()))
    }

    pub fn timezone(&self) -> Tz {
        self.timezone
    }

    /// First firing strictly after `after`.
    pub fn next_after(&self, after: DateTime<Utc>) -> DateTime<Utc> {
        let whole_minute = after
            - TimeDelta::seconds(i64::from(after.second()))
            - TimeDelta::nanoseconds(i64::from(after.nanosecond()));
        let mut candidate = whole_minute + TimeDelta::minutes(1);
        // Local minutes advance in lockstep with UTC minutes, so minute zero
        // comes around within one hour even across offset changes.
        for _ in 0..60 {
            if candidate.with_timezone(&self.timezone).minute() == 0 {
                break;
            }
            candidate += TimeDelta::minutes(1);
        }
        candidate
    }

    /// How long to sleep from `now` until the next firing.
    pub fn until_next(&self, now: DateTime<Utc>) -> (DateTime<Utc>, Duration) {
        self.until_next_unfired(now, None)
    }

    /// Like [`until_next`](Self::until_next), but never returns a firing at or
    /// before `last_fired`, even if the clock has stepped back behind it.
    pub fn until_next_unfired(
        &self,
        now: DateTime<Utc>,
        last_fired: Option<DateTime<Utc>>,
    ) -> (DateTime<Utc>, Duration) {
        let after = last_fired.map_or(now, |last| last.max(now));
        let next = self.next_after(after);
        let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
        (next, wait)
    }
}

impl Default for HourlySchedule {
    fn default() -> Self {
        Self::new(chrono_tz::America::New_York)
    }
}
