use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::Error;
use wordlebot_common::models::window::TimeWindow;

/// Discord epoch (2015-01-01T00:00:00Z) in milliseconds.
pub const DISCORD_EPOCH_MS: i64 = 1_420_070_400_000;

/// Label used as the aggregation bucket and column header, e.g. `07 Wed`.
pub fn day_key(instant: DateTime<Utc>, tz: Tz) -> String {
    instant.with_timezone(&tz).format("%d %a").to_string()
}

/// Smallest message snowflake that could have been created at `instant`.
pub fn snowflake_floor(instant: DateTime<Utc>) -> u64 {
    let ms = instant.timestamp_millis() - DISCORD_EPOCH_MS;
    if ms <= 0 {
        0
    } else {
        (ms as u64) << 22
    }
}

/// Calendar month selector, parsed from and displayed as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Result<Self, Error> {
        if !(1..=12).contains(&month) {
            return Err(Error::Parse(format!("month must be 1-12, got {month}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing "now" in the given zone.
    pub fn current(tz: Tz) -> Self {
        let now = Utc::now().with_timezone(&tz);
        Self {
            year: now.year(),
            month: now.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(&self) -> Self {
        if self.month == 12 {
            Self { year: self.year + 1, month: 1 }
        } else {
            Self { year: self.year, month: self.month + 1 }
        }
    }

    /// `[local midnight of the 1st, local midnight of the next 1st)` in UTC.
    pub fn window(&self, tz: Tz) -> Result<TimeWindow, Error> {
        Ok(TimeWindow::new(self.first_instant(tz)?, self.next().first_instant(tz)?))
    }

    fn first_instant(&self, tz: Tz) -> Result<DateTime<Utc>, Error> {
        let date = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| Error::Parse(format!("invalid month {self}")))?;
        let midnight = date
            .and_hms_opt(0, 0, 0)
            .ok_or_else(|| Error::Parse(format!("invalid midnight for {self}")))?;
        tz.from_local_datetime(&midnight)
            .earliest()
            .map(|dt| dt.with_timezone(&Utc))
            .ok_or_else(|| Error::TimeZone(format!("local midnight of {self} does not exist in {tz}")))
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (y, m) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| Error::Parse(format!("expected YYYY-MM, got '{s}'")))?;
        let year = y
            .parse::<i32>()
            .map_err(|_| Error::Parse(format!("invalid year in '{s}'")))?;
        let month = m
            .parse::<u32>()
            .map_err(|_| Error::Parse(format!("invalid month in '{s}'")))?;
        Self::new(year, month)
    }
}
