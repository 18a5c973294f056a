//! Local civil day arithmetic for reporting.
//!
//! Every report works on calendar days of one fixed UTC offset, independent
//! of the server process timezone. A day string is first resolved to local
//! midnight and only then shifted to the equivalent UTC instant.

use appraisal_core::{AppError, AppResult};
use chrono::{
    DateTime, Duration, FixedOffset, NaiveDate, NaiveDateTime, NaiveTime, Offset, TimeZone,
    Timelike, Utc,
};

/// Offset of the deployment's local civil time (+05:30) in minutes.
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 330;

/// Half-open UTC instant range `[start, end)` covering one local calendar day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    day: NaiveDate,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DayWindow {
    /// Local calendar day this window covers.
    #[must_use]
    pub fn day(&self) -> NaiveDate {
        self.day
    }

    /// First instant of the day (local 00:00:00.000) in UTC.
    #[must_use]
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    /// First instant of the following day in UTC; excluded from the window.
    #[must_use]
    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Returns whether `instant` falls inside the window.
    #[must_use]
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant < self.end
    }
}

/// Calendar of the fixed local offset used by login normalization and reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportingCalendar {
    offset: FixedOffset,
}

impl ReportingCalendar {
    /// Creates a calendar for a fixed offset east of UTC, in minutes.
    pub fn from_offset_minutes(minutes: i32) -> AppResult<Self> {
        minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .map(|offset| Self { offset })
            .ok_or_else(|| {
                AppError::Validation(format!(
                    "UTC offset of {minutes} minutes is outside the supported range"
                ))
            })
    }

    /// Returns the configured offset.
    #[must_use]
    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// Expresses an instant in local civil time.
    #[must_use]
    pub fn to_local(&self, instant: DateTime<Utc>) -> DateTime<FixedOffset> {
        instant.with_timezone(&self.offset)
    }

    /// Local calendar day that contains `instant`.
    #[must_use]
    pub fn local_day(&self, instant: DateTime<Utc>) -> NaiveDate {
        self.to_local(instant).date_naive()
    }

    /// Local hour of day (0-23) for `instant`.
    #[must_use]
    pub fn local_hour(&self, instant: DateTime<Utc>) -> u32 {
        self.to_local(instant).hour()
    }

    /// UTC range of the local calendar day `day`.
    #[must_use]
    pub fn day_window(&self, day: NaiveDate) -> DayWindow {
        let start = self.local_midnight(day);
        let end = start + Duration::days(1);

        DayWindow { day, start, end }
    }

    /// Window for an optional `YYYY-MM-DD` day, defaulting to the local day of `now`.
    pub fn window_or_today(&self, day: Option<&str>, now: DateTime<Utc>) -> AppResult<DayWindow> {
        match day.map(str::trim).filter(|value| !value.is_empty()) {
            Some(value) => Ok(self.day_window(parse_day(value)?)),
            None => Ok(self.day_window(self.local_day(now))),
        }
    }

    /// Window for a mandatory `YYYY-MM-DD` day.
    pub fn required_window(&self, day: Option<&str>) -> AppResult<DayWindow> {
        let value = day
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .ok_or_else(|| AppError::Validation("date query parameter is required".to_owned()))?;

        Ok(self.day_window(parse_day(value)?))
    }

    fn local_midnight(&self, day: NaiveDate) -> DateTime<Utc> {
        let local_midnight = NaiveDateTime::new(day, NaiveTime::MIN);
        let offset = Duration::seconds(i64::from(self.offset.local_minus_utc()));
        Utc.from_utc_datetime(&(local_midnight - offset))
    }
}

impl Default for ReportingCalendar {
    fn default() -> Self {
        Self::from_offset_minutes(DEFAULT_UTC_OFFSET_MINUTES)
            .unwrap_or(Self { offset: Utc.fix() })
    }
}

/// Parses a `YYYY-MM-DD` calendar day.
pub fn parse_day(value: &str) -> AppResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|error| {
        AppError::Validation(format!(
            "invalid date '{value}', expected YYYY-MM-DD: {error}"
        ))
    })
}
