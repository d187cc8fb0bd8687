//! Calendar month periods in UTC.
//!
//! Both the quota check and monthly reports use the half-open interval
//! `[first day of the month 00:00 UTC, first day of the next month 00:00 UTC)`.

use time::{Date, Duration, Month, OffsetDateTime};

use crate::{Error, timestamp};

/// The earliest year a report can be requested for.
pub const MIN_REPORT_YEAR: i32 = 2000;
/// The latest year a report can be requested for.
pub const MAX_REPORT_YEAR: i32 = 2100;

/// A calendar month in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthPeriod {
    year: i32,
    month: Month,
    start: OffsetDateTime,
    end: OffsetDateTime,
}

impl MonthPeriod {
    /// The month containing `date_time` once it has been converted to UTC.
    ///
    /// # Errors
    /// Returns [Error::InvalidDate] if `date_time` is outside of the supported
    /// years in UTC or the start of the following month cannot be represented.
    pub fn containing(date_time: OffsetDateTime) -> Result<Self, Error> {
        let date = timestamp::to_utc(date_time)?.date();
        let first_day = date - Duration::days(i64::from(date.day()) - 1);

        Self::starting_on(first_day)
    }

    /// The month `month` (1-12) of `year` for a report.
    ///
    /// # Errors
    /// Returns [Error::InvalidYear] if `year` is not between [MIN_REPORT_YEAR]
    /// and [MAX_REPORT_YEAR], or [Error::InvalidMonth] if `month` is not
    /// between 1 and 12.
    pub fn for_report(year: i32, month: i32) -> Result<Self, Error> {
        if !(MIN_REPORT_YEAR..=MAX_REPORT_YEAR).contains(&year) {
            return Err(Error::InvalidYear(year));
        }

        let month = u8::try_from(month)
            .ok()
            .and_then(|month| Month::try_from(month).ok())
            .ok_or(Error::InvalidMonth(month))?;

        let first_day = Date::from_calendar_date(year, month, 1)
            .map_err(|error| Error::InvalidDate(error.to_string()))?;

        Self::starting_on(first_day)
    }

    fn starting_on(first_day: Date) -> Result<Self, Error> {
        let (next_year, next_month) = match first_day.month() {
            Month::December => (first_day.year() + 1, Month::January),
            month => (first_day.year(), month.next()),
        };

        let next_first_day = Date::from_calendar_date(next_year, next_month, 1)
            .map_err(|error| Error::InvalidDate(error.to_string()))?;

        Ok(Self {
            year: first_day.year(),
            month: first_day.month(),
            start: first_day.midnight().assume_utc(),
            end: next_first_day.midnight().assume_utc(),
        })
    }

    /// The calendar year.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The month number, starting from 1 for January.
    pub fn month(&self) -> u8 {
        u8::from(self.month)
    }

    /// The first instant of the month (inclusive).
    pub fn start(&self) -> OffsetDateTime {
        self.start
    }

    /// The first instant of the next month (exclusive).
    pub fn end(&self) -> OffsetDateTime {
        self.end
    }

    /// The last whole second of the month, for display.
    pub fn last_second(&self) -> OffsetDateTime {
        self.end - Duration::seconds(1)
    }

    /// Whether `date_time` falls within the month.
    pub fn contains(&self, date_time: OffsetDateTime) -> bool {
        self.start <= date_time && date_time < self.end
    }
}
