//! Trading calendar for the exchange's daily close.
//!
//! Converts civil dates into close instants in the exchange's timezone and
//! advances close instants by whole trading days. The timezone handle is
//! resolved once at startup and threaded through explicitly; there is no
//! process-global location state.

use chrono::{DateTime, Days, NaiveDate, NaiveTime, Utc};
use chrono_tz::Tz;

use crate::error::CrawlError;

/// Default exchange timezone (TWSE trades in Taipei local time).
pub const DEFAULT_TIMEZONE: &str = "Asia/Taipei";

const CLOSE_HOUR: u32 = 13;
const CLOSE_MINUTE: u32 = 30;

/// Resolved exchange calendar: a timezone plus the fixed daily close
/// time-of-day (13:30 local). The close time is a property of the exchange,
/// not of the feed, and is deliberately not configurable.
#[derive(Debug, Clone, Copy)]
pub struct ExchangeCalendar {
    tz: Tz,
    close: NaiveTime,
}

impl ExchangeCalendar {
    /// Resolve a timezone name against the bundled tz database.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Configuration`] when the name is not a known
    /// tz database entry. Callers treat this as startup-fatal.
    pub fn new(timezone: &str) -> Result<Self, CrawlError> {
        let tz: Tz = timezone.parse().map_err(|_| {
            CrawlError::Configuration(format!("unknown timezone '{timezone}'"))
        })?;
        let close = NaiveTime::from_hms_opt(CLOSE_HOUR, CLOSE_MINUTE, 0)
            .expect("13:30:00 is a valid time of day");
        Ok(Self { tz, close })
    }

    /// The close instant for a civil date: that date at 13:30 exchange-local.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::Configuration`] only when the local close time
    /// does not exist in the timezone (a DST spring-forward gap; never the
    /// case for Asia/Taipei).
    pub fn close_instant(&self, date: NaiveDate) -> Result<DateTime<Tz>, CrawlError> {
        match date.and_time(self.close).and_local_timezone(self.tz) {
            chrono::LocalResult::Single(instant) => Ok(instant),
            // Fall-back overlap: take the earlier of the two valid instants.
            chrono::LocalResult::Ambiguous(earliest, _) => Ok(earliest),
            chrono::LocalResult::None => Err(CrawlError::Configuration(format!(
                "close time {}T13:30 does not exist in timezone {}",
                date, self.tz
            ))),
        }
    }

    /// Advance a close instant to the next trading day's close.
    ///
    /// Expressed as calendar-day-plus-one followed by re-applying the close
    /// time-of-day, not as a naive 24-hour addition, so the contract stays
    /// correct in DST-observing timezones.
    pub fn next_close(&self, at: DateTime<Tz>) -> Result<DateTime<Tz>, CrawlError> {
        let next = at
            .date_naive()
            .checked_add_days(Days::new(1))
            .ok_or_else(|| {
                CrawlError::Configuration(format!("date overflow advancing past {at}"))
            })?;
        self.close_instant(next)
    }

    /// Today's civil date in the exchange timezone.
    pub fn today(&self, now: DateTime<Utc>) -> NaiveDate {
        now.with_timezone(&self.tz).date_naive()
    }

    /// Canonical `YYYY-MM-DD` date string shared by artifact paths and
    /// feed URL substitution.
    pub fn date_string(date: NaiveDate) -> String {
        date.format("%Y-%m-%d").to_string()
    }
}
