use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

/// Inclusive time range anchored on calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportWindow {
    pub first_day: NaiveDate,
    pub last_day: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl ReportWindow {
    /// The `days` calendar days ending on `now`'s date, from midnight of the
    /// first day up to `now` itself.
    pub fn trailing_days(now: DateTime<Utc>, days: u32) -> Self {
        let last_day = now.date_naive();
        let span = i64::from(days.max(1)) - 1;
        let first_day = last_day - Duration::days(span);

        Self {
            first_day,
            last_day,
            start: start_of_day(first_day),
            end: now,
        }
    }

    /// Every day in the window, oldest first.
    pub fn days(&self) -> Vec<NaiveDate> {
        self.first_day
            .iter_days()
            .take_while(|day| *day <= self.last_day)
            .collect()
    }

    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        ts >= self.start && ts <= self.end
    }
}

pub(crate) fn start_of_day(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Reference instant for a dashboard request. Accepts RFC 3339,
/// `YYYY-MM-DD HH:MM:SS` (UTC), or a bare date, which covers that whole day.
pub fn parse_reference_time(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }

    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_nano_opt(23, 59, 59, 999_999_999))
        .map(|naive| naive.and_utc())
        .ok_or_else(|| format!("'{raw}' is not an RFC 3339 timestamp or YYYY-MM-DD date"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    pub fn containing(ts: DateTime<Utc>) -> Self {
        Self {
            year: ts.year(),
            month: ts.month(),
        }
    }

    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    pub fn first_instant(self) -> DateTime<Utc> {
        start_of_day(self.first_day())
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Whole calendar months before this one.
    pub fn months_back(self, months: u32) -> Self {
        let shifted = self
            .first_day()
            .checked_sub_months(Months::new(months))
            .unwrap_or(NaiveDate::MIN);
        Self {
            year: shifted.year(),
            month: shifted.month(),
        }
    }

    /// `count` consecutive months ending with the month containing `now`, oldest first.
    pub fn trailing(now: DateTime<Utc>, count: u32) -> Vec<Self> {
        let current = Self::containing(now);
        (0..count)
            .rev()
            .map(|offset| current.months_back(offset))
            .collect()
    }
}
