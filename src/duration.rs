//! duration.rs
//!
//! Human-readable breakdown of a day count, e.g. 400 days becomes
//!     "1 year 1 month 5 days"
//!
//! Unlike a birthday-style calendar diff, this is deliberately calendar-naive:
//!   • 1 year  = 365 days
//!   • 1 month = 30 days  (of what is left after years)
//!   • 1 week  = 7 days   (of what is left after months)
//!
//! Zero-valued units are skipped, so a zero-day span yields an empty string.

use chrono::TimeDelta;

pub const DAYS_PER_YEAR: i64 = 365;
pub const DAYS_PER_MONTH: i64 = 30;
pub const DAYS_PER_WEEK: i64 = 7;

/// Breakdown of a day count into calendar-naive units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Breakdown {
    pub years: i64,
    pub months: i64,
    pub weeks: i64,
    pub days: i64,
}

impl Breakdown {
    /// Floor-divides so negative spans decompose the same way the
    /// positive ones do (the remainder is always non-negative).
    pub fn from_days(total: i64) -> Self {
        let years = total.div_euclid(DAYS_PER_YEAR);
        let rest = total.rem_euclid(DAYS_PER_YEAR);
        let months = rest / DAYS_PER_MONTH;
        let rest = rest % DAYS_PER_MONTH;

        Self {
            years,
            months,
            weeks: rest / DAYS_PER_WEEK,
            days: rest % DAYS_PER_WEEK,
        }
    }

    pub fn total_days(&self) -> i64 {
        self.years * DAYS_PER_YEAR
            + self.months * DAYS_PER_MONTH
            + self.weeks * DAYS_PER_WEEK
            + self.days
    }
}

/// Formats a day count, largest unit first.
pub fn format_days(total: i64) -> String {
    let b = Breakdown::from_days(total);

    [
        (b.years, "year"),
        (b.months, "month"),
        (b.weeks, "week"),
        (b.days, "day"),
    ]
    .iter()
    .filter(|(n, _)| *n != 0)
    .map(|(n, unit)| format!("{n} {unit}{}", plural(*n)))
    .collect::<Vec<_>>()
    .join(" ")
}

/// Same as [`format_days`], for a chrono span. Only whole days count.
pub fn format_duration(span: TimeDelta) -> String {
    format_days(span.num_days())
}

// Only strictly-greater-than-one is plural; 0 and negatives read singular.
fn plural(n: i64) -> &'static str {
    if n > 1 { "s" } else { "" }
}
