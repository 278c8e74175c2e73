//! Business day calendars.
//!
//! Curve snapshots express maturity distance in business days. The
//! Treasury data carries no holiday information, so the standard calendar
//! is weekday-only.

use chrono::Weekday;

use crate::types::Date;

/// Trait for business day calendars.
pub trait Calendar: Send + Sync {
    /// Returns the name of the calendar.
    fn name(&self) -> &'static str;

    /// Returns true if the date is a business day.
    fn is_business_day(&self, date: Date) -> bool;

    /// Counts business days in the half-open range `[start, end)`.
    ///
    /// When `end` precedes `start` the count is negative and covers
    /// `(end, start]`.
    fn business_days_between(&self, start: Date, end: Date) -> i64 {
        if start == end {
            return 0;
        }
        let (lo, hi, sign) = if start < end {
            (start, end, 1)
        } else {
            (end.add_days(1), start.add_days(1), -1)
        };

        let mut count = 0i64;
        let mut current = lo;
        while current < hi {
            if self.is_business_day(current) {
                count += 1;
            }
            current = current.add_days(1);
        }
        count * sign
    }
}

/// A weekend-only calendar (no holidays).
#[derive(Debug, Clone, Copy, Default)]
pub struct WeekendCalendar;

impl Calendar for WeekendCalendar {
    fn name(&self) -> &'static str {
        "Weekend Only"
    }

    fn is_business_day(&self, date: Date) -> bool {
        !date.is_weekend()
    }

    fn business_days_between(&self, start: Date, end: Date) -> i64 {
        if start == end {
            return 0;
        }
        let (lo, hi, sign) = if start < end {
            (start, end, 1)
        } else {
            (end.add_days(1), start.add_days(1), -1)
        };

        // Whole weeks contribute five days each; walk the remainder.
        let span = lo.days_between(&hi);
        let mut count = (span / 7) * 5;
        let mut current = lo.add_days((span / 7) * 7);
        while current < hi {
            if !matches!(current.weekday(), Weekday::Sat | Weekday::Sun) {
                count += 1;
            }
            current = current.add_days(1);
        }
        count * sign
    }
}
