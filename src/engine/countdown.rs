// Promotion countdown
// Remaining time until a promotion ends, broken into days, hours, minutes and seconds

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use utoipa::ToSchema;

const SECONDS_PER_DAY: i64 = 86_400;
const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Whole units left before an end instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
pub struct TimeLeft {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

impl TimeLeft {
    pub fn from_seconds(total: i64) -> Self {
        Self {
            days: total / SECONDS_PER_DAY,
            hours: (total % SECONDS_PER_DAY) / SECONDS_PER_HOUR,
            minutes: (total % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE,
            seconds: total % SECONDS_PER_MINUTE,
        }
    }

    pub fn total_seconds(&self) -> i64 {
        self.days * SECONDS_PER_DAY
            + self.hours * SECONDS_PER_HOUR
            + self.minutes * SECONDS_PER_MINUTE
            + self.seconds
    }
}

/// `"{d}d HH:MM:SS"`, the day part left out when zero
impl fmt::Display for TimeLeft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.days > 0 {
            write!(f, "{}d ", self.days)?;
        }
        write!(f, "{:02}:{:02}:{:02}", self.hours, self.minutes, self.seconds)
    }
}

/// Outcome of a countdown computation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Countdown {
    Expired,
    Remaining(TimeLeft),
}

impl Countdown {
    pub fn is_expired(&self) -> bool {
        matches!(self, Countdown::Expired)
    }

    pub fn time_left(&self) -> Option<TimeLeft> {
        match self {
            Countdown::Expired => None,
            Countdown::Remaining(left) => Some(*left),
        }
    }
}

/// Compute the countdown from `now` to `end`
///
/// Only whole seconds count: anything under one second left is expired.
pub fn countdown(end: DateTime<Utc>, now: DateTime<Utc>) -> Countdown {
    let remaining = (end - now).num_seconds();
    if remaining <= 0 {
        return Countdown::Expired;
    }

    Countdown::Remaining(TimeLeft::from_seconds(remaining))
}

/// Countdown payload attached to a promotion in API responses
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CountdownView {
    pub ends_at: DateTime<Utc>,
    pub expired: bool,
    pub remaining: Option<TimeLeft>,
    /// Formatted remaining time, e.g. `"2d 03:15:09"`
    pub display: Option<String>,
}

impl CountdownView {
    pub fn new(end: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let result = countdown(end, now);
        let remaining = result.time_left();
        Self {
            ends_at: end,
            expired: result.is_expired(),
            remaining,
            display: remaining.map(|left| left.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at(h: u32, m: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, h, m, s).unwrap()
    }

    #[test]
    fn test_breakdown() {
        let now = at(10, 0, 0);
        let end = now + Duration::seconds(2 * 86_400 + 3 * 3_600 + 15 * 60 + 9);

        let left = countdown(end, now).time_left().unwrap();
        assert_eq!(
            left,
            TimeLeft {
                days: 2,
                hours: 3,
                minutes: 15,
                seconds: 9
            }
        );
        assert_eq!(left.total_seconds(), 2 * 86_400 + 3 * 3_600 + 15 * 60 + 9);
    }

    #[test]
    fn test_expired_when_past_or_equal() {
        let now = at(12, 0, 0);
        assert!(countdown(now, now).is_expired());
        assert!(countdown(now - Duration::seconds(1), now).is_expired());
    }

    #[test]
    fn test_sub_second_remainder_is_expired() {
        let now = at(12, 0, 0);
        assert!(countdown(now + Duration::milliseconds(999), now).is_expired());
        assert!(!countdown(now + Duration::seconds(1), now).is_expired());
    }

    #[test]
    fn test_display_format() {
        assert_eq!(TimeLeft::from_seconds(3_725).to_string(), "01:02:05");
        assert_eq!(TimeLeft::from_seconds(86_400 + 59).to_string(), "1d 00:00:59");
    }

    #[test]
    fn test_countdown_view() {
        let now = at(12, 0, 0);
        let view = CountdownView::new(now + Duration::seconds(61), now);
        assert!(!view.expired);
        assert_eq!(view.display.as_deref(), Some("00:01:01"));

        let view = CountdownView::new(now - Duration::hours(1), now);
        assert!(view.expired);
        assert!(view.remaining.is_none());
        assert!(view.display.is_none());
    }
}
