// Opening-Hours Evaluator
// Decides whether the restaurant is open at a local date-time given its weekly schedule

use crate::engine::error::{EngineError, EngineResult};
use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;
use utoipa::ToSchema;

fn time_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^([01]\d|2[0-3]):([0-5]\d)$").expect("valid time regex"))
}

/// Time of day as minutes since midnight
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeOfDay(u16);

impl TimeOfDay {
    /// Parse a strict, zero-padded 24-hour `HH:MM` string
    pub fn parse(value: &str) -> EngineResult<Self> {
        let captures = time_pattern().captures(value).ok_or_else(|| {
            EngineError::invalid(format!("Invalid time format '{}': expected HH:MM", value))
        })?;

        // Both groups are two ASCII digits once the pattern matched
        let hours: u16 = captures[1]
            .parse()
            .map_err(|_| EngineError::invalid(format!("Invalid hour in time '{}'", value)))?;
        let minutes: u16 = captures[2]
            .parse()
            .map_err(|_| EngineError::invalid(format!("Invalid minute in time '{}'", value)))?;

        Ok(TimeOfDay(hours * 60 + minutes))
    }

    pub fn from_hm(hours: u32, minutes: u32) -> Self {
        TimeOfDay((hours * 60 + minutes) as u16)
    }

    pub fn minutes(&self) -> u16 {
        self.0
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}:{:02}", self.0 / 60, self.0 % 60)
    }
}

/// Opening hours for a single weekday
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct DayHours {
    /// Opening time, `HH:MM`
    #[schema(example = "11:00")]
    pub open: String,
    /// Closing time, `HH:MM`; earlier than `open` means the range crosses midnight
    #[schema(example = "23:00")]
    pub close: String,
    #[serde(default)]
    pub closed: bool,
}

impl DayHours {
    /// Whether the given time of day falls inside this day's range
    pub fn contains(&self, current: TimeOfDay) -> EngineResult<bool> {
        if self.closed {
            return Ok(false);
        }

        let open = TimeOfDay::parse(&self.open)?;
        let close = TimeOfDay::parse(&self.close)?;

        if open <= close {
            Ok(current >= open && current <= close)
        } else {
            Ok(current >= open || current <= close)
        }
    }
}

/// Weekly opening schedule stored on the settings row
///
/// A missing day means the restaurant is closed that day.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct WeeklySchedule {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<DayHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<DayHours>,
}

impl WeeklySchedule {
    pub fn day(&self, weekday: Weekday) -> Option<&DayHours> {
        match weekday {
            Weekday::Mon => self.monday.as_ref(),
            Weekday::Tue => self.tuesday.as_ref(),
            Weekday::Wed => self.wednesday.as_ref(),
            Weekday::Thu => self.thursday.as_ref(),
            Weekday::Fri => self.friday.as_ref(),
            Weekday::Sat => self.saturday.as_ref(),
            Weekday::Sun => self.sunday.as_ref(),
        }
    }

    /// Check every configured day for well-formed times
    pub fn validate(&self) -> EngineResult<()> {
        let days = [
            &self.monday,
            &self.tuesday,
            &self.wednesday,
            &self.thursday,
            &self.friday,
            &self.saturday,
            &self.sunday,
        ];

        for hours in days.into_iter().flatten() {
            TimeOfDay::parse(&hours.open)?;
            TimeOfDay::parse(&hours.close)?;
        }

        Ok(())
    }
}

/// Determine whether the restaurant is open at the given local date-time
///
/// No schedule, no record for the weekday, or a day flagged `closed` all
/// mean closed. Ranges are inclusive on both ends; a closing time earlier
/// than the opening time spans midnight.
pub fn is_open_at(schedule: Option<&WeeklySchedule>, now: NaiveDateTime) -> EngineResult<bool> {
    let Some(schedule) = schedule else {
        return Ok(false);
    };

    let Some(hours) = schedule.day(now.weekday()) else {
        return Ok(false);
    };

    let current = TimeOfDay::from_hm(now.hour(), now.minute());
    hours.contains(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(open: &str, close: &str) -> Option<DayHours> {
        Some(DayHours {
            open: open.to_string(),
            close: close.to_string(),
            closed: false,
        })
    }

    /// 2024-06-03 is a Monday
    fn monday_at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 3)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_parse_time() {
        assert_eq!(TimeOfDay::parse("00:00").unwrap().minutes(), 0);
        assert_eq!(TimeOfDay::parse("09:30").unwrap().minutes(), 570);
        assert_eq!(TimeOfDay::parse("23:59").unwrap().minutes(), 1439);
    }

    #[test]
    fn test_parse_time_rejects_malformed() {
        for bad in ["9:30", "24:00", "12:60", "12-30", "", "12:3", "ab:cd", " 12:30"] {
            assert!(
                matches!(TimeOfDay::parse(bad), Err(EngineError::InvalidArgument(_))),
                "expected '{}' to be rejected",
                bad
            );
        }
    }

    #[test]
    fn test_time_display() {
        assert_eq!(TimeOfDay::from_hm(7, 5).to_string(), "07:05");
    }

    #[test]
    fn test_normal_range_inclusive() {
        let schedule = WeeklySchedule {
            monday: day("11:00", "22:00"),
            ..Default::default()
        };

        assert!(!is_open_at(Some(&schedule), monday_at(10, 59)).unwrap());
        assert!(is_open_at(Some(&schedule), monday_at(11, 0)).unwrap());
        assert!(is_open_at(Some(&schedule), monday_at(22, 0)).unwrap());
        assert!(!is_open_at(Some(&schedule), monday_at(22, 1)).unwrap());
    }

    #[test]
    fn test_overnight_range() {
        let schedule = WeeklySchedule {
            monday: day("18:00", "02:00"),
            ..Default::default()
        };

        assert!(is_open_at(Some(&schedule), monday_at(23, 0)).unwrap());
        assert!(is_open_at(Some(&schedule), monday_at(1, 0)).unwrap());
        assert!(is_open_at(Some(&schedule), monday_at(2, 0)).unwrap());
        assert!(!is_open_at(Some(&schedule), monday_at(2, 1)).unwrap());
        assert!(!is_open_at(Some(&schedule), monday_at(12, 0)).unwrap());
        assert!(is_open_at(Some(&schedule), monday_at(18, 0)).unwrap());
    }

    #[test]
    fn test_closed_flag() {
        let schedule = WeeklySchedule {
            monday: Some(DayHours {
                open: "00:00".to_string(),
                close: "23:59".to_string(),
                closed: true,
            }),
            ..Default::default()
        };

        assert!(!is_open_at(Some(&schedule), monday_at(12, 0)).unwrap());
    }

    #[test]
    fn test_missing_day_and_missing_schedule() {
        let schedule = WeeklySchedule {
            tuesday: day("00:00", "23:59"),
            ..Default::default()
        };

        assert!(!is_open_at(Some(&schedule), monday_at(12, 0)).unwrap());
        assert!(!is_open_at(None, monday_at(12, 0)).unwrap());
    }

    #[test]
    fn test_malformed_time_is_an_error() {
        let schedule = WeeklySchedule {
            monday: day("9h", "18:00"),
            ..Default::default()
        };

        assert!(is_open_at(Some(&schedule), monday_at(12, 0)).is_err());
        assert!(schedule.validate().is_err());
    }

    #[test]
    fn test_schedule_from_json() {
        let json = r#"{
            "monday": {"open": "11:00", "close": "23:00", "closed": false},
            "sunday": {"open": "11:00", "close": "15:00"}
        }"#;
        let schedule: WeeklySchedule = serde_json::from_str(json).unwrap();

        assert!(schedule.validate().is_ok());
        assert!(schedule.day(Weekday::Mon).is_some());
        assert!(schedule.day(Weekday::Tue).is_none());
        assert!(!schedule.sunday.as_ref().unwrap().closed);
    }
}
