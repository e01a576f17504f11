// Temporal Window Evaluator
// Decides whether a calendar date falls inside an optional, inclusive date range

use chrono::NaiveDate;

/// Check whether `today` falls inside the `[start, end]` window
///
/// Either bound may be absent. Both bounds are compared independently, so a
/// window whose start lies after its end can never be satisfied.
pub fn is_within_window(today: NaiveDate, start: Option<NaiveDate>, end: Option<NaiveDate>) -> bool {
    if let Some(start) = start {
        if today < start {
            return false;
        }
    }

    if let Some(end) = end {
        if today > end {
            return false;
        }
    }

    true
}
