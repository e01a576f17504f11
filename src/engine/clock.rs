// Current-time capability
// Every time-dependent engine computation takes "now" from a Clock so tests can pin it

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;
use std::sync::Arc;

/// Source of the current instant
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock backed by the system time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock frozen at a given instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Clock bound to the restaurant's timezone
///
/// Promotion dates and opening hours are expressed in local time, so "today"
/// and "what time is it" are always answered in that zone.
#[derive(Clone)]
pub struct RestaurantClock {
    clock: Arc<dyn Clock>,
    tz: Tz,
}

impl RestaurantClock {
    pub fn new(clock: Arc<dyn Clock>, tz: Tz) -> Self {
        Self { clock, tz }
    }

    /// System clock in the given timezone
    pub fn system(tz: Tz) -> Self {
        Self::new(Arc::new(SystemClock), tz)
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Local wall-clock time in the restaurant timezone
    pub fn local_now(&self) -> NaiveDateTime {
        self.now().with_timezone(&self.tz).naive_local()
    }

    /// Calendar date in the restaurant timezone
    pub fn today(&self) -> NaiveDate {
        self.local_now().date()
    }

    /// Instant at which the given local date is over (start of the next local day)
    pub fn end_of_day(&self, date: NaiveDate) -> DateTime<Utc> {
        let next_midnight = (date + Duration::days(1)).and_time(chrono::NaiveTime::MIN);

        // A DST jump can skip midnight; fall back to reading the wall time as UTC
        match self.tz.from_local_datetime(&next_midnight).earliest() {
            Some(local) => local.with_timezone(&Utc),
            None => Utc.from_utc_datetime(&next_midnight),
        }
    }
}

impl std::fmt::Debug for RestaurantClock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestaurantClock")
            .field("tz", &self.tz)
            .field("now", &self.now())
            .finish()
    }
}
