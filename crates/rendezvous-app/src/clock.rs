//! Wall-clock abstraction.
//!
//! Message timestamps are shown as local time of day. [`SystemClock`] reads
//! the real clock and the system time zone; [`FixedClock`] pins both so
//! rendered output is deterministic in tests and simulation.

use chrono::{DateTime, FixedOffset, Local, Offset, Utc};

/// `strftime` format for message timestamps.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// Shown in place of a timestamp that is missing or unparseable.
pub const UNKNOWN_TIME: &str = "--:--:--";

/// Source of the current time and its local rendering.
pub trait Clock {
    /// Current instant.
    fn now(&self) -> DateTime<Utc>;

    /// Local time of day for `instant`, formatted with [`TIME_FORMAT`].
    fn time_of_day(&self, instant: DateTime<Utc>) -> String;
}

/// Real clock in the system time zone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn time_of_day(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&Local).format(TIME_FORMAT).to_string()
    }
}

/// Clock frozen at a given instant in a fixed time zone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock {
    now: DateTime<Utc>,
    offset: FixedOffset,
}

impl FixedClock {
    /// Frozen at `now`, rendering in `offset`.
    pub fn new(now: DateTime<Utc>, offset: FixedOffset) -> Self {
        Self { now, offset }
    }

    /// Frozen at `now`, rendering in UTC.
    pub fn utc(now: DateTime<Utc>) -> Self {
        Self::new(now, Utc.fix())
    }

    /// Move the frozen instant.
    pub fn set_now(&mut self, now: DateTime<Utc>) {
        self.now = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.now
    }

    fn time_of_day(&self, instant: DateTime<Utc>) -> String {
        instant.with_timezone(&self.offset).format(TIME_FORMAT).to_string()
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn fixed_clock_renders_in_its_offset() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 23, 5, 9).single().expect("valid date");
        let plus_two = FixedOffset::east_opt(2 * 3600).expect("valid offset");

        assert_eq!(FixedClock::utc(instant).time_of_day(instant), "23:05:09");
        assert_eq!(FixedClock::new(instant, plus_two).time_of_day(instant), "01:05:09");
    }

    #[test]
    fn fixed_clock_does_not_advance() {
        let instant = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).single().expect("valid date");
        let mut clock = FixedClock::utc(instant);
        assert_eq!(clock.now(), clock.now());

        let later = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 1).single().expect("valid date");
        clock.set_now(later);
        assert_eq!(clock.now(), later);
    }
}
