use std::fmt;
use std::time::Duration;

// Nanoseconds per unit, chained so every pairwise ratio divides exactly.
const C0: u64 = 1;
const C1: u64 = C0 * 1000;
const C2: u64 = C1 * 1000;
const C3: u64 = C2 * 1000;
const C4: u64 = C3 * 60;
const C5: u64 = C4 * 60;
const C6: u64 = C5 * 24;

/// A granularity of time, from nanoseconds up to days.
///
/// A `TimeUnit` does not hold a time value; it tells time-based methods how a
/// given magnitude should be interpreted. For example, this call waits at
/// most 50 milliseconds for the lock:
///
/// ```ignore
/// lock.try_lock_for(50, TimeUnit::Milliseconds);
/// ```
///
/// Conversions between granularities are pure: converting to a coarser unit
/// truncates, converting to a finer unit multiplies and saturates at
/// [`TimeUnit::MAX`] instead of wrapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeUnit {
    Nanoseconds,
    Microseconds,
    Milliseconds,
    Seconds,
    Minutes,
    Hours,
    Days,
}

/// Scale `d` by `m`, saturating at `u64::MAX` on overflow.
fn scale(d: u64, m: u64) -> u64 {
    if d > TimeUnit::MAX / m {
        TimeUnit::MAX
    } else {
        d * m
    }
}

impl TimeUnit {
    /// The smallest representable magnitude.
    pub const MIN: u64 = 0;
    /// The largest representable magnitude; overflowing conversions clamp here.
    pub const MAX: u64 = u64::MAX;

    fn nanos_per(self) -> u64 {
        match self {
            TimeUnit::Nanoseconds => C0,
            TimeUnit::Microseconds => C1,
            TimeUnit::Milliseconds => C2,
            TimeUnit::Seconds => C3,
            TimeUnit::Minutes => C4,
            TimeUnit::Hours => C5,
            TimeUnit::Days => C6,
        }
    }

    /// Convert `duration`, interpreted in `source` granularity, into this
    /// granularity.
    ///
    /// Converting to a coarser unit truncates; converting to a finer unit
    /// saturates at [`TimeUnit::MAX`] rather than wrapping.
    pub fn convert(self, duration: u64, source: TimeUnit) -> u64 {
        let from = source.nanos_per();
        let to = self.nanos_per();
        if from >= to {
            scale(duration, from / to)
        } else {
            duration / (to / from)
        }
    }

    pub fn to_nanos(self, duration: u64) -> u64 {
        TimeUnit::Nanoseconds.convert(duration, self)
    }

    pub fn to_micros(self, duration: u64) -> u64 {
        TimeUnit::Microseconds.convert(duration, self)
    }

    pub fn to_millis(self, duration: u64) -> u64 {
        TimeUnit::Milliseconds.convert(duration, self)
    }

    pub fn to_seconds(self, duration: u64) -> u64 {
        TimeUnit::Seconds.convert(duration, self)
    }

    pub fn to_minutes(self, duration: u64) -> u64 {
        TimeUnit::Minutes.convert(duration, self)
    }

    pub fn to_hours(self, duration: u64) -> u64 {
        TimeUnit::Hours.convert(duration, self)
    }

    pub fn to_days(self, duration: u64) -> u64 {
        TimeUnit::Days.convert(duration, self)
    }

    /// Short display form for diagnostics: "ns", "us", "ms", "s", "m", "h", "d".
    pub fn short_str(self) -> &'static str {
        match self {
            TimeUnit::Nanoseconds => "ns",
            TimeUnit::Microseconds => "us",
            TimeUnit::Milliseconds => "ms",
            TimeUnit::Seconds => "s",
            TimeUnit::Minutes => "m",
            TimeUnit::Hours => "h",
            TimeUnit::Days => "d",
        }
    }

    /// Block the calling thread for `duration` in this granularity.
    pub fn sleep(self, duration: u64) {
        std::thread::sleep(Duration::from_nanos(self.to_nanos(duration)));
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_str())
    }
}
