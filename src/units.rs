// Time units for alarm intervals
//
// `AlarmClock` is generic over a unit marker so callers write
// `AlarmClock::<Milliseconds>::new(250)` the same way they would pick a
// duration type. `Unit` is the runtime counterpart used by config and the CLI.

use crate::errors::{AlarmError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;
use std::time::Duration;

/// A duration unit with a fixed number of microseconds per tick of the unit
pub trait TimeUnit: Send + Sync + 'static {
    /// Microseconds in one unit
    const MICROS: u64;

    /// Short suffix used when displaying intervals
    const NAME: &'static str;

    /// Convert `count` units to whole microseconds, saturating on overflow
    fn to_micros(count: u64) -> u64 {
        saturate(u128::from(count) * u128::from(Self::MICROS))
    }

    /// Convert `count` units to whole milliseconds, truncating like a duration cast.
    ///
    /// Saturates on its own, so it stays exact when only the microsecond count overflows.
    fn to_millis(count: u64) -> u64 {
        saturate(u128::from(count) * u128::from(Self::MICROS) / 1_000)
    }
}

fn saturate(value: u128) -> u64 {
    u64::try_from(value).unwrap_or(u64::MAX)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Microseconds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Milliseconds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Seconds;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Minutes;

impl TimeUnit for Microseconds {
    const MICROS: u64 = 1;
    const NAME: &'static str = "us";
}

impl TimeUnit for Milliseconds {
    const MICROS: u64 = 1_000;
    const NAME: &'static str = "ms";
}

impl TimeUnit for Seconds {
    const MICROS: u64 = 1_000_000;
    const NAME: &'static str = "s";
}

impl TimeUnit for Minutes {
    const MICROS: u64 = 60_000_000;
    const NAME: &'static str = "min";
}

/// A count of some [`TimeUnit`]
pub struct Interval<U: TimeUnit> {
    count: u64,
    _unit: PhantomData<U>,
}

impl<U: TimeUnit> Interval<U> {
    pub fn new(count: u64) -> Self {
        Self {
            count,
            _unit: PhantomData,
        }
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn as_micros(&self) -> u64 {
        U::to_micros(self.count)
    }

    pub fn as_millis(&self) -> u64 {
        U::to_millis(self.count)
    }

    pub fn as_duration(&self) -> Duration {
        Duration::from_micros(self.as_micros())
    }
}

// Manual impls: derives would demand `U: Clone` etc. on the marker.
impl<U: TimeUnit> Clone for Interval<U> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<U: TimeUnit> Copy for Interval<U> {}

impl<U: TimeUnit> PartialEq for Interval<U> {
    fn eq(&self, other: &Self) -> bool {
        self.count == other.count
    }
}

impl<U: TimeUnit> Eq for Interval<U> {}

impl<U: TimeUnit> fmt::Debug for Interval<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interval({}{})", self.count, U::NAME)
    }
}

impl<U: TimeUnit> fmt::Display for Interval<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.count, U::NAME)
    }
}

/// Runtime choice of unit, for config files and command-line flags.
///
/// Command-line values go through [`FromStr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[serde(alias = "us", alias = "micros")]
    Microseconds,
    #[default]
    #[serde(alias = "ms", alias = "millis")]
    Milliseconds,
    #[serde(alias = "s", alias = "secs")]
    Seconds,
    #[serde(alias = "min", alias = "mins")]
    Minutes,
}

impl Unit {
    pub fn as_str(&self) -> &'static str {
        match self {
            Unit::Microseconds => Microseconds::NAME,
            Unit::Milliseconds => Milliseconds::NAME,
            Unit::Seconds => Seconds::NAME,
            Unit::Minutes => Minutes::NAME,
        }
    }

    pub fn to_micros(&self, count: u64) -> u64 {
        match self {
            Unit::Microseconds => Microseconds::to_micros(count),
            Unit::Milliseconds => Milliseconds::to_micros(count),
            Unit::Seconds => Seconds::to_micros(count),
            Unit::Minutes => Minutes::to_micros(count),
        }
    }
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Unit {
    type Err = AlarmError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "us" | "micros" | "microseconds" => Ok(Unit::Microseconds),
            "ms" | "millis" | "milliseconds" => Ok(Unit::Milliseconds),
            "s" | "secs" | "seconds" => Ok(Unit::Seconds),
            "min" | "mins" | "minutes" => Ok(Unit::Minutes),
            _ => Err(AlarmError::InvalidUnit(s.to_string())),
        }
    }
}
