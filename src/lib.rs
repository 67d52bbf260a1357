// Library interface for alarmclock
// A resettable, cancelable interval timer on an owned background thread

pub mod alarm;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod strategy;
pub mod units;

pub use alarm::AlarmClock;
pub use errors::{AlarmError, Result};
pub use strategy::{SleepSignal, SleepStrategy};
pub use units::{Microseconds, Milliseconds, Minutes, Seconds, TimeUnit};
