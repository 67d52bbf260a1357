// Sleep strategies used by the alarm worker to wait out one interval
//
// A strategy either lets the full interval elapse (`Completed`) or gives up
// early once a reset or exit is requested (`Interrupted`). Tests inject
// instantaneous strategies so they never depend on wall-clock delays.

use crate::alarm::Shared;
use serde::{Deserialize, Serialize};
use std::sync::atomic::Ordering;
use std::sync::PoisonError;
use std::thread;
use std::time::{Duration, Instant};

/// Outcome of one attempt to sleep for an interval
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SleepSignal {
    /// The whole interval elapsed without a reset or exit request
    Completed,
    /// The sleep was abandoned before the interval elapsed
    Interrupted,
}

/// Trait for the way the worker waits out an interval
pub trait SleepStrategy: Send + 'static {
    /// Sleep for `micros` microseconds, returning early when `interrupt` fires
    fn sleep(&self, micros: u64, interrupt: &Interrupt<'_>) -> SleepSignal;
}

impl<S: SleepStrategy + ?Sized> SleepStrategy for Box<S> {
    fn sleep(&self, micros: u64, interrupt: &Interrupt<'_>) -> SleepSignal {
        (**self).sleep(micros, interrupt)
    }
}

/// The worker's view of the reset/exit flags while a strategy is sleeping
pub struct Interrupt<'a> {
    shared: &'a Shared,
}

impl<'a> Interrupt<'a> {
    pub(crate) fn new(shared: &'a Shared) -> Self {
        Self { shared }
    }

    pub fn exit_requested(&self) -> bool {
        self.shared.exit.load(Ordering::Acquire)
    }

    pub fn reset_requested(&self) -> bool {
        self.shared.reset.load(Ordering::Acquire)
    }

    /// True once either a reset or an exit is pending
    pub fn is_requested(&self) -> bool {
        self.reset_requested() || self.exit_requested()
    }

    /// Block on the clock's condition variable for at most `timeout`.
    ///
    /// Returns `true` if a reset or exit was requested before the timeout.
    /// Spurious wakeups are absorbed.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let guard = self.shared.guard();
        let (_guard, _timeout) = self
            .shared
            .wake
            .wait_timeout_while(guard, timeout, |_| !self.is_requested())
            .unwrap_or_else(PoisonError::into_inner);
        self.is_requested()
    }

    /// Publish how far into the current interval the strategy has slept
    pub fn record_progress(&self, micros: u64) {
        self.shared.slept_us.store(micros, Ordering::Relaxed);
    }
}

/// Sleeps in small ticks, checking for a reset or exit after each one.
///
/// Responsiveness is bounded by the tick length. The deadline comes from the
/// monotonic clock, so oversleeping a tick never stretches the interval.
#[derive(Debug, Clone, Copy)]
pub struct TickSleep {
    tick: Duration,
}

impl TickSleep {
    pub const DEFAULT_TICK: Duration = Duration::from_micros(1);

    pub fn new(tick: Duration) -> Self {
        // A zero tick would turn the loop into a pure spin
        Self {
            tick: tick.max(Duration::from_micros(1)),
        }
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }
}

impl Default for TickSleep {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TICK)
    }
}

impl SleepStrategy for TickSleep {
    fn sleep(&self, micros: u64, interrupt: &Interrupt<'_>) -> SleepSignal {
        let total = Duration::from_micros(micros);
        let start = Instant::now();

        loop {
            let elapsed = start.elapsed();
            interrupt.record_progress(elapsed_micros(elapsed).min(micros));
            if elapsed >= total {
                return SleepSignal::Completed;
            }

            thread::sleep(self.tick.min(total - elapsed));

            if interrupt.is_requested() {
                return SleepSignal::Interrupted;
            }
        }
    }
}

/// Waits on the clock's condition variable with a single timed wait.
///
/// Reset and exit both notify the condition variable, so this wakes as
/// promptly as the tick loop without burning CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct CondvarSleep;

impl SleepStrategy for CondvarSleep {
    fn sleep(&self, micros: u64, interrupt: &Interrupt<'_>) -> SleepSignal {
        let total = Duration::from_micros(micros);
        let start = Instant::now();

        loop {
            let elapsed = start.elapsed();
            interrupt.record_progress(elapsed_micros(elapsed).min(micros));
            if elapsed >= total {
                return SleepSignal::Completed;
            }

            if interrupt.wait_timeout(total - elapsed) {
                return SleepSignal::Interrupted;
            }
        }
    }
}

/// Reports `Interrupted` without sleeping; no cycle ever counts as an expiry
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysInterrupted;

impl SleepStrategy for AlwaysInterrupted {
    fn sleep(&self, _micros: u64, _interrupt: &Interrupt<'_>) -> SleepSignal {
        SleepSignal::Interrupted
    }
}

/// Reports `Completed` without sleeping; every cycle expires instantly
#[derive(Debug, Clone, Copy, Default)]
pub struct Immediate;

impl SleepStrategy for Immediate {
    fn sleep(&self, micros: u64, interrupt: &Interrupt<'_>) -> SleepSignal {
        interrupt.record_progress(micros);
        SleepSignal::Completed
    }
}

/// Strategy backed by a closure
pub struct FnSleep<F>(F);

impl<F> SleepStrategy for FnSleep<F>
where
    F: Fn(u64, &Interrupt<'_>) -> SleepSignal + Send + 'static,
{
    fn sleep(&self, micros: u64, interrupt: &Interrupt<'_>) -> SleepSignal {
        (self.0)(micros, interrupt)
    }
}

/// Wrap a closure as a [`SleepStrategy`]
pub fn from_fn<F>(f: F) -> FnSleep<F>
where
    F: Fn(u64, &Interrupt<'_>) -> SleepSignal + Send + 'static,
{
    FnSleep(f)
}

/// Named strategies selectable from config and the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    #[default]
    Tick,
    Condvar,
}

impl StrategyKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            StrategyKind::Tick => "tick",
            StrategyKind::Condvar => "condvar",
        }
    }

    /// Build the strategy; `tick` only applies to [`StrategyKind::Tick`]
    pub fn build(&self, tick: Duration) -> Box<dyn SleepStrategy> {
        match self {
            StrategyKind::Tick => Box::new(TickSleep::new(tick)),
            StrategyKind::Condvar => Box::new(CondvarSleep),
        }
    }
}

fn elapsed_micros(elapsed: Duration) -> u64 {
    u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX)
}
