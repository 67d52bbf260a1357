// Resettable interval timer running on an owned background thread
//
// The worker sleeps one interval at a time through a `SleepStrategy` and
// bumps the expiry counter when a sleep completes uninterrupted. `reset()`
// restarts the countdown without replacing the worker; dropping the clock
// asks the worker to exit, wakes it, and joins it.

use crate::errors::{AlarmError, Result};
use crate::strategy::{Interrupt, SleepSignal, SleepStrategy, TickSleep};
use crate::units::{Interval, Milliseconds, TimeUnit};
use std::fmt;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};
use tracing::{debug, trace, warn};

/// State shared between the owning clock and its worker.
///
/// `reset` and `exit` are only written while holding `lock`, and the worker
/// only increments `expired` while holding it, so a reset can never be
/// followed by a stale expiry. Readers outside the lock get eventually
/// consistent values.
pub(crate) struct Shared {
    pub(crate) expired: AtomicU64,
    pub(crate) slept_us: AtomicU64,
    pub(crate) exit: AtomicBool,
    pub(crate) reset: AtomicBool,
    pub(crate) lock: Mutex<()>,
    pub(crate) wake: Condvar,
}

impl Shared {
    pub(crate) fn new() -> Self {
        Self {
            expired: AtomicU64::new(0),
            slept_us: AtomicU64::new(0),
            exit: AtomicBool::new(false),
            reset: AtomicBool::new(false),
            lock: Mutex::new(()),
            wake: Condvar::new(),
        }
    }

    // The mutex protects no data, so a poisoned lock is still usable.
    pub(crate) fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn pending(&self) -> bool {
        self.reset.load(Ordering::Acquire) || self.exit.load(Ordering::Acquire)
    }
}

/// An interval timer that reports expiry through a polled flag.
///
/// The interval is given as a count of `U` and converted to milliseconds and
/// microseconds once, at construction.
///
/// ```no_run
/// use alarmclock::alarm::AlarmClock;
/// use alarmclock::units::Milliseconds;
///
/// let alarm = AlarmClock::<Milliseconds>::new(50)?;
/// while !alarm.expired() {
///     std::thread::sleep(std::time::Duration::from_millis(5));
/// }
/// alarm.reset();
/// # Ok::<(), alarmclock::errors::AlarmError>(())
/// ```
pub struct AlarmClock<U: TimeUnit = Milliseconds> {
    interval: Interval<U>,
    sleep_time_us: u64,
    sleep_time_ms: u64,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl<U: TimeUnit> AlarmClock<U> {
    /// Start a clock using the default [`TickSleep`] strategy
    pub fn new(count: u64) -> Result<Self> {
        Self::with_strategy(count, TickSleep::default())
    }

    /// Start a clock that waits out each interval with `strategy`
    pub fn with_strategy<S: SleepStrategy>(count: u64, strategy: S) -> Result<Self> {
        let interval = Interval::<U>::new(count);
        let sleep_time_us = interval.as_micros();
        let sleep_time_ms = interval.as_millis();

        let shared = Arc::new(Shared::new());
        let worker_shared = Arc::clone(&shared);

        let worker = thread::Builder::new()
            .name(format!("alarm-{}", interval))
            .spawn(move || run_worker(&worker_shared, sleep_time_us, strategy))
            .map_err(AlarmError::Spawn)?;

        debug!(interval = %interval, sleep_time_us, "alarm worker started");

        Ok(Self {
            interval,
            sleep_time_us,
            sleep_time_ms,
            shared,
            worker: Some(worker),
        })
    }

    /// True once at least one full interval elapsed since construction or the last reset
    pub fn expired(&self) -> bool {
        self.expiry_count() > 0
    }

    /// Number of uninterrupted intervals since construction or the last reset
    pub fn expiry_count(&self) -> u64 {
        self.shared.expired.load(Ordering::Acquire)
    }

    /// Clear the expiry state and restart the countdown.
    ///
    /// A worker parked after an expiry is woken; a worker mid-sleep abandons
    /// the current interval without counting it and starts a fresh one.
    pub fn reset(&self) {
        let _guard = self.shared.guard();
        self.shared.reset.store(true, Ordering::Release);
        self.shared.expired.store(0, Ordering::Release);
        self.shared.slept_us.store(0, Ordering::Relaxed);
        self.shared.wake.notify_all();
        trace!(interval = %self.interval, "alarm reset requested");
    }

    /// Microseconds slept so far in the current interval (diagnostic only)
    pub fn slept_time(&self) -> u64 {
        self.shared.slept_us.load(Ordering::Relaxed)
    }

    pub fn sleep_time_us(&self) -> u64 {
        self.sleep_time_us
    }

    pub fn sleep_time_ms(&self) -> u64 {
        self.sleep_time_ms
    }

    pub fn interval(&self) -> Interval<U> {
        self.interval
    }

    /// Whether the worker thread is still running
    pub fn worker_alive(&self) -> bool {
        self.worker
            .as_ref()
            .map(|worker| !worker.is_finished())
            .unwrap_or(false)
    }
}

impl<U: TimeUnit> fmt::Debug for AlarmClock<U> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlarmClock")
            .field("interval", &self.interval)
            .field("expired", &self.expiry_count())
            .field("slept_us", &self.slept_time())
            .finish()
    }
}

impl<U: TimeUnit> Drop for AlarmClock<U> {
    fn drop(&mut self) {
        {
            let _guard = self.shared.guard();
            self.shared.exit.store(true, Ordering::Release);
            // Wake a worker parked between cycles; it has nothing else to wait for.
            self.shared.wake.notify_all();
        }

        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(interval = %self.interval, "alarm worker panicked");
            }
        }
    }
}

fn run_worker<S: SleepStrategy>(shared: &Shared, micros: u64, strategy: S) {
    let interrupt = Interrupt::new(shared);

    while !shared.exit.load(Ordering::Acquire) {
        match strategy.sleep(micros, &interrupt) {
            SleepSignal::Completed => {
                let _guard = shared.guard();
                if !shared.pending() {
                    let count = shared.expired.fetch_add(1, Ordering::AcqRel) + 1;
                    trace!(count, "alarm expired");
                }
            }
            SleepSignal::Interrupted if shared.exit.load(Ordering::Acquire) => break,
            SleepSignal::Interrupted => {}
        }

        // Park until reset or exit; a reset that is already pending skips the wait.
        let guard = shared.guard();
        let _guard = shared
            .wake
            .wait_while(guard, |_| !shared.pending())
            .unwrap_or_else(PoisonError::into_inner);
        if shared.reset.swap(false, Ordering::AcqRel) {
            trace!("alarm cycle restarted");
        }
    }

    debug!("alarm worker exiting");
}
