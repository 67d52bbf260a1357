// Expiry and reset behavior of a running alarm
mod common;

use alarmclock::strategy::{from_fn, AlwaysInterrupted, CondvarSleep, Immediate, SleepSignal};
use alarmclock::{AlarmClock, Microseconds, Milliseconds, Seconds};
use common::{wait_until, PROMPT};
use serial_test::serial;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[test]
#[serial]
fn test_expires_exactly_once_before_reset() {
    let alarm = AlarmClock::<Milliseconds>::new(20).unwrap();
    assert!(!alarm.expired());

    assert!(wait_until(PROMPT, || alarm.expired()));

    // Worker parks after an expiry, so waiting several more intervals changes nothing
    thread::sleep(Duration::from_millis(100));
    assert_eq!(alarm.expiry_count(), 1);
}

#[test]
#[serial]
fn test_expiry_not_before_interval() {
    let start = Instant::now();
    let alarm = AlarmClock::<Milliseconds>::new(50).unwrap();

    assert!(wait_until(PROMPT, || alarm.expired()));
    assert!(start.elapsed() >= Duration::from_millis(50));
}

#[test]
#[serial]
fn test_reset_before_expiry_restarts_countdown() {
    let alarm = AlarmClock::<Milliseconds>::new(300).unwrap();
    thread::sleep(Duration::from_millis(150));

    let reset_at = Instant::now();
    alarm.reset();
    assert!(!alarm.expired());

    // The original deadline passes without an expiry
    thread::sleep(Duration::from_millis(200));
    assert!(!alarm.expired());

    assert!(wait_until(PROMPT, || alarm.expired()));
    assert!(reset_at.elapsed() >= Duration::from_millis(300));
}

#[test]
#[serial]
fn test_reset_after_expiry_clears_and_rearms() {
    let alarm = AlarmClock::<Milliseconds>::new(10).unwrap();
    assert!(wait_until(PROMPT, || alarm.expired()));

    alarm.reset();
    assert!(!alarm.expired());

    assert!(wait_until(PROMPT, || alarm.expired()));
    assert_eq!(alarm.expiry_count(), 1);
}

#[test]
#[serial]
fn test_rapid_resets_never_record_expiry() {
    let alarm = AlarmClock::<Milliseconds>::new(200).unwrap();

    let start = Instant::now();
    while start.elapsed() < Duration::from_millis(300) {
        alarm.reset();
        assert!(!alarm.expired());
        thread::sleep(Duration::from_millis(5));
    }
    assert!(!alarm.expired());

    // The worker is still cycling, not stranded in a wait
    assert!(wait_until(PROMPT, || alarm.expired()));
}

#[test]
fn test_reset_from_another_thread() {
    let alarm = Arc::new(AlarmClock::<Microseconds>::with_strategy(10, Immediate).unwrap());
    assert!(wait_until(PROMPT, || alarm.expired()));

    let resetter = Arc::clone(&alarm);
    thread::spawn(move || resetter.reset()).join().unwrap();

    assert!(wait_until(PROMPT, || alarm.expired()));
}

#[test]
fn test_always_interrupted_strategy_never_expires() {
    let alarm = AlarmClock::<Milliseconds>::with_strategy(1, AlwaysInterrupted).unwrap();

    for _ in 0..10 {
        alarm.reset();
        thread::sleep(Duration::from_millis(2));
    }

    assert!(!alarm.expired());
    assert_eq!(alarm.expiry_count(), 0);
    assert!(alarm.worker_alive());
}

#[test]
fn test_strategy_receives_interval_in_micros() {
    let seen = Arc::new(AtomicUsize::new(0));
    let record = Arc::clone(&seen);
    let alarm = AlarmClock::<Seconds>::with_strategy(
        2,
        from_fn(move |micros, _| {
            record.store(micros as usize, Ordering::SeqCst);
            SleepSignal::Completed
        }),
    )
    .unwrap();

    assert!(wait_until(PROMPT, || alarm.expired()));
    assert_eq!(seen.load(Ordering::SeqCst), 2_000_000);
}

#[test]
#[serial]
fn test_condvar_strategy_expires_and_resets() {
    let alarm = AlarmClock::<Milliseconds>::with_strategy(20, CondvarSleep).unwrap();
    assert!(wait_until(PROMPT, || alarm.expired()));

    alarm.reset();
    assert!(!alarm.expired());
    assert!(wait_until(PROMPT, || alarm.expired()));
    assert_eq!(alarm.expiry_count(), 1);
}

#[test]
#[serial]
fn test_slept_time_tracks_progress() {
    let alarm = AlarmClock::<Milliseconds>::new(100).unwrap();
    assert!(wait_until(PROMPT, || alarm.slept_time() > 0));
    assert!(alarm.slept_time() <= alarm.sleep_time_us());

    assert!(wait_until(PROMPT, || alarm.expired()));
    assert_eq!(alarm.slept_time(), alarm.sleep_time_us());
}

#[test]
fn test_sleep_time_accessors() {
    let alarm = AlarmClock::<Seconds>::with_strategy(1, AlwaysInterrupted).unwrap();
    assert_eq!(alarm.sleep_time_ms(), 1_000);
    assert_eq!(alarm.sleep_time_us(), 1_000_000);

    let alarm = AlarmClock::<Microseconds>::with_strategy(1_500, AlwaysInterrupted).unwrap();
    assert_eq!(alarm.sleep_time_ms(), 1);
    assert_eq!(alarm.sleep_time_us(), 1_500);
}

#[test]
#[serial]
fn test_completion_during_pending_reset_not_counted() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    // Claims a full interval elapsed even though a reset arrived mid-sleep
    let alarm = AlarmClock::<Seconds>::with_strategy(
        60,
        from_fn(move |_, interrupt| {
            counter.fetch_add(1, Ordering::SeqCst);
            while !interrupt.is_requested() {
                thread::sleep(Duration::from_micros(50));
            }
            SleepSignal::Completed
        }),
    )
    .unwrap();
    thread::sleep(Duration::from_millis(5));

    alarm.reset();

    assert!(wait_until(PROMPT, || calls.load(Ordering::SeqCst) >= 2));
    assert_eq!(alarm.expiry_count(), 0);
    assert!(!alarm.expired());
}
