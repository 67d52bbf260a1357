// Watch command: run one alarm clock and report each expiry
use crate::alarm::AlarmClock;
use crate::cli::{resolve_config, ConfigOverrides};
use crate::config::Config;
use crate::errors::Result;
use crate::units::Microseconds;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};
use std::thread;
use std::time::{Duration, Instant};

/// One expiry, as printed by `alarm watch --json`
#[derive(Debug, Serialize)]
pub struct ExpiryEvent {
    pub cycle: u64,
    pub timestamp: String,
    pub interval_us: u64,
    pub since_last_ms: u64,
    pub since_start_ms: u64,
}

pub fn run(overrides: ConfigOverrides, cycles: u64, json: bool) -> Result<()> {
    let config = resolve_config(&overrides)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    watch(&config, cycles, json, &mut out)?;
    Ok(())
}

/// Run an alarm built from `config`, resetting after every expiry.
///
/// Stops after `cycles` expiries; `0` means run until the process is killed.
/// Returns the number of expiries observed.
pub fn watch(config: &Config, cycles: u64, json: bool, out: &mut dyn Write) -> Result<u64> {
    let interval_us = config.interval_micros();
    let alarm = AlarmClock::<Microseconds>::with_strategy(interval_us, config.sleep_strategy())?;
    let poll = poll_interval(interval_us);

    if !json {
        writeln!(
            out,
            "{} every {}{} ({} strategy)",
            "Alarm".bold(),
            config.interval,
            config.unit,
            config.strategy.as_str()
        )?;
    }

    let started = Instant::now();
    let mut last = started;
    let mut fired = 0;

    while cycles == 0 || fired < cycles {
        if !alarm.expired() {
            thread::sleep(poll);
            continue;
        }

        let now = Instant::now();
        fired += 1;
        let event = ExpiryEvent {
            cycle: fired,
            timestamp: chrono::Local::now().to_rfc3339(),
            interval_us,
            since_last_ms: millis(now - last),
            since_start_ms: millis(now - started),
        };
        last = now;
        alarm.reset();

        if json {
            writeln!(out, "{}", serde_json::to_string(&event)?)?;
        } else {
            writeln!(
                out,
                "  {} #{} at {} (+{} ms)",
                "⏰".bright_yellow(),
                event.cycle,
                event.timestamp.bright_cyan(),
                event.since_last_ms
            )?;
        }
        out.flush()?;
    }

    tracing::debug!(fired, "watch finished");
    Ok(fired)
}

/// Poll often enough to notice an expiry within a tenth of the interval
fn poll_interval(interval_us: u64) -> Duration {
    Duration::from_micros((interval_us / 10).clamp(100, 10_000))
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}
