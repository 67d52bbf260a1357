/// Common test utilities for alarmclock integration tests
use std::thread;
use std::time::{Duration, Instant};

/// Upper bound for anything that should happen "promptly"
#[allow(dead_code)]
pub const PROMPT: Duration = Duration::from_secs(2);

/// Poll `cond` every millisecond until it holds or `timeout` passes
#[allow(dead_code)]
pub fn wait_until(timeout: Duration, cond: impl Fn() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < timeout {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(1));
    }
    cond()
}

/// Run `f` and return how long it took
#[allow(dead_code)]
pub fn timed<T>(f: impl FnOnce() -> T) -> (T, Duration) {
    let start = Instant::now();
    let value = f();
    (value, start.elapsed())
}

/// Output of one `alarm` invocation
#[allow(dead_code)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub success: bool,
}

/// Run the `alarm` binary in `dir`, isolated from the real user config
#[allow(dead_code)]
pub fn alarm(dir: &std::path::Path, args: &[&str]) -> CommandResult {
    let output = std::process::Command::new(env!("CARGO_BIN_EXE_alarm"))
        .args(args)
        .current_dir(dir)
        .env("HOME", dir)
        .env("XDG_CONFIG_HOME", dir.join(".config"))
        .env_remove("ALARM_LOG")
        .output()
        .expect("Failed to execute alarm command");

    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        success: output.status.success(),
    }
}
