use crate::cli::{resolve_config, ConfigOverrides};
use crate::config::Config;
use crate::errors::Result;
use colored::Colorize;
use std::io::{self, Write};

/// Show the interval an alarm would use, converted to every unit it caches
pub fn run(overrides: ConfigOverrides) -> Result<()> {
    let config = resolve_config(&overrides)?;
    let stdout = io::stdout();
    let mut out = stdout.lock();
    print_info(&config, &mut out)
}

pub fn print_info(config: &Config, out: &mut dyn Write) -> Result<()> {
    let micros = config.interval_micros();

    writeln!(out, "{}", "Alarm interval".bold())?;
    writeln!(out, "  Configured: {}{}", config.interval, config.unit)?;
    writeln!(out, "  Milliseconds: {}", micros / 1_000)?;
    writeln!(out, "  Microseconds: {}", micros)?;
    writeln!(out, "  Strategy: {}", config.strategy.as_str())?;
    if config.strategy == crate::strategy::StrategyKind::Tick {
        writeln!(out, "  Tick: {} us", config.tick_us)?;
    }

    Ok(())
}
