// Config command: Manage alarmclock configuration
use crate::config::{Config, CONFIG_FILE};
use crate::errors::{AlarmError, Result};
use colored::Colorize;
use std::fs;
use std::path::Path;

const TEMPLATE_CONFIG: &str = r#"# alarmclock configuration file
#
# Values here override ~/.config/alarmclock/config.yml.
# Command-line flags override both.

# Interval length, counted in `unit`
interval: 1000

# One of: us, ms, s, min
unit: ms

# How the worker waits out an interval:
#   tick    - short sleeps, checking for reset/exit after each tick
#   condvar - one interruptible timed wait, lower CPU use
strategy: tick

# Tick length in microseconds (tick strategy only)
tick_us: 1
"#;

/// Write a commented config file into `dir`
pub fn init(dir: &Path) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if config_path.exists() {
        return Err(AlarmError::ConfigError(format!(
            "{} already exists. Remove it first or edit manually.",
            CONFIG_FILE
        )));
    }

    fs::write(&config_path, TEMPLATE_CONFIG)?;

    println!("{}", "✓ Configuration file created!".bright_green());
    println!("\nCreated: {}", config_path.display().to_string().bright_cyan());
    println!(
        "\nValidate it anytime with: {}",
        "alarm config validate".bright_cyan()
    );

    Ok(())
}

/// Validate the config file in `dir`
pub fn validate(dir: &Path) -> Result<()> {
    let config_path = dir.join(CONFIG_FILE);

    if !config_path.exists() {
        println!("{}", "⚠ No configuration file found".bright_yellow());
        println!("\n{}:", "Suggestions".bright_yellow());
        println!("  • Create one: {}", "alarm config init".bright_cyan());
        println!("  • Defaults are used without a config file");
        return Ok(());
    }

    print!("Validating {}...", CONFIG_FILE);
    let config = Config::load(dir)?;
    println!(" {}", "✓".bright_green());
    println!(
        "\n  • Interval: {}{} ({} us)",
        config.interval,
        config.unit,
        config.interval_micros()
    );
    println!("  • Strategy: {}", config.strategy.as_str());

    Ok(())
}

/// Print the merged config (user file, then local file) as YAML
pub fn show(dir: &Path) -> Result<()> {
    let config = Config::load_hierarchy(dir)?;
    config.validate()?;
    println!("{}", render(&config)?);
    Ok(())
}

pub fn render(config: &Config) -> Result<String> {
    serde_yml::to_string(config)
        .map_err(|e| AlarmError::ConfigError(format!("Failed to serialize config: {}", e)))
}
