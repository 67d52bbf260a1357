// Subcommands of the `alarm` binary

pub mod config_cmd;
pub mod info;
pub mod watch;

use crate::config::Config;
use crate::errors::Result;
use crate::strategy::StrategyKind;
use crate::units::Unit;
use std::env;
use std::path::Path;

/// Command-line values that take precedence over config files
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigOverrides {
    pub interval: Option<u64>,
    pub unit: Option<Unit>,
    pub strategy: Option<StrategyKind>,
    pub tick_us: Option<u64>,
}

impl ConfigOverrides {
    pub fn apply(&self, config: &mut Config) {
        if let Some(interval) = self.interval {
            config.interval = interval;
        }
        if let Some(unit) = self.unit {
            config.unit = unit;
        }
        if let Some(strategy) = self.strategy {
            config.strategy = strategy;
        }
        if let Some(tick_us) = self.tick_us {
            config.tick_us = tick_us;
        }
    }
}

/// Load the config visible from the current directory, then apply `overrides`
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<Config> {
    let cwd = env::current_dir()?;
    let root = Config::find_config_root(&cwd).unwrap_or(cwd);

    resolve_config_in(&root, Config::user_config_path().as_deref(), overrides)
}

/// Merge config files under `dir`, apply `overrides`, and only then validate
pub fn resolve_config_in(
    dir: &Path,
    user_config: Option<&Path>,
    overrides: &ConfigOverrides,
) -> Result<Config> {
    let mut config = Config::load_with_user_config(dir, user_config)?;
    overrides.apply(&mut config);
    config.validate()?;

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CONFIG_FILE;
    use crate::errors::AlarmError;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_override_fixes_invalid_file_value() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "tick_us: 0\n").unwrap();
        let overrides = ConfigOverrides {
            tick_us: Some(5),
            ..ConfigOverrides::default()
        };

        let config = resolve_config_in(temp_dir.path(), None, &overrides).unwrap();
        assert_eq!(config.tick_us, 5);
    }

    #[test]
    fn test_invalid_value_rejected_without_override() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join(CONFIG_FILE), "tick_us: 0\n").unwrap();

        let result = resolve_config_in(temp_dir.path(), None, &ConfigOverrides::default());
        assert!(matches!(result, Err(AlarmError::ConfigError(_))));
    }

    #[test]
    fn test_overrides_only_touch_set_fields() {
        let mut config = Config::default();
        let overrides = ConfigOverrides {
            interval: Some(5),
            unit: Some(Unit::Seconds),
            ..ConfigOverrides::default()
        };

        overrides.apply(&mut config);

        assert_eq!(config.interval, 5);
        assert_eq!(config.unit, Unit::Seconds);
        assert_eq!(config.strategy, StrategyKind::Tick);
        assert_eq!(config.tick_us, 1);
    }
}
