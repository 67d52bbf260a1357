use crate::errors::{AlarmError, Result};
use crate::strategy::{SleepStrategy, StrategyKind};
use crate::units::Unit;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILE: &str = ".alarmclock.yml";

const DEFAULT_INTERVAL: u64 = 1000;
const DEFAULT_TICK_US: u64 = 1;

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct Config {
    /// Interval length, counted in `unit`
    #[serde(default = "default_interval")]
    pub interval: u64,
    #[serde(default)]
    pub unit: Unit,
    #[serde(default)]
    pub strategy: StrategyKind,
    /// Tick length for the `tick` strategy, in microseconds
    #[serde(default = "default_tick_us")]
    pub tick_us: u64,
}

fn default_interval() -> u64 {
    DEFAULT_INTERVAL
}

fn default_tick_us() -> u64 {
    DEFAULT_TICK_US
}

impl Default for Config {
    fn default() -> Self {
        Self {
            interval: DEFAULT_INTERVAL,
            unit: Unit::default(),
            strategy: StrategyKind::default(),
            tick_us: DEFAULT_TICK_US,
        }
    }
}

/// One config file, where every key is optional so layers can be merged
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct ConfigLayer {
    interval: Option<u64>,
    unit: Option<Unit>,
    strategy: Option<StrategyKind>,
    tick_us: Option<u64>,
}

impl ConfigLayer {
    fn read(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Ok(Some(Self::default()));
        }

        let layer = serde_yml::from_str(&content).map_err(|e| {
            AlarmError::ConfigError(format!("Failed to parse {}: {}", path.display(), e))
        })?;
        Ok(Some(layer))
    }

    fn apply(self, config: &mut Config) {
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

impl Config {
    /// Load and validate config from .alarmclock.yml in `dir`, falling back to defaults
    pub fn load(dir: &Path) -> Result<Self> {
        let config = Self::load_layers(&[dir.join(CONFIG_FILE)])?;
        config.validate()?;
        Ok(config)
    }

    /// Load the user config, then let the local .alarmclock.yml override it.
    ///
    /// The merged result is not validated; callers apply their own overrides
    /// first and then call [`Config::validate`].
    pub fn load_hierarchy(dir: &Path) -> Result<Self> {
        Self::load_with_user_config(dir, Self::user_config_path().as_deref())
    }

    /// Same as [`Config::load_hierarchy`] with an explicit user config path
    pub fn load_with_user_config(dir: &Path, user_config: Option<&Path>) -> Result<Self> {
        let mut paths = Vec::new();
        if let Some(user) = user_config {
            paths.push(user.to_path_buf());
        }
        paths.push(dir.join(CONFIG_FILE));

        Self::load_layers(&paths)
    }

    fn load_layers(paths: &[PathBuf]) -> Result<Self> {
        let mut config = Config::default();

        for path in paths {
            if let Some(layer) = ConfigLayer::read(path)? {
                tracing::debug!(path = %path.display(), "applying config layer");
                layer.apply(&mut config);
            }
        }

        Ok(config)
    }

    /// Platform config location, e.g. ~/.config/alarmclock/config.yml
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("alarmclock").join("config.yml"))
    }

    /// Walk up from `start_path` to the nearest directory holding .alarmclock.yml
    pub fn find_config_root(start_path: &Path) -> Option<PathBuf> {
        let mut current = start_path;

        loop {
            if current.join(CONFIG_FILE).exists() {
                return Some(current.to_path_buf());
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => return None,
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.tick_us == 0 {
            return Err(AlarmError::ConfigError(
                "tick_us must be at least 1".to_string(),
            ));
        }

        let micros_per_unit = self.unit.to_micros(1);
        if self.interval.checked_mul(micros_per_unit).is_none() {
            return Err(AlarmError::InvalidInterval(format!(
                "{}{} does not fit in microseconds",
                self.interval, self.unit
            )));
        }

        Ok(())
    }

    pub fn interval_micros(&self) -> u64 {
        self.unit.to_micros(self.interval)
    }

    pub fn tick(&self) -> Duration {
        Duration::from_micros(self.tick_us)
    }

    pub fn sleep_strategy(&self) -> Box<dyn SleepStrategy> {
        self.strategy.build(self.tick())
    }
}
