use crate::domain::Bounds;
use crate::domain::tuning::Tuning;
use crate::use_cases::SimulationSettings;
use serde::Deserialize;
use std::{env, fmt, path::PathBuf, time::Duration};

// Runtime constants (not gameplay tuning).

pub const COMMAND_CHANNEL_CAPACITY: usize = 32;
pub const EVENT_CHANNEL_CAPACITY: usize = 256;
pub const PLAYER_INPUT_CAPACITY: usize = 64;

const DEFAULT_WIDTH: i32 = 80;
const DEFAULT_HEIGHT: i32 = 24;
// Smallest arena that still leaves room for a ship between the side boundaries.
const MIN_WIDTH: i32 = 4;
const MIN_HEIGHT: i32 = 4;
const DEFAULT_FORMATION_TICK_MS: u64 = 500;
const DEFAULT_PROJECTILE_TICK_MS: u64 = 1000 / 30;
const DEFAULT_REDRAW_MS: u64 = 1000 / 30;
const DEFAULT_FLUSH_MS: u64 = 1000 / 30;

#[derive(Debug)]
pub enum ConfigError {
    Read { path: PathBuf, source: std::io::Error },
    Parse { path: PathBuf, source: toml::de::Error },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Read { path, source } => {
                write!(f, "failed to read {}: {source}", path.display())
            }
            ConfigError::Parse { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Optional TOML file named by `ARENA_CONFIG`. Environment variables override it.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub formation_tick_ms: Option<u64>,
    pub projectile_tick_ms: Option<u64>,
    pub redraw_ms: Option<u64>,
    pub flush_ms: Option<u64>,
    pub fire_probability: Option<f64>,
    pub seed: Option<u64>,
    pub headless: Option<bool>,
}

impl FileConfig {
    pub fn parse(contents: &str, path: PathBuf) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|source| ConfigError::Parse { path, source })
    }
}

/// Everything the process needs to start a simulation.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub width: i32,
    pub height: i32,
    pub formation_tick: Duration,
    pub projectile_tick: Duration,
    pub redraw: Duration,
    pub flush: Duration,
    pub fire_probability: f64,
    pub seed: Option<u64>,
    // Skip the terminal display (logs and the final report only).
    pub headless: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self::from_sources(FileConfig::default(), |_| None)
    }
}

impl RuntimeConfig {
    /// Reads `ARENA_CONFIG` (if set) and the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let file = match env::var("ARENA_CONFIG") {
            Ok(path) if !path.is_empty() => {
                let path = PathBuf::from(path);
                let contents = std::fs::read_to_string(&path).map_err(|source| {
                    ConfigError::Read {
                        path: path.clone(),
                        source,
                    }
                })?;
                FileConfig::parse(&contents, path)?
            }
            _ => FileConfig::default(),
        };
        Ok(Self::from_sources(file, |key| env::var(key).ok()))
    }

    /// Merges the file values with `lookup` (environment) overrides and applies defaults.
    pub fn from_sources(file: FileConfig, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let parsed = |key: &str| get(key).and_then(|v| v.trim().parse::<u64>().ok());

        let width = get("ARENA_WIDTH")
            .and_then(|v| v.trim().parse().ok())
            .or(file.width)
            .filter(|w| *w >= MIN_WIDTH)
            .unwrap_or(DEFAULT_WIDTH);
        let height = get("ARENA_HEIGHT")
            .and_then(|v| v.trim().parse().ok())
            .or(file.height)
            .filter(|h| *h >= MIN_HEIGHT)
            .unwrap_or(DEFAULT_HEIGHT);

        let millis = |key: &str, file_value: Option<u64>, default: u64| {
            // Zero periods are not valid timer intervals.
            Duration::from_millis(parsed(key).or(file_value).unwrap_or(default).max(1))
        };

        let fire_probability = get("FIRE_PROBABILITY")
            .and_then(|v| v.trim().parse::<f64>().ok())
            .or(file.fire_probability)
            .filter(|p| !p.is_nan())
            .map(|p| p.clamp(0.0, 1.0))
            .unwrap_or(Tuning::default().formation.fire_probability);

        let headless = get("ARENA_HEADLESS")
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .or(file.headless)
            .unwrap_or(false);

        Self {
            width,
            height,
            formation_tick: millis(
                "FORMATION_TICK_MS",
                file.formation_tick_ms,
                DEFAULT_FORMATION_TICK_MS,
            ),
            projectile_tick: millis(
                "PROJECTILE_TICK_MS",
                file.projectile_tick_ms,
                DEFAULT_PROJECTILE_TICK_MS,
            ),
            redraw: millis("REDRAW_MS", file.redraw_ms, DEFAULT_REDRAW_MS),
            flush: millis("FLUSH_MS", file.flush_ms, DEFAULT_FLUSH_MS),
            fire_probability,
            seed: parsed("ARENA_SEED").or(file.seed),
            headless,
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds::new(self.width, self.height)
    }

    pub fn settings(&self) -> SimulationSettings {
        SimulationSettings {
            formation_tick_interval: self.formation_tick,
            projectile_tick_interval: self.projectile_tick,
            redraw_interval: self.redraw,
            command_channel_capacity: COMMAND_CHANNEL_CAPACITY,
            event_channel_capacity: EVENT_CHANNEL_CAPACITY,
            seed: self.seed,
            ..SimulationSettings::new(self.bounds())
        }
    }

    pub fn tuning(&self) -> Tuning {
        let mut tuning = Tuning::default();
        tuning.formation.fire_probability = self.fire_probability;
        tuning
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn when_nothing_is_set_then_defaults_apply() {
        let config = RuntimeConfig::default();

        assert_eq!(config.bounds(), Bounds::new(80, 24));
        assert_eq!(config.formation_tick, Duration::from_millis(500));
        assert_eq!(config.projectile_tick, Duration::from_millis(33));
        assert_eq!(config.fire_probability, 0.05);
        assert_eq!(config.seed, None);
        assert!(!config.headless);
    }

    #[test]
    fn when_env_and_file_disagree_then_env_wins() {
        let file = FileConfig {
            width: Some(60),
            height: Some(30),
            seed: Some(1),
            ..Default::default()
        };
        let config = RuntimeConfig::from_sources(
            file,
            env_of(&[("ARENA_WIDTH", "100"), ("ARENA_SEED", "42"), ("ARENA_HEADLESS", "true")]),
        );

        assert_eq!(config.width, 100);
        assert_eq!(config.height, 30);
        assert_eq!(config.seed, Some(42));
        assert!(config.headless);
    }

    #[test]
    fn when_values_are_invalid_then_they_fall_back_or_clamp() {
        let config = RuntimeConfig::from_sources(
            FileConfig::default(),
            env_of(&[
                ("ARENA_WIDTH", "2"),
                ("ARENA_HEIGHT", "tall"),
                ("FORMATION_TICK_MS", "0"),
                ("FIRE_PROBABILITY", "3.5"),
            ]),
        );

        assert_eq!(config.bounds(), Bounds::new(80, 24));
        assert_eq!(config.formation_tick, Duration::from_millis(1));
        assert_eq!(config.fire_probability, 1.0);

        let nan = RuntimeConfig::from_sources(
            FileConfig::default(),
            env_of(&[("FIRE_PROBABILITY", "NaN")]),
        );
        assert_eq!(nan.fire_probability, 0.05);
    }

    #[test]
    fn when_toml_is_parsed_then_known_keys_are_read() {
        let file = FileConfig::parse(
            "width = 40\nheight = 20\nfire_probability = 0.25\nheadless = true\n",
            PathBuf::from("arena.toml"),
        )
        .expect("valid config");

        assert_eq!(file.width, Some(40));
        assert_eq!(file.fire_probability, Some(0.25));

        let config = RuntimeConfig::from_sources(file, |_| None);
        assert_eq!(config.bounds(), Bounds::new(40, 20));
        assert_eq!(config.tuning().formation.fire_probability, 0.25);
        assert!(config.headless);
    }

    #[test]
    fn when_toml_has_unknown_keys_then_parse_fails() {
        let err = FileConfig::parse("speed = 3\n", PathBuf::from("arena.toml"))
            .expect_err("unknown key should be rejected");
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn settings_carry_timers_and_capacities() {
        let config = RuntimeConfig::from_sources(
            FileConfig::default(),
            env_of(&[("REDRAW_MS", "50"), ("ARENA_SEED", "9")]),
        );
        let settings = config.settings();

        assert_eq!(settings.bounds, Bounds::new(80, 24));
        assert_eq!(settings.redraw_interval, Duration::from_millis(50));
        assert_eq!(settings.command_channel_capacity, COMMAND_CHANNEL_CAPACITY);
        assert_eq!(settings.seed, Some(9));
    }
}
