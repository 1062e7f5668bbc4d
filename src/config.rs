//! # Configuration
//!
//! Layered application configuration.
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. built-in defaults
//! 2. optional `config/mm-monitor.toml`
//! 3. environment variables prefixed `MM_MONITOR__`, with `__` between
//!    nested keys (`MM_MONITOR__SERVER__BIND_ADDR=127.0.0.1:8080`)
//!
//! A `.env` file is loaded into the environment first when present.
//!
//! # Examples
//!
//! ```
//! use mm_monitor::config::AppConfig;
//!
//! let config = AppConfig::default();
//! assert_eq!(config.server.bind_addr, "0.0.0.0:3001");
//! assert!(config.validate().is_ok());
//! ```

use crate::application::scheduler::SchedulerSettings;
use crate::application::views::ViewKind;
use crate::domain::services::metric_generator::{RandomSource, StdRandomSource};
use crate::domain::value_objects::timestamp::Timestamp;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "config/mm-monitor.toml";

/// Environment variable prefix.
pub const ENV_PREFIX: &str = "MM_MONITOR";

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or deserialized.
    #[error("failed to load configuration: {0}")]
    Load(#[from] ::config::ConfigError),

    /// A value is out of range.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Creates an invalid-value error.
    #[must_use]
    pub fn invalid(msg: impl Into<String>) -> Self {
        Self::Invalid(msg.into())
    }
}

/// Result type for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// HTTP server settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Listen address.
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0:3001".to_string(),
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of pretty output.
    pub json: bool,
}

/// Per-view refresh cadence.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    /// Market makers view period.
    pub market_makers_period_ms: u64,
    /// Metrics view period.
    pub metrics_period_ms: u64,
    /// Chart view period.
    pub chart_period_ms: u64,
    /// Rankings view period.
    pub rankings_period_ms: u64,
    /// Pillar detail view period.
    pub pillar_detail_period_ms: u64,
    /// Alerts view period.
    pub alerts_period_ms: u64,
    /// Trades view period.
    pub trades_period_ms: u64,
    /// Ticks the pillar detail view stays on one maker.
    pub pillar_detail_rotate_every: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            market_makers_period_ms: 2_000,
            metrics_period_ms: 10_000,
            chart_period_ms: 1_000,
            rankings_period_ms: 3_000,
            pillar_detail_period_ms: 2_000,
            alerts_period_ms: 15_000,
            trades_period_ms: 2_000,
            pillar_detail_rotate_every: 5,
        }
    }
}

impl SchedulerConfig {
    /// Period of `view` in milliseconds.
    #[must_use]
    pub const fn period_ms(&self, view: ViewKind) -> u64 {
        match view {
            ViewKind::MarketMakers => self.market_makers_period_ms,
            ViewKind::Metrics => self.metrics_period_ms,
            ViewKind::Chart => self.chart_period_ms,
            ViewKind::Rankings => self.rankings_period_ms,
            ViewKind::PillarDetail => self.pillar_detail_period_ms,
            ViewKind::Alerts => self.alerts_period_ms,
            ViewKind::Trades => self.trades_period_ms,
        }
    }

    /// Rejects zero periods and a zero rotation.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some(view) = ViewKind::ALL.into_iter().find(|v| self.period_ms(*v) == 0) {
            return Err(ConfigError::invalid(format!(
                "scheduler.{view}_period_ms must be greater than zero"
            )));
        }
        if self.pillar_detail_rotate_every == 0 {
            return Err(ConfigError::invalid(
                "scheduler.pillar_detail_rotate_every must be greater than zero",
            ));
        }
        Ok(())
    }
}

/// Alert book settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AlertsConfig {
    /// Maximum retained alerts.
    pub capacity: usize,
}

impl Default for AlertsConfig {
    fn default() -> Self {
        Self { capacity: 20 }
    }
}

/// Rankings view settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RankingsConfig {
    /// Entries shown.
    pub top_n: usize,
}

impl Default for RankingsConfig {
    fn default() -> Self {
        Self { top_n: 5 }
    }
}

/// Chart view settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Points kept in the rolling history.
    pub history_len: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self { history_len: 6 }
    }
}

/// Rating engine settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RatingConfig {
    /// Fixed RNG seed; seeded from OS entropy when absent.
    pub seed: Option<u64>,
    /// Year used for firm age; current UTC year when absent.
    pub reference_year: Option<i32>,
}

impl RatingConfig {
    /// The configured reference year, or the current one.
    #[must_use]
    pub fn reference_year(&self) -> i32 {
        self.reference_year
            .unwrap_or_else(|| Timestamp::now().year())
    }

    /// Random source for the rating engine.
    #[must_use]
    pub fn random_source(&self) -> Box<dyn RandomSource> {
        match self.seed {
            Some(seed) => Box::new(StdRandomSource::seeded(seed)),
            None => Box::new(StdRandomSource::from_entropy()),
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// HTTP server.
    pub server: ServerConfig,
    /// Logging.
    pub logging: LoggingConfig,
    /// View cadence.
    pub scheduler: SchedulerConfig,
    /// Alert book.
    pub alerts: AlertsConfig,
    /// Rankings view.
    pub rankings: RankingsConfig,
    /// Chart view.
    pub chart: ChartConfig,
    /// Rating engine.
    pub rating: RatingConfig,
}

impl AppConfig {
    /// Loads `.env`, the default file if present, and the environment.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load() -> ConfigResult<Self> {
        Self::load_from(Path::new(DEFAULT_CONFIG_FILE))
    }

    /// Like [`load`](Self::load) with an explicit file path.
    ///
    /// A missing file is not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if a source is malformed or a value is invalid.
    pub fn load_from(path: &Path) -> ConfigResult<Self> {
        if let Ok(env_file) = dotenvy::dotenv() {
            tracing::debug!(path = %env_file.display(), "loaded .env");
        }

        let config: Self = ::config::Config::builder()
            .add_source(::config::File::from(path).required(false))
            .add_source(
                ::config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Checks every section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the first bad key.
    pub fn validate(&self) -> ConfigResult<()> {
        self.scheduler.validate()?;
        if self.alerts.capacity == 0 {
            return Err(ConfigError::invalid("alerts.capacity must be greater than zero"));
        }
        if self.rankings.top_n == 0 {
            return Err(ConfigError::invalid("rankings.top_n must be greater than zero"));
        }
        if self.chart.history_len == 0 {
            return Err(ConfigError::invalid("chart.history_len must be greater than zero"));
        }
        if self.server.bind_addr.trim().is_empty() {
            return Err(ConfigError::invalid("server.bind_addr must not be empty"));
        }
        Ok(())
    }

    /// Scheduler tuning derived from this configuration.
    #[must_use]
    pub fn scheduler_settings(&self) -> SchedulerSettings {
        let mut settings = SchedulerSettings::default();
        settings.pillar_rotate_every = self.scheduler.pillar_detail_rotate_every;
        settings.alert_capacity = self.alerts.capacity;
        settings.top_n = self.rankings.top_n;
        settings.chart_history_len = self.chart.history_len;
        ViewKind::ALL.into_iter().fold(settings, |settings, view| {
            settings.with_period(view, Duration::from_millis(self.scheduler.period_ms(view)))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::io::Write;

    mod defaults {
        use super::*;

        #[test]
        fn match_documented_values() {
            let config = AppConfig::default();
            assert_eq!(config.scheduler.chart_period_ms, 1_000);
            assert_eq!(config.scheduler.metrics_period_ms, 10_000);
            assert_eq!(config.alerts.capacity, 20);
            assert_eq!(config.rankings.top_n, 5);
            assert_eq!(config.chart.history_len, 6);
            assert!(!config.logging.json);
            assert!(config.rating.seed.is_none());
        }

        #[test]
        fn convert_to_scheduler_settings() {
            let settings = AppConfig::default().scheduler_settings();
            assert_eq!(settings, SchedulerSettings::default());
        }

        #[test]
        fn reference_year_falls_back_to_now() {
            let rating = RatingConfig::default();
            assert_eq!(rating.reference_year(), Timestamp::now().year());

            let rating = RatingConfig {
                seed: Some(1),
                reference_year: Some(2020),
            };
            assert_eq!(rating.reference_year(), 2020);
        }
    }

    mod validation {
        use super::*;

        #[test]
        fn rejects_zero_period() {
            let mut config = AppConfig::default();
            config.scheduler.rankings_period_ms = 0;
            let err = config.validate().unwrap_err();
            assert!(err.to_string().contains("scheduler.rankings_period_ms"));
        }

        #[test]
        fn rejects_zero_capacity() {
            let mut config = AppConfig::default();
            config.alerts.capacity = 0;
            assert!(config.validate().is_err());
        }

        #[test]
        fn rejects_zero_rotation() {
            let mut config = AppConfig::default();
            config.scheduler.pillar_detail_rotate_every = 0;
            assert!(config.scheduler.validate().is_err());
        }
    }

    mod loading {
        use super::*;

        #[test]
        fn missing_file_yields_defaults() {
            let path = std::env::temp_dir().join("mm-monitor-does-not-exist.toml");
            let config = AppConfig::load_from(&path).unwrap();
            assert_eq!(config.scheduler, SchedulerConfig::default());
        }

        #[test]
        fn file_overrides_defaults() {
            let path = std::env::temp_dir().join(format!(
                "mm-monitor-test-{}.toml",
                uuid::Uuid::new_v4()
            ));
            let mut file = std::fs::File::create(&path).unwrap();
            writeln!(
                file,
                "[scheduler]\nchart_period_ms = 500\n\n[rating]\nseed = 9\nreference_year = 2024\n\n[rankings]\ntop_n = 3"
            )
            .unwrap();

            let config = AppConfig::load_from(&path).unwrap();
            std::fs::remove_file(&path).unwrap();

            assert_eq!(config.scheduler.chart_period_ms, 500);
            assert_eq!(config.scheduler.metrics_period_ms, 10_000);
            assert_eq!(config.rating.seed, Some(9));
            assert_eq!(config.rating.reference_year, Some(2024));
            assert_eq!(config.rankings.top_n, 3);
            assert_eq!(
                config.scheduler_settings().period(ViewKind::Chart),
                Duration::from_millis(500)
            );
        }

        #[test]
        fn invalid_file_values_are_rejected() {
            let path = std::env::temp_dir().join(format!(
                "mm-monitor-test-{}.toml",
                uuid::Uuid::new_v4()
            ));
            std::fs::write(&path, "[alerts]\ncapacity = 0\n").unwrap();

            let result = AppConfig::load_from(&path);
            std::fs::remove_file(&path).unwrap();
            assert!(matches!(result, Err(ConfigError::Invalid(_))));
        }
    }
}
