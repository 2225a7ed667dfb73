//! Multiclient configuration.

use multiclient_common::error::{MulticlientError, Result};
use std::path::PathBuf;
use std::time::Duration;

use crate::health_checker::HealthCheckConfig;
use crate::scheduler::SchedulerConfig;

/// Startup configuration of a [`MultiClient`](crate::MultiClient).
///
/// # Example
///
/// ```
/// use multiclient_core::MultiClientConfig;
/// use std::time::Duration;
///
/// let config = MultiClientConfig::new("/etc/ton/global.config.json")
///     .with_key_store("/var/lib/multiclient/keys", true)
///     .with_max_consecutive_alive_check_errors(5)
///     .with_exclusion_cooldown(Some(Duration::from_secs(600)));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiClientConfig {
    /// Path to the network-wide global config
    pub global_config_path: PathBuf,
    /// Root for per-liteserver key storage (`<root>/ls_<index>`)
    pub key_store_root: Option<PathBuf>,
    /// Wipe and recreate `key_store_root` at startup
    pub reset_key_store: bool,
    /// Network label passed through to every connection
    pub blockchain_name: String,
    pub scheduler: SchedulerConfig,
    pub health: HealthCheckConfig,
    /// Seed for worker selection randomness; entropy when unset
    pub rng_seed: Option<u64>,
}

impl MultiClientConfig {
    pub fn new(global_config_path: impl Into<PathBuf>) -> Self {
        Self {
            global_config_path: global_config_path.into(),
            key_store_root: None,
            reset_key_store: false,
            blockchain_name: "ton".to_string(),
            scheduler: SchedulerConfig::default(),
            health: HealthCheckConfig::default(),
            rng_seed: None,
        }
    }

    pub fn with_key_store(mut self, root: impl Into<PathBuf>, reset: bool) -> Self {
        self.key_store_root = Some(root.into());
        self.reset_key_store = reset;
        self
    }

    pub fn with_blockchain_name(mut self, name: impl Into<String>) -> Self {
        self.blockchain_name = name.into();
        self
    }

    pub fn with_max_consecutive_alive_check_errors(mut self, max: u32) -> Self {
        self.health.max_consecutive_alive_check_errors = max;
        self
    }

    pub fn with_exclusion_cooldown(mut self, cooldown: Option<Duration>) -> Self {
        self.health.exclusion_cooldown = cooldown;
        self
    }

    pub fn with_scheduler(mut self, scheduler: SchedulerConfig) -> Self {
        self.scheduler = scheduler;
        self
    }

    pub fn with_health(mut self, health: HealthCheckConfig) -> Self {
        self.health = health;
        self
    }

    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng_seed = Some(seed);
        self
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if any interval or timeout is zero, or if the
    /// exclusion cooldown is zero.
    pub fn validate(&self) -> Result<()> {
        let durations = [
            ("tick interval", self.scheduler.tick_interval),
            ("archival interval", self.scheduler.archival_interval),
            ("retry interval", self.health.retry_interval),
            ("probe timeout", self.health.probe_timeout),
        ];

        for (name, duration) in durations {
            if duration.is_zero() {
                return Err(MulticlientError::InvalidConfig(format!(
                    "{} must be greater than zero",
                    name
                )));
            }
        }

        if self.health.exclusion_cooldown.is_some_and(|d| d.is_zero()) {
            return Err(MulticlientError::InvalidConfig(
                "exclusion cooldown must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MultiClientConfig::new("global.config.json");
        assert_eq!(config.global_config_path, PathBuf::from("global.config.json"));
        assert!(config.key_store_root.is_none());
        assert!(!config.reset_key_store);
        assert_eq!(config.blockchain_name, "ton");
        assert!(config.rng_seed.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders() {
        let config = MultiClientConfig::new("g.json")
            .with_key_store("/tmp/keys", true)
            .with_blockchain_name("testnet")
            .with_max_consecutive_alive_check_errors(7)
            .with_rng_seed(42);
        assert_eq!(config.key_store_root, Some(PathBuf::from("/tmp/keys")));
        assert!(config.reset_key_store);
        assert_eq!(config.blockchain_name, "testnet");
        assert_eq!(config.health.max_consecutive_alive_check_errors, 7);
        assert_eq!(config.rng_seed, Some(42));
    }

    #[test]
    fn test_zero_tick_rejected() {
        let config = MultiClientConfig::new("g.json").with_scheduler(SchedulerConfig {
            tick_interval: Duration::ZERO,
            ..Default::default()
        });
        match config.validate() {
            Err(MulticlientError::InvalidConfig(msg)) => assert!(msg.contains("tick interval")),
            other => panic!("expected InvalidConfig, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_probe_timeout_rejected() {
        let config = MultiClientConfig::new("g.json").with_health(HealthCheckConfig {
            probe_timeout: Duration::ZERO,
            ..Default::default()
        });
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_cooldown_rejected() {
        let config = MultiClientConfig::new("g.json").with_exclusion_cooldown(Some(Duration::ZERO));
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_permanent_exclusion_allowed() {
        let config = MultiClientConfig::new("g.json").with_exclusion_cooldown(None);
        assert!(config.validate().is_ok());
    }
}
