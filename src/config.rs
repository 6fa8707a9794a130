//! Application configuration loaded from environment variables.

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    // === Catalog ===
    /// Market catalog JSON file; the built-in fixture is used when unset.
    #[serde(default)]
    pub forecast_catalog_path: Option<PathBuf>,

    // === Storage ===
    /// Key-value file holding the connected wallet kind.
    #[serde(default = "default_storage_path")]
    pub forecast_storage_path: PathBuf,

    // === Simulation ===
    /// Apply the simulated delays (false = every call resolves immediately).
    #[serde(default = "default_true")]
    pub simulate_latency: bool,

    /// Leather connect delay in milliseconds.
    #[serde(default = "default_leather_delay")]
    pub leather_connect_delay_ms: u64,

    /// Xverse connect delay in milliseconds.
    #[serde(default = "default_xverse_delay")]
    pub xverse_connect_delay_ms: u64,

    /// `create-market` call delay in milliseconds.
    #[serde(default = "default_create_market_delay")]
    pub create_market_delay_ms: u64,

    /// `place-stake` call delay in milliseconds.
    #[serde(default = "default_place_stake_delay")]
    pub place_stake_delay_ms: u64,

    /// `resolve-market` call delay in milliseconds.
    #[serde(default = "default_resolve_market_delay")]
    pub resolve_market_delay_ms: u64,

    /// `claim-payout` call delay in milliseconds.
    #[serde(default = "default_claim_payout_delay")]
    pub claim_payout_delay_ms: u64,

    /// Position query delay in milliseconds.
    #[serde(default = "default_positions_delay")]
    pub positions_delay_ms: u64,

    /// Cosmetic catalog load delay in milliseconds.
    #[serde(default = "default_catalog_delay")]
    pub catalog_delay_ms: u64,

    // === Logging ===
    /// Log level (trace, debug, info, warn, error).
    #[serde(default = "default_log_level")]
    pub rust_log: String,

    /// Enable verbose logging.
    #[serde(default)]
    pub verbose: bool,
}

fn default_storage_path() -> PathBuf {
    PathBuf::from(".forecast-btc/storage.json")
}

fn default_true() -> bool {
    true
}

fn default_leather_delay() -> u64 {
    1000
}

fn default_xverse_delay() -> u64 {
    1200
}

fn default_create_market_delay() -> u64 {
    1000
}

fn default_place_stake_delay() -> u64 {
    800
}

fn default_resolve_market_delay() -> u64 {
    1200
}

fn default_claim_payout_delay() -> u64 {
    900
}

fn default_positions_delay() -> u64 {
    500
}

fn default_catalog_delay() -> u64 {
    500
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Simulated delays applied by the mock wallet, contract and catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    /// Leather connect.
    pub leather_connect: Duration,
    /// Xverse connect.
    pub xverse_connect: Duration,
    /// `create-market`.
    pub create_market: Duration,
    /// `place-stake`.
    pub place_stake: Duration,
    /// `resolve-market`.
    pub resolve_market: Duration,
    /// `claim-payout`.
    pub claim_payout: Duration,
    /// Position query.
    pub positions: Duration,
    /// Catalog load.
    pub catalog: Duration,
}

impl LatencyProfile {
    /// Every call resolves on the next poll.
    pub const fn instant() -> Self {
        Self {
            leather_connect: Duration::ZERO,
            xverse_connect: Duration::ZERO,
            create_market: Duration::ZERO,
            place_stake: Duration::ZERO,
            resolve_market: Duration::ZERO,
            claim_payout: Duration::ZERO,
            positions: Duration::ZERO,
            catalog: Duration::ZERO,
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self {
            leather_connect: Duration::from_millis(default_leather_delay()),
            xverse_connect: Duration::from_millis(default_xverse_delay()),
            create_market: Duration::from_millis(default_create_market_delay()),
            place_stake: Duration::from_millis(default_place_stake_delay()),
            resolve_market: Duration::from_millis(default_resolve_market_delay()),
            claim_payout: Duration::from_millis(default_claim_payout_delay()),
            positions: Duration::from_millis(default_positions_delay()),
            catalog: Duration::from_millis(default_catalog_delay()),
        }
    }
}

impl Config {
    /// Load configuration from environment, reading .env file first.
    pub fn load() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();
        envy::from_env()
    }

    /// Check if the configuration is valid.
    pub fn validate(&self) -> Result<(), String> {
        if self.forecast_storage_path.as_os_str().is_empty() {
            return Err("FORECAST_STORAGE_PATH must not be empty".to_string());
        }

        if let Some(path) = &self.forecast_catalog_path {
            if path.as_os_str().is_empty() {
                return Err("FORECAST_CATALOG_PATH must not be empty when set".to_string());
            }
        }

        // Anything past a minute is almost certainly a unit mistake.
        let delays = [
            ("LEATHER_CONNECT_DELAY_MS", self.leather_connect_delay_ms),
            ("XVERSE_CONNECT_DELAY_MS", self.xverse_connect_delay_ms),
            ("CREATE_MARKET_DELAY_MS", self.create_market_delay_ms),
            ("PLACE_STAKE_DELAY_MS", self.place_stake_delay_ms),
            ("RESOLVE_MARKET_DELAY_MS", self.resolve_market_delay_ms),
            ("CLAIM_PAYOUT_DELAY_MS", self.claim_payout_delay_ms),
            ("POSITIONS_DELAY_MS", self.positions_delay_ms),
            ("CATALOG_DELAY_MS", self.catalog_delay_ms),
        ];
        for (name, value) in delays {
            if value > 60_000 {
                return Err(format!("{} must be at most 60000", name));
            }
        }

        Ok(())
    }

    /// Delays to hand to the mock implementations.
    pub fn latency(&self) -> LatencyProfile {
        if !self.simulate_latency {
            return LatencyProfile::instant();
        }

        LatencyProfile {
            leather_connect: Duration::from_millis(self.leather_connect_delay_ms),
            xverse_connect: Duration::from_millis(self.xverse_connect_delay_ms),
            create_market: Duration::from_millis(self.create_market_delay_ms),
            place_stake: Duration::from_millis(self.place_stake_delay_ms),
            resolve_market: Duration::from_millis(self.resolve_market_delay_ms),
            claim_payout: Duration::from_millis(self.claim_payout_delay_ms),
            positions: Duration::from_millis(self.positions_delay_ms),
            catalog: Duration::from_millis(self.catalog_delay_ms),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            forecast_catalog_path: None,
            forecast_storage_path: default_storage_path(),
            simulate_latency: true,
            leather_connect_delay_ms: default_leather_delay(),
            xverse_connect_delay_ms: default_xverse_delay(),
            create_market_delay_ms: default_create_market_delay(),
            place_stake_delay_ms: default_place_stake_delay(),
            resolve_market_delay_ms: default_resolve_market_delay(),
            claim_payout_delay_ms: default_claim_payout_delay(),
            positions_delay_ms: default_positions_delay(),
            catalog_delay_ms: default_catalog_delay(),
            rust_log: default_log_level(),
            verbose: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values_are_sensible() {
        assert_eq!(default_leather_delay(), 1000);
        assert_eq!(default_xverse_delay(), 1200);
        assert_eq!(default_place_stake_delay(), 800);
        assert!(default_true());
    }

    #[test]
    fn default_config_validates() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_storage_path() {
        let config = Config {
            forecast_storage_path: PathBuf::new(),
            ..Config::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_absurd_delay() {
        let config = Config {
            place_stake_delay_ms: 120_000,
            ..Config::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.contains("PLACE_STAKE_DELAY_MS"));
    }

    #[test]
    fn latency_is_zero_when_simulation_disabled() {
        let config = Config {
            simulate_latency: false,
            ..Config::default()
        };

        assert_eq!(config.latency(), LatencyProfile::instant());
        assert_eq!(Config::default().latency(), LatencyProfile::default());
    }
}
