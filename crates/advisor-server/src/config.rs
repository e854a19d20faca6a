//! Server Configuration

use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use wealth_advisor::strategy::DEFAULT_LOOKBACK_YEARS;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
const DEFAULT_SESSION_IDLE_MINUTES: u64 = 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value:?}")]
    Invalid { name: &'static str, value: String },
}

/// Where growth estimates get their price history
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PriceSourceKind {
    Yahoo,
    /// Synthetic benchmarks, no network
    Mock,
}

impl PriceSourceKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Yahoo => "yahoo",
            Self::Mock => "mock",
        }
    }
}

impl FromStr for PriceSourceKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yahoo" => Ok(Self::Yahoo),
            "mock" => Ok(Self::Mock),
            _ => Err(ConfigError::Invalid {
                name: "PRICE_SOURCE",
                value: s.to_string(),
            }),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_addr: String,

    /// Default CAGR window when a request does not give one
    pub lookback_years: u32,

    pub price_source: PriceSourceKind,

    /// Sessions without activity for this long are dropped
    pub session_idle_minutes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.into(),
            lookback_years: DEFAULT_LOOKBACK_YEARS,
            price_source: PriceSourceKind::Yahoo,
            session_idle_minutes: DEFAULT_SESSION_IDLE_MINUTES,
        }
    }
}

impl ServerConfig {
    /// Read `BIND_ADDR`, `GROWTH_LOOKBACK_YEARS`, `PRICE_SOURCE` and
    /// `SESSION_IDLE_MINUTES`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(addr) = lookup("BIND_ADDR") {
            config.bind_addr = addr;
        }

        if let Some(raw) = lookup("GROWTH_LOOKBACK_YEARS") {
            config.lookback_years = raw
                .trim()
                .parse::<u32>()
                .ok()
                .filter(|years| *years > 0)
                .ok_or(ConfigError::Invalid {
                    name: "GROWTH_LOOKBACK_YEARS",
                    value: raw,
                })?;
        }

        if let Some(raw) = lookup("PRICE_SOURCE") {
            config.price_source = raw.parse()?;
        }

        if let Some(raw) = lookup("SESSION_IDLE_MINUTES") {
            config.session_idle_minutes = raw
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|minutes| *minutes > 0)
                .ok_or(ConfigError::Invalid {
                    name: "SESSION_IDLE_MINUTES",
                    value: raw,
                })?;
        }

        Ok(config)
    }

    pub const fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_minutes.saturating_mul(60))
    }
}
