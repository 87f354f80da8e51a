//! Converter settings
//!
//! Runtime-facing configuration: fee bounds, the oracle window, the
//! first-deposit seed policy, and the network-fee parameters. Settings load
//! from TOML with defaults for everything, and are validated before use.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use weir_amm::{PoolKind, SeedPolicy};
use weir_types::{
    Address, ReserveId, DEFAULT_AVERAGE_RATE_WINDOW_SECS, PPM_SCALE,
};

/// Longest accepted oracle window (one week). The bound keeps the oracle's
/// blend arithmetic inside 256 bits: 112-bit rate sides times a sub-20-bit
/// window cannot overflow.
pub const MAX_AVERAGE_RATE_WINDOW_SECS: u64 = 7 * 24 * 60 * 60;

/// Default upper bound for a pool's conversion fee (3%)
pub const DEFAULT_MAX_CONVERSION_FEE_PPM: u32 = 30_000;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse settings file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// Protocol-level fee parameters, read-only to the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkSettings {
    /// Recipient of swept network fees
    pub fee_wallet: Address,
    /// Share of each conversion fee earmarked for the network, in ppm of the
    /// fee (not of the trade amount)
    pub network_fee_ppm: u32,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            fee_wallet: Address::new([0u8; 20]),
            network_fee_ppm: 0,
        }
    }
}

/// Complete converter configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConverterSettings {
    /// Upper bound for `set_conversion_fee`
    pub max_conversion_fee_ppm: u32,
    /// Window over which the average rate converges to spot
    pub average_rate_window_secs: u64,
    /// First-deposit pool-token seed rule
    pub seed_policy: SeedPolicy,
    pub network: NetworkSettings,
}

impl Default for ConverterSettings {
    fn default() -> Self {
        Self {
            max_conversion_fee_ppm: DEFAULT_MAX_CONVERSION_FEE_PPM,
            average_rate_window_secs: DEFAULT_AVERAGE_RATE_WINDOW_SECS,
            seed_policy: SeedPolicy::default(),
            network: NetworkSettings::default(),
        }
    }
}

impl ConverterSettings {
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.max_conversion_fee_ppm >= PPM_SCALE {
            return Err(SettingsError::Invalid(format!(
                "max conversion fee {} ppm must be below {}",
                self.max_conversion_fee_ppm, PPM_SCALE
            )));
        }
        if self.average_rate_window_secs == 0
            || self.average_rate_window_secs > MAX_AVERAGE_RATE_WINDOW_SECS
        {
            return Err(SettingsError::Invalid(format!(
                "average rate window {} must be within 1..={} seconds",
                self.average_rate_window_secs, MAX_AVERAGE_RATE_WINDOW_SECS
            )));
        }
        if self.network.network_fee_ppm > PPM_SCALE {
            return Err(SettingsError::Invalid(format!(
                "network fee {} ppm must not exceed {}",
                self.network.network_fee_ppm, PPM_SCALE
            )));
        }
        Ok(())
    }

    /// Load and validate settings from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let raw = fs::read_to_string(path)?;
        let settings: Self = toml::from_str(&raw)?;
        settings.validate()?;
        Ok(settings)
    }
}

/// One reserve in a pool-creation spec
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReserveSpec {
    pub id: ReserveId,
    pub weight_ppm: u32,
}

/// Pool-creation parameters: the reserve set is fixed for the pool's lifetime
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSpec {
    #[serde(default)]
    pub kind: PoolKind,
    #[serde(default)]
    pub conversion_fee_ppm: u32,
    pub reserves: Vec<ReserveSpec>,
}

impl PoolSpec {
    /// Two-reserve standard pool with equal weights, no fee
    pub fn standard_pair(a: ReserveId, b: ReserveId) -> Self {
        Self {
            kind: PoolKind::Standard,
            conversion_fee_ppm: 0,
            reserves: vec![
                ReserveSpec { id: a, weight_ppm: PPM_SCALE / 2 },
                ReserveSpec { id: b, weight_ppm: PPM_SCALE / 2 },
            ],
        }
    }
}
