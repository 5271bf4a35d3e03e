//! Dispatch configuration: the population-tier demand table.

use gridwright_core::fixed::{Fixed64, kwh};
use serde::{Deserialize, Serialize};

/// Hourly demand in kWh for population tiers 0 through 5.
pub const DEFAULT_DEMAND_BY_TIER: [u32; 6] = [0, 10, 25, 50, 100, 200];

/// Errors from loading or validating a [`DispatchConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config parse error: {0}")]
    Parse(String),
    #[error("demand table is empty")]
    EmptyDemandTable,
    #[error("tier 0 is unpopulated and must demand 0 kWh, got {0}")]
    NonZeroEmptyTier(u32),
}

/// Tunables for a resolution cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// `demand_by_tier[t]` is the hourly kWh demand of a tier-`t` cell.
    /// Tiers past the end of the table demand nothing.
    #[serde(default = "default_demand_by_tier")]
    pub demand_by_tier: Vec<u32>,
}

fn default_demand_by_tier() -> Vec<u32> {
    DEFAULT_DEMAND_BY_TIER.to_vec()
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            demand_by_tier: default_demand_by_tier(),
        }
    }
}

impl DispatchConfig {
    /// Hourly demand of a cell with the given population tier.
    pub fn demand_for_tier(&self, tier: u8) -> Fixed64 {
        self.demand_by_tier
            .get(usize::from(tier))
            .map(|&d| kwh(d))
            .unwrap_or(Fixed64::ZERO)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.demand_by_tier.first() {
            None => Err(ConfigError::EmptyDemandTable),
            Some(&d) if d != 0 => Err(ConfigError::NonZeroEmptyTier(d)),
            Some(_) => Ok(()),
        }
    }

    /// Parse and validate a TOML document such as
    /// `demand_by_tier = [0, 10, 25, 50, 100, 200]`.
    #[cfg(feature = "config-io")]
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: DispatchConfig =
            toml::from_str(source).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_table_matches_population_tiers() {
        let config = DispatchConfig::default();
        let expected = [0, 10, 25, 50, 100, 200];
        for (tier, demand) in expected.into_iter().enumerate() {
            assert_eq!(config.demand_for_tier(tier as u8), kwh(demand));
        }
        assert!(config.validate().is_ok());
    }

    #[test]
    fn unknown_tier_demands_nothing() {
        let config = DispatchConfig::default();
        assert_eq!(config.demand_for_tier(6), Fixed64::ZERO);
        assert_eq!(config.demand_for_tier(u8::MAX), Fixed64::ZERO);
    }

    #[test]
    fn validation_rejects_bad_tables() {
        let empty = DispatchConfig {
            demand_by_tier: Vec::new(),
        };
        assert!(matches!(empty.validate(), Err(ConfigError::EmptyDemandTable)));

        let shifted = DispatchConfig {
            demand_by_tier: vec![5, 10],
        };
        assert!(matches!(
            shifted.validate(),
            Err(ConfigError::NonZeroEmptyTier(5))
        ));
    }

    #[cfg(feature = "config-io")]
    #[test]
    fn parses_toml_table() {
        let config = DispatchConfig::from_toml_str("demand_by_tier = [0, 20, 40]").unwrap();
        assert_eq!(config.demand_for_tier(2), kwh(40));
        assert_eq!(config.demand_for_tier(3), Fixed64::ZERO);
    }

    #[cfg(feature = "config-io")]
    #[test]
    fn empty_toml_uses_defaults() {
        let config = DispatchConfig::from_toml_str("").unwrap();
        assert_eq!(config, DispatchConfig::default());
    }

    #[cfg(feature = "config-io")]
    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = DispatchConfig::from_toml_str("demand_by_tier = \"lots\"").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
