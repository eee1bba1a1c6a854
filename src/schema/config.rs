//! Configuration types for genome repair.

use serde::{Deserialize, Serialize};

fn default_max_repair_attempts() -> usize {
    20
}

fn default_gaussian_strength() -> f64 {
    0.1
}

/// Top-level repair configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RepairConfig {
    /// Maximum number of mutations spent on resolving forbidden combinations
    /// before a genome is reported as irreparable.
    #[serde(default = "default_max_repair_attempts")]
    pub max_repair_attempts: usize,
    /// How a gene is changed during repair.
    #[serde(default)]
    pub mutation: MutationMethod,
    /// Random seed for reproducibility.
    #[serde(default)]
    pub random_seed: Option<u64>,
}

impl Default for RepairConfig {
    fn default() -> Self {
        Self {
            max_repair_attempts: default_max_repair_attempts(),
            mutation: MutationMethod::default(),
            random_seed: None,
        }
    }
}

/// Mutation applied to a single gene.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum MutationMethod {
    /// Draw a fresh value from the domain, independent of the current one.
    Resample,
    /// Perturb numeric genes with Gaussian noise scaled by the domain width.
    /// Categorical genes are resampled.
    Gaussian {
        #[serde(default = "default_gaussian_strength")]
        strength: f64,
    },
}

impl Default for MutationMethod {
    fn default() -> Self {
        Self::Resample
    }
}

impl RepairConfig {
    /// Validate configuration parameters.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_repair_attempts == 0 {
            return Err(ConfigError::InvalidRepairAttempts);
        }
        if let MutationMethod::Gaussian { strength } = self.mutation {
            if !strength.is_finite() || strength <= 0.0 {
                return Err(ConfigError::InvalidMutationStrength(strength));
            }
        }
        Ok(())
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Maximum repair attempts must be non-zero")]
    InvalidRepairAttempts,
    #[error("Mutation strength must be positive and finite, got {0}")]
    InvalidMutationStrength(f64),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = RepairConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_repair_attempts, 20);
        assert_eq!(config.mutation, MutationMethod::Resample);
    }

    #[test]
    fn test_invalid_config() {
        let config = RepairConfig {
            max_repair_attempts: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidRepairAttempts)
        ));

        let config = RepairConfig {
            mutation: MutationMethod::Gaussian { strength: -0.5 },
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidMutationStrength(_))
        ));
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let config: RepairConfig = serde_json::from_str(r#"{"mutation": {"method": "Gaussian"}}"#).unwrap();
        assert_eq!(config.max_repair_attempts, 20);
        assert_eq!(config.mutation, MutationMethod::Gaussian { strength: 0.1 });

        let config: RepairConfig =
            serde_json::from_str(r#"{"max_repair_attempts": 5, "random_seed": 7}"#).unwrap();
        assert_eq!(config.max_repair_attempts, 5);
        assert_eq!(config.random_seed, Some(7));
        assert_eq!(config.mutation, MutationMethod::Resample);
    }
}
