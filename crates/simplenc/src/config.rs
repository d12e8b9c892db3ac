//! Coder construction parameters.

use serde::{Deserialize, Serialize};

use crate::error::{CoderError, CoderResult};

/// Construction parameters for a [`BinaryCoder`](crate::BinaryCoder).
///
/// These are fixed for the lifetime of a coding session (generation).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoderConfig {
    /// Number of symbols coded together.
    ///
    /// Default: 4
    pub num_symbols: usize,

    /// Length of every packet payload in bits.
    ///
    /// Default: 5
    pub packet_bit_length: usize,

    /// Seed for the coder's own random source.
    ///
    /// Identical seeds produce identical coded-packet sequences.
    ///
    /// Default: 1
    #[serde(default = "default_seed")]
    pub seed: u64,
}

const fn default_seed() -> u64 {
    1
}

impl Default for CoderConfig {
    fn default() -> Self {
        Self {
            num_symbols: 4,
            packet_bit_length: 5,
            seed: default_seed(),
        }
    }
}

impl CoderConfig {
    /// Config with the given dimensions and seed.
    #[must_use]
    pub const fn new(num_symbols: usize, packet_bit_length: usize, seed: u64) -> Self {
        Self {
            num_symbols,
            packet_bit_length,
            seed,
        }
    }

    /// Check the dimensions.
    ///
    /// # Errors
    ///
    /// Returns `CoderError::InvalidConfig` if either dimension is zero.
    pub fn validate(&self) -> CoderResult<()> {
        if self.num_symbols == 0 {
            return Err(CoderError::InvalidConfig {
                reason: "num_symbols must be positive".into(),
            });
        }
        if self.packet_bit_length == 0 {
            return Err(CoderError::InvalidConfig {
                reason: "packet_bit_length must be positive".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = CoderConfig::default();
        assert_eq!(config.num_symbols, 4);
        assert_eq!(config.packet_bit_length, 5);
        assert_eq!(config.seed, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_dimensions_rejected() {
        let err = CoderConfig::new(0, 5, 1).validate().unwrap_err();
        assert!(matches!(err, CoderError::InvalidConfig { .. }));
        assert!(err.to_string().contains("num_symbols"));

        let err = CoderConfig::new(3, 0, 1).validate().unwrap_err();
        assert!(err.to_string().contains("packet_bit_length"));
    }

    #[test]
    fn config_serialization_roundtrip() {
        let config = CoderConfig::new(16, 1024, 42);
        let json = serde_json::to_string(&config).unwrap();
        let deserialized: CoderConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn seed_defaults_when_missing() {
        let config: CoderConfig =
            serde_json::from_str(r#"{"num_symbols": 8, "packet_bit_length": 16}"#).unwrap();
        assert_eq!(config.seed, 1);
        assert_eq!(config.num_symbols, 8);
    }
}
