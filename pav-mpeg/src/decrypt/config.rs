use super::MAX_KEY_LEN;
use crate::{Error, Result, ps::SEARCH_LIMIT};

/// Tuning knobs for key recovery.
///
/// The defaults were tuned against real containers. Other container families or
/// damaged tails may need different values.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct RecoveryConfig {
    /// Minimum autocorrelation ratio for a key length to be tried.
    pub confidence_threshold: f64,
    /// Tail window sizes, in multiples of the candidate key length.
    pub window_multipliers: Vec<usize>,
    /// Largest key length tried.
    pub max_key_len: usize,
    /// Bytes excluded from the end of the container around the end code.
    pub tail_margin: usize,
    /// Minimum number of key periods a tail window must hold.
    pub min_periods: usize,
    /// Cap on how far the clear region is walked.
    pub search_limit: usize,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.90,
            window_multipliers: vec![3, 5, 8, 12, 20],
            max_key_len: MAX_KEY_LEN,
            tail_margin: 8,
            min_periods: 3,
            search_limit: SEARCH_LIMIT,
        }
    }
}

impl RecoveryConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.confidence_threshold > 0.0 && self.confidence_threshold <= 1.0) {
            return Err(Error::InvalidConfig(format!(
                "confidence threshold must be in (0, 1], got {}",
                self.confidence_threshold
            )));
        }

        if self.window_multipliers.is_empty() || self.window_multipliers.contains(&0) {
            return Err(Error::InvalidConfig(
                "window multipliers must be non-empty and non-zero".to_owned(),
            ));
        }

        if !(1..=MAX_KEY_LEN).contains(&self.max_key_len) {
            return Err(Error::InvalidConfig(format!(
                "max key length must be in 1..={}, got {}",
                MAX_KEY_LEN, self.max_key_len
            )));
        }

        if self.min_periods < 2 {
            return Err(Error::InvalidConfig(format!(
                "a tail window needs at least 2 key periods, got {}",
                self.min_periods
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        assert!(RecoveryConfig::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_values() {
        let invalid = [
            RecoveryConfig {
                confidence_threshold: 0.0,
                ..Default::default()
            },
            RecoveryConfig {
                confidence_threshold: f64::NAN,
                ..Default::default()
            },
            RecoveryConfig {
                window_multipliers: vec![3, 0],
                ..Default::default()
            },
            RecoveryConfig {
                window_multipliers: vec![],
                ..Default::default()
            },
            RecoveryConfig {
                max_key_len: 129,
                ..Default::default()
            },
            RecoveryConfig {
                min_periods: 1,
                ..Default::default()
            },
        ];

        for config in invalid {
            assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
        }
    }
}
