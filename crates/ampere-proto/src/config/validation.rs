use super::{Config, MAX_SCALE_FACTOR};

/// Errors returned when validating a [`Config`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    /// The low level threshold is not a percentage.
    #[error("low level threshold {value} is outside 0..=100")]
    ThresholdOutOfRange { value: u8 },

    /// The scale factor cannot be used to size the window.
    #[error(
        "scale factor {value} must be greater than 0 and at most {max}",
        max = MAX_SCALE_FACTOR
    )]
    InvalidScaleFactor { value: f64 },
}

impl Config {
    /// Validates values serde cannot check on its own.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigValidationError`] if the low level threshold exceeds
    /// 100 or the scale factor is not in `(0, MAX_SCALE_FACTOR]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use ampere_proto::config::Config;
    ///
    /// let config = Config::default();
    /// assert!(config.validate().is_ok());
    /// ```
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        let threshold = self.indicator.low_level_threshold;
        if threshold > 100 {
            return Err(ConfigValidationError::ThresholdOutOfRange { value: threshold });
        }

        let scale_factor = self.appearance.scale_factor;
        if !scale_factor.is_finite() || scale_factor <= 0.0 || scale_factor > MAX_SCALE_FACTOR
        {
            return Err(ConfigValidationError::InvalidScaleFactor {
                value: scale_factor,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_accepts_default_config() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_threshold_above_hundred() {
        let mut config = Config::default();
        config.indicator.low_level_threshold = 120;

        let error = config.validate().expect_err("expected threshold error");
        assert_eq!(error, ConfigValidationError::ThresholdOutOfRange { value: 120 });
    }

    #[test]
    fn validate_rejects_non_finite_scale_factor() {
        let mut config = Config::default();
        config.appearance.scale_factor = f64::INFINITY;

        let error = config.validate().expect_err("expected scale factor error");
        assert!(matches!(error, ConfigValidationError::InvalidScaleFactor { .. }));
    }

    #[test]
    fn validate_rejects_scale_factor_above_maximum() {
        let mut config = Config::default();
        config.appearance.scale_factor = 2.5;

        let error = config.validate().expect_err("expected scale factor error");
        assert_eq!(error, ConfigValidationError::InvalidScaleFactor { value: 2.5 });

        config.appearance.scale_factor = MAX_SCALE_FACTOR;
        assert!(config.validate().is_ok());
    }
}
