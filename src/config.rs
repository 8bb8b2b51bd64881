//! Engine configuration
//!
//! Detection thresholds, zone calibration data and database settings. All of
//! these are plain values passed into the engine per call; the environment is
//! only consulted by the `from_env` constructors.

use serde::{Deserialize, Serialize};
use std::env;

use crate::error::EngineError;

/// ---------------------------------------------------------------------------
/// Session Detection
/// ---------------------------------------------------------------------------

/// Upper bound for `min_session_duration_minutes` and `max_gap_minutes` (one day)
pub const MAX_THRESHOLD_MINUTES: i64 = 24 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDetectionConfig {
  /// Candidates shorter than this (last sample - first sample) are dropped
  pub min_session_duration_minutes: i64,
  /// A larger gap between consecutive samples closes the open session
  pub max_gap_minutes: i64,
  /// Lower bound of the valid heart-rate band applied when loading telemetry
  pub min_heart_rate: i64,
  /// Upper bound of the valid band, and the max HR the zone model is built from
  pub max_heart_rate: i64,
}

impl Default for SessionDetectionConfig {
  fn default() -> Self {
    Self {
      min_session_duration_minutes: 10,
      max_gap_minutes: 5,
      min_heart_rate: 50,
      max_heart_rate: 220,
    }
  }
}

impl SessionDetectionConfig {
  /// Read overrides from `SESSION_*` variables, keeping the default for any
  /// variable that is unset or does not parse.
  pub fn from_env() -> Self {
    let defaults = Self::default();
    Self {
      min_session_duration_minutes: env_i64("SESSION_MIN_DURATION_MINUTES")
        .unwrap_or(defaults.min_session_duration_minutes),
      max_gap_minutes: env_i64("SESSION_MAX_GAP_MINUTES").unwrap_or(defaults.max_gap_minutes),
      min_heart_rate: env_i64("SESSION_MIN_HEART_RATE").unwrap_or(defaults.min_heart_rate),
      max_heart_rate: env_i64("SESSION_MAX_HEART_RATE").unwrap_or(defaults.max_heart_rate),
    }
  }

  pub fn validate(&self) -> Result<(), EngineError> {
    if self.max_heart_rate <= 0 {
      return Err(EngineError::InvalidMaxHeartRate(self.max_heart_rate));
    }
    check_threshold("min_session_duration_minutes", self.min_session_duration_minutes)?;
    check_threshold("max_gap_minutes", self.max_gap_minutes)?;
    if self.min_heart_rate > self.max_heart_rate {
      return Err(EngineError::InvalidConfig(format!(
        "min_heart_rate ({}) exceeds max_heart_rate ({})",
        self.min_heart_rate, self.max_heart_rate
      )));
    }
    Ok(())
  }

  /// Saturates instead of overflowing for configs that skipped `validate`
  pub fn min_session_duration_ms(&self) -> i64 {
    self.min_session_duration_minutes.saturating_mul(60_000)
  }

  pub fn max_gap_ms(&self) -> i64 {
    self.max_gap_minutes.saturating_mul(60_000)
  }
}

fn check_threshold(name: &str, minutes: i64) -> Result<(), EngineError> {
  if !(0..=MAX_THRESHOLD_MINUTES).contains(&minutes) {
    return Err(EngineError::InvalidConfig(format!(
      "{} must be between 0 and {}, got {}",
      name, MAX_THRESHOLD_MINUTES, minutes
    )));
  }
  Ok(())
}

/// ---------------------------------------------------------------------------
/// Zone Calibration
/// ---------------------------------------------------------------------------

/// Zone bands as fractions of max HR plus the calorie burn rate used per zone.
/// Index 0 is Z1, index 4 is Z5.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneCalibration {
  pub zone_fractions: [(f64, f64); 5],
  /// kcal per minute spent in each zone
  pub calories_per_minute: [f64; 5],
}

impl Default for ZoneCalibration {
  fn default() -> Self {
    Self {
      zone_fractions: [(0.50, 0.60), (0.60, 0.70), (0.70, 0.80), (0.80, 0.90), (0.90, 1.00)],
      calories_per_minute: [8.0, 12.0, 16.0, 20.0, 25.0],
    }
  }
}

impl ZoneCalibration {
  pub fn validate(&self) -> Result<(), EngineError> {
    let mut previous_min = f64::NEG_INFINITY;
    for (i, (min, max)) in self.zone_fractions.iter().enumerate() {
      let in_unit_range = (0.0..=1.0).contains(min) && (0.0..=1.0).contains(max);
      if !in_unit_range || min > max || *min <= previous_min {
        return Err(EngineError::InvalidConfig(format!(
          "zone Z{} fractions ({}, {}) must be ascending within [0, 1]",
          i + 1,
          min,
          max
        )));
      }
      previous_min = *min;
    }

    if let Some(rate) = self.calories_per_minute.iter().find(|r| !r.is_finite() || **r < 0.0) {
      return Err(EngineError::InvalidConfig(format!(
        "calories_per_minute must be non-negative, got {}",
        rate
      )));
    }

    Ok(())
  }
}

/// ---------------------------------------------------------------------------
/// Database
/// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
  pub url: String,
  pub max_connections: u32,
}

impl DatabaseConfig {
  pub fn from_env() -> Result<Self, EngineError> {
    Ok(Self {
      url: env::var("DATABASE_URL")
        .map_err(|_| EngineError::MissingConfig("DATABASE_URL".into()))?,
      max_connections: env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(5),
    })
  }
}

fn env_i64(key: &str) -> Option<i64> {
  env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;
  use serial_test::serial;

  #[test]
  fn test_detection_defaults() {
    let config = SessionDetectionConfig::default();
    assert_eq!(config.min_session_duration_minutes, 10);
    assert_eq!(config.max_gap_minutes, 5);
    assert_eq!(config.min_heart_rate, 50);
    assert_eq!(config.max_heart_rate, 220);
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_detection_config_rejects_non_positive_max_hr() {
    let config = SessionDetectionConfig {
      max_heart_rate: 0,
      min_heart_rate: 0,
      ..Default::default()
    };
    assert_eq!(config.validate(), Err(EngineError::InvalidMaxHeartRate(0)));
  }

  #[test]
  fn test_detection_config_rejects_inverted_band() {
    let config = SessionDetectionConfig {
      min_heart_rate: 200,
      max_heart_rate: 180,
      ..Default::default()
    };
    assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
  }

  #[test]
  fn test_detection_config_rejects_oversized_thresholds() {
    let config = SessionDetectionConfig {
      min_session_duration_minutes: i64::MAX / 2,
      ..Default::default()
    };
    assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
    assert_eq!(config.min_session_duration_ms(), i64::MAX);

    let config = SessionDetectionConfig {
      max_gap_minutes: MAX_THRESHOLD_MINUTES + 1,
      ..Default::default()
    };
    assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));

    let config = SessionDetectionConfig {
      min_session_duration_minutes: MAX_THRESHOLD_MINUTES,
      max_gap_minutes: MAX_THRESHOLD_MINUTES,
      ..Default::default()
    };
    assert!(config.validate().is_ok());
  }

  #[test]
  fn test_detection_config_rejects_negative_gap() {
    let config = SessionDetectionConfig {
      max_gap_minutes: -1,
      ..Default::default()
    };
    assert!(matches!(config.validate(), Err(EngineError::InvalidConfig(_))));
  }

  #[test]
  #[serial]
  fn test_detection_config_from_env_overrides() {
    temp_env::with_vars(
      [
        ("SESSION_MIN_DURATION_MINUTES", Some("15")),
        ("SESSION_MAX_GAP_MINUTES", Some("3")),
        ("SESSION_MIN_HEART_RATE", None),
        ("SESSION_MAX_HEART_RATE", Some("190")),
      ],
      || {
        let config = SessionDetectionConfig::from_env();
        assert_eq!(config.min_session_duration_minutes, 15);
        assert_eq!(config.max_gap_minutes, 3);
        assert_eq!(config.min_heart_rate, 50);
        assert_eq!(config.max_heart_rate, 190);
      },
    );
  }

  #[test]
  #[serial]
  fn test_detection_config_from_env_ignores_garbage() {
    temp_env::with_var("SESSION_MAX_GAP_MINUTES", Some("five"), || {
      let config = SessionDetectionConfig::from_env();
      assert_eq!(config.max_gap_minutes, 5);
    });
  }

  #[test]
  fn test_calibration_defaults_are_valid() {
    let calibration = ZoneCalibration::default();
    assert!(calibration.validate().is_ok());
    assert_eq!(calibration.calories_per_minute[4], 25.0);
  }

  #[test]
  fn test_calibration_rejects_non_ascending_floors() {
    let mut calibration = ZoneCalibration::default();
    calibration.zone_fractions[2] = (0.65, 0.80);
    assert!(calibration.validate().is_ok());

    calibration.zone_fractions[2] = (0.60, 0.80);
    assert!(matches!(calibration.validate(), Err(EngineError::InvalidConfig(_))));
  }

  #[test]
  fn test_calibration_rejects_negative_calorie_rate() {
    let mut calibration = ZoneCalibration::default();
    calibration.calories_per_minute[0] = -1.0;
    assert!(matches!(calibration.validate(), Err(EngineError::InvalidConfig(_))));
  }

  #[test]
  #[serial]
  fn test_database_config_requires_url() {
    temp_env::with_var_unset("DATABASE_URL", || {
      let result = DatabaseConfig::from_env();
      assert_eq!(
        result.unwrap_err(),
        EngineError::MissingConfig("DATABASE_URL".into())
      );
    });
  }

  #[test]
  #[serial]
  fn test_database_config_reads_pool_size() {
    temp_env::with_vars(
      [
        ("DATABASE_URL", Some("sqlite::memory:")),
        ("DATABASE_MAX_CONNECTIONS", Some("2")),
      ],
      || {
        let config = DatabaseConfig::from_env().unwrap();
        assert_eq!(config.url, "sqlite::memory:");
        assert_eq!(config.max_connections, 2);
      },
    );
  }
}
