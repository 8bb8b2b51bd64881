use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Sport label used when a sample carries none
pub const UNKNOWN_SPORT: &str = "Unknown";

/// One heart-rate/GPS reading. Arrives already filtered to the valid HR band
/// and sorted ascending by timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct TelemetrySample {
  pub timestamp: DateTime<Utc>,
  pub heart_rate: Option<i64>,
  pub sport: Option<String>,
  pub latitude: Option<f64>,
  pub longitude: Option<f64>,
  pub altitude: Option<f64>,
  pub speed: Option<f64>,
}

impl TelemetrySample {
  /// Heart-rate-only sample without position data
  pub fn new(timestamp: DateTime<Utc>, heart_rate: Option<i64>, sport: Option<&str>) -> Self {
    Self {
      timestamp,
      heart_rate,
      sport: sport.map(str::to_string),
      latitude: None,
      longitude: None,
      altitude: None,
      speed: None,
    }
  }

  /// Heart rate if present and positive
  pub fn valid_heart_rate(&self) -> Option<i64> {
    self.heart_rate.filter(|hr| *hr > 0)
  }

  pub fn sport_label(&self) -> &str {
    self.sport.as_deref().unwrap_or(UNKNOWN_SPORT)
  }
}
