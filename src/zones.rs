//! Heart-rate zone model
//!
//! Five zones derived from a single max HR using fixed fraction bands.
//! Classification picks the highest zone whose floor the reading meets, so a
//! reading above max HR still lands in Z5 and anything under the Z1 floor is
//! unzoned.

use serde::{Deserialize, Serialize};

use crate::config::ZoneCalibration;
use crate::error::EngineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HrZone {
  Z1, // Recovery: 50-60% max
  Z2, // Aerobic: 60-70% max
  Z3, // Tempo: 70-80% max
  Z4, // Threshold: 80-90% max
  Z5, // VO2max: 90-100% max
}

impl HrZone {
  pub const ALL: [HrZone; 5] = [HrZone::Z1, HrZone::Z2, HrZone::Z3, HrZone::Z4, HrZone::Z5];

  pub fn index(self) -> usize {
    match self {
      HrZone::Z1 => 0,
      HrZone::Z2 => 1,
      HrZone::Z3 => 2,
      HrZone::Z4 => 3,
      HrZone::Z5 => 4,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      HrZone::Z1 => "Z1",
      HrZone::Z2 => "Z2",
      HrZone::Z3 => "Z3",
      HrZone::Z4 => "Z4",
      HrZone::Z5 => "Z5",
    }
  }

  /// Z1 and Z2 count as fat-burn time, Z3 and above as cardio
  pub fn is_fat_burn(self) -> bool {
    matches!(self, HrZone::Z1 | HrZone::Z2)
  }
}

/// Inclusive bpm range of one zone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneBounds {
  pub min: f64,
  pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeartRateZones {
  pub max_heart_rate: i64,
  /// Indexed by `HrZone::index`
  pub zone_bounds: [ZoneBounds; 5],
}

impl HeartRateZones {
  pub fn bounds(&self, zone: HrZone) -> ZoneBounds {
    self.zone_bounds[zone.index()]
  }

  pub fn classify(&self, heart_rate: i64) -> Option<HrZone> {
    let hr = heart_rate as f64;
    HrZone::ALL
      .iter()
      .rev()
      .find(|zone| hr >= self.bounds(**zone).min)
      .copied()
  }
}

/// Build zones from max HR with the default fraction bands
pub fn build_zones(max_heart_rate: i64) -> Result<HeartRateZones, EngineError> {
  build_zones_with(max_heart_rate, &ZoneCalibration::default())
}

pub fn build_zones_with(
  max_heart_rate: i64,
  calibration: &ZoneCalibration,
) -> Result<HeartRateZones, EngineError> {
  if max_heart_rate <= 0 {
    return Err(EngineError::InvalidMaxHeartRate(max_heart_rate));
  }

  let max = max_heart_rate as f64;
  let zone_bounds = calibration.zone_fractions.map(|(lo, hi)| ZoneBounds {
    min: max * lo,
    max: max * hi,
  });

  Ok(HeartRateZones {
    max_heart_rate,
    zone_bounds,
  })
}

pub fn classify(heart_rate: i64, zones: &HeartRateZones) -> Option<HrZone> {
  zones.classify(heart_rate)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
