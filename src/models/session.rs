use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::ops::AddAssign;

use crate::zones::HrZone;

/// Whole minutes spent in each HR zone
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneMinutes {
  #[serde(rename = "Z1")]
  pub z1: i64,
  #[serde(rename = "Z2")]
  pub z2: i64,
  #[serde(rename = "Z3")]
  pub z3: i64,
  #[serde(rename = "Z4")]
  pub z4: i64,
  #[serde(rename = "Z5")]
  pub z5: i64,
}

impl ZoneMinutes {
  pub fn get(&self, zone: HrZone) -> i64 {
    match zone {
      HrZone::Z1 => self.z1,
      HrZone::Z2 => self.z2,
      HrZone::Z3 => self.z3,
      HrZone::Z4 => self.z4,
      HrZone::Z5 => self.z5,
    }
  }

  pub fn set(&mut self, zone: HrZone, minutes: i64) {
    match zone {
      HrZone::Z1 => self.z1 = minutes,
      HrZone::Z2 => self.z2 = minutes,
      HrZone::Z3 => self.z3 = minutes,
      HrZone::Z4 => self.z4 = minutes,
      HrZone::Z5 => self.z5 = minutes,
    }
  }

  pub fn total(&self) -> i64 {
    self.z1 + self.z2 + self.z3 + self.z4 + self.z5
  }

  pub fn fat_burn(&self) -> i64 {
    HrZone::ALL.iter().filter(|z| z.is_fat_burn()).map(|z| self.get(*z)).sum()
  }

  pub fn cardio(&self) -> i64 {
    HrZone::ALL.iter().filter(|z| !z.is_fat_burn()).map(|z| self.get(*z)).sum()
  }
}

impl AddAssign for ZoneMinutes {
  fn add_assign(&mut self, other: Self) {
    self.z1 += other.z1;
    self.z2 += other.z2;
    self.z3 += other.z3;
    self.z4 += other.z4;
    self.z5 += other.z5;
  }
}

/// A detected exercise session with its derived metrics. Built once from a
/// closed session span and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSession {
  pub sport: String,
  pub session_start: DateTime<Utc>,
  /// Timestamp of the last sample in the session
  pub session_end: DateTime<Utc>,
  pub duration_min: i64,
  pub avg_heart_rate: Option<i64>,
  pub zones: ZoneMinutes,
  pub calories_burned: i64,
  pub intensity_score: Option<i64>,
  pub trimp_score: Option<i64>,
  pub fat_burn_ratio: f64,
  pub cardio_ratio: f64,
  pub bpm_std_dev: Option<f64>,
  /// No algorithm defined yet; always `None`
  pub recovery_drop_bpm: Option<i64>,
  /// No algorithm defined yet; always `None`
  pub warmup_duration_sec: Option<i64>,
}

/// Row shape of the `workout_sessions` table
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct StoredSession {
  pub id: i64,
  pub sport: String,
  pub session_start: DateTime<Utc>,
  pub session_end: DateTime<Utc>,
  pub duration_min: i64,
  pub avg_heart_rate: Option<i64>,
  pub z1_minutes: i64,
  pub z2_minutes: i64,
  pub z3_minutes: i64,
  pub z4_minutes: i64,
  pub z5_minutes: i64,
  pub calories_burned: i64,
  pub intensity_score: Option<i64>,
  pub trimp_score: Option<i64>,
  pub fat_burn_ratio: f64,
  pub cardio_ratio: f64,
  pub bpm_std_dev: Option<f64>,
  pub recovery_drop_bpm: Option<i64>,
  pub warmup_duration_sec: Option<i64>,
  pub created_at: Option<DateTime<Utc>>,
}

impl From<StoredSession> for WorkoutSession {
  fn from(row: StoredSession) -> Self {
    Self {
      sport: row.sport,
      session_start: row.session_start,
      session_end: row.session_end,
      duration_min: row.duration_min,
      avg_heart_rate: row.avg_heart_rate,
      zones: ZoneMinutes {
        z1: row.z1_minutes,
        z2: row.z2_minutes,
        z3: row.z3_minutes,
        z4: row.z4_minutes,
        z5: row.z5_minutes,
      },
      calories_burned: row.calories_burned,
      intensity_score: row.intensity_score,
      trimp_score: row.trimp_score,
      fat_burn_ratio: row.fat_burn_ratio,
      cardio_ratio: row.cardio_ratio,
      bpm_std_dev: row.bpm_std_dev,
      recovery_drop_bpm: row.recovery_drop_bpm,
      warmup_duration_sec: row.warmup_duration_sec,
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_zone_minutes_accumulate() {
    let mut total = ZoneMinutes::default();
    total += ZoneMinutes { z1: 2, z2: 5, z3: 3, z4: 0, z5: 1 };
    total += ZoneMinutes { z1: 1, z2: 0, z3: 4, z4: 2, z5: 0 };

    assert_eq!(total, ZoneMinutes { z1: 3, z2: 5, z3: 7, z4: 2, z5: 1 });
    assert_eq!(total.total(), 18);
    assert_eq!(total.fat_burn(), 8);
    assert_eq!(total.cardio(), 10);
  }

  #[test]
  fn test_zone_minutes_get_and_set() {
    let mut minutes = ZoneMinutes::default();
    minutes.set(HrZone::Z4, 12);
    assert_eq!(minutes.get(HrZone::Z4), 12);
    assert_eq!(minutes.z4, 12);
  }

  #[test]
  fn test_zone_minutes_serialize_with_zone_names() {
    let minutes = ZoneMinutes { z1: 1, z2: 2, z3: 3, z4: 4, z5: 5 };
    let json = serde_json::to_value(minutes).unwrap();
    assert_eq!(json["Z1"], 1);
    assert_eq!(json["Z5"], 5);
  }
}
