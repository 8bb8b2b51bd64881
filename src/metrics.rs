//! Per-session metrics
//!
//! Turns one closed `SessionSpan` into a `WorkoutSession`. Pure function of
//! its inputs, so spans can be processed in any order or in parallel.
//!
//! Zone time uses a uniform time-per-sample approximation: the session's
//! wall-clock duration is divided evenly over all of its samples instead of
//! using the real (irregular) gaps between them.

use tracing::debug;

use crate::config::ZoneCalibration;
use crate::models::{WorkoutSession, ZoneMinutes};
use crate::segmenter::SessionSpan;
use crate::zones::{HeartRateZones, HrZone};

pub fn compute_session_metrics(
  span: &SessionSpan,
  zones: &HeartRateZones,
  calibration: &ZoneCalibration,
) -> WorkoutSession {
  let duration_ms = span.duration_ms();
  let duration_min = (duration_ms as f64 / 60_000.0).round() as i64;

  let heart_rates: Vec<i64> = span
    .samples
    .iter()
    .filter_map(|s| s.valid_heart_rate())
    .collect();

  let avg_heart_rate = mean(&heart_rates).map(|m| m.round() as i64);
  let zone_minutes = accumulate_zone_minutes(span, zones);
  let calories_burned = calories_burned(&zone_minutes, calibration);
  let (fat_burn_ratio, cardio_ratio) = zone_ratios(&zone_minutes);

  let relative_intensity = avg_heart_rate.map(|avg| avg as f64 / zones.max_heart_rate as f64);
  let intensity_score = relative_intensity.map(|r| (r * 100.0).round() as i64);
  let trimp_score = relative_intensity.map(|r| (duration_min as f64 * r * 100.0).round() as i64);

  let bpm_std_dev = population_std_dev(&heart_rates).map(|sd| round_to(sd, 1));

  debug!(
    sport = %span.sport,
    start = %span.start,
    duration_min,
    samples = span.samples.len(),
    valid_hr = heart_rates.len(),
    ?avg_heart_rate,
    ?trimp_score,
    "computed session metrics"
  );

  WorkoutSession {
    sport: span.sport.clone(),
    session_start: span.start,
    session_end: span.last_time,
    duration_min,
    avg_heart_rate,
    zones: zone_minutes,
    calories_burned,
    intensity_score,
    trimp_score,
    fat_burn_ratio,
    cardio_ratio,
    bpm_std_dev,
    recovery_drop_bpm: None,
    warmup_duration_sec: None,
  }
}

/// Spread the session duration evenly over its samples and credit each
/// zoned reading with one share. Totals are rounded per zone at the end.
fn accumulate_zone_minutes(span: &SessionSpan, zones: &HeartRateZones) -> ZoneMinutes {
  let sample_count = span.samples.len();
  let seconds_per_reading = if sample_count > 1 {
    span.duration_ms() as f64 / (1000.0 * sample_count as f64)
  } else {
    1.0
  };

  let mut raw = [0.0f64; 5];
  for sample in &span.samples {
    if let Some(zone) = sample.valid_heart_rate().and_then(|hr| zones.classify(hr)) {
      raw[zone.index()] += seconds_per_reading / 60.0;
    }
  }

  let mut minutes = ZoneMinutes::default();
  for zone in HrZone::ALL {
    minutes.set(zone, raw[zone.index()].round() as i64);
  }
  minutes
}

fn calories_burned(minutes: &ZoneMinutes, calibration: &ZoneCalibration) -> i64 {
  HrZone::ALL
    .iter()
    .map(|zone| minutes.get(*zone) as f64 * calibration.calories_per_minute[zone.index()])
    .sum::<f64>()
    .round() as i64
}

/// (fat_burn, cardio) share of zoned time, both 0 when nothing was zoned
fn zone_ratios(minutes: &ZoneMinutes) -> (f64, f64) {
  let fat_burn = minutes.fat_burn();
  let cardio = minutes.cardio();
  let total = fat_burn + cardio;
  if total == 0 {
    return (0.0, 0.0);
  }
  (
    round_to(fat_burn as f64 / total as f64, 2),
    round_to(cardio as f64 / total as f64, 2),
  )
}

fn mean(values: &[i64]) -> Option<f64> {
  if values.is_empty() {
    return None;
  }
  Some(values.iter().sum::<i64>() as f64 / values.len() as f64)
}

fn population_std_dev(values: &[i64]) -> Option<f64> {
  if values.len() < 2 {
    return None;
  }
  let mean = mean(values)?;
  let variance = values
    .iter()
    .map(|v| (*v as f64 - mean).powi(2))
    .sum::<f64>()
    / values.len() as f64;
  Some(variance.sqrt())
}

fn round_to(value: f64, decimals: i32) -> f64 {
  let factor = 10f64.powi(decimals);
  (value * factor).round() / factor
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
