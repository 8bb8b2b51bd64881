//! Test utilities and helpers for unit and integration testing
//!
//! This module provides common test infrastructure including:
//! - In-memory database setup/teardown
//! - Telemetry seeding
//! - Sample and session factories
//! - Helper assertions

use chrono::{DateTime, Duration, TimeZone, Utc};
use sqlx::SqlitePool;

use crate::db;
use crate::models::{TelemetrySample, WorkoutSession, ZoneMinutes};

/// ---------------------------------------------------------------------------
/// Database Test Utilities
/// ---------------------------------------------------------------------------

/// Create an in-memory SQLite database for testing
/// Runs all migrations and returns a ready-to-use pool
///
/// Uses max_connections(1) to prevent multiple pool connections from creating
/// isolated in-memory databases, which would cause intermittent test failures
pub async fn setup_test_db() -> SqlitePool {
  let pool = sqlx::sqlite::SqlitePoolOptions::new()
    .max_connections(1)
    .connect("sqlite::memory:")
    .await
    .expect("Failed to create in-memory database");

  sqlx::migrate!("./migrations")
    .run(&pool)
    .await
    .expect("Failed to run migrations");

  pool
}

/// Close a test database pool
pub async fn teardown_test_db(pool: SqlitePool) {
  pool.close().await;
}

/// Seed the telemetry table, returning the number of rows written
pub async fn seed_telemetry(pool: &SqlitePool, samples: &[TelemetrySample]) -> u64 {
  db::insert_telemetry(pool, samples)
    .await
    .expect("Failed to seed telemetry")
}

/// ---------------------------------------------------------------------------
/// Mock Data Factories
/// ---------------------------------------------------------------------------

/// Monday 2024-03-04 07:00 UTC
pub fn base_time() -> DateTime<Utc> {
  Utc.with_ymd_and_hms(2024, 3, 4, 7, 0, 0).unwrap()
}

/// Evenly spaced samples from `start` through `start + minutes`, inclusive
pub fn sample_run(
  start: DateTime<Utc>,
  minutes: i64,
  interval_secs: i64,
  heart_rate: i64,
  sport: Option<&str>,
) -> Vec<TelemetrySample> {
  let steps = minutes * 60 / interval_secs;
  (0..=steps)
    .map(|i| {
      TelemetrySample::new(
        start + Duration::seconds(i * interval_secs),
        Some(heart_rate),
        sport,
      )
    })
    .collect()
}

/// A day of telemetry with four real sessions and two short bursts.
/// Heart rates are chosen so every reading is zoned at max HR 220 and no
/// session spans more than two zones.
pub fn mixed_day_samples(day_start: DateTime<Utc>) -> Vec<TelemetrySample> {
  let mut samples = Vec::new();

  // 30 min run, Z2
  samples.extend(sample_run(day_start, 30, 45, 150, Some("Running")));
  // 4 min burst after a 10 min gap (discarded)
  samples.extend(sample_run(day_start + Duration::minutes(40), 4, 30, 150, Some("Running")));

  // 45 min ride alternating Z2/Z3
  let mut ride = sample_run(day_start + Duration::hours(2), 45, 60, 140, Some("Cycling"));
  for (i, sample) in ride.iter_mut().enumerate() {
    if i % 2 == 1 {
      sample.heart_rate = Some(160);
    }
  }
  samples.extend(ride);
  // 3 min of rowing right after the ride (discarded)
  samples.extend(sample_run(
    day_start + Duration::hours(2) + Duration::seconds(45 * 60 + 30),
    3,
    30,
    150,
    Some("Rowing"),
  ));

  // 20 min walk, Z1
  samples.extend(sample_run(day_start + Duration::hours(5), 20, 60, 115, Some("Walking")));

  // 25 min evening run, Z4
  samples.extend(sample_run(day_start + Duration::hours(11), 25, 30, 180, Some("Running")));

  samples
}

/// A 30 minute session with fixed metrics and the given TRIMP score
pub fn mock_workout_session(
  sport: &str,
  session_start: DateTime<Utc>,
  trimp_score: Option<i64>,
) -> WorkoutSession {
  WorkoutSession {
    sport: sport.to_string(),
    session_start,
    session_end: session_start + Duration::minutes(30),
    duration_min: 30,
    avg_heart_rate: trimp_score.map(|_| 145),
    zones: ZoneMinutes { z1: 0, z2: 20, z3: 10, z4: 0, z5: 0 },
    calories_burned: 400,
    intensity_score: trimp_score.map(|_| 66),
    trimp_score,
    fat_burn_ratio: 0.67,
    cardio_ratio: 0.33,
    bpm_std_dev: Some(6.2),
    recovery_drop_bpm: None,
    warmup_duration_sec: None,
  }
}

/// ---------------------------------------------------------------------------
/// Test Macros
/// ---------------------------------------------------------------------------

/// Assert two floats are approximately equal within a tolerance
#[macro_export]
macro_rules! assert_approx_eq {
  ($left:expr, $right:expr, $tolerance:expr) => {
    let diff = ($left - $right).abs();
    assert!(
      diff < $tolerance,
      "Values not approximately equal: {} vs {} (diff: {}, tolerance: {})",
      $left,
      $right,
      diff,
      $tolerance
    );
  };
}

/// ---------------------------------------------------------------------------
/// Tests for Test Utilities
/// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use super::*;

  #[tokio::test]
  async fn test_setup_db_creates_schema() {
    let pool = setup_test_db().await;

    let tables: Vec<(String,)> = sqlx::query_as(
      "SELECT name FROM sqlite_master WHERE type='table' AND name IN ('heart_rate_telemetry', 'workout_sessions')"
    )
    .fetch_all(&pool)
    .await
    .expect("Failed to query tables");

    assert_eq!(tables.len(), 2, "Expected 2 tables, got {}", tables.len());

    teardown_test_db(pool).await;
  }

  #[tokio::test]
  async fn test_seed_telemetry_returns_correct_count() {
    let pool = setup_test_db().await;

    let samples = sample_run(base_time(), 5, 60, 140, Some("Running"));
    let written = seed_telemetry(&pool, &samples).await;
    assert_eq!(written, 6);

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM heart_rate_telemetry")
      .fetch_one(&pool)
      .await
      .expect("Failed to count telemetry");

    assert_eq!(count, 6);

    teardown_test_db(pool).await;
  }

  #[test]
  fn test_sample_run_is_inclusive_and_sorted() {
    let samples = sample_run(base_time(), 10, 30, 140, Some("Running"));

    assert_eq!(samples.len(), 21);
    assert_eq!(samples[20].timestamp - samples[0].timestamp, Duration::minutes(10));
    assert!(samples.windows(2).all(|p| p[0].timestamp < p[1].timestamp));
  }

  #[test]
  fn test_mixed_day_is_sorted() {
    let samples = mixed_day_samples(base_time());
    assert!(samples.windows(2).all(|p| p[0].timestamp <= p[1].timestamp));
  }
}
