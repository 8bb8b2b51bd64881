use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use tracing::info;

use crate::aggregation::DayRange;
use crate::config::{DatabaseConfig, SessionDetectionConfig};
use crate::error::EngineError;
use crate::models::{StoredSession, TelemetrySample, WorkoutSession};

pub type DbPool = SqlitePool;

/// Application state holding the database connection pool
pub struct AppState {
  pub db: DbPool,
}

/// Initialize the database connection pool and run migrations
pub async fn initialize_db(config: &DatabaseConfig) -> Result<DbPool, EngineError> {
  info!(url = %config.url, "initializing database");

  let pool = SqlitePoolOptions::new()
    .max_connections(config.max_connections)
    .connect(&config.url)
    .await?;

  sqlx::migrate!("./migrations").run(&pool).await?;

  info!("database initialized");

  Ok(pool)
}

/// ---------------------------------------------------------------------------
/// Telemetry
/// ---------------------------------------------------------------------------

/// Samples inside `range` whose heart rate falls in the configured band,
/// ordered by timestamp. This is the filtered, sorted batch the segmenter
/// expects.
pub async fn load_telemetry(
  pool: &DbPool,
  range: &DayRange,
  config: &SessionDetectionConfig,
) -> Result<Vec<TelemetrySample>, EngineError> {
  let samples = sqlx::query_as::<_, TelemetrySample>(
    r#"
    SELECT timestamp, heart_rate, sport, latitude, longitude, altitude, speed
    FROM heart_rate_telemetry
    WHERE timestamp >= ?1 AND timestamp < ?2
      AND heart_rate BETWEEN ?3 AND ?4
    ORDER BY timestamp ASC, id ASC
    "#,
  )
  .bind(range.start)
  .bind(range.end)
  .bind(config.min_heart_rate)
  .bind(config.max_heart_rate)
  .fetch_all(pool)
  .await?;

  Ok(samples)
}

/// Whether any in-band sample falls in `[from, to)`
pub async fn telemetry_exists(
  pool: &DbPool,
  from: DateTime<Utc>,
  to: DateTime<Utc>,
  config: &SessionDetectionConfig,
) -> Result<bool, EngineError> {
  let found: i64 = sqlx::query_scalar(
    r#"
    SELECT EXISTS(
      SELECT 1 FROM heart_rate_telemetry
      WHERE timestamp >= ?1 AND timestamp < ?2
        AND heart_rate BETWEEN ?3 AND ?4
    )
    "#,
  )
  .bind(from)
  .bind(to)
  .bind(config.min_heart_rate)
  .bind(config.max_heart_rate)
  .fetch_one(pool)
  .await?;

  Ok(found != 0)
}

pub async fn insert_telemetry(
  pool: &DbPool,
  samples: &[TelemetrySample],
) -> Result<u64, EngineError> {
  let mut tx = pool.begin().await?;
  let mut written = 0;

  for sample in samples {
    let result = sqlx::query(
      r#"
      INSERT INTO heart_rate_telemetry (
        timestamp, heart_rate, sport, latitude, longitude, altitude, speed
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
      "#,
    )
    .bind(sample.timestamp)
    .bind(sample.heart_rate)
    .bind(&sample.sport)
    .bind(sample.latitude)
    .bind(sample.longitude)
    .bind(sample.altitude)
    .bind(sample.speed)
    .execute(&mut *tx)
    .await?;

    written += result.rows_affected();
  }

  tx.commit().await?;
  Ok(written)
}

/// ---------------------------------------------------------------------------
/// Sessions
/// ---------------------------------------------------------------------------

/// Upsert sessions keyed by their start time
pub async fn save_sessions(
  pool: &DbPool,
  sessions: &[WorkoutSession],
) -> Result<usize, EngineError> {
  let mut tx = pool.begin().await?;

  for s in sessions {
    sqlx::query(
      r#"
      INSERT INTO workout_sessions (
        sport, session_start, session_end, duration_min, avg_heart_rate,
        z1_minutes, z2_minutes, z3_minutes, z4_minutes, z5_minutes,
        calories_burned, intensity_score, trimp_score, fat_burn_ratio,
        cardio_ratio, bpm_std_dev, recovery_drop_bpm, warmup_duration_sec
      )
      VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)
      ON CONFLICT(session_start) DO UPDATE SET
        sport = excluded.sport,
        session_end = excluded.session_end,
        duration_min = excluded.duration_min,
        avg_heart_rate = excluded.avg_heart_rate,
        z1_minutes = excluded.z1_minutes,
        z2_minutes = excluded.z2_minutes,
        z3_minutes = excluded.z3_minutes,
        z4_minutes = excluded.z4_minutes,
        z5_minutes = excluded.z5_minutes,
        calories_burned = excluded.calories_burned,
        intensity_score = excluded.intensity_score,
        trimp_score = excluded.trimp_score,
        fat_burn_ratio = excluded.fat_burn_ratio,
        cardio_ratio = excluded.cardio_ratio,
        bpm_std_dev = excluded.bpm_std_dev,
        recovery_drop_bpm = excluded.recovery_drop_bpm,
        warmup_duration_sec = excluded.warmup_duration_sec
      "#,
    )
    .bind(&s.sport)
    .bind(s.session_start)
    .bind(s.session_end)
    .bind(s.duration_min)
    .bind(s.avg_heart_rate)
    .bind(s.zones.z1)
    .bind(s.zones.z2)
    .bind(s.zones.z3)
    .bind(s.zones.z4)
    .bind(s.zones.z5)
    .bind(s.calories_burned)
    .bind(s.intensity_score)
    .bind(s.trimp_score)
    .bind(s.fat_burn_ratio)
    .bind(s.cardio_ratio)
    .bind(s.bpm_std_dev)
    .bind(s.recovery_drop_bpm)
    .bind(s.warmup_duration_sec)
    .execute(&mut *tx)
    .await?;
  }

  tx.commit().await?;
  Ok(sessions.len())
}

pub async fn load_sessions(
  pool: &DbPool,
  range: &DayRange,
) -> Result<Vec<WorkoutSession>, EngineError> {
  let rows = sqlx::query_as::<_, StoredSession>(
    "SELECT * FROM workout_sessions WHERE session_start >= ?1 AND session_start < ?2 ORDER BY session_start ASC",
  )
  .bind(range.start)
  .bind(range.end)
  .fetch_all(pool)
  .await?;

  Ok(rows.into_iter().map(WorkoutSession::from).collect())
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
