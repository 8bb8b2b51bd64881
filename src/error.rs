//! Error taxonomy for the session engine
//!
//! Only validation failures and storage failures are errors. Sessions without
//! heart-rate data, empty streams and short discarded candidates all produce
//! ordinary (possibly empty) results instead.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
#[serde(tag = "type", content = "message")]
pub enum EngineError {
  #[error("Invalid max heart rate: {0} (must be a positive integer)")]
  InvalidMaxHeartRate(i64),

  #[error("Telemetry samples are not sorted by timestamp (first offending index: {index})")]
  UnsortedSamples { index: usize },

  #[error("Invalid configuration: {0}")]
  InvalidConfig(String),

  #[error("Missing configuration: {0}")]
  MissingConfig(String),

  #[error("Database error: {0}")]
  Database(String),
}

impl From<sqlx::Error> for EngineError {
  fn from(e: sqlx::Error) -> Self {
    EngineError::Database(e.to_string())
  }
}

impl From<sqlx::migrate::MigrateError> for EngineError {
  fn from(e: sqlx::migrate::MigrateError) -> Self {
    EngineError::Database(format!("migration failed: {}", e))
  }
}
