//! Workout session detection and training-load analytics
//!
//! Turns an ordered heart-rate telemetry batch into exercise sessions with
//! zone minutes, calorie estimate, TRIMP and related scores, and reduces
//! those sessions into weekly zone totals and a daily load trend.

pub mod aggregation;
pub mod commands;
pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod segmenter;
pub mod zones;

#[cfg(test)]
pub mod test_utils;

pub use aggregation::{training_load_trend, weekly_zone_breakdown, TrainingLoadPoint, ZoneBreakdown};
pub use config::{DatabaseConfig, SessionDetectionConfig, ZoneCalibration};
pub use engine::{detect_sessions, detect_sessions_with_report, DetectionReport};
pub use error::EngineError;
pub use models::{TelemetrySample, WorkoutSession, ZoneMinutes};
pub use zones::{build_zones, classify, HeartRateZones, HrZone};
