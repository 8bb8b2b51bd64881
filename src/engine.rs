//! Session detection entry points
//!
//! raw samples -> segmenter -> session spans -> metrics -> `WorkoutSession`s
//!
//! Segmentation is sequential over the batch. Once boundaries are fixed each
//! span is independent, so metrics are computed on the rayon pool.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{SessionDetectionConfig, ZoneCalibration};
use crate::error::EngineError;
use crate::metrics::compute_session_metrics;
use crate::models::{TelemetrySample, WorkoutSession};
use crate::segmenter::segment;
use crate::zones::build_zones_with;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionReport {
  pub sessions: Vec<WorkoutSession>,
  /// Candidates dropped for being under the minimum duration
  pub discarded: usize,
}

/// Detect sessions with the default zone calibration
pub fn detect_sessions(
  samples: &[TelemetrySample],
  config: &SessionDetectionConfig,
) -> Result<Vec<WorkoutSession>, EngineError> {
  detect_sessions_with_report(samples, config, &ZoneCalibration::default())
    .map(|report| report.sessions)
}

pub fn detect_sessions_with_report(
  samples: &[TelemetrySample],
  config: &SessionDetectionConfig,
  calibration: &ZoneCalibration,
) -> Result<DetectionReport, EngineError> {
  config.validate()?;
  calibration.validate()?;
  let zones = build_zones_with(config.max_heart_rate, calibration)?;

  let segmentation = segment(samples, config)?;

  let sessions: Vec<WorkoutSession> = segmentation
    .spans
    .par_iter()
    .map(|span| compute_session_metrics(span, &zones, calibration))
    .collect();

  debug!(
    samples = samples.len(),
    sessions = sessions.len(),
    discarded = segmentation.discarded,
    "session detection finished"
  );

  Ok(DetectionReport {
    sessions,
    discarded: segmentation.discarded,
  })
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
