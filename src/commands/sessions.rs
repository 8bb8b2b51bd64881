use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::aggregation::{sessions_in_range, DayRange};
use crate::config::{SessionDetectionConfig, ZoneCalibration};
use crate::db::{self, AppState};
use crate::engine::{detect_sessions_with_report, DetectionReport};
use crate::error::EngineError;
use crate::models::WorkoutSession;

/// ---------------------------------------------------------------------------
/// Session Detection Commands
/// ---------------------------------------------------------------------------

/// Days a detection window may grow past each edge of the requested range
const MAX_WINDOW_EXTENSION_DAYS: usize = 7;

/// Widen `range` a day at a time on either side while telemetry sits within
/// one gap of an edge, so a session crossing an edge is segmented whole.
async fn detection_window(
  state: &AppState,
  range: &DayRange,
  config: &SessionDetectionConfig,
) -> Result<DayRange, EngineError> {
  let gap = Duration::milliseconds(config.max_gap_ms());
  let mut window = *range;

  for _ in 0..MAX_WINDOW_EXTENSION_DAYS {
    if !db::telemetry_exists(&state.db, window.start - gap, window.start, config).await? {
      break;
    }
    window.start = window.start - Duration::days(1);
  }

  for _ in 0..MAX_WINDOW_EXTENSION_DAYS {
    if !db::telemetry_exists(&state.db, window.end, window.end + gap, config).await? {
      break;
    }
    window.end = window.end + Duration::days(1);
  }

  if window != *range {
    debug!(
      start = %window.start,
      end = %window.end,
      "widened detection window past range edges"
    );
  }

  Ok(window)
}

/// Detect sessions over the telemetry around `range` and keep the ones that
/// start inside it. `discarded` counts short candidates across the whole
/// detection window.
pub(crate) async fn detect_in_range(
  state: &AppState,
  range: &DayRange,
  config: &SessionDetectionConfig,
) -> Result<DetectionReport, EngineError> {
  config.validate()?;

  let window = detection_window(state, range, config).await?;
  let samples = db::load_telemetry(&state.db, &window, config).await?;
  let report = detect_sessions_with_report(&samples, config, &ZoneCalibration::default())?;

  Ok(DetectionReport {
    sessions: sessions_in_range(&report.sessions, range),
    discarded: report.discarded,
  })
}

pub async fn get_workout_sessions(
  state: &AppState,
  first_day: NaiveDate,
  last_day: NaiveDate,
  config: &SessionDetectionConfig,
) -> Result<Vec<WorkoutSession>, EngineError> {
  let report = detect_in_range(state, &DayRange::days(first_day, last_day), config).await?;

  info!(
    %first_day,
    %last_day,
    sessions = report.sessions.len(),
    discarded = report.discarded,
    "detected workout sessions"
  );

  Ok(report.sessions)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncResult {
  pub detected: usize,
  pub discarded: usize,
  pub stored: usize,
}

/// Detect sessions for the range and persist them
pub async fn sync_workout_sessions(
  state: &AppState,
  first_day: NaiveDate,
  last_day: NaiveDate,
  config: &SessionDetectionConfig,
) -> Result<SyncResult, EngineError> {
  let report = detect_in_range(state, &DayRange::days(first_day, last_day), config).await?;
  let stored = db::save_sessions(&state.db, &report.sessions).await?;

  info!(%first_day, %last_day, stored, "synced workout sessions");

  Ok(SyncResult {
    detected: report.sessions.len(),
    discarded: report.discarded,
    stored,
  })
}
