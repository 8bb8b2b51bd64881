use chrono::NaiveDate;
use tracing::info;

use crate::aggregation::{
  training_load_trend, weekly_zone_breakdown, DayRange, TrainingLoadPoint, ZoneBreakdown,
};
use crate::commands::sessions::detect_in_range;
use crate::config::SessionDetectionConfig;
use crate::db::AppState;
use crate::error::EngineError;

/// ---------------------------------------------------------------------------
/// Summary Commands
/// ---------------------------------------------------------------------------

/// Zone minutes for `week_start` through `week_start + 6 days`
pub async fn get_weekly_zone_breakdown(
  state: &AppState,
  week_start: NaiveDate,
  config: &SessionDetectionConfig,
) -> Result<ZoneBreakdown, EngineError> {
  let range = DayRange::week(week_start);
  let report = detect_in_range(state, &range, config).await?;
  let breakdown = weekly_zone_breakdown(&report.sessions);

  info!(%week_start, total_minutes = breakdown.total(), "computed weekly zone breakdown");

  Ok(breakdown)
}

/// Daily TRIMP totals for the sessions started between `first_day` and `last_day`
pub async fn get_training_load_trend(
  state: &AppState,
  first_day: NaiveDate,
  last_day: NaiveDate,
  config: &SessionDetectionConfig,
) -> Result<Vec<TrainingLoadPoint>, EngineError> {
  let range = DayRange::days(first_day, last_day);
  let report = detect_in_range(state, &range, config).await?;
  let trend = training_load_trend(&report.sessions);

  info!(%first_day, %last_day, days = trend.len(), "computed training load trend");

  Ok(trend)
}
