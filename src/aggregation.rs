//! Multi-session summaries
//!
//! Pure reductions over already computed sessions: weekly zone totals and a
//! daily training-load (TRIMP) series. Empty input gives zeroed or empty
//! results.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{WorkoutSession, ZoneMinutes};

/// Summed zone minutes across sessions, no normalization
pub type ZoneBreakdown = ZoneMinutes;

/// One day of the training-load series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingLoadPoint {
  pub date: NaiveDate,
  pub trimp_score: i64,
}

/// Half-open UTC interval covering whole calendar days
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRange {
  pub start: DateTime<Utc>,
  pub end: DateTime<Utc>,
}

impl DayRange {
  /// From the start of `first` through the end of `last`
  pub fn days(first: NaiveDate, last: NaiveDate) -> Self {
    Self {
      start: first.and_time(NaiveTime::MIN).and_utc(),
      end: (last + Duration::days(1)).and_time(NaiveTime::MIN).and_utc(),
    }
  }

  /// `week_start` plus the six following days
  pub fn week(week_start: NaiveDate) -> Self {
    Self::days(week_start, week_start + Duration::days(6))
  }

  pub fn contains(&self, t: DateTime<Utc>) -> bool {
    t >= self.start && t < self.end
  }
}

/// Sessions whose start falls inside `range`
pub fn sessions_in_range(sessions: &[WorkoutSession], range: &DayRange) -> Vec<WorkoutSession> {
  sessions
    .iter()
    .filter(|s| range.contains(s.session_start))
    .cloned()
    .collect()
}

pub fn weekly_zone_breakdown(sessions: &[WorkoutSession]) -> ZoneBreakdown {
  sessions.iter().fold(ZoneBreakdown::default(), |mut acc, s| {
    acc += s.zones;
    acc
  })
}

/// Daily TRIMP totals keyed by each session's UTC start date, sorted by date.
/// Sessions without a TRIMP score contribute 0.
pub fn training_load_trend(sessions: &[WorkoutSession]) -> Vec<TrainingLoadPoint> {
  let mut by_day: BTreeMap<NaiveDate, i64> = BTreeMap::new();
  for session in sessions {
    *by_day.entry(session.session_start.date_naive()).or_insert(0) +=
      session.trimp_score.unwrap_or(0);
  }

  by_day
    .into_iter()
    .map(|(date, trimp_score)| TrainingLoadPoint { date, trimp_score })
    .collect()
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
