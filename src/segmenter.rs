//! Session segmentation
//!
//! Splits a time-ordered telemetry batch into session spans. The segmenter is
//! a two-state machine folded over the samples:
//!
//! - `Idle`: the next sample opens a session anchored at its timestamp.
//! - `Accumulating`: a gap above `max_gap_minutes` or a sport change closes
//!   the open session and opens a new one at the current sample; otherwise
//!   the sample extends the open session.
//!
//! Closing a session keeps it only when `last_time - start` reaches
//! `min_session_duration_minutes`. Shorter candidates are dropped and counted.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::config::SessionDetectionConfig;
use crate::error::EngineError;
use crate::models::TelemetrySample;

/// Samples belonging to one closed session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSpan {
  pub sport: String,
  pub start: DateTime<Utc>,
  pub last_time: DateTime<Utc>,
  pub samples: Vec<TelemetrySample>,
}

impl SessionSpan {
  fn open(sample: &TelemetrySample) -> Self {
    Self {
      sport: sample.sport_label().to_string(),
      start: sample.timestamp,
      last_time: sample.timestamp,
      samples: vec![sample.clone()],
    }
  }

  fn extend(&mut self, sample: &TelemetrySample) {
    self.last_time = sample.timestamp;
    self.samples.push(sample.clone());
  }

  fn breaks_at(&self, sample: &TelemetrySample, config: &SessionDetectionConfig) -> bool {
    let gap_ms = (sample.timestamp - self.last_time).num_milliseconds();
    gap_ms > config.max_gap_ms() || sample.sport_label() != self.sport
  }

  pub fn duration_ms(&self) -> i64 {
    (self.last_time - self.start).num_milliseconds()
  }
}

/// Result of one segmentation pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Segmentation {
  pub spans: Vec<SessionSpan>,
  /// Candidates dropped for being shorter than the minimum duration
  pub discarded: usize,
}

impl Segmentation {
  fn close(&mut self, span: SessionSpan, config: &SessionDetectionConfig) {
    if span.duration_ms() >= config.min_session_duration_ms() {
      self.spans.push(span);
    } else {
      debug!(
        sport = %span.sport,
        start = %span.start,
        duration_ms = span.duration_ms(),
        samples = span.samples.len(),
        "discarding session candidate below minimum duration"
      );
      self.discarded += 1;
    }
  }
}

enum SegmenterState {
  Idle,
  Accumulating(SessionSpan),
}

impl SegmenterState {
  fn step(
    self,
    sample: &TelemetrySample,
    config: &SessionDetectionConfig,
    out: &mut Segmentation,
  ) -> Self {
    match self {
      SegmenterState::Idle => SegmenterState::Accumulating(SessionSpan::open(sample)),
      SegmenterState::Accumulating(mut span) => {
        if span.breaks_at(sample, config) {
          out.close(span, config);
          SegmenterState::Accumulating(SessionSpan::open(sample))
        } else {
          span.extend(sample);
          SegmenterState::Accumulating(span)
        }
      }
    }
  }
}

/// Reject batches whose timestamps go backwards
pub fn ensure_sorted(samples: &[TelemetrySample]) -> Result<(), EngineError> {
  match samples
    .windows(2)
    .position(|pair| pair[1].timestamp < pair[0].timestamp)
  {
    Some(i) => {
      warn!(index = i + 1, "telemetry batch is not sorted by timestamp");
      Err(EngineError::UnsortedSamples { index: i + 1 })
    }
    None => Ok(()),
  }
}

pub fn segment(
  samples: &[TelemetrySample],
  config: &SessionDetectionConfig,
) -> Result<Segmentation, EngineError> {
  ensure_sorted(samples)?;

  let mut out = Segmentation::default();
  let state = samples.iter().fold(SegmenterState::Idle, |state, sample| {
    state.step(sample, config, &mut out)
  });

  if let SegmenterState::Accumulating(span) = state {
    out.close(span, config);
  }

  Ok(out)
}

/// ---------------------------------------------------------------------------
/// Tests
/// ---------------------------------------------------------------------------
