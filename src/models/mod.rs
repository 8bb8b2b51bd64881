pub mod session;
pub mod telemetry;

pub use session::{StoredSession, WorkoutSession, ZoneMinutes};
pub use telemetry::{TelemetrySample, UNKNOWN_SPORT};
