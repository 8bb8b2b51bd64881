pub mod analytics;
pub mod sessions;
