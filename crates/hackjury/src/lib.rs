pub mod config;
pub mod error;
pub mod judging;
pub mod telemetry;
