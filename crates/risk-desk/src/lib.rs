pub mod assistant;
pub mod config;
pub mod error;
pub mod market;
pub mod portfolio;
pub mod reports;
pub mod telemetry;
