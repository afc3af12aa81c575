pub mod configuration;
pub mod extractors;
pub mod into_http;
pub mod routes;
pub mod startup;
pub mod telemetry;

pub use configuration::{ApplicationSettings, DatabaseSettings, Settings};
