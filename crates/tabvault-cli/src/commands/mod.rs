pub mod clean;
pub mod configuration;
pub mod import;
pub mod list;
pub mod migrations;
pub mod server;
