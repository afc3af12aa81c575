use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;
use std::{net::IpAddr, path::PathBuf};
use tabvault_common::{DEFAULT_DB_PATH, DEFAULT_POOL_SIZE};

pub const CONFIG_DIR: &str = "configuration";
pub const CONFIG_FILE: &str = "config";
pub const ENV_PREFIX: &str = "TABVAULT";

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    pub app_settings: ApplicationSettings,
    pub db_settings: DatabaseSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct DatabaseSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub pool_size: usize,
    pub db_path: PathBuf,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ApplicationSettings {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    pub host: IpAddr,
}

impl ApplicationSettings {
    #[must_use]
    pub fn new(name: String, version: String, port: u16, host: IpAddr) -> Self {
        Self {
            name,
            version,
            port,
            host,
        }
    }
}

/// Reads `configuration/config.{yml,toml,json}` if present, then
/// `TABVAULT__SECTION__KEY` environment variables. Every key has a default, so
/// a missing file is not an error.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|err| config::ConfigError::Message(format!("Failed to determine the current directory: {err}")))?;
    let config_dir = base_path.join(CONFIG_DIR);

    let settings = config::Config::builder()
        .set_default("app_settings.name", "Tabvault")?
        .set_default("app_settings.port", 3000_i64)?
        .set_default("app_settings.host", "127.0.0.1")?
        .set_default("db_settings.pool_size", DEFAULT_POOL_SIZE as i64)?
        .set_default("db_settings.db_path", DEFAULT_DB_PATH)?
        .add_source(config::File::from(config_dir.join(CONFIG_FILE)).required(false))
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;

    settings.try_deserialize()
}

pub const ENVIRONMENT_VAR: &str = "TABVAULT_ENVIRONMENT";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }

    /// Default log filter for the environment.
    pub fn log_filter(&self) -> &'static str {
        match self {
            Environment::Local => "debug",
            Environment::Production => "info",
        }
    }
}

/// Reads [`ENVIRONMENT_VAR`]. Unset means production.
pub fn current_environment() -> Result<Environment, config::ConfigError> {
    std::env::var(ENVIRONMENT_VAR)
        .map_or(Ok(Environment::Production), Environment::try_from)
        .map_err(config::ConfigError::Message)
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either 'local' or 'production'"
            )),
        }
    }
}
