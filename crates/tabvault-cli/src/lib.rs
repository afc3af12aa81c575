use std::{net::IpAddr, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tabvault_server::Settings;

mod clierror;
pub mod commands;

pub use clierror::*;
pub use tabvault_server::configuration::{current_environment, get_configuration};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None, before_help = r"
 _        _                     _ _
| |_ __ _| |____   ____ _ _   _| | |_
| __/ _` | '_ \ \ / / _` | | | | | __|
| || (_| | |_) \ V / (_| | |_| | | |_
 \__\__,_|_.__/ \_/ \__,_|\__,_|_|\__|
")]
pub struct Cli {
    /// Log filter used when `RUST_LOG` is not set. Defaults to the filter of
    /// `TABVAULT_ENVIRONMENT`.
    #[arg(long = "log-level", global = true)]
    pub loglevel: Option<String>,

    /// Path to the SQLite database. Overrides the configuration file.
    #[arg(long, global = true)]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

impl Cli {
    pub fn command(&self) -> &Command {
        &self.command
    }

    /// Database path: `--db` first, then the configuration.
    pub fn db_path(&self, settings: &Settings) -> String {
        self.db
            .as_ref()
            .unwrap_or(&settings.db_settings.db_path)
            .to_string_lossy()
            .into_owned()
    }

    /// Same as [`Cli::db_path`], loading the configuration only when `--db`
    /// was not given.
    pub fn resolve_db_path(&self) -> Result<String, CliError> {
        match &self.db {
            Some(path) => Ok(path.to_string_lossy().into_owned()),
            None => Ok(self.db_path(&get_configuration()?)),
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Writes a configuration template to `configuration/config.yml`.
    Init,
    /// Starts the HTTP API.
    Serve {
        /// IP address to bind.
        #[arg(short = 'I', long)]
        interface: Option<IpAddr>,

        /// Port to listen on.
        #[arg(short = 'P', long)]
        port: Option<u16>,

        /// Number of pooled database connections.
        #[arg(long)]
        pool_size: Option<usize>,
    },
    /// Cleans a text file and stores it as a new tab.
    Import {
        /// Raw tab text to import.
        file: PathBuf,

        #[arg(long)]
        title: String,

        #[arg(long)]
        artist: String,

        /// `Tab` or `Chords`.
        #[arg(long = "type", default_value = tabvault_common::DEFAULT_KIND)]
        kind: String,

        #[arg(long, default_value = "")]
        tuning: String,

        #[arg(long, default_value = "")]
        capo: String,

        #[arg(long, default_value = tabvault_common::DEFAULT_DIFFICULTY)]
        difficulty: String,
    },
    /// Re-cleans every stored tab in place.
    Clean {
        /// Only report what would change.
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },
    /// Lists stored tabs.
    List {
        /// Only tabs whose title or artist contains this text.
        #[arg(short, long)]
        query: Option<String>,

        #[arg(value_enum, short = 'F', long, default_value_t = Format::Pretty)]
        format: Format,
    },
    /// Prints a single tab.
    Show { id: i64 },
    /// Applies pending schema migrations.
    Migrate {
        /// Only print which migrations ran.
        #[arg(long, default_value = "false")]
        status: bool,
    },
}

#[derive(Debug, Clone, ValueEnum)]
pub enum Format {
    Pretty,
    Json,
}
