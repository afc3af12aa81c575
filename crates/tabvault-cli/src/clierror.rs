use std::path::PathBuf;

use tabvault_sqlite::{StoreError, pooling::PoolError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("Could not serialize output: {0}")]
    Json(#[from] serde_json::Error),
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Store error: {0}")]
    Store(#[from] StoreError),
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Tab {0} does not exist")]
    TabNotFound(i64),
    #[error("Nothing to import from {}: the file is empty", .0.display())]
    EmptyImport(PathBuf),
    #[error("Other: {0}")]
    Other(#[from] eyre::Report),
}

impl CliError {
    pub fn print_tip(&self) {
        match self {
            CliError::Json(error) => {
                eprintln!("💡 Failed to write JSON output:");
                eprintln!("   • {error}");
            }
            CliError::Io(error) => {
                eprintln!("💡 Cannot read or write a file:");
                match error.kind() {
                    std::io::ErrorKind::NotFound => {
                        eprintln!("   • File not found, check the path");
                    }
                    std::io::ErrorKind::PermissionDenied => {
                        eprintln!("   • Permission denied - check file permissions");
                    }
                    std::io::ErrorKind::InvalidData => {
                        eprintln!("   • File is not valid UTF-8 text");
                    }
                    _ => {
                        eprintln!("   • File system error: {error}");
                    }
                }
            }
            CliError::Sqlite(error) => sqlite_tip(error),
            CliError::Store(error) => match error {
                StoreError::Database(error) => sqlite_tip(error),
                StoreError::Pool(PoolError::Database(error)) => sqlite_tip(error),
                StoreError::Pool(error) => {
                    eprintln!("💡 Connection pool error:");
                    eprintln!("   • {error}");
                    eprintln!("   • Check `db_settings.pool_size` in your config.yml");
                }
                StoreError::Migration(error) => {
                    eprintln!("💡 Schema migration failed:");
                    eprintln!("   • {error:#}");
                    eprintln!("   • Run `tabvault migrate --status` to see what was applied");
                }
            },
            CliError::Config(error) => {
                eprintln!("⚙️  Configuration error occurred:");
                eprintln!("   • Error details: {error}");
                eprintln!("   • Check if your config.yml file exists and is valid");
            }
            CliError::TabNotFound(_) => {
                eprintln!("💡 Run `tabvault list` to see the stored ids");
            }
            CliError::EmptyImport(_) => {
                eprintln!("💡 Pass a file with tab text in it");
            }
            CliError::Other(error) => {
                eprintln!("💡 Unexpected error occurred:");
                eprintln!("   • Error details: {error}");
            }
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Json(_) | CliError::Config(_) => 10,
            CliError::Io(_) | CliError::EmptyImport(_) => 11,
            CliError::Sqlite(_) | CliError::Store(_) => 12,
            CliError::TabNotFound(_) => 13,
            CliError::Other(_) => 99,
        }
    }

    pub fn exit_with_tips(self) -> ! {
        eprintln!("❌ {self}");
        self.print_tip();
        std::process::exit(self.exit_code());
    }
}

fn sqlite_tip(error: &rusqlite::Error) {
    eprintln!("💡 SQLite database error:");
    match error {
        rusqlite::Error::SqliteFailure(code, msg) => match code.code {
            rusqlite::ErrorCode::DatabaseBusy => {
                eprintln!("   • Database is locked by another process");
            }
            rusqlite::ErrorCode::DatabaseLocked => {
                eprintln!("   • Database is locked");
            }
            rusqlite::ErrorCode::ReadOnly => {
                eprintln!("   • Database is read-only");
            }
            rusqlite::ErrorCode::DatabaseCorrupt => {
                eprintln!("   • Database file is corrupted");
            }
            rusqlite::ErrorCode::NotADatabase => {
                eprintln!("   • File is not a valid SQLite database");
            }
            rusqlite::ErrorCode::CannotOpen => {
                eprintln!("   • Cannot open database file, does its directory exist?");
            }
            _ => {
                eprintln!(
                    "   • SQLite error ({}): {}",
                    code.code as u32,
                    msg.as_deref().unwrap_or("No additional details")
                );
            }
        },
        rusqlite::Error::InvalidPath(path) => {
            eprintln!("   • Invalid database path: {}", path.display());
        }
        rusqlite::Error::SqlInputError { error, .. } => {
            eprintln!("   • SQL syntax error: {error}");
        }
        _ => {
            eprintln!("   • Database error: {error}");
        }
    }
}

pub trait ExitOnError<T> {
    fn or_exit(self) -> T;
}

impl<T> ExitOnError<T> for Result<T, CliError> {
    fn or_exit(self) -> T {
        self.unwrap_or_else(|err| err.exit_with_tips())
    }
}
