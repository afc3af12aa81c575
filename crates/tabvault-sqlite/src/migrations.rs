use chrono::{DateTime, Utc};
use eyre::WrapErr;
use rusqlite::{Connection, OptionalExtension};
use tracing::{debug, info};

const MIGRATION_TRACKING_TABLE: &str = "schema_migrations";

/// Schema history, oldest first. Filenames follow `YYYY_MM_DD_HHMMSS_name.sql`
/// and are what gets recorded in the tracking table.
pub const MIGRATIONS: &[(&str, &str)] = &[
    (
        "2025_01_10_120000_create_songs.sql",
        "create table if not exists songs (
            id integer primary key autoincrement,
            title text not null,
            artist text not null,
            chords text not null
        );",
    ),
    (
        "2025_02_02_093000_create_tabs.sql",
        "create table if not exists tabs (
            id integer primary key autoincrement,
            title text not null,
            artist text not null,
            type text not null default 'Tab',
            tuning text,
            capo text,
            difficulty text,
            content text not null
        );",
    ),
    (
        "2025_02_02_093500_index_tabs.sql",
        "create index if not exists tabs_title_artist on tabs (title, artist);",
    ),
];

#[derive(Debug, Clone, PartialEq)]
pub struct Migration {
    pub filename: String,
    pub timestamp: String,
    pub name: String,
    pub content: String,
    pub executed_at: Option<DateTime<Utc>>,
}

impl Migration {
    fn from_embedded(filename: &str, content: &str) -> Self {
        // Format: YYYY_MM_DD_HHMMSS_name.sql
        let parts: Vec<&str> = filename.splitn(5, '_').collect();
        let timestamp = if parts.len() == 5 {
            parts[..4].join("_")
        } else {
            "unknown".to_owned()
        };

        let name = parts
            .last()
            .map(|rest| rest.trim_end_matches(".sql").to_owned())
            .unwrap_or_default();

        Self {
            filename: filename.to_owned(),
            timestamp,
            name,
            content: content.to_owned(),
            executed_at: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MigrationStatus {
    pub filename: String,
    pub executed_at: Option<DateTime<Utc>>,
}

pub struct MigrationRunner<'a> {
    conn: &'a mut Connection,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(conn: &'a mut Connection) -> Self {
        Self { conn }
    }

    /// Creates the tracking table.
    pub fn init(&self) -> eyre::Result<()> {
        self.conn.execute(
            &format!(
                "create table if not exists {MIGRATION_TRACKING_TABLE} (filename text primary key, executed_at datetime default current_timestamp)"
            ),
            [],
        )?;
        Ok(())
    }

    pub fn all_migrations(&self) -> Vec<Migration> {
        let mut migrations: Vec<Migration> = MIGRATIONS
            .iter()
            .map(|(filename, content)| Migration::from_embedded(filename, content))
            .collect();

        migrations.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        migrations
    }

    fn executed_at(&self, filename: &str) -> eyre::Result<Option<DateTime<Utc>>> {
        let executed: Option<String> = self
            .conn
            .query_row(
                &format!("select executed_at from {MIGRATION_TRACKING_TABLE} where filename = ?1"),
                [filename],
                |row| row.get(0),
            )
            .optional()?;

        Ok(executed.map(|raw| {
            chrono::NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M:%S")
                .map(|naive| naive.and_utc())
                .unwrap_or_default()
        }))
    }

    pub fn pending(&self) -> eyre::Result<Vec<Migration>> {
        let mut pending = vec![];
        for migration in self.all_migrations() {
            if self.executed_at(&migration.filename)?.is_none() {
                pending.push(migration);
            }
        }
        Ok(pending)
    }

    pub fn status(&self) -> eyre::Result<Vec<MigrationStatus>> {
        self.init()?;

        self.all_migrations()
            .into_iter()
            .map(|migration| {
                let executed_at = self.executed_at(&migration.filename)?;
                Ok(MigrationStatus {
                    filename: migration.filename,
                    executed_at,
                })
            })
            .collect()
    }

    /// Runs every pending migration, each inside its own transaction. Returns
    /// how many were applied.
    pub fn run(&mut self) -> eyre::Result<usize> {
        self.init()?;

        let pending = self.pending()?;
        if pending.is_empty() {
            debug!("no pending migrations");
            return Ok(0);
        }

        let applied = pending.len();
        for migration in pending {
            info!(migration = %migration.filename, "running migration");

            let tx = self.conn.transaction()?;
            tx.execute_batch(&migration.content)
                .wrap_err_with(|| format!("Failed to execute migration: {}", migration.filename))?;
            tx.execute(
                &format!("insert into {MIGRATION_TRACKING_TABLE} (filename) values (?1)"),
                [&migration.filename],
            )?;
            tx.commit()?;
        }

        Ok(applied)
    }
}
