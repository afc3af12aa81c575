pub mod migrations;
pub mod pooling;

use std::time::Duration;

use rusqlite::{Connection, OptionalExtension, params};
use serde::Serialize;
use tabvault_cleaner::{clean_all, clean_tab_text};
use tabvault_common::{
    MEMORY_DB_PATH, NewSong, NewTab, Song, SongSummary, Tab, TabSummary, normalize_query,
};
use tracing::{debug, info, instrument, warn};

use migrations::MigrationRunner;
use pooling::{AsyncConnectionPool, PoolError, PooledConnection};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("SQLite error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("Connection pool error: {0}")]
    Pool(#[from] PoolError),
    #[error("Migration failed: {0}")]
    Migration(eyre::Report),
}

const TAB_SUMMARY_COLUMNS: &str = "id, title, artist, type, tuning, capo, difficulty";

/// Opens a connection configured the same way for every pool member.
pub fn open_connection(db_path: &str) -> rusqlite::Result<Connection> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(Duration::from_secs(5))?;

    if db_path.trim() != MEMORY_DB_PATH {
        let mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        debug!(journal_mode = %mode);
    }

    Ok(conn)
}

/// Handle over the tab database. Constructed explicitly by whoever owns the
/// process (server or CLI) and shared by cloning.
#[derive(Clone, Debug)]
pub struct Store {
    pool: AsyncConnectionPool,
    db_path: String,
}

impl Store {
    /// Opens the database, runs pending migrations and seeds an empty `tabs`
    /// table. An in-memory database always gets a single connection, since
    /// every in-memory connection is a separate database.
    #[instrument(name = "store.open", skip_all, fields(db_path = %db_path.as_ref()))]
    pub fn open(db_path: impl AsRef<str>, pool_size: usize) -> Result<Self, StoreError> {
        let db_path = db_path.as_ref().to_owned();

        let pool_size = if db_path.trim() == MEMORY_DB_PATH && pool_size != 1 {
            warn!("in-memory database requested, using a single connection");
            1
        } else {
            pool_size
        };

        let pool = AsyncConnectionPool::new(pool_size, || open_connection(&db_path))?;

        {
            let mut conn = pool.try_acquire()?;
            let applied = MigrationRunner::new(&mut conn)
                .run()
                .map_err(StoreError::Migration)?;
            let seeded = seed(&conn)?;
            info!(applied, seeded, pool_size, "store ready");
        }

        Ok(Self { pool, db_path })
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    pub fn pool(&self) -> &AsyncConnectionPool {
        &self.pool
    }

    pub async fn acquire(&self) -> Result<PooledConnection, StoreError> {
        Ok(self.pool.acquire().await?)
    }

    /// Blocking checkout for callers outside of an async runtime.
    pub fn try_acquire(&self) -> Result<PooledConnection, StoreError> {
        Ok(self.pool.try_acquire()?)
    }
}

pub struct SeedTab {
    pub title: &'static str,
    pub artist: &'static str,
    pub kind: &'static str,
    pub tuning: &'static str,
    pub capo: &'static str,
    pub difficulty: &'static str,
    pub content: &'static str,
}

pub const SEED_TABS: &[SeedTab] = &[
    SeedTab {
        title: "Let It Be",
        artist: "The Beatles",
        kind: "Chords",
        tuning: "Standard",
        capo: "",
        difficulty: "Beginner",
        content: "[Verse]\nC    G    Am    F\nC    G    F    C",
    },
    SeedTab {
        title: "Smoke on the Water",
        artist: "Deep Purple",
        kind: "Tab",
        tuning: "Standard",
        capo: "",
        difficulty: "Beginner",
        content: "[Riff]\nG|-----0---3---5----0---3---6-5----|\nD|---0---3---5----0---3---6-5------|",
    },
    SeedTab {
        title: "Wonderwall",
        artist: "Oasis",
        kind: "Chords",
        tuning: "Standard",
        capo: "2",
        difficulty: "Intermediate",
        content: "[Verse]\nAm    G    C    F\nAm    G    C    F",
    },
];

pub const SEED_SONGS: &[(&str, &str, &str)] = &[
    ("Let It Be", "The Beatles", "C G Am F"),
    ("Knockin' on Heaven's Door", "Bob Dylan", "G D Am G D C"),
];

/// Inserts the seed rows when `tabs` is empty. Returns how many tabs were added.
pub fn seed(conn: &Connection) -> Result<usize, StoreError> {
    let count: i64 = conn.query_row("select count(*) from tabs", [], |row| row.get(0))?;
    if count > 0 {
        return Ok(0);
    }

    let mut statement = conn.prepare(
        "insert into tabs (title, artist, type, tuning, capo, difficulty, content) values (?,?,?,?,?,?,?)",
    )?;
    for tab in SEED_TABS {
        statement.execute(params![
            tab.title,
            tab.artist,
            tab.kind,
            tab.tuning,
            tab.capo,
            tab.difficulty,
            tab.content
        ])?;
    }

    let songs: i64 = conn.query_row("select count(*) from songs", [], |row| row.get(0))?;
    if songs == 0 {
        let mut statement =
            conn.prepare("insert into songs (title, artist, chords) values (?,?,?)")?;
        for (title, artist, chords) in SEED_SONGS {
            statement.execute(params![title, artist, chords])?;
        }
    }

    Ok(SEED_TABS.len())
}

/// Lists tabs whose title or artist contains `query`, oldest first.
pub fn search_tabs(conn: &Connection, query: Option<&str>) -> Result<Vec<TabSummary>, StoreError> {
    let tabs = match normalize_query(query) {
        Some(q) => {
            let pattern = format!("%{q}%");
            let mut statement = conn.prepare_cached(&format!(
                "select {TAB_SUMMARY_COLUMNS} from tabs where title like ?1 or artist like ?1 order by id"
            ))?;
            statement
                .query_map([pattern], TabSummary::from_row)?
                .collect::<Result<Vec<_>, _>>()?
        }
        None => {
            let mut statement = conn.prepare_cached(&format!(
                "select {TAB_SUMMARY_COLUMNS} from tabs order by id"
            ))?;
            statement
                .query_map([], TabSummary::from_row)?
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    Ok(tabs)
}

pub fn get_tab(conn: &Connection, id: i64) -> Result<Option<Tab>, StoreError> {
    let tab = conn
        .query_row(
            &format!("select {TAB_SUMMARY_COLUMNS}, content from tabs where id = ?1"),
            [id],
            Tab::from_row,
        )
        .optional()?;

    Ok(tab)
}

/// Stores `tab` as given. Use [`import_tab`] for raw uploads.
pub fn insert_tab(conn: &Connection, tab: &NewTab) -> Result<i64, StoreError> {
    let mut statement = conn.prepare_cached(
        "insert into tabs (title, artist, type, tuning, capo, difficulty, content) values (?,?,?,?,?,?,?)",
    )?;
    statement.execute(params![
        tab.title,
        tab.artist,
        tab.kind,
        tab.tuning,
        tab.capo,
        tab.difficulty,
        tab.content
    ])?;

    Ok(conn.last_insert_rowid())
}

/// Cleans the uploaded text and stores the tab. Returns the new id.
#[instrument(name = "tabs.import", skip(conn, tab), fields(title = %tab.title, artist = %tab.artist))]
pub fn import_tab(conn: &Connection, mut tab: NewTab) -> Result<i64, StoreError> {
    tab.content = clean_tab_text(&tab.content);
    let id = insert_tab(conn, &tab)?;
    info!(id, bytes = tab.content.len(), "tab imported");
    Ok(id)
}

pub fn tab_contents(conn: &Connection) -> Result<Vec<(i64, String)>, StoreError> {
    let mut statement = conn.prepare("select id, content from tabs order by id")?;
    let rows = statement
        .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}

/// Writes every `(id, content)` pair in one transaction. Returns the number
/// of rows touched.
pub fn update_contents(conn: &mut Connection, records: &[(i64, String)]) -> Result<usize, StoreError> {
    let tx = conn.transaction()?;
    let mut updated = 0;
    {
        let mut statement = tx.prepare("update tabs set content = ?1 where id = ?2")?;
        for (id, content) in records {
            updated += statement.execute(params![content, id])?;
        }
    }
    tx.commit()?;

    Ok(updated)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanReport {
    pub total: usize,
    pub changed: usize,
}

/// Re-cleans every stored tab. With `dry_run` nothing is written back.
#[instrument(name = "tabs.reclean", skip(conn))]
pub fn reclean_all(conn: &mut Connection, dry_run: bool) -> Result<CleanReport, StoreError> {
    let records = tab_contents(conn)?;
    let total = records.len();

    let cleaned = clean_all(records.clone());
    let changed: Vec<(i64, String)> = records
        .into_iter()
        .zip(cleaned)
        .filter(|((_, before), (_, after))| before != after)
        .map(|(_, after)| after)
        .collect();

    let report = CleanReport {
        total,
        changed: changed.len(),
    };

    if !dry_run && !changed.is_empty() {
        update_contents(conn, &changed)?;
    }

    info!(total = report.total, changed = report.changed, dry_run, "tabs re-cleaned");
    Ok(report)
}

pub fn list_songs(conn: &Connection) -> Result<Vec<SongSummary>, StoreError> {
    let mut statement = conn.prepare_cached("select id, title, artist from songs order by id")?;
    let songs = statement
        .query_map([], |row| {
            Ok(SongSummary {
                id: row.get(0)?,
                title: row.get(1)?,
                artist: row.get(2)?,
            })
        })?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(songs)
}

pub fn get_song(conn: &Connection, id: i64) -> Result<Option<Song>, StoreError> {
    let song = conn
        .query_row(
            "select id, title, artist, chords from songs where id = ?1",
            [id],
            |row| {
                Ok(Song {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    artist: row.get(2)?,
                    chords: row.get(3)?,
                })
            },
        )
        .optional()?;
    Ok(song)
}

pub fn insert_song(conn: &Connection, song: &NewSong) -> Result<i64, StoreError> {
    conn.execute(
        "insert into songs (title, artist, chords) values (?,?,?)",
        params![song.title, song.artist, song.chords],
    )?;
    Ok(conn.last_insert_rowid())
}
