use std::path::Path;

use tabvault_common::{DEFAULT_POOL_SIZE, NewTab};
use tabvault_sqlite::{Store, import_tab};

use crate::CliError;

/// Metadata given on the command line for an imported file.
#[derive(Debug, Clone)]
pub struct ImportMeta {
    pub title: String,
    pub artist: String,
    pub kind: String,
    pub tuning: String,
    pub capo: String,
    pub difficulty: String,
}

pub fn import_file(db_path: &str, file: &Path, meta: ImportMeta) -> Result<i64, CliError> {
    let content = fs_err::read_to_string(file)?;
    if content.trim().is_empty() {
        return Err(CliError::EmptyImport(file.to_path_buf()));
    }

    let store = Store::open(db_path, DEFAULT_POOL_SIZE)?;
    let conn = store.try_acquire()?;

    let tab = NewTab {
        title: meta.title,
        artist: meta.artist,
        kind: meta.kind,
        tuning: meta.tuning,
        capo: meta.capo,
        difficulty: meta.difficulty,
        content,
    };

    let id = import_tab(&conn, tab)?;
    println!("✅ Imported {} as tab #{id}", file.display());
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tabvault_sqlite::get_tab;

    fn meta() -> ImportMeta {
        ImportMeta {
            title: "Come As You Are".to_owned(),
            artist: "Nirvana".to_owned(),
            kind: "Tab".to_owned(),
            tuning: "Drop D".to_owned(),
            capo: String::new(),
            difficulty: "Beginner".to_owned(),
        }
    }

    #[test]
    fn imported_file_is_cleaned_before_storing() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("tabs.db");
        let db = db.to_str().unwrap();
        let file = dir.path().join("riff.txt");
        fs_err::write(
            &file,
            "Tabbed by kurt@example.com\n[Riff]\nE|--0--0-1-2--|\nlyrics after the riff\n",
        )
        .unwrap();

        let id = import_file(db, &file, meta()).unwrap();

        let store = Store::open(db, 1).unwrap();
        let conn = store.try_acquire().unwrap();
        let tab = get_tab(&conn, id).unwrap().unwrap();
        assert_eq!(
            tab.content,
            "[Riff]\nE|--0--0-1-2--|\nlyrics after the riff"
        );
        assert_eq!(tab.summary.tuning, "Drop D");
    }

    #[test]
    fn empty_file_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("tabs.db");
        let file = dir.path().join("blank.txt");
        fs_err::write(&file, "  \n\n").unwrap();

        let err = import_file(db.to_str().unwrap(), &file, meta()).unwrap_err();
        assert!(matches!(err, CliError::EmptyImport(_)));
    }
}
