use tabvault_common::DEFAULT_POOL_SIZE;
use tabvault_sqlite::{Store, get_tab, search_tabs};

use crate::{CliError, Format};

pub fn list_tabs(db_path: &str, query: Option<&str>, format: &Format) -> Result<(), CliError> {
    let store = Store::open(db_path, DEFAULT_POOL_SIZE)?;
    let conn = store.try_acquire()?;
    let tabs = search_tabs(&conn, query)?;

    match format {
        Format::Json => println!("{}", serde_json::to_string_pretty(&tabs)?),
        Format::Pretty => {
            if tabs.is_empty() {
                println!("ℹ️  No tabs found");
            }
            for tab in &tabs {
                println!("{tab}");
            }
        }
    }

    Ok(())
}

pub fn show_tab(db_path: &str, id: i64) -> Result<(), CliError> {
    let store = Store::open(db_path, DEFAULT_POOL_SIZE)?;
    let conn = store.try_acquire()?;
    let tab = get_tab(&conn, id)?.ok_or(CliError::TabNotFound(id))?;

    println!("{}\n", tab.summary);
    println!("{}", tab.content);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_id_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("tabs.db");

        let err = show_tab(db.to_str().unwrap(), 999).unwrap_err();
        assert!(matches!(err, CliError::TabNotFound(999)));
    }
}
