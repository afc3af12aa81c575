use tabvault_sqlite::{migrations::MigrationRunner, open_connection};

use crate::CliError;

pub fn migrate(db_path: &str) -> Result<(), CliError> {
    let mut conn = open_connection(db_path)?;
    let applied = MigrationRunner::new(&mut conn).run()?;

    if applied == 0 {
        println!("ℹ️  Nothing to migrate");
    } else {
        println!("✅ Applied {applied} migration(s)");
    }

    status(db_path)
}

pub fn status(db_path: &str) -> Result<(), CliError> {
    let mut conn = open_connection(db_path)?;
    let runner = MigrationRunner::new(&mut conn);

    for migration in runner.status()? {
        match migration.executed_at {
            Some(at) => println!("  ✔ {} ({})", migration.filename, at.format("%Y-%m-%d %H:%M:%S")),
            None => println!("  ⧗ {} (pending)", migration.filename),
        }
    }

    Ok(())
}
