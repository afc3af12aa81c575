use std::time::Duration;

use eyre::eyre;
use indicatif::{ProgressBar, ProgressStyle};
use tabvault_common::DEFAULT_POOL_SIZE;
use tabvault_sqlite::{CleanReport, Store, reclean_all};

use crate::CliError;

pub fn clean_stored(db_path: &str, dry_run: bool) -> Result<CleanReport, CliError> {
    let store = Store::open(db_path, DEFAULT_POOL_SIZE)?;
    let mut conn = store.try_acquire()?;

    let pb = ProgressBar::new_spinner();
    let style = ProgressStyle::with_template("{spinner:.green}{wide_msg}")
        .map_err(|err| eyre!(err))?
        .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ");

    pb.set_style(style);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.set_message(" Re-cleaning stored tabs...");

    let report = reclean_all(&mut conn, dry_run);
    pb.finish_and_clear();
    let report = report?;

    if dry_run {
        println!(
            "ℹ️  {} of {} tabs would change (dry run, nothing written)",
            report.changed, report.total
        );
    } else {
        println!("✅ {} of {} tabs updated", report.changed, report.total);
    }

    Ok(report)
}
