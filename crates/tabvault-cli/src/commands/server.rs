use clap::crate_version;
use std::{net::IpAddr, time::Instant};
use tabvault_server::{ApplicationSettings, startup::run_server};
use tabvault_sqlite::Store;

use crate::CliError;

pub fn start_server(
    interface: IpAddr,
    port: u16,
    pool_size: usize,
    db_path: &str,
) -> Result<(), CliError> {
    let start = Instant::now();
    let name = String::from("Tabvault");
    let version = crate_version!().to_owned();

    let configuration = ApplicationSettings::new(name, version, port, interface);
    let store = Store::open(db_path, pool_size)?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_server(configuration, store, start))?;

    Ok(())
}
