use clap::Parser;
use tabvault_cli::commands::import::ImportMeta;
use tabvault_cli::{
    Cli, CliError, Command, ExitOnError, commands, current_environment, get_configuration,
};
use tabvault_server::telemetry::{get_subscriber, init_subscriber};

fn main() -> eyre::Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();

    let log_level = match &cli.loglevel {
        Some(level) => level.clone(),
        None => current_environment()?.log_filter().to_owned(),
    };
    init_subscriber(get_subscriber(&log_level))?;

    if let Err(e) = run_cli(&cli) {
        e.exit_with_tips();
    }

    Ok(())
}

fn run_cli(cli: &Cli) -> Result<(), CliError> {
    match cli.command().clone() {
        Command::Init => commands::configuration::create_config_template()?,
        Command::Serve {
            interface,
            port,
            pool_size,
        } => {
            let settings = get_configuration()?;
            commands::server::start_server(
                interface.unwrap_or(settings.app_settings.host),
                port.unwrap_or(settings.app_settings.port),
                pool_size.unwrap_or(settings.db_settings.pool_size),
                &cli.db_path(&settings),
            )?;
        }
        Command::Import {
            file,
            title,
            artist,
            kind,
            tuning,
            capo,
            difficulty,
        } => {
            let meta = ImportMeta {
                title,
                artist,
                kind,
                tuning,
                capo,
                difficulty,
            };
            commands::import::import_file(&cli.resolve_db_path()?, &file, meta).or_exit();
        }
        Command::Clean { dry_run } => {
            commands::clean::clean_stored(&cli.resolve_db_path()?, dry_run).or_exit();
        }
        Command::List { query, format } => {
            commands::list::list_tabs(&cli.resolve_db_path()?, query.as_deref(), &format)?;
        }
        Command::Show { id } => commands::list::show_tab(&cli.resolve_db_path()?, id)?,
        Command::Migrate { status } => {
            let db_path = cli.resolve_db_path()?;
            if status {
                commands::migrations::status(&db_path)?;
            } else {
                commands::migrations::migrate(&db_path)?;
            }
        }
    }

    Ok(())
}
