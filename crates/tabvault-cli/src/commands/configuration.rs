use std::{
    io::{BufRead as _, BufReader, Write},
    path::Path,
};

use config::ConfigError;
use fs_err::{File, OpenOptions};

use crate::CliError;

const CONFIG_TEMPLATE: &str = r#"# Tabvault configuration
# Every key can also be set as TABVAULT__SECTION__KEY in the environment.
app_settings:
  name: "Tabvault"
  port: "3000"
  host: "127.0.0.1"
db_settings:
  pool_size: "4"
  db_path: "./tabvault.db"
"#;

pub fn create_config_template() -> Result<(), CliError> {
    create_config_template_in(Path::new("."))
}

pub fn create_config_template_in(root: &Path) -> Result<(), CliError> {
    let config_dir = root.join("configuration");
    let config_path = config_dir.join("config.yml");
    let gitignore_path = root.join(".gitignore");
    let config_entry = "/configuration";

    let is_git_repo = root.join(".git").exists();

    if config_path.exists() {
        let contents = fs_err::read_to_string(&config_path)?;
        if !contents.trim().is_empty() {
            return Err(ConfigError::Message(
                "Config file already exists and is not empty. Please remove or rename the existing config.yml file.".to_string()
            ).into());
        }
    }

    fs_err::create_dir_all(&config_dir)?;
    fs_err::write(&config_path, CONFIG_TEMPLATE)?;

    if is_git_repo {
        if gitignore_path.exists() {
            let reader = BufReader::new(File::open(&gitignore_path)?);
            let mut found_config_entry = false;

            for line in reader.lines() {
                if line?.trim() == config_entry {
                    found_config_entry = true;
                    break;
                }
            }

            if found_config_entry {
                println!("ℹ️  /configuration already exists in .gitignore");
            } else {
                let contents = fs_err::read_to_string(&gitignore_path)?;
                let mut gitignore_file = OpenOptions::new().append(true).open(&gitignore_path)?;
                if !contents.ends_with('\n') && !contents.is_empty() {
                    writeln!(gitignore_file)?;
                }

                writeln!(gitignore_file, "{config_entry}")?;
                println!("✅ Added /configuration to existing .gitignore");
            }
        } else {
            let mut gitignore_file = File::create(&gitignore_path)?;
            writeln!(gitignore_file, "{config_entry}")?;
            println!("✅ Created .gitignore with /configuration entry");
        }
    } else {
        println!("ℹ️  Not a Git repository - skipping .gitignore creation");
    }

    println!("✅ config.yml created successfully!");
    Ok(())
}
