use super::CliError;
use crate::config::generate::generate_starter_config;
use crate::config::{load_config, user_config_path};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the starter config to stdout or to `~/.config/escli/config.yml`.
pub fn init<W: Write>(stdout: bool, out: &mut W) -> Result<(), CliError> {
    let config_content = generate_starter_config();

    if stdout {
        write!(out, "{}", config_content)?;
        return Ok(());
    }

    let config_path = user_config_path().unwrap_or_else(|| PathBuf::from("/etc/escli/config.yml"));
    write_config(&config_path, &config_content)?;
    writeln!(out, "Config file written to {}", config_path.display())?;
    Ok(())
}

/// Writes `content` to `path`, refusing to overwrite an existing file.
pub fn write_config(path: &Path, content: &str) -> Result<(), CliError> {
    if path.exists() {
        return Err(CliError::Usage(format!(
            "config file already exists at {}; remove it first or use --stdout to print the config",
            path.display()
        )));
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    fs::write(path, content)?;
    Ok(())
}

pub fn validate<W: Write>(config_path: Option<PathBuf>, out: &mut W) -> Result<(), CliError> {
    let path = config_path.ok_or_else(|| {
        CliError::Usage("no config file found, use --config to specify a path".to_string())
    })?;

    writeln!(out, "Validating config file: {}", path.display())?;
    load_config(&path)?;
    writeln!(out, "✓ Config is valid")?;
    Ok(())
}
