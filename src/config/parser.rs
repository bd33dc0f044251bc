use crate::config::types::Config;
use crate::config::validation::validate;
use crate::{ConfigError, ConfigResult};
use std::path::Path;
use std::str::FromStr;

/// Loads the configuration, applying environment overrides and validation
///
/// # Arguments
///
/// * `path` - Optional path to a TOML configuration file; defaults are used when `None`
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to read, parse, or validate the configuration
pub fn load_config(path: Option<&Path>) -> ConfigResult<Config> {
    let mut config = match path {
        Some(path) => parse_config(&std::fs::read_to_string(path)?)?,
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok())?;

    validate(&config)?;

    Ok(config)
}

/// Parses TOML content into a configuration without validating it
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    Ok(toml::from_str(content)?)
}

/// Overrides configuration values from environment-style variables
///
/// `lookup` maps a variable name to its value. Recognized variables:
/// `PORT`, `DATABASE_URL`, `DB_DIR`, `DB_NAME`, `START_URL`, `TOTAL_TARGET`.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F) -> ConfigResult<()>
where
    F: Fn(&str) -> Option<String>,
{
    let lookup = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

    if let Some(port) = lookup("PORT") {
        config.server.port = parse_var("PORT", &port)?;
    }

    if let Some(url) = lookup("DATABASE_URL") {
        config.database.url = Some(url);
    }

    if let Some(directory) = lookup("DB_DIR") {
        config.database.directory = directory;
    }

    if let Some(name) = lookup("DB_NAME") {
        config.database.name = name;
    }

    if let Some(start_url) = lookup("START_URL") {
        config.crawl.start_url = start_url;
    }

    if let Some(target) = lookup("TOTAL_TARGET") {
        config.crawl.total_target = parse_var("TOTAL_TARGET", &target)?;
    }

    Ok(())
}

fn parse_var<T: FromStr>(key: &str, value: &str) -> ConfigResult<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::Validation(format!("{} has an invalid value '{}'", key, value))
    })
}
