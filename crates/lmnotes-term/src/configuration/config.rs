#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

use std::path;
use std::time::Duration;

use anyhow::bail;
use anyhow::Context;
use anyhow::Result;
use clap::ArgMatches;
use clap::Command;
use dashmap::DashMap;
use once_cell::sync::Lazy;
use strum::EnumIter;
use strum::EnumVariantNames;
use strum::IntoEnumIterator;
use tokio::fs;

static CONFIG: Lazy<DashMap<String, String>> = Lazy::new(DashMap::new);

#[derive(Clone, Copy, Debug, Eq, PartialEq, EnumIter, EnumVariantNames, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ConfigKey {
    ConfigFile,
    ServerUrl,
    RequestTimeout,
    SearchLimit,
    SearchThreshold,
    LogFile,
    LogLevel,
}

fn app_dir(base: Option<path::PathBuf>) -> path::PathBuf {
    base.unwrap_or_else(std::env::temp_dir).join("lmnotes")
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        "".to_string()
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    pub fn default(key: ConfigKey) -> String {
        match key {
            ConfigKey::ServerUrl => "http://localhost:8000".to_string(),
            ConfigKey::RequestTimeout => "30000".to_string(),
            ConfigKey::SearchLimit => "10".to_string(),
            ConfigKey::SearchThreshold => "0.2".to_string(),
            ConfigKey::LogLevel => "info".to_string(),
            ConfigKey::LogFile => app_dir(dirs::cache_dir())
                .join("lmnotes.log")
                .to_string_lossy()
                .to_string(),

            // Special
            ConfigKey::ConfigFile => app_dir(dirs::config_dir())
                .join("config.toml")
                .to_string_lossy()
                .to_string(),
        }
    }

    fn parse<T>(key: ConfigKey) -> Result<T>
    where
        T: std::str::FromStr,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        let val = Config::get(key);
        val.parse::<T>()
            .with_context(|| format!("invalid value for '{key}': {val}"))
    }

    pub fn get_u32(key: ConfigKey) -> Result<u32> {
        Config::parse(key)
    }

    pub fn get_f64(key: ConfigKey) -> Result<f64> {
        Config::parse(key)
    }

    /// Request timeout, configured in milliseconds.
    pub fn request_timeout() -> Result<Duration> {
        Ok(Duration::from_millis(Config::parse(ConfigKey::RequestTimeout)?))
    }

    fn possible_values(cmd: &Command, key: ConfigKey) -> Vec<String> {
        cmd.get_arguments()
            .find(|e| e.get_long() == Some(key.to_string().as_str()))
            .map(|arg| {
                arg.get_possible_values()
                    .iter()
                    .map(|e| e.get_name().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Fill the config from defaults, then the TOML file, then the command
    /// line. Later sources win.
    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        for key in ConfigKey::iter() {
            Config::set(key, &Config::default(key))
        }

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(&config_path).await?;
            let doc = toml_str
                .parse::<toml_edit::Document>()
                .with_context(|| format!("failed to parse {}", config_path.display()))?;

            for key in ConfigKey::iter() {
                if key == ConfigKey::ConfigFile {
                    continue;
                }
                let Some(val) = doc.get(&key.to_string()) else {
                    continue;
                };

                if let Some(val_int) = val.as_integer() {
                    Config::set(key, &val_int.to_string());
                } else if let Some(val_float) = val.as_float() {
                    Config::set(key, &val_float.to_string());
                } else if let Some(val_str) = val.as_str() {
                    if val_str.is_empty() {
                        continue;
                    }
                    let possible_values = Config::possible_values(&cmd, key);
                    if !possible_values.is_empty()
                        && !possible_values.contains(&val_str.to_string())
                    {
                        bail!(
                            "config.toml has an invalid value for key '{key}': {val_str}\nPossible values are: {}",
                            possible_values.join(", ")
                        );
                    }
                    Config::set(key, val_str);
                } else {
                    bail!("config.toml has an unsupported value type for key '{key}'");
                }
            }
        }

        for key in ConfigKey::iter() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    Config::set(key, val)
                }
            }
        }

        tracing::debug!(
            server_url = Config::get(ConfigKey::ServerUrl),
            request_timeout = Config::get(ConfigKey::RequestTimeout),
            search_limit = Config::get(ConfigKey::SearchLimit),
            search_threshold = Config::get(ConfigKey::SearchThreshold),
            "config"
        );

        Ok(())
    }

    /// A commented `config.toml` holding every default.
    pub fn serialize_default(cmd: Command) -> String {
        ConfigKey::iter()
            .filter(|key| *key != ConfigKey::ConfigFile)
            .map(|key| {
                let long = key.to_string();
                let arg = cmd
                    .get_arguments()
                    .find(|e| e.get_long() == Some(long.as_str()));

                let mut description = arg
                    .and_then(|arg| arg.get_help())
                    .map(|help| help.to_string())
                    .unwrap_or_default();
                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let possible_values = Config::possible_values(&cmd, key);
                if !possible_values.is_empty() {
                    description = format!(
                        "{description} [possible values: {}]",
                        possible_values.join(", ")
                    );
                }

                let val = Config::default(key);
                let val = if val.is_empty() {
                    format!("# {key} = \"\"")
                } else if val.parse::<f64>().is_ok() {
                    format!("{key} = {val}")
                } else {
                    format!("{key} = \"{val}\"")
                };

                format!("# {description}\n{val}")
            })
            .collect::<Vec<String>>()
            .join("\n\n")
    }
}
