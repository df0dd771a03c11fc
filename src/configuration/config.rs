#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

#[cfg(target_os = "macos")]
use std::env;
use std::path;

use anyhow::bail;
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
    ApiURL,
    ConfigFile,
    HealthCheckTimeout,
    RequestTimeout,
    SessionFile,
}

impl ConfigKey {
    fn is_millis(&self) -> bool {
        return *self == ConfigKey::HealthCheckTimeout || *self == ConfigKey::RequestTimeout;
    }
}

pub struct Config {}

impl Config {
    pub fn get(key: ConfigKey) -> String {
        if let Some(val) = CONFIG.get(&key.to_string()) {
            return val.to_string();
        }

        return "".to_string();
    }

    pub fn set(key: ConfigKey, value: &str) {
        CONFIG.insert(key.to_string(), value.to_string());
    }

    /// Millisecond settings are validated on load, so a bad value here can
    /// only come from a direct `Config::set`.
    pub fn get_millis(key: ConfigKey) -> Result<u64> {
        let val = Config::get(key);
        if let Ok(millis) = val.parse::<u64>() {
            return Ok(millis);
        }

        bail!(format!("Config key '{key}' must be a number of milliseconds, got '{val}'"));
    }

    pub fn default(key: ConfigKey) -> String {
        let cache_dir = dirs::cache_dir().unwrap_or_default().join("pathfinder");

        #[cfg(not(target_os = "macos"))]
        let config_path = cache_dir.join("config.toml");
        #[cfg(target_os = "macos")]
        let config_path = path::PathBuf::from(env::var("HOME").unwrap_or_default())
            .join(".config/pathfinder/config.toml");

        let res = match key {
            ConfigKey::ApiURL => "http://localhost:8000".to_string(),
            ConfigKey::HealthCheckTimeout => "1000".to_string(),
            ConfigKey::RequestTimeout => "10000".to_string(),

            // Special
            ConfigKey::ConfigFile => config_path.to_string_lossy().to_string(),
            ConfigKey::SessionFile => cache_dir.join("session.yaml").to_string_lossy().to_string(),
        };

        return res;
    }

    fn validate(key: ConfigKey, val: &str) -> Result<()> {
        if key.is_millis() && val.parse::<u64>().is_err() {
            bail!(format!(
                "Invalid value for key '{key}': {val}\nExpected a number of milliseconds."
            ));
        }

        if key == ConfigKey::ApiURL && reqwest::Url::parse(val).is_err() {
            bail!(format!(
                "Invalid value for key '{key}': {val}\nExpected a URL such as {}",
                Config::default(ConfigKey::ApiURL)
            ));
        }

        return Ok(());
    }

    /// Resolves every key from defaults, the config file, then CLI arguments
    /// (which clap has already merged with `PATHFINDER_*` environment
    /// variables). Nothing is written to the global store unless every value
    /// validates.
    pub async fn load(cmd: Command, clap_arg_matches: Vec<&ArgMatches>) -> Result<()> {
        let mut values = ConfigKey::iter()
            .map(|key| return (key, Config::default(key)))
            .collect::<Vec<(ConfigKey, String)>>();

        let mut config_file = Config::default(ConfigKey::ConfigFile);
        for matches in clap_arg_matches.as_slice() {
            if let Ok(Some(arg_config_file)) =
                matches.try_get_one::<String>(&ConfigKey::ConfigFile.to_string())
            {
                config_file = arg_config_file.to_string();
            }
        }

        let config_path = path::PathBuf::from(&config_file);
        if config_path.exists() {
            let toml_str = fs::read_to_string(config_path).await?;
            let doc = toml_str.parse::<toml_edit::Document>()?;

            for (key, value) in values.iter_mut() {
                if let Some(val) = doc.get(&key.to_string()) {
                    // Use clap value parsers to do validation.
                    let mut possible_values = vec![];
                    if let Some(arg) = cmd
                        .get_arguments()
                        .find(|e| return e.get_long() == Some(key.to_string().as_str()))
                    {
                        possible_values = arg
                            .get_possible_values()
                            .iter()
                            .map(|e| return e.get_name().to_string())
                            .collect::<Vec<String>>();
                    }

                    if let Some(val_int) = val.as_integer() {
                        *value = val_int.to_string();
                    } else if let Some(val_str) = val.as_str() {
                        if val_str.is_empty() {
                            continue;
                        }
                        if !possible_values.is_empty()
                            && !possible_values.contains(&val_str.to_string())
                        {
                            bail!(format!("{config_file} has an invalid value for key '{key}': {val_str}\nPossible values are: {}", possible_values.join(", ")));
                        }
                        *value = val_str.to_string();
                    } else {
                        bail!(format!(
                            "{config_file} has an invalid value for key '{key}': {val}"
                        ));
                    }
                }
            }
        }

        for (key, value) in values.iter_mut() {
            for matches in clap_arg_matches.as_slice() {
                if let Ok(Some(val)) = matches.try_get_one::<String>(&key.to_string()) {
                    if val.is_empty() {
                        continue;
                    }
                    *value = val.to_string();
                }
            }
        }

        for (key, value) in values.iter() {
            Config::validate(*key, value)?;
        }

        for (key, value) in values.iter() {
            Config::set(*key, value);
        }

        tracing::debug!(
            api_url = Config::get(ConfigKey::ApiURL),
            request_timeout = Config::get(ConfigKey::RequestTimeout),
            session_file = Config::get(ConfigKey::SessionFile),
            config_file = config_file,
            "config"
        );

        return Ok(());
    }

    pub fn serialize_default(cmd: Command) -> String {
        let toml_str = ConfigKey::iter()
            .filter_map(|key| {
                if key == ConfigKey::ConfigFile {
                    return None;
                }

                let arg = cmd
                    .get_arguments()
                    .find(|e| return e.get_long() == Some(key.to_string().as_str()))?;

                let mut description = arg
                    .get_help()
                    .map(|help| return help.to_string())
                    .unwrap_or_default();

                description = description
                    .split("[default:")
                    .next()
                    .unwrap_or_default()
                    .trim()
                    .to_string();

                let mut val = Config::default(key);
                if val.is_empty() {
                    val = format!("# {key} = \"\"");
                } else if val.parse::<i32>().is_ok() {
                    val = format!("{key} = {val}");
                } else {
                    val = format!("{key} = \"{val}\"");
                }

                return Some(format!("# {description}\n{val}"));
            })
            .collect::<Vec<String>>()
            .join("\n\n");

        return toml_str;
    }
}
