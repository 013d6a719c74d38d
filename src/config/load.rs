use std::{env, path::PathBuf};

use super::schema::Settings;

/// Configuration loading helpers.
///
/// `Settings::load` tries environment variables first (prefix `CADENZA__`), then an
/// optional config file and falls back to struct defaults.
impl Settings {
    /// Load settings from environment and optional config file.
    pub fn load() -> Result<Self, ::config::ConfigError> {
        let config_path = resolve_config_path();

        let mut builder = ::config::Config::builder();

        if let Some(path) = &config_path {
            builder = builder.add_source(::config::File::from(path.as_path()).required(false));
        }

        builder = builder.add_source(
            ::config::Environment::with_prefix("CADENZA")
                .separator("__")
                .try_parsing(true),
        );

        let cfg = builder.build()?;
        let settings: Settings = cfg.try_deserialize()?;
        Ok(settings)
    }

    /// Perform basic validation checks on loaded settings.
    pub fn validate(&self) -> Result<(), String> {
        if self.library.extensions.is_empty() {
            return Err("library.extensions must not be empty".to_string());
        }
        if self.library.display_fields.is_empty() {
            return Err("library.display_fields must not be empty".to_string());
        }
        Ok(())
    }

    /// Resolve where the shared JSON document lives: explicit
    /// `storage.data_path` wins, then `CADENZA_DATA_PATH`, then the
    /// default location under the user config directory.
    pub fn resolve_data_path(&self) -> Option<PathBuf> {
        if let Some(p) = &self.storage.data_path {
            return Some(p.clone());
        }
        if let Some(p) = env::var_os("CADENZA_DATA_PATH") {
            return Some(PathBuf::from(p));
        }
        default_data_path()
    }
}

/// Resolve the config path from `CADENZA_CONFIG_PATH` or XDG defaults.
pub fn resolve_config_path() -> Option<PathBuf> {
    if let Some(p) = env::var_os("CADENZA_CONFIG_PATH") {
        let p = PathBuf::from(p);
        return Some(p);
    }
    default_config_path()
}

/// Compute the default config path under `$XDG_CONFIG_HOME/cadenza/config.toml`
/// or `~/.config/cadenza/config.toml` when `XDG_CONFIG_HOME` is not set.
pub fn default_config_path() -> Option<PathBuf> {
    config_home().map(|d| d.join("cadenza").join("config.toml"))
}

/// Compute the default data path under `$XDG_CONFIG_HOME/cadenza/library.json`
/// or `~/.config/cadenza/library.json` when `XDG_CONFIG_HOME` is not set.
pub fn default_data_path() -> Option<PathBuf> {
    config_home().map(|d| d.join("cadenza").join("library.json"))
}

fn config_home() -> Option<PathBuf> {
    if let Some(xdg) = env::var_os("XDG_CONFIG_HOME") {
        Some(PathBuf::from(xdg))
    } else if let Some(home) = env::var_os("HOME") {
        Some(PathBuf::from(home).join(".config"))
    } else {
        None
    }
}
