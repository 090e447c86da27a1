use crate::error::AppError;
use crate::model::date;
use crate::storage::json_store::DEFAULT_STORE_NAME;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use time::UtcOffset;
use time::macros::format_description;

const CONFIG_FILE_NAME: &str = "config.json";
pub const CONFIG_ENV_VAR: &str = "TASKER_CONFIG_PATH";

/// Lowercases `raw` and collapses every run of other characters into one
/// `_`, so `" Store-Name "` and `store_name` name the same key.
pub fn canonical_key(raw: &str) -> Option<String> {
    let mut cleaned = String::new();
    let mut previous_underscore = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            cleaned.push(ch.to_ascii_lowercase());
            previous_underscore = false;
        } else if !previous_underscore && !cleaned.is_empty() {
            cleaned.push('_');
            previous_underscore = true;
        }
    }

    let trimmed = cleaned.trim_matches('_');
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// The UTC offset used to read typed due dates and to print stored ones.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum DisplayOffset {
    /// Whatever the machine reports, UTC when it cannot tell.
    #[default]
    Local,
    Fixed(UtcOffset),
}

impl DisplayOffset {
    /// Accepts `local`, `utc`/`z`, or a signed `+hh:mm` / `+hh` offset.
    pub fn parse(raw: &str) -> Result<Self, AppError> {
        match canonical_key(raw).as_deref() {
            None | Some("local") => return Ok(Self::Local),
            Some("utc" | "z") => return Ok(Self::Fixed(UtcOffset::UTC)),
            _ => {}
        }

        let value = raw.trim();
        UtcOffset::parse(
            value,
            format_description!("[offset_hour sign:mandatory]:[offset_minute]"),
        )
        .or_else(|_| UtcOffset::parse(value, format_description!("[offset_hour sign:mandatory]")))
        .map(Self::Fixed)
        .map_err(|_| {
            AppError::invalid_data(format!(
                "invalid offset '{value}': expected local, utc or +hh:mm"
            ))
        })
    }

    pub fn resolve(self) -> UtcOffset {
        match self {
            Self::Local => date::local_offset(),
            Self::Fixed(offset) => offset,
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Name of the task file, without the `.json` extension.
    #[serde(default)]
    pub store: Option<String>,
    /// See [`DisplayOffset::parse`]; unset means the local offset.
    #[serde(default)]
    pub offset: Option<String>,
}

impl Config {
    pub fn store_name(&self) -> &str {
        self.store
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or(DEFAULT_STORE_NAME)
    }

    /// Values are validated on load and override, so a bad one here falls
    /// back to the local offset.
    pub fn display_offset(&self) -> DisplayOffset {
        self.offset
            .as_deref()
            .and_then(|raw| DisplayOffset::parse(raw).ok())
            .unwrap_or_default()
    }

    pub fn offset(&self) -> UtcOffset {
        self.display_offset().resolve()
    }
}

#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    pub error: Option<AppError>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub store: Option<String>,
    pub offset: Option<String>,
}

fn path_from_env() -> Option<PathBuf> {
    std::env::var(CONFIG_ENV_VAR)
        .ok()
        .filter(|path| !path.trim().is_empty())
        .map(PathBuf::from)
}

fn env_dir(name: &str) -> Result<PathBuf, AppError> {
    std::env::var(name)
        .map(PathBuf::from)
        .map_err(|_| AppError::invalid_data(format!("{name} is not set")))
}

/// `TASKER_CONFIG_PATH` when set, otherwise `tasker/config.json` under the
/// per-user configuration directory.
pub fn config_path() -> Result<PathBuf, AppError> {
    if let Some(path) = path_from_env() {
        return Ok(path);
    }

    let base = if cfg!(windows) {
        env_dir("APPDATA")?
    } else {
        env_dir("HOME")?.join(".config")
    };
    Ok(base.join("tasker").join(CONFIG_FILE_NAME))
}

pub fn load_config_with_fallback() -> ConfigLoad {
    match config_path() {
        Ok(path) => load_config_with_fallback_from_path(&path),
        Err(err) => ConfigLoad {
            config: Config::default(),
            error: Some(err),
        },
    }
}

fn load_config_with_fallback_from_path(path: &Path) -> ConfigLoad {
    if !path.exists() {
        return ConfigLoad {
            config: Config::default(),
            error: None,
        };
    }

    match load_config_from_path(path) {
        Ok(config) => ConfigLoad {
            config,
            error: None,
        },
        Err(err) => {
            tracing::warn!(target: "tasks", "using default configuration: {err}");
            ConfigLoad {
                config: Config::default(),
                error: Some(err),
            }
        }
    }
}

fn load_config_from_path(path: &Path) -> Result<Config, AppError> {
    let content = std::fs::read_to_string(path)
        .map_err(|err| AppError::io(format!("{}: {}", path.display(), err)))?;
    let config: Config = serde_json::from_str(&content).map_err(|err| {
        AppError::invalid_data(format!("invalid JSON in {}: {}", path.display(), err))
    })?;
    if let Some(raw) = config.offset.as_deref() {
        DisplayOffset::parse(raw)
            .map_err(|err| AppError::invalid_data(format!("{}: {}", path.display(), err.message())))?;
    }
    Ok(config)
}

pub fn merge_overrides(base: &Config, overrides: &ConfigOverrides) -> Config {
    let mut merged = base.clone();
    if let Some(store) = overrides.store.as_ref()
        && !store.trim().is_empty()
    {
        merged.store = Some(store.trim().to_string());
    }

    if let Some(offset) = overrides.offset.as_ref()
        && DisplayOffset::parse(offset).is_ok()
    {
        merged.offset = Some(offset.trim().to_string());
    }

    merged
}
