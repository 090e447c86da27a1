use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tasker_core::config::{ConfigOverrides, DisplayOffset, canonical_key};
use tasker_core::error::AppError;
use tasker_core::model::TaskStatus;

#[derive(Parser, Debug)]
#[command(name = "tasker", author, version, about, long_about = None)]
pub struct Cli {
    /// Run one command and exit; without a command the interactive menu starts
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Output JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Task file to read and write, overriding configuration and environment
    #[arg(long, value_name = "PATH", global = true)]
    pub store: Option<PathBuf>,

    /// Override configuration values (format KEY=VALUE)
    #[arg(long = "config-override", value_name = "KEY=VALUE", global = true)]
    pub config_override: Vec<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Add a new task
    ///
    /// Example: tasker add "Buy milk" --difficulty 2 --due 2024/01/15
    Add {
        title: String,
        #[arg(long)]
        description: Option<String>,
        /// 1 easy, 2 medium, 3 hard
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        difficulty: Option<u8>,
        /// 1 pending, 2 in progress, 3 done
        #[arg(long, value_parser = clap::value_parser!(u8).range(1..=3))]
        status: Option<u8>,
        /// Due date as yyyy/mm/dd or yyyy-mm-dd
        #[arg(long)]
        due: Option<String>,
    },
    /// List active tasks
    ///
    /// Example: tasker list --status in-progress
    List {
        #[arg(long, value_enum)]
        status: Option<StatusFilter>,
    },
    /// Search active tasks by title
    ///
    /// Example: tasker search milk
    Search { text: String },
    /// Show counts by status and difficulty
    ///
    /// Example: tasker stats --json
    Stats,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusFilter {
    Pending,
    InProgress,
    Done,
}

impl From<StatusFilter> for TaskStatus {
    fn from(filter: StatusFilter) -> Self {
        match filter {
            StatusFilter::Pending => TaskStatus::Pending,
            StatusFilter::InProgress => TaskStatus::InProgress,
            StatusFilter::Done => TaskStatus::Done,
        }
    }
}

/// Flag name used to identify config override arguments by the runtime.
pub const CONFIG_OVERRIDE_FLAG: &str = "--config-override";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOverrideTarget {
    Store,
    Offset,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedConfigOverride {
    pub target: ConfigOverrideTarget,
    pub value: String,
}

/// Parse a raw `KEY=VALUE` override string into a structured target.
pub fn parse_config_override(raw: &str) -> Result<ParsedConfigOverride, String> {
    let trimmed = raw.trim();
    let (key_raw, value_raw) = trimmed
        .split_once('=')
        .ok_or_else(|| "override must be in KEY=VALUE format".to_string())?;

    let value = value_raw.trim().to_string();
    let field = canonical_key(key_raw).ok_or_else(|| "override key cannot be empty".to_string())?;

    let target = match field.as_str() {
        "store" | "store_name" => ConfigOverrideTarget::Store,
        "offset" | "utc_offset" | "display_offset" => ConfigOverrideTarget::Offset,
        other => return Err(format!("unknown config field '{other}'")),
    };

    match target {
        ConfigOverrideTarget::Store if value.is_empty() => {
            return Err("store override cannot be empty".to_string());
        }
        ConfigOverrideTarget::Offset => {
            DisplayOffset::parse(&value).map_err(|err| err.message().to_string())?;
        }
        ConfigOverrideTarget::Store => {}
    }

    Ok(ParsedConfigOverride { target, value })
}

/// Folds every `--config-override` argument into one set; later keys win.
pub fn collect_overrides(raw: &[String]) -> Result<ConfigOverrides, AppError> {
    let mut overrides = ConfigOverrides::default();
    for entry in raw {
        let parsed = parse_config_override(entry)
            .map_err(|err| AppError::invalid_input(format!("{CONFIG_OVERRIDE_FLAG}: {err}")))?;
        match parsed.target {
            ConfigOverrideTarget::Store => overrides.store = Some(parsed.value),
            ConfigOverrideTarget::Offset => overrides.offset = Some(parsed.value),
        }
    }
    Ok(overrides)
}
