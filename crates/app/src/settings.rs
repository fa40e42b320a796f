//! Settings for the expense tracker.
//!
//! Read in order, later sources winning: the TOML file
//! (`config/expense_tracker.toml` unless `--config` says otherwise),
//! `EXPENSE_TRACKER__*` environment variables, then command line flags.
use std::time::Duration;

use clap::Parser;
use config::ConfigError;
use serde::Deserialize;

const DEFAULT_CONFIG_PATH: &str = "config/expense_tracker.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct App {
    pub level: String,
}

impl Default for App {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Server {
    pub bind: String,
    pub port: u16,
}

impl Default for Server {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Store {
    /// sea-orm connection string. Without it records live in memory only.
    pub database_url: Option<String>,
    pub connect_timeout_secs: u64,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            database_url: None,
            connect_timeout_secs: 3,
        }
    }
}

impl Store {
    pub fn store_settings(&self) -> engine::StoreSettings {
        engine::StoreSettings {
            database_url: self.database_url.clone().filter(|url| !url.trim().is_empty()),
            connect_timeout: Duration::from_secs(self.connect_timeout_secs.max(1)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub app: App,
    pub server: Server,
    pub store: Store,
}

#[derive(Debug, Parser)]
#[command(name = "expense_tracker", about = "Personal expense tracker API")]
struct Args {
    /// Optional config file path (TOML).
    #[arg(long)]
    config: Option<String>,
    /// Override bind address.
    #[arg(long)]
    bind: Option<String>,
    /// Override listening port.
    #[arg(long)]
    port: Option<u16>,
    /// Override database connection string.
    #[arg(long)]
    database_url: Option<String>,
    /// Override log level (trace, debug, info, warn, error).
    #[arg(long)]
    level: Option<String>,
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_args(Args::parse())
    }

    fn from_args(args: Args) -> Result<Self, ConfigError> {
        let config_path = args.config.as_deref().unwrap_or(DEFAULT_CONFIG_PATH);
        let mut settings: Settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("EXPENSE_TRACKER")
                    .try_parsing(true)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        if let Some(bind) = args.bind {
            settings.server.bind = bind;
        }
        if let Some(port) = args.port {
            settings.server.port = port;
        }
        if let Some(url) = args.database_url {
            settings.store.database_url = Some(url);
        }
        if let Some(level) = args.level {
            settings.app.level = level;
        }

        Ok(settings)
    }
}
