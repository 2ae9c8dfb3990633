use crate::adapters::source::{
    EmbeddedMenuSource, FileMenuSource, RemoteMenuSource, DEFAULT_MENU_URL,
};
use crate::core::{ConfigProvider, MenuSource};
use crate::utils::error::{GachaError, Result};
use crate::utils::validation::{
    validate_non_empty_secret, validate_path, validate_positive_number, validate_required_field,
    validate_url, Validate,
};
use clap::{Parser, ValueEnum};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MenuSourceKind {
    /// Hosted JSON document, refreshed periodically
    Remote,
    /// Local JSON document, refreshed periodically
    File,
    /// Dataset bundled at build time, never refreshed
    Embedded,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "saizeriya-gacha")]
#[command(version, about = "Nostr webhook that replies with a random Saizeriya order")]
pub struct ServerConfig {
    /// Bot secret key (nsec1... or hex)
    #[arg(long, env = "BOT_NSEC", hide_env_values = true)]
    pub bot_nsec: Option<String>,

    /// Listen port; an empty value means the default
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT, value_parser = parse_port)]
    pub port: u16,

    #[arg(long, env = "MENU_SOURCE", value_enum, default_value_t = MenuSourceKind::Remote)]
    pub menu_source: MenuSourceKind,

    #[arg(long, env = "MENU_URL", default_value = DEFAULT_MENU_URL)]
    pub menu_url: String,

    #[arg(long, env = "MENU_FILE")]
    pub menu_file: Option<String>,

    #[arg(long, env = "MENU_REFRESH_SECS", default_value_t = 3600)]
    pub refresh_interval_secs: u64,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, env = "LOG_JSON", help = "Emit JSON log lines")]
    pub log_json: bool,
}

fn parse_port(value: &str) -> std::result::Result<u16, String> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(DEFAULT_PORT);
    }
    value
        .parse()
        .map_err(|e| format!("invalid port {:?}: {}", value, e))
}

impl ServerConfig {
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_secs())
    }

    /// Missing keys are a startup error.
    pub fn secret(&self) -> Result<&str> {
        self.bot_secret().ok_or_else(|| GachaError::MissingConfigError {
            field: "bot_nsec".to_string(),
        })
    }

    pub fn build_menu_source(&self) -> Result<Arc<dyn MenuSource>> {
        let source: Arc<dyn MenuSource> = match self.menu_source {
            MenuSourceKind::Remote => Arc::new(RemoteMenuSource::new(self.menu_url())?),
            MenuSourceKind::File => {
                let path = self.menu_file.as_ref().ok_or_else(|| GachaError::MissingConfigError {
                    field: "menu_file".to_string(),
                })?;
                Arc::new(FileMenuSource::new(path))
            }
            MenuSourceKind::Embedded => Arc::new(EmbeddedMenuSource),
        };
        Ok(source)
    }
}

impl ConfigProvider for ServerConfig {
    fn bot_secret(&self) -> Option<&str> {
        self.bot_nsec.as_deref()
    }

    fn port(&self) -> u16 {
        self.port
    }

    fn menu_url(&self) -> &str {
        &self.menu_url
    }

    fn refresh_interval_secs(&self) -> u64 {
        self.refresh_interval_secs
    }
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_secret("bot_nsec", self.secret()?)?;
        validate_positive_number("port", u64::from(self.port()), 1)?;

        match self.menu_source {
            MenuSourceKind::Remote => {
                validate_url("menu_url", self.menu_url())?;
                validate_positive_number("refresh_interval_secs", self.refresh_interval_secs(), 1)?;
            }
            MenuSourceKind::File => {
                let path = validate_required_field("menu_file", &self.menu_file)?;
                validate_path("menu_file", path)?;
                validate_positive_number("refresh_interval_secs", self.refresh_interval_secs(), 1)?;
            }
            MenuSourceKind::Embedded => {}
        }

        tracing::info!("✅ Configuration validation passed");
        Ok(())
    }
}
