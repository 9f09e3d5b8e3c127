use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000/api";
pub const DEFAULT_GMAIL_ORIGIN: &str = "https://mail.google.com/";

/// Which popup flow to run.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum Flow {
    /// Recipients, then template, then review.
    #[default]
    Wizard,
    /// A single template list; picking a row applies it.
    TemplateOnly,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub api_base_url: String,
    pub gmail_origin: String,
    pub request_timeout_secs: u64,
    pub locator_attempts: u32,
    pub locator_interval_ms: u64,
    pub bridge_socket: Option<String>,
    pub flow: Flow,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE.to_string(),
            gmail_origin: DEFAULT_GMAIL_ORIGIN.to_string(),
            request_timeout_secs: 5,
            locator_attempts: 20,
            locator_interval_ms: 100,
            bridge_socket: None,
            flow: Flow::Wizard,
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn locator_interval(&self) -> Duration {
        Duration::from_millis(self.locator_interval_ms)
    }
}

fn config_dir() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("no config dir available"))?
        .join("gmail_assist"))
}

pub fn config_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("config.toml");
    Ok(p)
}

pub fn default_socket_path() -> Result<PathBuf> {
    let mut p = config_dir()?;
    fs::create_dir_all(&p)?;
    p.push("bridge.sock");
    Ok(p)
}

/// Loads the config file, writing a template with the defaults first if
/// there is none yet. Unset keys fall back to their defaults.
pub fn load_config() -> Result<Config> {
    let path = config_path()?;
    if !path.exists() {
        let tom = toml::to_string_pretty(&Config::default())?;
        fs::write(&path, tom)?;
        log::info!("wrote default config to {}", path.display());
        return Ok(Config::default());
    }
    let s = fs::read_to_string(path)?;
    parse_config(&s)
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;
    Ok(cfg)
}

pub fn resolve_socket_path(cfg: &Config) -> Result<PathBuf> {
    if let Some(p) = &cfg.bridge_socket {
        Ok(PathBuf::from(p))
    } else {
        default_socket_path()
    }
}
