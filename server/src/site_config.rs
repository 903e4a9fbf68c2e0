use std::net::SocketAddr;
use std::path::Path;

use common::config::{ConfigManager, FileContentConfigProvider, Validate, YamlConfigSerializer};
use common::games::tictactoe::TicTacToeSettings;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_NAME: &str = "irg_site_config.yaml";
pub const WEBHOOK_URL_ENV: &str = "GOOGLE_SHEETS_WEBHOOK_URL";
pub const WEBHOOK_TOKEN_ENV: &str = "IRG_WEBHOOK_TOKEN";

pub fn get_config_manager(
    path: &str,
) -> ConfigManager<FileContentConfigProvider, SiteConfig, YamlConfigSerializer> {
    ConfigManager::from_yaml_file(path)
}

/// Writes `SiteConfig::default()` to `path` so it can be edited by hand.
/// An existing file is left alone; returns whether a file was written.
pub fn write_default_config(path: &str) -> Result<bool, String> {
    if Path::new(path).exists() {
        return Ok(false);
    }
    get_config_manager(path).set_config(&SiteConfig::default())?;
    Ok(true)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub bind_address: String,
    pub static_files_path: String,
    pub contact: ContactConfig,
    pub tictactoe: TicTacToeSettings,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
            static_files_path: "public".to_string(),
            contact: ContactConfig::default(),
            tictactoe: TicTacToeSettings::default(),
        }
    }
}

impl Validate for SiteConfig {
    fn validate(&self) -> Result<(), String> {
        self.bind_address
            .parse::<SocketAddr>()
            .map_err(|e| format!("bind_address '{}' is invalid: {}", self.bind_address, e))?;
        if self.static_files_path.is_empty() {
            return Err("static_files_path must not be empty".to_string());
        }
        self.contact.validate()?;
        self.tictactoe.validate()?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactConfig {
    pub webhook_url: Option<String>,
    pub token: Option<String>,
    /// Tag the webhook uses to tell which site a submission came from.
    pub source: String,
    pub timeout_ms: u64,
}

impl ContactConfig {
    /// Environment variables win over the file so secrets can stay out of it.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup(WEBHOOK_URL_ENV).filter(|v| !v.is_empty()) {
            self.webhook_url = Some(url);
        }
        if let Some(token) = lookup(WEBHOOK_TOKEN_ENV).filter(|v| !v.is_empty()) {
            self.token = Some(token);
        }
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.as_deref().is_some_and(|v| !v.is_empty())
            && self.token.as_deref().is_some_and(|v| !v.is_empty())
    }
}

impl Default for ContactConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            token: None,
            source: "irg-auw.app".to_string(),
            timeout_ms: 10_000,
        }
    }
}

impl Validate for ContactConfig {
    fn validate(&self) -> Result<(), String> {
        if let Some(url) = &self.webhook_url
            && !url.is_empty()
            && !(url.starts_with("http://") || url.starts_with("https://"))
        {
            return Err(format!("contact webhook_url '{}' must be an http(s) URL", url));
        }
        if self.timeout_ms == 0 {
            return Err("contact timeout_ms must be greater than 0".to_string());
        }
        Ok(())
    }
}
