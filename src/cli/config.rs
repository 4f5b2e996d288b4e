use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5001";

const CONFIG_FILE: &str = "cli.json";

/// Persisted client state: which server to talk to and the current session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    pub server_url: String,
    pub username: Option<String>,
    pub token: Option<String>,
    pub logged_in_at: Option<DateTime<Utc>>,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            username: None,
            token: None,
            logged_in_at: None,
        }
    }
}

impl CliConfig {
    pub fn set_session(&mut self, username: &str, token: String) {
        self.username = Some(username.to_string());
        self.token = Some(token);
        self.logged_in_at = Some(Utc::now());
    }

    pub fn clear_session(&mut self) {
        self.username = None;
        self.token = None;
        self.logged_in_at = None;
    }

    pub fn require_token(&self) -> anyhow::Result<&str> {
        self.token
            .as_deref()
            .ok_or_else(|| anyhow::anyhow!("Not logged in. Run `planner auth login <username>` first"))
    }
}

pub fn get_config_dir() -> anyhow::Result<PathBuf> {
    let config_dir = if let Ok(custom_dir) = std::env::var("PLANNER_CLI_CONFIG_DIR") {
        PathBuf::from(custom_dir)
    } else {
        let home = std::env::var("HOME")
            .map_err(|_| anyhow::anyhow!("HOME environment variable not set"))?;
        PathBuf::from(home).join(".config").join("study-planner")
    };

    if !config_dir.exists() {
        fs::create_dir_all(&config_dir)?;
    }

    Ok(config_dir)
}

pub fn load_config() -> anyhow::Result<CliConfig> {
    load_config_from(&get_config_dir()?)
}

pub fn save_config(config: &CliConfig) -> anyhow::Result<()> {
    save_config_to(&get_config_dir()?, config)
}

pub fn load_config_from(dir: &Path) -> anyhow::Result<CliConfig> {
    let config_file = dir.join(CONFIG_FILE);

    if !config_file.exists() {
        return Ok(CliConfig::default());
    }

    let content = fs::read_to_string(config_file)?;
    let config: CliConfig = serde_json::from_str(&content)?;
    Ok(config)
}

pub fn save_config_to(dir: &Path, config: &CliConfig) -> anyhow::Result<()> {
    let content = serde_json::to_string_pretty(config)?;
    fs::write(dir.join(CONFIG_FILE), content)?;
    Ok(())
}
