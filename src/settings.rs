use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::api::DEFAULT_API_BASE;
use crate::deeplink::{DEFAULT_SHARE_BASE, DEFAULT_SHARE_PREFIX};
use crate::feed::list::DEFAULT_PAGE_SIZE;

const APP_SENTINEL: &str = "vidfeed";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(rename = "_app")]
    pub app: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_base_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub share_prefix: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub mpv_path: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub video: Option<bool>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            app: APP_SENTINEL.to_string(),
            theme: None,
            api_base_url: None,
            page_size: None,
            share_base_url: None,
            share_prefix: None,
            mpv_path: None,
            video: None,
        }
    }
}

impl Settings {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings from {}", path.display()))?;

        let settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse settings from {}", path.display()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let content =
            toml::to_string_pretty(self).with_context(|| "Failed to serialize settings")?;

        fs::write(path, content)
            .with_context(|| format!("Failed to write settings to {}", path.display()))?;

        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if self.app != APP_SENTINEL {
            bail!(
                "Settings file appears to belong to another application (expected _app = '{}', found '{}')",
                APP_SENTINEL,
                self.app
            );
        }
        if self.page_size == Some(0) {
            bail!("page_size must be at least 1");
        }
        Ok(())
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url.as_deref().unwrap_or(DEFAULT_API_BASE)
    }

    pub fn page_size(&self) -> u32 {
        self.page_size.unwrap_or(DEFAULT_PAGE_SIZE)
    }

    pub fn share_base_url(&self) -> &str {
        self.share_base_url.as_deref().unwrap_or(DEFAULT_SHARE_BASE)
    }

    pub fn share_prefix(&self) -> &str {
        self.share_prefix.as_deref().unwrap_or(DEFAULT_SHARE_PREFIX)
    }

    pub fn mpv_path(&self) -> &str {
        self.mpv_path.as_deref().unwrap_or("mpv")
    }

    pub fn video_enabled(&self) -> bool {
        self.video.unwrap_or(true)
    }
}

pub fn config_dir(custom: Option<&PathBuf>) -> Option<PathBuf> {
    custom
        .cloned()
        .or_else(|| dirs::home_dir().map(|p| p.join(".config").join("vidfeed")))
}

pub fn settings_path(config_dir: &Path) -> PathBuf {
    config_dir.join("settings.toml")
}

pub fn session_path(config_dir: &Path) -> PathBuf {
    config_dir.join("session.toml")
}
