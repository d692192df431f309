//! Plugin configuration.

use achievements::NotifyTiming;
use anyhow::Context;
use error::PluginError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// User-editable plugin settings.
///
/// Every field has a default, so a partial or missing config file still
/// yields a working setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PluginConfig {
    /// Key that opens the achievements menu.
    #[serde(default = "default_menu_key")]
    pub menu_key: String,
    /// Seconds an unlock toast stays on screen.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// Seconds of fade at each end of a toast's life.
    #[serde(default = "default_toast_fade")]
    pub toast_fade: f32,
    /// Minimum seconds between unlock chimes.
    #[serde(default = "default_sound_cooldown")]
    pub sound_cooldown: f32,
}

fn default_menu_key() -> String {
    "F5".to_string()
}

fn default_toast_duration() -> f32 {
    8.0
}

fn default_toast_fade() -> f32 {
    1.0
}

fn default_sound_cooldown() -> f32 {
    0.5
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            menu_key: default_menu_key(),
            toast_duration: default_toast_duration(),
            toast_fade: default_toast_fade(),
            sound_cooldown: default_sound_cooldown(),
        }
    }
}

impl PluginConfig {
    /// Loads the config file, falling back to defaults when it is missing
    /// or unreadable. A bad config never stops the plugin from loading.
    pub fn load(path: &Path) -> Self {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Self::default(),
            Err(err) => {
                warn!("failed to read config file {}: {err}", path.display());
                return Self::default();
            }
        };

        match toml::from_str(&content) {
            Ok(config) => config,
            Err(err) => {
                warn!("failed to parse config file {}: {err}", path.display());
                Self::default()
            }
        }
    }

    /// Writes the config, creating the parent directory if needed.
    pub fn save(&self, path: &Path) -> Result<(), PluginError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Notification timing derived from the toast settings.
    pub fn notify_timing(&self) -> NotifyTiming {
        NotifyTiming {
            duration: self.toast_duration,
            fade: self.toast_fade,
            sound_cooldown: self.sound_cooldown,
        }
    }
}
