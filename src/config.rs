use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::session::descriptor::ReviewPreset;
use crate::session::presenter::PresenterOptions;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_sound_enabled")]
    pub sound_enabled: bool,
    #[serde(default = "default_review_preset")]
    pub default_review_preset: String,
    #[serde(default = "default_review_shortcut_on_success")]
    pub review_shortcut_on_success: bool,
    #[serde(default = "default_confetti_pieces")]
    pub confetti_pieces: usize,
}

fn default_theme() -> String {
    "meadow".to_string()
}
fn default_sound_enabled() -> bool {
    true
}
fn default_review_preset() -> String {
    ReviewPreset::default().token()
}
fn default_review_shortcut_on_success() -> bool {
    false
}
fn default_confetti_pieces() -> usize {
    40
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            sound_enabled: default_sound_enabled(),
            default_review_preset: default_review_preset(),
            review_shortcut_on_success: default_review_shortcut_on_success(),
            confetti_pieces: default_confetti_pieces(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };
        config.normalize_review_preset();
        Ok(config)
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lingr")
            .join("config.toml")
    }

    pub fn default_log_path() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("lingr")
            .join("lingr.log")
    }

    /// Reset an unparseable `default_review_preset` to the built-in default.
    pub fn normalize_review_preset(&mut self) {
        match self.default_review_preset.parse::<ReviewPreset>() {
            Ok(preset) => self.default_review_preset = preset.token(),
            Err(err) => {
                log::warn!("config: {err}, resetting to {}", default_review_preset());
                self.default_review_preset = default_review_preset();
            }
        }
    }

    pub fn review_preset(&self) -> ReviewPreset {
        self.default_review_preset.parse().unwrap_or_default()
    }

    pub fn presenter_options(&self) -> PresenterOptions {
        PresenterOptions {
            review_shortcut_on_success: self.review_shortcut_on_success,
        }
    }
}
