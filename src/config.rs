use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::i18n::Locale;
use crate::speech::SpeechRate;
use crate::ui::theme::DEFAULT_THEME;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_speech_rate")]
    pub speech_rate: f32,
    #[serde(default = "default_speech_command")]
    pub speech_command: String,
    #[serde(default = "default_support_popup_frequency_days")]
    pub support_popup_frequency_days: u32,
    #[serde(default = "default_support_config_source")]
    pub support_config_source: String,
    #[serde(default = "default_support_config_lesson")]
    pub support_config_lesson: String,
}

fn default_locale() -> String {
    Locale::default().code().to_string()
}
fn default_theme() -> String {
    DEFAULT_THEME.to_string()
}
fn default_speech_rate() -> f32 {
    1.0
}
fn default_speech_command() -> String {
    "espeak-ng".to_string()
}
fn default_support_popup_frequency_days() -> u32 {
    30
}
fn default_support_config_source() -> String {
    config_dir()
        .join("support-popup-config.json")
        .to_string_lossy()
        .to_string()
}
fn default_support_config_lesson() -> String {
    "bankid-intro".to_string()
}

fn config_dir() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tillsammans")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            theme: default_theme(),
            speech_rate: default_speech_rate(),
            speech_command: default_speech_command(),
            support_popup_frequency_days: default_support_popup_frequency_days(),
            support_config_source: default_support_config_source(),
            support_config_lesson: default_support_config_lesson(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = if path.exists() {
            let content = fs::read_to_string(path)?;
            toml::from_str::<Config>(&content)?
        } else {
            Config::default()
        };
        config.validate();
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn default_path() -> PathBuf {
        config_dir().join("config.toml")
    }

    /// Resets values outside their allowed set to defaults.
    pub fn validate(&mut self) {
        self.locale = Locale::from_code_or_default(&self.locale).code().to_string();
        if SpeechRate::from_multiplier(self.speech_rate).is_none() {
            self.speech_rate = default_speech_rate();
        }
        if self.speech_command.trim().is_empty() {
            self.speech_command = default_speech_command();
        }
        if self.support_config_lesson.trim().is_empty() {
            self.support_config_lesson = default_support_config_lesson();
        }
    }

    pub fn locale(&self) -> Locale {
        Locale::from_code_or_default(&self.locale)
    }

    pub fn speech_rate(&self) -> SpeechRate {
        SpeechRate::from_multiplier(self.speech_rate).unwrap_or_default()
    }
}
