use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// UI languages. Swedish is the default and the fallback for unknown codes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Sv,
    En,
    Ar,
    Ti,
    Fr,
}

pub const ALL_LOCALES: [Locale; 5] = [Locale::Sv, Locale::En, Locale::Ar, Locale::Ti, Locale::Fr];

impl Locale {
    pub fn code(self) -> &'static str {
        match self {
            Locale::Sv => "sv",
            Locale::En => "en",
            Locale::Ar => "ar",
            Locale::Ti => "ti",
            Locale::Fr => "fr",
        }
    }

    /// Accepts bare codes and region-tagged forms (`sv-SE`, `en_US`).
    pub fn from_code(code: &str) -> Option<Self> {
        let primary = code
            .trim()
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_ascii_lowercase();
        ALL_LOCALES.into_iter().find(|l| l.code() == primary)
    }

    pub fn from_code_or_default(code: &str) -> Self {
        Self::from_code(code).unwrap_or_default()
    }

    pub fn native_name(self) -> &'static str {
        match self {
            Locale::Sv => "Svenska",
            Locale::En => "English",
            Locale::Ar => "العربية",
            Locale::Ti => "ትግርኛ",
            Locale::Fr => "Français",
        }
    }

    pub fn is_rtl(self) -> bool {
        matches!(self, Locale::Ar)
    }

    /// BCP-47 tag handed to the speech synthesizer.
    pub fn speech_tag(self) -> &'static str {
        match self {
            Locale::Sv => "sv-SE",
            Locale::En => "en-US",
            Locale::Ar => "ar-SA",
            Locale::Ti => "ti-ET",
            Locale::Fr => "fr-FR",
        }
    }

    pub fn next(self) -> Self {
        let idx = ALL_LOCALES.iter().position(|l| *l == self).unwrap_or(0);
        ALL_LOCALES[(idx + 1) % ALL_LOCALES.len()]
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| anyhow::anyhow!("unsupported locale: {s}"))
    }
}

/// Read-only view of one locale's UI strings.
///
/// Keys are dotted paths into `locales/<code>.yml`, e.g. `lesson.step_label`.
/// Missing keys fall back to the Swedish table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dictionary {
    locale: Locale,
}

impl Dictionary {
    pub fn new(locale: Locale) -> Self {
        Self { locale }
    }

    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn get(&self, key: &str) -> String {
        rust_i18n::t!(key, locale = self.locale.code()).into_owned()
    }

    /// Looks up `key` and substitutes each `%{name}` placeholder.
    pub fn format(&self, key: &str, args: &[(&str, &str)]) -> String {
        let mut text = self.get(key);
        for (name, value) in args {
            text = text.replace(&format!("%{{{name}}}"), value);
        }
        text
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key) != key
    }
}
