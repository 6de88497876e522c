use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use tracing::debug;

use crate::i18n::Locale;

/// Payment handle shown by the lesson-embedded support step.
pub const EMBEDDED_SWISH_NUMBER: &str = "070-481 03 77";

/// Support popup content fetched for one lesson, e.g.
/// `{"swishNumber": "...", "qrCodeUrl": "...", "messages": {"sv": "...", "en": "..."}}`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportConfig {
    pub swish_number: String,
    #[serde(default)]
    pub qr_code_url: Option<String>,
    #[serde(default)]
    pub messages: HashMap<String, String>,
}

impl SupportConfig {
    /// Message for `locale`, falling back to Swedish, then to nothing.
    pub fn message_for(&self, locale: Locale) -> &str {
        self.messages
            .get(locale.code())
            .or_else(|| self.messages.get(Locale::Sv.code()))
            .map(String::as_str)
            .unwrap_or("")
    }
}

/// Reads the config from an `http(s)://` URL or a local path. Any failure
/// means there is no popup.
pub fn load_config(source: &str) -> Option<SupportConfig> {
    let body = if source.starts_with("http://") || source.starts_with("https://") {
        fetch_url(source)
    } else {
        read_file(Path::new(source))
    };
    let Some(body) = body else {
        debug!(source, "support popup config unavailable");
        return None;
    };
    match serde_json::from_str(&body) {
        Ok(config) => Some(config),
        Err(e) => {
            debug!(source, "support popup config invalid: {e}");
            None
        }
    }
}

fn read_file(path: &Path) -> Option<String> {
    std::fs::read_to_string(path).ok()
}

#[cfg(feature = "network")]
fn fetch_url(url: &str) -> Option<String> {
    let client = reqwest::blocking::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .build()
        .ok()?;
    let response = client.get(url).send().ok()?;
    if response.status().is_success() {
        response.text().ok()
    } else {
        None
    }
}

#[cfg(not(feature = "network"))]
fn fetch_url(_url: &str) -> Option<String> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const SAMPLE: &str = r#"{
        "swishNumber": "123 456 78 90",
        "qrCodeUrl": "https://example.org/qr.png",
        "messages": { "sv": "Stöd oss!", "en": "Support us!" }
    }"#;

    #[test]
    fn loads_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("support-popup-config.json");
        fs::write(&path, SAMPLE).unwrap();

        let config = load_config(path.to_str().unwrap()).unwrap();
        assert_eq!(config.swish_number, "123 456 78 90");
        assert_eq!(config.qr_code_url.as_deref(), Some("https://example.org/qr.png"));
    }

    #[test]
    fn message_falls_back_to_swedish() {
        let config: SupportConfig = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(config.message_for(Locale::En), "Support us!");
        assert_eq!(config.message_for(Locale::Ti), "Stöd oss!");

        let bare: SupportConfig = serde_json::from_str(r#"{"swishNumber": "1"}"#).unwrap();
        assert_eq!(bare.message_for(Locale::Fr), "");
    }

    #[test]
    fn missing_or_invalid_config_is_none() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(dir.path().join("absent.json").to_str().unwrap()).is_none());

        let bad = dir.path().join("bad.json");
        fs::write(&bad, r#"{"messages": {}}"#).unwrap();
        assert!(load_config(bad.to_str().unwrap()).is_none());
    }
}
