use std::fs;

use ratatui::style::Color;
use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Embed)]
#[folder = "assets/themes/"]
struct ThemeAssets;

pub const DEFAULT_THEME: &str = "tillsammans-light";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Theme {
    pub name: String,
    pub colors: ThemeColors,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThemeColors {
    pub bg: String,
    pub fg: String,
    pub muted: String,
    pub accent: String,
    pub accent_dim: String,
    pub border: String,
    pub border_focused: String,
    pub header_bg: String,
    pub header_fg: String,
    pub bar_filled: String,
    pub bar_empty: String,
    pub selection_bg: String,
    pub selection_fg: String,
    pub hint: String,
    pub error: String,
    pub warning: String,
    pub success: String,
}

impl Theme {
    /// User themes in `<config_dir>/tillsammans/themes/` shadow the bundled ones.
    pub fn load(name: &str) -> Option<Self> {
        let filename = format!("{name}.toml");

        if let Some(config_dir) = dirs::config_dir() {
            let user_theme_path = config_dir.join("tillsammans").join("themes").join(&filename);
            if let Ok(content) = fs::read_to_string(&user_theme_path) {
                match toml::from_str::<Theme>(&content) {
                    Ok(theme) => return Some(theme),
                    Err(e) => warn!("ignoring theme {}: {e}", user_theme_path.display()),
                }
            }
        }

        let file = ThemeAssets::get(&filename)?;
        let content = std::str::from_utf8(file.data.as_ref()).ok()?;
        toml::from_str::<Theme>(content).ok()
    }

    pub fn load_or_default(name: &str) -> Self {
        Self::load(name).unwrap_or_else(|| {
            warn!(theme = name, "unknown theme, using default");
            Self::default()
        })
    }

    pub fn available_themes() -> Vec<String> {
        let mut names: Vec<String> = ThemeAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::load(DEFAULT_THEME).unwrap_or_else(|| Self {
            name: "default".to_string(),
            colors: ThemeColors::default(),
        })
    }
}

impl Default for ThemeColors {
    fn default() -> Self {
        Self {
            bg: "#fbfaf7".to_string(),
            fg: "#1f2328".to_string(),
            muted: "#57606a".to_string(),
            accent: "#6f2da8".to_string(),
            accent_dim: "#e9ddf5".to_string(),
            border: "#8c959f".to_string(),
            border_focused: "#6f2da8".to_string(),
            header_bg: "#6f2da8".to_string(),
            header_fg: "#ffffff".to_string(),
            bar_filled: "#6f2da8".to_string(),
            bar_empty: "#d0d7de".to_string(),
            selection_bg: "#6f2da8".to_string(),
            selection_fg: "#ffffff".to_string(),
            hint: "#9a6700".to_string(),
            error: "#cf222e".to_string(),
            warning: "#9a6700".to_string(),
            success: "#1a7f37".to_string(),
        }
    }
}

impl ThemeColors {
    pub fn parse_color(hex: &str) -> Color {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Color::Rgb(r, g, b);
            }
        }
        Color::White
    }

    pub fn bg(&self) -> Color { Self::parse_color(&self.bg) }
    pub fn fg(&self) -> Color { Self::parse_color(&self.fg) }
    pub fn muted(&self) -> Color { Self::parse_color(&self.muted) }
    pub fn accent(&self) -> Color { Self::parse_color(&self.accent) }
    pub fn accent_dim(&self) -> Color { Self::parse_color(&self.accent_dim) }
    pub fn border(&self) -> Color { Self::parse_color(&self.border) }
    pub fn border_focused(&self) -> Color { Self::parse_color(&self.border_focused) }
    pub fn header_bg(&self) -> Color { Self::parse_color(&self.header_bg) }
    pub fn header_fg(&self) -> Color { Self::parse_color(&self.header_fg) }
    pub fn bar_filled(&self) -> Color { Self::parse_color(&self.bar_filled) }
    pub fn bar_empty(&self) -> Color { Self::parse_color(&self.bar_empty) }
    pub fn selection_bg(&self) -> Color { Self::parse_color(&self.selection_bg) }
    pub fn selection_fg(&self) -> Color { Self::parse_color(&self.selection_fg) }
    pub fn hint(&self) -> Color { Self::parse_color(&self.hint) }
    pub fn error(&self) -> Color { Self::parse_color(&self.error) }
    pub fn warning(&self) -> Color { Self::parse_color(&self.warning) }
    pub fn success(&self) -> Color { Self::parse_color(&self.success) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_themes_parse() {
        let names = Theme::available_themes();
        assert!(names.contains(&DEFAULT_THEME.to_string()));
        for name in names {
            let theme = Theme::load(&name).unwrap_or_else(|| panic!("theme {name} failed to load"));
            assert_eq!(theme.name, name);
        }
    }

    #[test]
    fn parse_color_handles_bad_input() {
        assert_eq!(ThemeColors::parse_color("#6f2da8"), Color::Rgb(0x6f, 0x2d, 0xa8));
        assert_eq!(ThemeColors::parse_color("purple"), Color::White);
    }

    #[test]
    fn unknown_theme_falls_back() {
        assert!(Theme::load("no-such-theme").is_none());
        let theme = Theme::load_or_default("no-such-theme");
        assert_eq!(theme.name, DEFAULT_THEME);
    }
}
