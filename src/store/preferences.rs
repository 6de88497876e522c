use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use crate::store::json_store::JsonStore;
use crate::store::schema::FONT_SIZE_KEY;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FontSize {
    Small,
    #[default]
    Medium,
    Large,
    XLarge,
}

pub const ALL_FONT_SIZES: [FontSize; 4] = [
    FontSize::Small,
    FontSize::Medium,
    FontSize::Large,
    FontSize::XLarge,
];

impl FontSize {
    pub fn label_key(self) -> &'static str {
        match self {
            FontSize::Small => "accessibility.small",
            FontSize::Medium => "accessibility.medium",
            FontSize::Large => "accessibility.large",
            FontSize::XLarge => "accessibility.x_large",
        }
    }

    fn index(self) -> usize {
        ALL_FONT_SIZES.iter().position(|s| *s == self).unwrap_or(1)
    }

    pub fn larger(self) -> Self {
        ALL_FONT_SIZES[(self.index() + 1).min(ALL_FONT_SIZES.len() - 1)]
    }

    pub fn smaller(self) -> Self {
        ALL_FONT_SIZES[self.index().saturating_sub(1)]
    }

    /// Blank lines inserted between paragraphs of step content.
    pub fn line_spacing(self) -> u16 {
        match self {
            FontSize::Small | FontSize::Medium => 0,
            FontSize::Large | FontSize::XLarge => 1,
        }
    }

    /// Horizontal padding around lesson content, in cells.
    pub fn margin(self) -> u16 {
        match self {
            FontSize::Small => 1,
            FontSize::Medium => 2,
            FontSize::Large => 4,
            FontSize::XLarge => 6,
        }
    }
}

/// Display preferences persisted beside progress.
#[derive(Debug)]
pub struct Preferences {
    store: JsonStore,
    font_size: FontSize,
}

impl Preferences {
    pub fn load(store: JsonStore) -> Self {
        let font_size = match store.read::<FontSize>(FONT_SIZE_KEY) {
            Ok(size) => size.unwrap_or_default(),
            Err(e) => {
                warn!("ignoring unreadable font size: {e:#}");
                FontSize::default()
            }
        };
        Self { store, font_size }
    }

    pub fn font_size(&self) -> FontSize {
        self.font_size
    }

    pub fn set_font_size(&mut self, size: FontSize) {
        if size == self.font_size {
            return;
        }
        self.font_size = size;
        if let Err(e) = self.store.write(FONT_SIZE_KEY, &size) {
            error!("failed to save font size: {e:#}");
        }
    }

    pub fn increase_font_size(&mut self) {
        self.set_font_size(self.font_size.larger());
    }

    pub fn decrease_font_size(&mut self) {
        self.set_font_size(self.font_size.smaller());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn make_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn larger_and_smaller_clamp() {
        assert_eq!(FontSize::XLarge.larger(), FontSize::XLarge);
        assert_eq!(FontSize::Small.smaller(), FontSize::Small);
        assert_eq!(FontSize::Medium.larger(), FontSize::Large);
        assert_eq!(FontSize::Large.smaller(), FontSize::Medium);
    }

    #[test]
    fn persisted_as_plain_string() {
        let (dir, store) = make_store();
        let mut prefs = Preferences::load(store.clone());
        assert_eq!(prefs.font_size(), FontSize::Medium);
        prefs.increase_font_size();
        prefs.increase_font_size();

        let raw = fs::read_to_string(dir.path().join("font_size.json")).unwrap();
        assert_eq!(raw, "\"x-large\"");
        assert_eq!(Preferences::load(store).font_size(), FontSize::XLarge);
    }

    #[test]
    fn unknown_value_falls_back_to_medium() {
        let (dir, store) = make_store();
        fs::write(dir.path().join("font_size.json"), "\"huge\"").unwrap();
        assert_eq!(Preferences::load(store).font_size(), FontSize::Medium);
    }

    #[test]
    fn unchanged_size_is_not_written() {
        let (_dir, store) = make_store();
        let mut prefs = Preferences::load(store.clone());
        prefs.decrease_font_size();
        prefs.decrease_font_size();
        assert_eq!(prefs.font_size(), FontSize::Small);
        assert!(store.contains(FONT_SIZE_KEY));

        let (_dir2, fresh) = make_store();
        let mut prefs = Preferences::load(fresh.clone());
        prefs.set_font_size(FontSize::Medium);
        assert!(!fresh.contains(FONT_SIZE_KEY));
    }
}
