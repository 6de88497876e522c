use std::path::PathBuf;
use std::time::Instant;

use anyhow::Result;
use chrono::Utc;
use tracing::{info, warn};

use crate::config::Config;
use crate::engine::listing::{self, ListingEntry};
use crate::engine::summary::{self, ProgressSummary};
use crate::i18n::{Dictionary, Locale};
use crate::lesson::{LessonCatalog, StepWidget};
use crate::session::{LessonRunner, StepChange};
use crate::speech::{Narrator, SpeechRate};
use crate::store::{FontSize, JsonStore, Preferences, ProgressStore, SupportGate};
use crate::support::{self, EMBEDDED_SWISH_NUMBER};
use crate::ui::components::menu::Menu;
use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    LessonList,
    Lesson,
    LessonNotFound,
    Completion,
    Progress,
}

/// Funding prompt drawn over the current screen.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SupportOverlay {
    pub swish_number: String,
    pub qr_code_url: Option<String>,
    pub message: String,
    pub dont_show: bool,
}

pub struct App {
    pub screen: AppScreen,
    pub locale: Locale,
    pub theme: &'static Theme,
    pub config: Config,
    config_path: Option<PathBuf>,
    pub catalog: LessonCatalog,
    pub progress: ProgressStore,
    pub preferences: Preferences,
    pub support_gate: SupportGate,
    pub runner: Option<LessonRunner>,
    pub not_found_id: Option<String>,
    pub menu: Menu,
    pub lesson_list_selected: usize,
    pub support_overlay: Option<SupportOverlay>,
    pub confirm_reset: bool,
    pub speech_rate: SpeechRate,
    narrator: Box<dyn Narrator>,
    pub should_quit: bool,
}

impl App {
    /// `config_path` is where locale and speech-rate changes are saved;
    /// `None` keeps them in memory.
    pub fn new(
        config: Config,
        store: JsonStore,
        config_path: Option<PathBuf>,
        narrator: Box<dyn Narrator>,
    ) -> Result<Self> {
        let catalog = LessonCatalog::load_embedded()?;
        let theme: &'static Theme = Box::leak(Box::new(Theme::load_or_default(&config.theme)));

        Ok(Self {
            screen: AppScreen::Menu,
            locale: config.locale(),
            theme,
            speech_rate: config.speech_rate(),
            config,
            config_path,
            catalog,
            progress: ProgressStore::load(store.clone()),
            preferences: Preferences::load(store.clone()),
            support_gate: SupportGate::new(store),
            runner: None,
            not_found_id: None,
            menu: Menu::default(),
            lesson_list_selected: 0,
            support_overlay: None,
            confirm_reset: false,
            narrator,
            should_quit: false,
        })
    }

    pub fn dict(&self) -> Dictionary {
        Dictionary::new(self.locale)
    }

    pub fn set_theme(&mut self, name: &str) {
        if let Some(theme) = Theme::load(name) {
            self.theme = Box::leak(Box::new(theme));
        } else {
            warn!(theme = name, "unknown theme");
        }
    }

    pub fn go_to_menu(&mut self) {
        self.leave_lesson();
        self.screen = AppScreen::Menu;
    }

    pub fn go_to_lesson_list(&mut self) {
        self.leave_lesson();
        self.screen = AppScreen::LessonList;
    }

    pub fn go_to_progress(&mut self) {
        self.leave_lesson();
        self.confirm_reset = false;
        self.screen = AppScreen::Progress;
    }

    fn leave_lesson(&mut self) {
        self.narrator.stop();
        self.runner = None;
        self.not_found_id = None;
        self.support_overlay = None;
    }

    // --- Lesson list ---

    pub fn listing(&self) -> Vec<ListingEntry<'_>> {
        let groups = listing::group_by_category(self.catalog.lessons(self.locale), |id| {
            self.progress.is_completed(id)
        });
        listing::flatten(&groups)
    }

    pub fn lesson_list_next(&mut self) {
        let len = self.listing().len();
        if len > 0 {
            self.lesson_list_selected = (self.lesson_list_selected + 1) % len;
        }
    }

    pub fn lesson_list_prev(&mut self) {
        let len = self.listing().len();
        if len > 0 {
            self.lesson_list_selected = (self.lesson_list_selected + len - 1) % len;
        }
    }

    /// Locked lessons cannot be opened from the list.
    pub fn open_selected_lesson(&mut self) -> bool {
        let target = self
            .listing()
            .get(self.lesson_list_selected)
            .filter(|entry| entry.status.can_open())
            .map(|entry| entry.lesson.id.clone());
        match target {
            Some(id) => {
                self.open_lesson(&id);
                true
            }
            None => false,
        }
    }

    // --- Lesson ---

    /// Opens a lesson by id without checking prerequisites.
    pub fn open_lesson(&mut self, id: &str) {
        self.leave_lesson();
        match LessonRunner::open(&self.catalog, self.locale, id) {
            Ok(runner) => {
                self.runner = Some(runner);
                self.screen = AppScreen::Lesson;
                if id == self.config.support_config_lesson {
                    self.offer_configured_support();
                }
                self.on_step_entered();
            }
            Err(e) => {
                info!("{e}");
                self.not_found_id = Some(id.to_string());
                self.screen = AppScreen::LessonNotFound;
            }
        }
    }

    fn offer_configured_support(&mut self) {
        let Some(config) = support::load_config(&self.config.support_config_source) else {
            return;
        };
        let frequency = self.config.support_popup_frequency_days;
        if self.support_gate.try_show(frequency, Utc::now()) {
            info!("showing support popup");
            self.support_overlay = Some(SupportOverlay {
                message: config.message_for(self.locale).to_string(),
                swish_number: config.swish_number,
                qr_code_url: config.qr_code_url,
                dont_show: self.support_gate.dont_show(),
            });
        }
    }

    fn on_step_entered(&mut self) {
        let embedded_popup = self
            .runner
            .as_ref()
            .and_then(|r| r.current_step())
            .is_some_and(|s| s.widget == Some(StepWidget::SupportPopup));
        if embedded_popup && self.support_gate.try_show(0, Utc::now()) {
            self.support_overlay = Some(SupportOverlay {
                swish_number: EMBEDDED_SWISH_NUMBER.to_string(),
                qr_code_url: None,
                message: self.dict().get("support_popup.embedded_message"),
                dont_show: false,
            });
        }
    }

    fn apply_step_change(&mut self, change: StepChange) {
        match change {
            StepChange::Moved(_) => {
                self.narrator.stop();
                self.on_step_entered();
            }
            StepChange::Completed => {
                self.narrator.stop();
                self.support_overlay = None;
                self.screen = AppScreen::Completion;
            }
            StepChange::Unchanged => {}
        }
    }

    pub fn lesson_next(&mut self) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };
        let change = runner.next(&mut self.progress);
        self.apply_step_change(change);
    }

    pub fn lesson_prev(&mut self) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };
        let change = runner.retreat();
        self.apply_step_change(change);
    }

    pub fn toggle_hint(&mut self) {
        if let Some(runner) = self.runner.as_mut() {
            runner.toggle_hint();
        }
    }

    /// Lets a solved exercise finish its step.
    pub fn tick(&mut self, now: Instant) {
        let Some(runner) = self.runner.as_mut() else {
            return;
        };
        let change = runner.poll(now, &mut self.progress);
        self.apply_step_change(change);
    }

    // --- Support popup ---

    pub fn toggle_support_dont_show(&mut self) {
        if let Some(overlay) = self.support_overlay.as_mut() {
            overlay.dont_show = !overlay.dont_show;
            self.support_gate.set_dont_show(overlay.dont_show);
        }
    }

    pub fn close_support_overlay(&mut self) {
        self.support_overlay = None;
    }

    // --- Narration ---

    pub fn toggle_narration(&mut self) {
        if self.narrator.is_speaking() {
            self.narrator.stop();
            return;
        }
        let dict = self.dict();
        let Some(text) = self
            .runner
            .as_ref()
            .and_then(|r| r.current_step())
            .map(|s| s.content.resolve(&dict))
        else {
            return;
        };
        if let Err(e) = self.narrator.speak(&text, self.locale, self.speech_rate) {
            warn!("narration failed: {e:#}");
        }
    }

    pub fn is_narrating(&mut self) -> bool {
        self.narrator.is_speaking()
    }

    pub fn cycle_speech_rate(&mut self) {
        self.speech_rate = self.speech_rate.next();
        self.config.speech_rate = self.speech_rate.multiplier();
        self.save_config();
    }

    // --- Preferences ---

    pub fn cycle_locale(&mut self) {
        self.locale = self.locale.next();
        self.config.locale = self.locale.code().to_string();
        self.lesson_list_selected = 0;
        info!(locale = %self.locale, "locale changed");
        self.save_config();
    }

    pub fn increase_font_size(&mut self) {
        self.preferences.increase_font_size();
    }

    pub fn decrease_font_size(&mut self) {
        self.preferences.decrease_font_size();
    }

    /// Steps up one size and wraps from the largest back to the smallest.
    pub fn cycle_font_size(&mut self) {
        let size = self.preferences.font_size();
        let next = if size.larger() == size {
            FontSize::Small
        } else {
            size.larger()
        };
        self.preferences.set_font_size(next);
    }

    fn save_config(&self) {
        if let Some(path) = &self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!("failed to save config: {e:#}");
            }
        }
    }

    // --- Progress ---

    pub fn summary(&self) -> ProgressSummary<'_> {
        summary::summarize(self.catalog.lessons(self.locale), self.progress.record())
    }

    pub fn request_reset(&mut self) {
        self.confirm_reset = true;
    }

    pub fn cancel_reset(&mut self) {
        self.confirm_reset = false;
    }

    pub fn confirm_reset(&mut self) {
        self.progress.reset();
        self.confirm_reset = false;
    }
}
