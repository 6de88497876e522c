use std::process::{Child, Command, Stdio};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::i18n::Locale;

/// Words per minute at 1x, the espeak-ng default.
const BASE_WPM: f32 = 175.0;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SpeechRate {
    Slow,
    #[default]
    Normal,
    Fast,
    Faster,
}

pub const ALL_SPEECH_RATES: [SpeechRate; 4] = [
    SpeechRate::Slow,
    SpeechRate::Normal,
    SpeechRate::Fast,
    SpeechRate::Faster,
];

impl SpeechRate {
    pub fn multiplier(self) -> f32 {
        match self {
            SpeechRate::Slow => 0.75,
            SpeechRate::Normal => 1.0,
            SpeechRate::Fast => 1.25,
            SpeechRate::Faster => 1.5,
        }
    }

    pub fn from_multiplier(value: f32) -> Option<Self> {
        ALL_SPEECH_RATES
            .into_iter()
            .find(|r| (r.multiplier() - value).abs() < 0.01)
    }

    pub fn next(self) -> Self {
        let idx = ALL_SPEECH_RATES.iter().position(|r| *r == self).unwrap_or(1);
        ALL_SPEECH_RATES[(idx + 1) % ALL_SPEECH_RATES.len()]
    }

    pub fn words_per_minute(self) -> u32 {
        (BASE_WPM * self.multiplier()).round() as u32
    }

    pub fn label(self) -> String {
        format!("{}x", self.multiplier())
    }
}

/// Text-to-speech output for step content.
pub trait Narrator {
    /// Starts reading `text`, interrupting anything already playing.
    fn speak(&mut self, text: &str, locale: Locale, rate: SpeechRate) -> Result<()>;
    fn stop(&mut self);
    fn is_speaking(&mut self) -> bool;
}

/// Runs an espeak-compatible program: `<program> -v <tag> -s <wpm> <text>`.
#[derive(Debug)]
pub struct CommandNarrator {
    program: String,
    child: Option<Child>,
}

impl CommandNarrator {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            child: None,
        }
    }

    pub fn args(text: &str, locale: Locale, rate: SpeechRate) -> Vec<String> {
        vec![
            "-v".to_string(),
            locale.speech_tag().to_string(),
            "-s".to_string(),
            rate.words_per_minute().to_string(),
            text.to_string(),
        ]
    }
}

impl Narrator for CommandNarrator {
    fn speak(&mut self, text: &str, locale: Locale, rate: SpeechRate) -> Result<()> {
        self.stop();
        let child = Command::new(&self.program)
            .args(Self::args(text, locale, rate))
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .with_context(|| format!("starting {}", self.program))?;
        debug!(program = %self.program, %locale, rate = rate.multiplier(), "narration started");
        self.child = Some(child);
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                debug!("narration already finished: {e}");
            }
            if let Err(e) = child.wait() {
                warn!("failed to reap narration process: {e}");
            }
        }
    }

    fn is_speaking(&mut self) -> bool {
        let finished = match self.child.as_mut() {
            None => return false,
            Some(child) => !matches!(child.try_wait(), Ok(None)),
        };
        if finished {
            self.child = None;
        }
        !finished
    }
}

impl Drop for CommandNarrator {
    fn drop(&mut self) {
        self.stop();
    }
}
