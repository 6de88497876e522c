use chrono::{DateTime, Duration, Utc};
use tracing::{debug, error, warn};

use crate::store::json_store::JsonStore;
use crate::store::schema::{SUPPORT_DONT_SHOW_KEY, SUPPORT_LAST_SHOWN_KEY};

/// Display gate for the support popup: a permanent opt-out flag plus a
/// minimum re-display interval measured from the last time it was shown.
#[derive(Clone, Debug)]
pub struct SupportGate {
    store: JsonStore,
}

impl SupportGate {
    pub fn new(store: JsonStore) -> Self {
        Self { store }
    }

    pub fn dont_show(&self) -> bool {
        match self.store.read::<bool>(SUPPORT_DONT_SHOW_KEY) {
            Ok(flag) => flag.unwrap_or(false),
            Err(e) => {
                warn!("ignoring unreadable support popup flag: {e:#}");
                false
            }
        }
    }

    pub fn set_dont_show(&self, value: bool) {
        if let Err(e) = self.store.write(SUPPORT_DONT_SHOW_KEY, &value) {
            error!("failed to save support popup flag: {e:#}");
        }
    }

    pub fn last_shown(&self) -> Option<DateTime<Utc>> {
        match self.store.read::<DateTime<Utc>>(SUPPORT_LAST_SHOWN_KEY) {
            Ok(ts) => ts,
            Err(e) => {
                warn!("ignoring unreadable support popup timestamp: {e:#}");
                None
            }
        }
    }

    /// Pure check. An interval of zero days leaves only the opt-out flag.
    /// A timestamp in the future counts as missing.
    pub fn is_due(&self, frequency_days: u32, now: DateTime<Utc>) -> bool {
        if self.dont_show() {
            return false;
        }
        if frequency_days == 0 {
            return true;
        }
        match self.last_shown() {
            None => true,
            Some(last) if last > now => true,
            Some(last) => now - last > Duration::days(i64::from(frequency_days)),
        }
    }

    /// Checks the gate and, when it opens, records `now` as last shown.
    pub fn try_show(&self, frequency_days: u32, now: DateTime<Utc>) -> bool {
        let due = self.is_due(frequency_days, now);
        debug!(frequency_days, due, "support popup gate");
        if due {
            if let Err(e) = self.store.write(SUPPORT_LAST_SHOWN_KEY, &now) {
                error!("failed to save support popup timestamp: {e:#}");
            }
        }
        due
    }
}
