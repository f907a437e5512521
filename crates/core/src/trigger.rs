//! Wall-clock gate evaluated by the caller before merging a feed.

use chrono::{Datelike, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Restricts a feed update to a weekday and/or hour of day.
///
/// Unset fields match anything, so the default window always allows a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerWindow {
    #[serde(default)]
    pub weekday: Option<Weekday>,
    #[serde(default)]
    pub hour: Option<u32>,
}

impl TriggerWindow {
    pub fn at(weekday: Weekday, hour: u32) -> Self {
        Self { weekday: Some(weekday), hour: Some(hour) }
    }

    pub fn allows(&self, now: NaiveDateTime) -> bool {
        self.weekday.is_none_or(|w| now.weekday() == w) && self.hour.is_none_or(|h| now.hour() == h)
    }
}
