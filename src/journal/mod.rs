//! Reading journal: log entries, user settings and the store behind them.
//!
//! The verse engine never sees this module's types directly. Callers turn
//! entries into [`VerseRange`]s with [`entry_ranges`] and work from there.

mod json_store;

pub use json_store::JsonStore;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::bible::{Canon, VerseId, VerseRange};
use crate::constants::goal::DEFAULT_DAILY_VERSE_GOAL;
use crate::error::Result;
use crate::services::links::{BibleApp, BibleVersion};
use crate::types::EntryId;

/// One logged reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogEntry {
    /// Store-assigned identifier.
    pub id: EntryId,
    /// Calendar day the reading happened.
    pub date: NaiveDate,
    /// First verse read.
    pub start: VerseId,
    /// Last verse read.
    pub end: VerseId,
    /// When the entry was first stored.
    pub created_at: DateTime<Utc>,
    /// When the entry was last changed.
    pub updated_at: DateTime<Utc>,
}

impl LogEntry {
    /// The verses this entry covers.
    pub const fn range(&self) -> VerseRange {
        VerseRange::new(self.start, self.end)
    }
}

/// Fields the caller supplies when logging a reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewLogEntry {
    /// Calendar day.
    pub date: NaiveDate,
    /// First verse read.
    pub start: VerseId,
    /// Last verse read.
    pub end: VerseId,
}

impl NewLogEntry {
    /// Entry for `range` on `date`.
    pub const fn new(date: NaiveDate, range: VerseRange) -> Self {
        Self { date, start: range.start, end: range.end }
    }

    /// The verses this entry covers.
    pub const fn range(&self) -> VerseRange {
        VerseRange::new(self.start, self.end)
    }
}

/// Partial change to an existing entry. `None` leaves a field alone.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogEntryUpdate {
    /// New calendar day.
    pub date: Option<NaiveDate>,
    /// New first verse.
    pub start: Option<VerseId>,
    /// New last verse.
    pub end: Option<VerseId>,
}

/// Per-user preferences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Verses per day the user aims for.
    pub daily_verse_goal: u32,
    /// Entries before this date are left out of "current" statistics.
    pub look_back_date: Option<NaiveDate>,
    /// App that reading links open in.
    pub bible_app: BibleApp,
    /// Translation that reading links ask for.
    pub bible_version: BibleVersion,
}

impl Default for UserSettings {
    fn default() -> Self {
        Self {
            daily_verse_goal: DEFAULT_DAILY_VERSE_GOAL,
            look_back_date: None,
            bible_app: BibleApp::default(),
            bible_version: BibleVersion::default(),
        }
    }
}

/// Persistence for log entries and settings.
///
/// Implementations validate ranges against their canon on every write, so
/// nothing a store returns needs checking again.
pub trait LogStore {
    /// Every entry, newest date first, newest creation first within a date.
    fn entries(&self) -> Result<Vec<LogEntry>>;

    /// Entries logged for one day, newest creation first.
    fn entries_on(&self, date: NaiveDate) -> Result<Vec<LogEntry>> {
        Ok(self.entries()?.into_iter().filter(|e| e.date == date).collect())
    }

    /// Entries that count toward current progress: those on or after the
    /// look-back date, or all of them when none is set.
    fn current_entries(&self) -> Result<Vec<LogEntry>> {
        let look_back = self.settings()?.look_back_date;
        Ok(filter_since(&self.entries()?, look_back))
    }

    /// Store a new entry.
    fn create(&mut self, entry: NewLogEntry) -> Result<LogEntry>;

    /// Change an existing entry.
    fn update(&mut self, id: &EntryId, changes: LogEntryUpdate) -> Result<LogEntry>;

    /// Remove an entry.
    fn delete(&mut self, id: &EntryId) -> Result<()>;

    /// Store several entries at once. Either all are stored or none.
    fn bulk_create(&mut self, entries: Vec<NewLogEntry>) -> Result<usize>;

    /// Current settings, defaults if none were saved.
    fn settings(&self) -> Result<UserSettings>;

    /// Replace the settings.
    fn update_settings(&mut self, settings: UserSettings) -> Result<UserSettings>;
}

/// Entries dated on or after `look_back`, or all of them.
pub fn filter_since(entries: &[LogEntry], look_back: Option<NaiveDate>) -> Vec<LogEntry> {
    entries
        .iter()
        .filter(|e| look_back.map_or(true, |since| e.date >= since))
        .cloned()
        .collect()
}

/// Ranges of the entries that are valid in `canon`. Invalid ones are dropped.
pub fn entry_ranges(canon: &Canon, entries: &[LogEntry]) -> Vec<VerseRange> {
    entries
        .iter()
        .filter_map(|entry| {
            let range = entry.range();
            if canon.validate(&range) {
                Some(range)
            } else {
                tracing::warn!("Skipping entry {} with invalid range {}-{}", entry.id, entry.start, entry.end);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn entry(date: NaiveDate, start: VerseId, end: VerseId) -> LogEntry {
        let now = Utc::now();
        LogEntry {
            id: EntryId::generate(),
            date,
            start,
            end,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn filters_by_look_back_date() {
        let entries = vec![
            entry(day(1), VerseId::new(1, 1, 1), VerseId::new(1, 1, 5)),
            entry(day(3), VerseId::new(1, 2, 1), VerseId::new(1, 2, 5)),
        ];
        assert_eq!(filter_since(&entries, None).len(), 2);
        assert_eq!(filter_since(&entries, Some(day(2))).len(), 1);
        assert_eq!(filter_since(&entries, Some(day(3))).len(), 1);
        assert!(filter_since(&entries, Some(day(4))).is_empty());
    }

    #[test]
    fn drops_invalid_ranges() {
        let entries = vec![
            entry(day(1), VerseId::new(1, 1, 1), VerseId::new(1, 1, 5)),
            entry(day(1), VerseId::new(1, 1, 1), VerseId::new(1, 1, 99)),
            entry(day(1), VerseId::from_raw(0), VerseId::from_raw(0)),
        ];
        let ranges = entry_ranges(Canon::standard(), &entries);
        assert_eq!(ranges, vec![VerseRange::new(VerseId::new(1, 1, 1), VerseId::new(1, 1, 5))]);
    }

    #[test]
    fn settings_default_to_the_yearly_goal() {
        let settings = UserSettings::default();
        assert_eq!(settings.daily_verse_goal, 86);
        assert!(settings.look_back_date.is_none());

        let parsed: UserSettings = serde_json::from_str(r#"{"daily_verse_goal": 40}"#).unwrap();
        assert_eq!(parsed.daily_verse_goal, 40);
        assert_eq!(parsed.bible_app, BibleApp::default());
    }
}
