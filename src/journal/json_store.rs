//! JSON document store for the journal.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::cmp::Reverse;
use std::path::{Path, PathBuf};

use super::{LogEntry, LogEntryUpdate, LogStore, NewLogEntry, UserSettings};
use crate::bible::{Canon, VerseRange};
use crate::error::{Error, Result};
use crate::types::EntryId;

/// On-disk layout.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Journal {
    #[serde(default)]
    entries: Vec<LogEntry>,
    #[serde(default)]
    settings: UserSettings,
}

/// Journal kept as one pretty-printed JSON file, rewritten after every change.
#[derive(Debug)]
pub struct JsonStore<'c> {
    canon: &'c Canon,
    path: Option<PathBuf>,
    journal: Journal,
}

impl<'c> JsonStore<'c> {
    /// Open the journal at `path`, starting empty if the file does not exist yet.
    pub fn open(path: impl Into<PathBuf>, canon: &'c Canon) -> Result<Self> {
        let path = path.into();
        let journal = if path.exists() {
            let data = fs_err::read_to_string(&path).map_err(|e| Error::io(e, path.clone()))?;
            let journal: Journal = serde_json::from_str(&data)?;
            tracing::info!("Loaded {} entries from {}", journal.entries.len(), path.display());
            journal
        } else {
            tracing::info!("No journal at {}, starting a new one", path.display());
            Journal::default()
        };
        Ok(Self { canon, path: Some(path), journal })
    }

    /// A store that never touches the disk.
    pub fn in_memory(canon: &'c Canon) -> Self {
        Self { canon, path: None, journal: Journal::default() }
    }

    /// Backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    fn check(&self, range: &VerseRange) -> Result<()> {
        if self.canon.validate(range) {
            Ok(())
        } else {
            Err(Error::invalid_range(format!("{}-{}", range.start, range.end)))
        }
    }

    /// Write `journal` out and only then make it the current state.
    fn commit(&mut self, journal: Journal) -> Result<()> {
        self.save(&journal)?;
        self.journal = journal;
        Ok(())
    }

    fn save(&self, journal: &Journal) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs_err::create_dir_all(dir).map_err(|e| Error::io(e, dir.to_path_buf()))?;
        }
        let json = serde_json::to_string_pretty(journal)
            .map_err(|e| Error::Msg(format!("Failed to serialize journal: {e}")))?;
        fs_err::write(path, json).map_err(|e| Error::io(e, path.clone()))?;
        tracing::debug!("Saved {} entries to {}", journal.entries.len(), path.display());
        Ok(())
    }

    fn stamp(entry: NewLogEntry) -> LogEntry {
        let now = Utc::now();
        LogEntry {
            id: EntryId::generate(),
            date: entry.date,
            start: entry.start,
            end: entry.end,
            created_at: now,
            updated_at: now,
        }
    }

    fn position(&self, id: &EntryId) -> Result<usize> {
        self.journal
            .entries
            .iter()
            .position(|e| &e.id == id)
            .ok_or_else(|| Error::Store(format!("no entry with id {id}")))
    }
}

impl LogStore for JsonStore<'_> {
    fn entries(&self) -> Result<Vec<LogEntry>> {
        // later insertions first so same-timestamp entries still read newest first
        let mut entries: Vec<LogEntry> = self.journal.entries.iter().rev().cloned().collect();
        entries.sort_by_key(|e| (Reverse(e.date), Reverse(e.created_at)));
        Ok(entries)
    }

    fn create(&mut self, entry: NewLogEntry) -> Result<LogEntry> {
        self.check(&entry.range())?;
        let stored = Self::stamp(entry);
        let mut journal = self.journal.clone();
        journal.entries.push(stored.clone());
        self.commit(journal)?;
        tracing::info!("Logged {} for {}", self.canon.format_range(&stored.range()), stored.date);
        Ok(stored)
    }

    fn update(&mut self, id: &EntryId, changes: LogEntryUpdate) -> Result<LogEntry> {
        let index = self.position(id)?;
        let mut updated = self.journal.entries[index].clone();
        if let Some(date) = changes.date {
            updated.date = date;
        }
        if let Some(start) = changes.start {
            updated.start = start;
        }
        if let Some(end) = changes.end {
            updated.end = end;
        }
        self.check(&updated.range())?;
        updated.updated_at = Utc::now();
        let mut journal = self.journal.clone();
        journal.entries[index] = updated.clone();
        self.commit(journal)?;
        Ok(updated)
    }

    fn delete(&mut self, id: &EntryId) -> Result<()> {
        let index = self.position(id)?;
        let mut journal = self.journal.clone();
        journal.entries.remove(index);
        self.commit(journal)?;
        tracing::info!("Deleted entry {id}");
        Ok(())
    }

    fn bulk_create(&mut self, entries: Vec<NewLogEntry>) -> Result<usize> {
        for entry in &entries {
            self.check(&entry.range())?;
        }
        let count = entries.len();
        let mut journal = self.journal.clone();
        journal.entries.extend(entries.into_iter().map(Self::stamp));
        self.commit(journal)?;
        tracing::info!("Imported {count} entries");
        Ok(count)
    }

    fn settings(&self) -> Result<UserSettings> {
        Ok(self.journal.settings.clone())
    }

    fn update_settings(&mut self, settings: UserSettings) -> Result<UserSettings> {
        let journal = Journal { entries: self.journal.entries.clone(), settings: settings.clone() };
        self.commit(journal)?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::bible::VerseId;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn new_entry(d: u32, c: u32, v1: u32, v2: u32) -> NewLogEntry {
        NewLogEntry {
            date: day(d),
            start: VerseId::new(1, c, v1),
            end: VerseId::new(1, c, v2),
        }
    }

    #[test]
    fn orders_newest_first() {
        let mut store = JsonStore::in_memory(Canon::standard());
        let first = store.create(new_entry(1, 1, 1, 5)).unwrap();
        let later_same_day = store.create(new_entry(1, 1, 6, 9)).unwrap();
        let newest = store.create(new_entry(2, 2, 1, 3)).unwrap();
        let ids: Vec<EntryId> = store.entries().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![newest.id, later_same_day.id, first.id]);
        assert_eq!(store.entries_on(day(1)).unwrap().len(), 2);
    }

    #[test]
    fn rejects_invalid_ranges() {
        let mut store = JsonStore::in_memory(Canon::standard());
        assert!(matches!(store.create(new_entry(1, 1, 1, 40)), Err(Error::InvalidRange { .. })));
        assert!(matches!(store.create(new_entry(1, 1, 5, 1)), Err(Error::InvalidRange { .. })));

        let stored = store.create(new_entry(1, 1, 1, 5)).unwrap();
        let bad = LogEntryUpdate { end: Some(VerseId::new(2, 1, 1)), ..Default::default() };
        assert!(store.update(&stored.id, bad).is_err());
        assert_eq!(store.entries().unwrap()[0].end, VerseId::new(1, 1, 5));

        let batch = vec![new_entry(2, 1, 1, 2), new_entry(2, 1, 1, 99)];
        assert!(store.bulk_create(batch).is_err());
        assert_eq!(store.entries().unwrap().len(), 1);
    }

    #[test]
    fn update_and_delete() {
        let mut store = JsonStore::in_memory(Canon::standard());
        let stored = store.create(new_entry(1, 1, 1, 5)).unwrap();
        let changes = LogEntryUpdate { date: Some(day(9)), end: Some(VerseId::new(1, 1, 10)), ..Default::default() };
        let updated = store.update(&stored.id, changes).unwrap();
        assert_eq!(updated.date, day(9));
        assert_eq!(updated.end, VerseId::new(1, 1, 10));
        assert_eq!(updated.created_at, stored.created_at);

        store.delete(&stored.id).unwrap();
        assert!(store.entries().unwrap().is_empty());
        assert!(matches!(store.delete(&stored.id), Err(Error::Store(_))));
    }

    #[test]
    fn persists_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("journal.json");
        {
            let mut store = JsonStore::open(&path, Canon::standard()).unwrap();
            assert_eq!(store.bulk_create(vec![new_entry(1, 1, 1, 5), new_entry(2, 1, 6, 10)]).unwrap(), 2);
            let mut settings = store.settings().unwrap();
            settings.daily_verse_goal = 50;
            store.update_settings(settings).unwrap();
        }
        let reopened = JsonStore::open(&path, Canon::standard()).unwrap();
        assert_eq!(reopened.entries().unwrap().len(), 2);
        assert_eq!(reopened.settings().unwrap().daily_verse_goal, 50);
        assert_eq!(reopened.path(), Some(path.as_path()));
    }

    #[test]
    fn failed_save_leaves_store_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();
        let mut store = JsonStore::open(blocker.join("journal.json"), Canon::standard()).unwrap();

        assert!(matches!(store.create(new_entry(1, 1, 1, 5)), Err(Error::Io { .. })));
        let batch = vec![new_entry(1, 1, 1, 2), new_entry(2, 1, 3, 4), new_entry(3, 1, 5, 6)];
        assert!(store.bulk_create(batch).is_err());
        assert!(store.entries().unwrap().is_empty());

        let mut settings = store.settings().unwrap();
        settings.daily_verse_goal = 10;
        assert!(store.update_settings(settings).is_err());
        assert_eq!(store.settings().unwrap().daily_verse_goal, UserSettings::default().daily_verse_goal);
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("journal.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(JsonStore::open(&path, Canon::standard()), Err(Error::Json(_))));
    }
}
