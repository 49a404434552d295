//! Logging, importing and reporting against an on-disk journal.

#![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

use chrono::NaiveDate;
use versetrack::bible::Canon;
use versetrack::journal::{entry_ranges, filter_since, JsonStore, LogStore, NewLogEntry};
use versetrack::services::{import, recommendations, stats};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

fn log(store: &mut JsonStore<'_>, d: u32, reference: &str) {
    let range = Canon::standard().parse_reference(reference).unwrap().unwrap();
    store.create(NewLogEntry::new(day(d), range)).unwrap();
}

#[test]
fn overlapping_entries_count_once() {
    let canon = Canon::standard();
    let mut store = JsonStore::in_memory(canon);
    log(&mut store, 1, "Genesis 1:1-10");
    log(&mut store, 2, "Genesis 1:8-20");

    let entries = store.entries().unwrap();
    let ranges = entry_ranges(canon, &entries);
    assert_eq!(canon.count_unique_verses(&ranges), 20);

    let counts = stats::daily_verse_counts(canon, &entries);
    assert_eq!(counts.values().sum::<u32>(), 23);

    let next = recommendations::continue_reading(canon, &entries, &ranges).unwrap();
    assert_eq!(next.detail, "Genesis 1:21-31");
}

#[test]
fn import_then_reopen() {
    let canon = Canon::standard();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("journal.json");

    {
        let mut store = JsonStore::open(&path, canon).unwrap();
        log(&mut store, 1, "Genesis 1");
        let text = "2024-01-01,Genesis 1\n2024-01-02,Genesis 2\n2024-01-02,Genesis 2\n2024-01-03,Genesis 3:1-12\nbad line\n";
        let rows = import::classify(canon, text, &store.entries().unwrap());
        let summary = import::summarize(&rows);
        assert_eq!(summary, import::ImportSummary { valid: 2, duplicate: 2, invalid: 1 });
        assert_eq!(store.bulk_create(import::importable_entries(&rows)).unwrap(), 2);
    }

    let store = JsonStore::open(&path, canon).unwrap();
    let entries = store.entries().unwrap();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].date, day(3));

    let stats = stats::reading_stats(&stats::daily_verse_counts(canon, &entries), day(4));
    assert_eq!(stats.longest_streak, 3);
    assert_eq!(stats.current_streak, 0);
    assert_eq!(stats.total_days, 4);
}

#[test]
fn look_back_narrows_progress() {
    let canon = Canon::standard();
    let mut store = JsonStore::in_memory(canon);
    log(&mut store, 1, "Matthew");
    log(&mut store, 5, "Mark 1");

    let mut settings = store.settings().unwrap();
    settings.look_back_date = Some(day(3));
    store.update_settings(settings).unwrap();

    let look_back = store.settings().unwrap().look_back_date;
    let recent = filter_since(&store.entries().unwrap(), look_back);
    let ranges = entry_ranges(canon, &recent);
    let progress = stats::overall_progress(canon, &ranges);
    assert_eq!(progress.read, canon.chapter_verse_count(41, 1));

    let everything = entry_ranges(canon, &store.entries().unwrap());
    assert_eq!(
        stats::overall_progress(canon, &everything).read,
        canon.book_verse_count(40) + canon.chapter_verse_count(41, 1)
    );
}

#[test]
fn suggestions_respect_look_back() {
    let canon = Canon::standard();
    let mut store = JsonStore::in_memory(canon);
    log(&mut store, 1, "Genesis 1");
    log(&mut store, 5, "Exodus 1");

    let mut settings = store.settings().unwrap();
    settings.look_back_date = Some(day(3));
    store.update_settings(settings).unwrap();

    let current = store.current_entries().unwrap();
    assert_eq!(current.len(), 1);
    let ranges = entry_ranges(canon, &current);
    assert_eq!(ranges, vec![canon.chapter_range(2, 1)]);

    let next = recommendations::continue_reading(canon, &current, &ranges).unwrap();
    assert_eq!(next.detail, "Exodus 2");
    let gaps = recommendations::unread_gaps(canon, &ranges, 3);
    assert!(gaps.iter().any(|g| g.start == canon.first_verse()));
}
