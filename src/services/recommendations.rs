//! What to read next, derived from the current log.

use serde::Serialize;

use crate::bible::{Canon, VerseId, VerseRange};
use crate::constants::recommend::POPULAR_STARTING_POINTS;
use crate::journal::LogEntry;

/// A suggested reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Recommendation {
    /// Headline shown to the reader.
    pub title: String,
    /// Supporting line, usually the formatted range.
    pub detail: String,
    /// First verse of the suggestion.
    pub start: VerseId,
    /// Last verse of the suggestion.
    pub end: VerseId,
}

/// The rest of the chapter after the most recent reading, skipping anything
/// already read. `None` with no entries or once everything after is read.
pub fn continue_reading(canon: &Canon, entries: &[LogEntry], ranges: &[VerseRange]) -> Option<Recommendation> {
    let latest = entries
        .iter()
        .filter(|e| canon.validate(&e.range()))
        .max_by_key(|e| (e.date, e.created_at))?;

    let mut next = canon.next(latest.end, true)?;
    for range in canon.consolidate(ranges) {
        if range.contains(next) {
            next = canon.next(range.end, true)?;
        }
    }

    let end = canon.last_of_chapter(next.book(), next.chapter());
    Some(Recommendation {
        title: "Pick up where you left off".to_string(),
        detail: canon.format_range(&VerseRange::new(next, end)),
        start: next,
        end,
    })
}

/// The `limit` largest unread stretches, each suggesting its first chapter.
pub fn unread_gaps(canon: &Canon, ranges: &[VerseRange], limit: usize) -> Vec<Recommendation> {
    let mut unread: Vec<_> = canon.segment_bible(ranges).into_iter().filter(|s| !s.is_read).collect();
    unread.sort_by(|a, b| b.verse_count.cmp(&a.verse_count));
    unread.truncate(limit);

    unread
        .into_iter()
        .map(|segment| {
            let (start, end) = (segment.start, segment.end);
            let title = if start.book() != end.book() {
                format!("{} through {} is unread", canon.book_name(start.book()), canon.book_name(end.book()))
            } else if segment.verse_count == canon.book_verse_count(start.book()) {
                format!("{} is unread", canon.book_name(start.book()))
            } else {
                format!("{} is unread", canon.format_range(&VerseRange::new(start, end)))
            };
            let suggestion_end = canon.last_of_chapter(start.book(), start.chapter()).min(end);
            Recommendation {
                title,
                detail: canon.format_range(&VerseRange::new(start, suggestion_end)),
                start,
                end: suggestion_end,
            }
        })
        .collect()
}

/// Curated landmarks whose chapter is not fully read yet.
pub fn popular_starting_points(canon: &Canon, ranges: &[VerseRange]) -> Vec<Recommendation> {
    POPULAR_STARTING_POINTS
        .iter()
        .filter(|(book, chapter, ..)| {
            let total = canon.chapter_verse_count(*book, *chapter);
            total > 0 && canon.count_unique_chapter_verses(*book, *chapter, ranges) < total
        })
        .map(|&(book, chapter, title, detail)| {
            let range = canon.chapter_range(book, chapter);
            Recommendation {
                title: title.to_string(),
                detail: detail.to_string(),
                start: range.start,
                end: range.end,
            }
        })
        .collect()
}
