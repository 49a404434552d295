//! Verse addressing: packing (book, chapter, verse) into one ordered integer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Added to every packed id so the smallest real verse is far from zero.
const VERSE_ID_OFFSET: u32 = 100_000_000;
const BOOK_FACTOR: u32 = 1_000_000;
const CHAPTER_FACTOR: u32 = 1_000;

/// A (book, chapter, verse) triple. Components are 1-based; 0 means unset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct VerseRef {
    /// Book order in the canon.
    pub book: u32,
    /// Chapter number.
    pub chapter: u32,
    /// Verse number.
    pub verse: u32,
}

/// Single integer address of a verse. Integer order is reading order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VerseId(u32);

impl VerseId {
    /// Pack a triple. No validation: zero components make placeholder ids.
    pub const fn new(book: u32, chapter: u32, verse: u32) -> Self {
        Self(VERSE_ID_OFFSET + book * BOOK_FACTOR + chapter * CHAPTER_FACTOR + verse)
    }

    /// Wrap a raw persisted value.
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// The raw integer, as persisted.
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Unpack into its triple. Values below the offset decode to all zeros.
    pub const fn decode(self) -> VerseRef {
        let rest = self.0.saturating_sub(VERSE_ID_OFFSET);
        VerseRef {
            book: rest / BOOK_FACTOR,
            chapter: (rest % BOOK_FACTOR) / CHAPTER_FACTOR,
            verse: rest % CHAPTER_FACTOR,
        }
    }

    /// Book component.
    pub const fn book(self) -> u32 {
        self.decode().book
    }

    /// Chapter component.
    pub const fn chapter(self) -> u32 {
        self.decode().chapter
    }

    /// Verse component.
    pub const fn verse(self) -> u32 {
        self.decode().verse
    }
}

impl From<VerseRef> for VerseId {
    fn from(r: VerseRef) -> Self {
        Self::new(r.book, r.chapter, r.verse)
    }
}

impl fmt::Display for VerseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Closed interval of verses, inclusive on both ends.
///
/// Construction is unchecked; `Canon::validate` decides whether a range is
/// usable. Logged ranges never span books.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VerseRange {
    /// First verse.
    pub start: VerseId,
    /// Last verse.
    pub end: VerseId,
}

impl VerseRange {
    /// Create a range without validating it.
    pub const fn new(start: VerseId, end: VerseId) -> Self {
        Self { start, end }
    }

    /// Whether `id` lies inside the range.
    pub fn contains(&self, id: VerseId) -> bool {
        self.start <= id && id <= self.end
    }
}

/// A maximal read or unread run inside a queried window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Segment {
    /// First verse of the run.
    pub start: VerseId,
    /// Last verse of the run.
    pub end: VerseId,
    /// Whether the run has been read.
    pub is_read: bool,
    /// Number of verses in the run.
    pub verse_count: u32,
}
