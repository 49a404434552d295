//! Multi-range operations: sorting, consolidation, unique counting,
//! scoping to a book or chapter, and gap ranges between two verses.

use std::cmp::Ordering;

use super::{Canon, VerseId, VerseRange};
use crate::error::{Error, Result};

/// Reading-order comparison on start verse only.
pub fn compare_ranges(a: &VerseRange, b: &VerseRange) -> Ordering {
    a.start.cmp(&b.start)
}

fn sorted(ranges: &[VerseRange]) -> Vec<VerseRange> {
    let mut sorted = ranges.to_vec();
    sorted.sort_by(compare_ranges);
    sorted
}

impl Canon {
    /// Minimal set of disjoint, non-touching ranges covering the same verses,
    /// ordered by book then start.
    ///
    /// Ranges merge when they overlap or when one starts on the verse right
    /// after the other ends. Merging never crosses a book boundary.
    pub fn consolidate(&self, ranges: &[VerseRange]) -> Vec<VerseRange> {
        let mut merged: Vec<VerseRange> = Vec::new();
        for range in sorted(ranges) {
            if let Some(holding) = merged.last_mut() {
                let same_book = holding.start.book() == range.start.book();
                // None means the holding range already runs to the end of its book.
                let touches = self.next(holding.end, false).map_or(true, |after| range.start <= after);
                if same_book && touches {
                    holding.end = holding.end.max(range.end);
                    continue;
                }
            }
            merged.push(range);
        }
        merged
    }

    /// Distinct verses covered by `ranges`, however they overlap.
    pub fn count_unique_verses(&self, ranges: &[VerseRange]) -> u32 {
        let mut total = 0;
        let mut current: Option<VerseRange> = None;
        for range in sorted(ranges) {
            match current.as_mut() {
                Some(held) if range.start <= held.end => held.end = held.end.max(range.end),
                Some(held) => {
                    total += self.range_verse_count(held);
                    current = Some(range);
                }
                None => current = Some(range),
            }
        }
        total + current.map_or(0, |held| self.range_verse_count(&held))
    }

    /// Distinct verses read in one book.
    pub fn count_unique_book_verses(&self, book: u32, ranges: &[VerseRange]) -> u32 {
        self.count_unique_verses(&filter_by_book(book, ranges))
    }

    /// Distinct verses read in one chapter.
    pub fn count_unique_chapter_verses(&self, book: u32, chapter: u32, ranges: &[VerseRange]) -> u32 {
        let cropped: Vec<VerseRange> = filter_by_book_chapter(book, chapter, ranges)
            .iter()
            .map(|range| self.crop_to_book_chapter(book, chapter, range))
            .collect();
        self.count_unique_verses(&cropped)
    }

    /// Clamp `range` so it starts and ends inside `book` `chapter`.
    pub fn crop_to_book_chapter(&self, book: u32, chapter: u32, range: &VerseRange) -> VerseRange {
        let start = if range.start.chapter() < chapter {
            self.first_of_chapter(book, chapter)
        } else {
            range.start
        };
        let end = if range.end.chapter() > chapter {
            self.last_of_chapter(book, chapter)
        } else {
            range.end
        };
        VerseRange::new(start, end)
    }

    /// Ranges covering every verse strictly between `a` and `b`, split at
    /// book boundaries. Empty when the two are adjacent.
    ///
    /// `a` must come before `b`.
    pub fn gaps_between(&self, a: VerseId, b: VerseId) -> Result<Vec<VerseRange>> {
        if a >= b {
            return Err(Error::OutOfOrder { start: a, end: b });
        }
        let (Some(first), Some(last)) = (self.next(a, true), self.previous(b, true)) else {
            return Ok(Vec::new());
        };
        if first > last {
            return Ok(Vec::new());
        }
        Ok(self.split_by_book(first, last))
    }

    /// Split `[first, last]` into one range per book it touches.
    pub(super) fn split_by_book(&self, first: VerseId, last: VerseId) -> Vec<VerseRange> {
        let (start_book, end_book) = (first.book(), last.book());
        if start_book == end_book {
            return vec![VerseRange::new(first, last)];
        }
        let mut gaps = Vec::with_capacity((end_book - start_book + 1) as usize);
        gaps.push(VerseRange::new(first, self.last_of_book(start_book)));
        gaps.extend((start_book + 1..end_book).map(|book| self.book_range(book)));
        gaps.push(VerseRange::new(self.first_of_book(end_book), last));
        gaps
    }
}

/// Ranges that start in `book`.
pub fn filter_by_book(book: u32, ranges: &[VerseRange]) -> Vec<VerseRange> {
    ranges.iter().filter(|r| r.start.book() == book).copied().collect()
}

/// Ranges in `book` whose chapter span includes `chapter`.
pub fn filter_by_book_chapter(book: u32, chapter: u32, ranges: &[VerseRange]) -> Vec<VerseRange> {
    ranges
        .iter()
        .filter(|r| r.start.book() == book && r.start.chapter() <= chapter && r.end.chapter() >= chapter)
        .copied()
        .collect()
}
