//! Read/unread segmentation of a window of verses.

use super::ranges::{filter_by_book, filter_by_book_chapter};
use super::{Canon, Segment, VerseId, VerseRange};
use crate::error::{Error, Result};

impl Canon {
    fn make_segment(&self, start: VerseId, end: VerseId, is_read: bool) -> Segment {
        Segment {
            start,
            end,
            is_read,
            verse_count: self.count_verses(start, end),
        }
    }

    /// Ordered, gap-free read/unread partition of `[window_start, window_end]`.
    pub fn segment(
        &self,
        window_start: VerseId,
        window_end: VerseId,
        ranges: &[VerseRange],
    ) -> Result<Vec<Segment>> {
        if window_start > window_end {
            return Err(Error::OutOfOrder { start: window_start, end: window_end });
        }
        Ok(self.segment_window(window_start, window_end, ranges))
    }

    /// `segment` over a window already known to be ordered.
    fn segment_window(&self, window_start: VerseId, window_end: VerseId, ranges: &[VerseRange]) -> Vec<Segment> {
        let inside: Vec<VerseRange> = ranges
            .iter()
            .filter(|r| r.end >= window_start && r.start <= window_end)
            .copied()
            .collect();
        let read: Vec<VerseRange> = self
            .consolidate(&inside)
            .into_iter()
            .map(|r| VerseRange::new(r.start.max(window_start), r.end.min(window_end)))
            .collect();

        let (Some(first), Some(last)) = (read.first(), read.last()) else {
            return vec![self.make_segment(window_start, window_end, false)];
        };

        let mut segments = Vec::with_capacity(read.len() * 2 + 1);
        if first.start > window_start {
            if let Some(before) = self.previous(first.start, true) {
                segments.push(self.make_segment(window_start, before, false));
            }
        }
        let mut last_read: Option<VerseId> = None;
        for range in &read {
            if let Some(previous_end) = last_read {
                // consolidated ranges are ordered and disjoint, so this cannot fail
                let gaps = self.gaps_between(previous_end, range.start).unwrap_or_default();
                segments.extend(gaps.into_iter().map(|gap| self.make_segment(gap.start, gap.end, false)));
            }
            segments.push(self.make_segment(range.start, range.end, true));
            last_read = Some(range.end);
        }
        if last.end < window_end {
            if let Some(after) = self.next(last.end, true) {
                segments.push(self.make_segment(after, window_end, false));
            }
        }
        segments
    }

    /// Whole-canon segmentation, computed book by book.
    pub fn segment_bible(&self, ranges: &[VerseRange]) -> Vec<Segment> {
        let consolidated = self.consolidate(ranges);
        let mut rest = consolidated.as_slice();
        let mut segments = Vec::new();
        for book in 1..=self.book_count() {
            // ranges outside the canon sort before book 1 and are dropped here
            let stale = rest.iter().take_while(|r| r.start.book() < book).count();
            let (_, from_book) = rest.split_at(stale);
            let split = from_book.iter().position(|r| r.start.book() != book).unwrap_or(from_book.len());
            let (in_book, after) = from_book.split_at(split);
            rest = after;
            segments.extend(self.segment_window(self.first_of_book(book), self.last_of_book(book), in_book));
        }
        segments
    }

    /// Segmentation of one book. Empty for an unknown book.
    pub fn segment_book(&self, book: u32, ranges: &[VerseRange]) -> Vec<Segment> {
        if self.book(book).is_none() {
            return Vec::new();
        }
        self.segment_window(self.first_of_book(book), self.last_of_book(book), &filter_by_book(book, ranges))
    }

    /// Segmentation of one chapter. Empty for an unknown chapter.
    pub fn segment_book_chapter(&self, book: u32, chapter: u32, ranges: &[VerseRange]) -> Vec<Segment> {
        if self.chapter_verse_count(book, chapter) == 0 {
            return Vec::new();
        }
        let cropped: Vec<VerseRange> = filter_by_book_chapter(book, chapter, ranges)
            .iter()
            .map(|r| self.crop_to_book_chapter(book, chapter, r))
            .collect();
        self.segment_window(
            self.first_of_chapter(book, chapter),
            self.last_of_chapter(book, chapter),
            &cropped,
        )
    }
}
