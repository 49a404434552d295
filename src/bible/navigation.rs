//! Single-verse and single-range primitives: existence, counting, stepping
//! and book/chapter boundaries.

use super::{Canon, VerseId, VerseRange};

impl Canon {
    /// Whether `id` names a real verse.
    pub fn exists(&self, id: VerseId) -> bool {
        let r = id.decode();
        r.verse >= 1 && r.verse <= self.chapter_verse_count(r.book, r.chapter)
    }

    /// Both ends exist, are ordered, and sit in the same book.
    pub fn validate(&self, range: &VerseRange) -> bool {
        self.exists(range.start)
            && self.exists(range.end)
            && range.start <= range.end
            && range.start.book() == range.end.book()
    }

    /// Verses in the closed interval `[start, end]`, which may cross books.
    ///
    /// Returns 0 for reversed input or endpoints outside the canon.
    pub fn count_verses(&self, start: VerseId, end: VerseId) -> u32 {
        if start > end {
            return 0;
        }
        let (s, e) = (start.decode(), end.decode());
        if self.book(s.book).is_none() || self.book(e.book).is_none() {
            return 0;
        }

        if s.book != e.book {
            let tail = self.count_verses(start, self.last_of_book(s.book));
            let middle: u32 = (s.book + 1..e.book).map(|b| self.book_verse_count(b)).sum();
            let head = self.count_verses(self.first_of_book(e.book), end);
            return tail + middle + head;
        }

        if s.chapter == e.chapter {
            return e.verse + 1 - s.verse;
        }

        (s.chapter..=e.chapter)
            .map(|chapter| {
                let count = self.chapter_verse_count(s.book, chapter);
                if chapter == s.chapter {
                    (count + 1).saturating_sub(s.verse)
                } else if chapter == e.chapter {
                    e.verse
                } else {
                    count
                }
            })
            .sum()
    }

    /// Verses in one range.
    pub fn range_verse_count(&self, range: &VerseRange) -> u32 {
        self.count_verses(range.start, range.end)
    }

    /// The verse after `id`. Stops at the end of the book unless
    /// `cross_books`, and always at the end of the canon.
    pub fn next(&self, id: VerseId, cross_books: bool) -> Option<VerseId> {
        let r = id.decode();
        self.book(r.book)?;
        if r.verse < self.chapter_verse_count(r.book, r.chapter) {
            Some(VerseId::new(r.book, r.chapter, r.verse + 1))
        } else if r.chapter < self.chapter_count(r.book) {
            Some(VerseId::new(r.book, r.chapter + 1, 1))
        } else if cross_books && r.book < self.book_count() {
            Some(self.first_of_book(r.book + 1))
        } else {
            None
        }
    }

    /// The verse before `id`. Stops at the start of the book unless
    /// `cross_books`, and always at the start of the canon.
    pub fn previous(&self, id: VerseId, cross_books: bool) -> Option<VerseId> {
        let r = id.decode();
        self.book(r.book)?;
        if r.verse > 1 {
            Some(VerseId::new(r.book, r.chapter, r.verse - 1))
        } else if r.chapter > 1 {
            Some(self.last_of_chapter(r.book, r.chapter - 1))
        } else if cross_books && r.book > 1 {
            Some(self.last_of_book(r.book - 1))
        } else {
            None
        }
    }

    /// First verse of `book`.
    #[allow(clippy::unused_self)]
    pub const fn first_of_book(&self, book: u32) -> VerseId {
        VerseId::new(book, 1, 1)
    }

    /// Last verse of `book`.
    pub fn last_of_book(&self, book: u32) -> VerseId {
        self.last_of_chapter(book, self.chapter_count(book))
    }

    /// First verse of `book` `chapter`.
    #[allow(clippy::unused_self)]
    pub const fn first_of_chapter(&self, book: u32, chapter: u32) -> VerseId {
        VerseId::new(book, chapter, 1)
    }

    /// Last verse of `book` `chapter`.
    pub fn last_of_chapter(&self, book: u32, chapter: u32) -> VerseId {
        VerseId::new(book, chapter, self.chapter_verse_count(book, chapter))
    }

    /// Whole-book range.
    pub fn book_range(&self, book: u32) -> VerseRange {
        VerseRange::new(self.first_of_book(book), self.last_of_book(book))
    }

    /// Whole-chapter range.
    pub fn chapter_range(&self, book: u32, chapter: u32) -> VerseRange {
        VerseRange::new(self.first_of_chapter(book, chapter), self.last_of_chapter(book, chapter))
    }

    /// First verse of the canon.
    pub const fn first_verse(&self) -> VerseId {
        self.first_of_book(1)
    }

    /// Last verse of the canon.
    pub fn last_verse(&self) -> VerseId {
        self.last_of_book(self.book_count())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canon() -> &'static Canon {
        Canon::standard()
    }

    #[test]
    fn existence() {
        assert!(canon().exists(VerseId::new(1, 1, 31)));
        assert!(!canon().exists(VerseId::new(1, 1, 32)));
        assert!(!canon().exists(VerseId::new(1, 1, 0)));
        assert!(!canon().exists(VerseId::new(1, 51, 1)));
        assert!(!canon().exists(VerseId::new(0, 1, 1)));
        assert!(!canon().exists(VerseId::new(67, 1, 1)));
        assert!(!canon().exists(VerseId::from_raw(0)));
    }

    #[test]
    fn validation() {
        let ok = VerseRange::new(VerseId::new(1, 1, 1), VerseId::new(1, 2, 5));
        let reversed = VerseRange::new(VerseId::new(1, 2, 5), VerseId::new(1, 1, 1));
        let cross_book = VerseRange::new(VerseId::new(1, 50, 1), VerseId::new(2, 1, 1));
        let missing = VerseRange::new(VerseId::new(1, 1, 1), VerseId::new(1, 1, 40));
        assert!(canon().validate(&ok));
        assert!(!canon().validate(&reversed));
        assert!(!canon().validate(&cross_book));
        assert!(!canon().validate(&missing));
    }

    #[test]
    fn counts_same_chapter() {
        assert_eq!(canon().count_verses(VerseId::new(1, 1, 1), VerseId::new(1, 1, 5)), 5);
        assert_eq!(canon().count_verses(VerseId::new(1, 1, 7), VerseId::new(1, 1, 7)), 1);
    }

    #[test]
    fn counts_across_chapters() {
        // Genesis 1:30 - 3:2 = 2 + 25 + 2
        assert_eq!(canon().count_verses(VerseId::new(1, 1, 30), VerseId::new(1, 3, 2)), 29);
    }

    #[test]
    fn counts_across_books() {
        // Genesis 50:26 - Leviticus 1:1 = 1 + 1213 + 1
        assert_eq!(canon().count_verses(VerseId::new(1, 50, 26), VerseId::new(3, 1, 1)), 1_215);
        assert_eq!(canon().count_verses(canon().first_verse(), canon().last_verse()), 31_102);
    }

    #[test]
    fn counts_nothing_for_bad_input() {
        assert_eq!(canon().count_verses(VerseId::new(1, 1, 5), VerseId::new(1, 1, 1)), 0);
        assert_eq!(canon().count_verses(VerseId::new(70, 1, 1), VerseId::new(70, 1, 5)), 0);
    }

    #[test]
    fn stepping_forward() {
        assert_eq!(canon().next(VerseId::new(1, 1, 1), false), Some(VerseId::new(1, 1, 2)));
        assert_eq!(canon().next(VerseId::new(1, 1, 31), false), Some(VerseId::new(1, 2, 1)));
        let end_of_genesis = canon().last_of_book(1);
        assert_eq!(end_of_genesis, VerseId::new(1, 50, 26));
        assert_eq!(canon().next(end_of_genesis, false), None);
        assert_eq!(canon().next(end_of_genesis, true), Some(VerseId::new(2, 1, 1)));
        assert_eq!(canon().next(canon().last_verse(), true), None);
    }

    #[test]
    fn stepping_backward() {
        assert_eq!(canon().previous(VerseId::new(1, 2, 1), false), Some(VerseId::new(1, 1, 31)));
        assert_eq!(canon().previous(VerseId::new(2, 1, 1), false), None);
        assert_eq!(canon().previous(VerseId::new(2, 1, 1), true), Some(VerseId::new(1, 50, 26)));
        assert_eq!(canon().previous(canon().first_verse(), true), None);
    }

    #[test]
    fn boundaries() {
        assert_eq!(canon().first_of_chapter(19, 23), VerseId::new(19, 23, 1));
        assert_eq!(canon().last_of_chapter(19, 23), VerseId::new(19, 23, 6));
        assert_eq!(canon().last_verse(), VerseId::new(66, 22, 21));
        assert_eq!(canon().range_verse_count(&canon().chapter_range(19, 119)), 176);
    }
}
