//! Reference text like "Genesis 1:1-5" to and from verse ranges.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::{Canon, VerseId, VerseRange, MAX_COMPONENT};
use crate::error::{Error, Result};

/// Book name: optional leading number, then letters, spaces, apostrophes, hyphens.
const BOOK: &str = r"(?P<book>(?:[0-9]+\s*)?[\p{L}\p{M}][\p{L}\p{M}\p{N}\s'-]*?)\.?";
const DASH: &str = r"\s*[-–—]+\s*";

/// The reference shapes, most specific first. Order matters: each later
/// pattern would also accept a prefix of an earlier one's input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    /// `Book C:V-C:V`
    VerseSpan,
    /// `Book C:V-V`
    VerseRun,
    /// `Book C-C`
    ChapterSpan,
    /// `Book C:V`
    Verse,
    /// `Book C`
    Chapter,
    /// `Book`
    WholeBook,
}

const PRECEDENCE: [Shape; 6] = [
    Shape::VerseSpan,
    Shape::VerseRun,
    Shape::ChapterSpan,
    Shape::Verse,
    Shape::Chapter,
    Shape::WholeBook,
];

impl Shape {
    fn pattern(self) -> String {
        let tail = match self {
            Self::VerseSpan => format!(r"\s+(?P<c1>[0-9]+)\s*:\s*(?P<v1>[0-9]+){DASH}(?P<c2>[0-9]+)\s*:\s*(?P<v2>[0-9]+)"),
            Self::VerseRun => format!(r"\s+(?P<c1>[0-9]+)\s*:\s*(?P<v1>[0-9]+){DASH}(?P<v2>[0-9]+)"),
            Self::ChapterSpan => format!(r"\s+(?P<c1>[0-9]+){DASH}(?P<c2>[0-9]+)"),
            Self::Verse => r"\s+(?P<c1>[0-9]+)\s*:\s*(?P<v1>[0-9]+)".to_string(),
            Self::Chapter => r"\s+(?P<c1>[0-9]+)".to_string(),
            Self::WholeBook => String::new(),
        };
        format!(r"(?i)^\s*{BOOK}{tail}\s*$")
    }
}

/// Compiled matchers in precedence order.
#[allow(clippy::expect_used)]
static MATCHERS: LazyLock<Vec<(Shape, Regex)>> = LazyLock::new(|| {
    PRECEDENCE
        .iter()
        .map(|&shape| (shape, Regex::new(&shape.pattern()).expect("valid regex: reference shape")))
        .collect()
});

/// Structural result of matching, before the book is resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PartialReference<'a> {
    shape: Shape,
    book: &'a str,
    start_chapter: Option<u32>,
    start_verse: Option<u32>,
    end_chapter: Option<u32>,
    end_verse: Option<u32>,
}

/// A captured number; `Some(None)` when present but too wide to address.
fn number(caps: &Captures<'_>, name: &str) -> Option<Option<u32>> {
    caps.name(name)
        .map(|m| m.as_str().parse::<u32>().ok().filter(|n| *n <= MAX_COMPONENT))
}

fn match_structure(text: &str) -> Option<std::result::Result<PartialReference<'_>, ()>> {
    MATCHERS.iter().find_map(|(shape, regex)| {
        let caps = regex.captures(text)?;
        let book = caps.name("book")?.as_str().trim();
        let fields = ["c1", "v1", "c2", "v2"].map(|name| number(&caps, name));
        if fields.iter().any(|f| matches!(f, Some(None))) {
            return Some(Err(()));
        }
        let [start_chapter, start_verse, end_chapter, end_verse] = fields.map(Option::flatten);
        Some(Ok(PartialReference {
            shape: *shape,
            book,
            start_chapter,
            start_verse,
            end_chapter,
            end_verse,
        }))
    })
}

impl Canon {
    /// Parse a reference into a validated range.
    ///
    /// `Ok(None)` means the text has no recognisable reference shape.
    /// A recognisable shape naming an unknown book, or a range that does
    /// not exist, is an error.
    pub fn parse_reference(&self, text: &str) -> Result<Option<VerseRange>> {
        let Some(matched) = match_structure(text) else {
            return Ok(None);
        };
        let Ok(partial) = matched else {
            return Err(Error::invalid_range(text.trim()));
        };

        let book = self.book_index(partial.book).ok_or_else(|| Error::UnknownBook {
            name: partial.book.to_string(),
            suggestion: self.suggest_book(partial.book).map(str::to_string),
        })?;

        let (start, end) = self.resolve(book, &partial);
        let range = VerseRange::new(start, end);
        if !self.validate(&range) {
            return Err(Error::invalid_range(text.trim()));
        }
        Ok(Some(range))
    }

    fn resolve(&self, book: u32, p: &PartialReference<'_>) -> (VerseId, VerseId) {
        let c1 = p.start_chapter.unwrap_or(0);
        let v1 = p.start_verse.unwrap_or(0);
        match p.shape {
            Shape::VerseSpan => (
                VerseId::new(book, c1, v1),
                VerseId::new(book, p.end_chapter.unwrap_or(0), p.end_verse.unwrap_or(0)),
            ),
            Shape::VerseRun => (VerseId::new(book, c1, v1), VerseId::new(book, c1, p.end_verse.unwrap_or(0))),
            Shape::ChapterSpan => (
                self.first_of_chapter(book, c1),
                self.last_of_chapter(book, p.end_chapter.unwrap_or(0)),
            ),
            Shape::Verse => (VerseId::new(book, c1, v1), VerseId::new(book, c1, v1)),
            Shape::Chapter => (self.first_of_chapter(book, c1), self.last_of_chapter(book, c1)),
            Shape::WholeBook => (self.first_of_book(book), self.last_of_book(book)),
        }
    }

    /// Shortest readable form of a range: `Book`, `Book C`, `Book C-C`,
    /// `Book C:V`, `Book C:V-V` or `Book C:V-C:V`.
    ///
    /// A range whose start names no book formats as an empty string.
    pub fn format_range(&self, range: &VerseRange) -> String {
        let (start, end) = (range.start.decode(), range.end.decode());
        let name = self.book_name(start.book);
        if name.is_empty() {
            return String::new();
        }
        if start.chapter == 0 {
            return name.to_string();
        }

        let whole_book = start.chapter == 1
            && start.verse == 1
            && end.chapter == self.chapter_count(start.book)
            && end.verse == self.chapter_verse_count(start.book, end.chapter);
        if whole_book {
            return name.to_string();
        }

        let ends_chapter = end.verse == self.chapter_verse_count(start.book, end.chapter);
        if start.chapter == end.chapter {
            if start.verse == 1 && ends_chapter {
                format!("{name} {}", start.chapter)
            } else if start.verse == end.verse {
                format!("{name} {}:{}", start.chapter, start.verse)
            } else {
                format!("{name} {}:{}-{}", start.chapter, start.verse, end.verse)
            }
        } else if start.verse == 1 && ends_chapter {
            format!("{name} {}-{}", start.chapter, end.chapter)
        } else {
            format!("{name} {}:{}-{}:{}", start.chapter, start.verse, end.chapter, end.verse)
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn canon() -> &'static Canon {
        Canon::standard()
    }

    fn parse(text: &str) -> VerseRange {
        canon().parse_reference(text).unwrap().unwrap()
    }

    fn range(b: u32, c1: u32, v1: u32, c2: u32, v2: u32) -> VerseRange {
        VerseRange::new(VerseId::new(b, c1, v1), VerseId::new(b, c2, v2))
    }

    #[test]
    fn shapes_in_precedence_order() {
        assert_eq!(parse("Genesis 1:30-2:3"), range(1, 1, 30, 2, 3));
        assert_eq!(parse("Genesis 1:1-5"), range(1, 1, 1, 1, 5));
        assert_eq!(parse("Genesis 1-3"), range(1, 1, 1, 3, 24));
        assert_eq!(parse("Genesis 1:1"), range(1, 1, 1, 1, 1));
        assert_eq!(parse("Genesis 1"), range(1, 1, 1, 1, 31));
        assert_eq!(parse("Genesis"), range(1, 1, 1, 50, 26));
    }

    #[test]
    fn numbered_and_multi_word_books() {
        assert_eq!(parse("1 John 3:16"), range(62, 3, 16, 3, 16));
        assert_eq!(parse("1 john 3"), range(62, 3, 1, 3, 24));
        assert_eq!(parse("Song of Solomon 2:1-4"), range(22, 2, 1, 2, 4));
        assert_eq!(parse("Psalm 23"), range(19, 23, 1, 23, 6));
        assert_eq!(parse("2 Kings"), range(12, 1, 1, 25, 30));
    }

    #[test]
    fn tolerant_spacing_dashes_and_abbreviations() {
        assert_eq!(parse("  gen. 1 : 1 – 5 "), range(1, 1, 1, 1, 5));
        assert_eq!(parse("Rom 8:28—9:2"), range(45, 8, 28, 9, 2));
        assert_eq!(parse("REV 22"), range(66, 22, 1, 22, 21));
    }

    #[test]
    fn no_match_is_not_an_error() {
        assert!(canon().parse_reference("").unwrap().is_none());
        assert!(canon().parse_reference("12:5").unwrap().is_none());
        assert!(canon().parse_reference("Genesis 1:2:3").unwrap().is_none());
    }

    #[test]
    fn unknown_book_is_an_error() {
        let err = canon().parse_reference("Nonexistent 1:1").unwrap_err();
        assert!(matches!(err, Error::UnknownBook { ref name, .. } if name == "Nonexistent"));
    }

    #[test]
    fn out_of_bounds_is_an_error() {
        for text in ["Genesis 51", "Genesis 1:32", "Genesis 2:5-1:3", "Jude 2", "Genesis 1000:1", "Psalm 23:4-2"] {
            assert!(
                matches!(canon().parse_reference(text), Err(Error::InvalidRange { .. })),
                "{text} should be out of range"
            );
        }
    }

    #[test]
    fn formats_minimal_forms() {
        assert_eq!(canon().format_range(&range(1, 1, 1, 1, 5)), "Genesis 1:1-5");
        assert_eq!(canon().format_range(&range(1, 1, 1, 1, 31)), "Genesis 1");
        assert_eq!(canon().format_range(&range(1, 1, 1, 50, 26)), "Genesis");
        assert_eq!(canon().format_range(&range(1, 1, 7, 1, 7)), "Genesis 1:7");
        assert_eq!(canon().format_range(&range(1, 1, 1, 3, 24)), "Genesis 1-3");
        assert_eq!(canon().format_range(&range(1, 1, 30, 2, 3)), "Genesis 1:30-2:3");
        assert_eq!(canon().format_range(&range(19, 23, 1, 23, 6)), "Psalms 23");
        assert_eq!(canon().format_range(&VerseRange::new(VerseId::from_raw(0), VerseId::from_raw(0))), "");
        assert_eq!(canon().format_range(&range(1, 0, 0, 0, 0)), "Genesis");
    }

    #[test]
    fn parse_then_format() {
        for text in ["Genesis 1:1-5", "Genesis 1", "Genesis", "John 3:16", "Romans 8:28-9:2", "Exodus 20-24"] {
            assert_eq!(canon().format_range(&parse(text)), text);
        }
    }
}
