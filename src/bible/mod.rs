//! Canon table and verse-range arithmetic.
//!
//! Everything here is pure: a [`Canon`] is built once, never mutated, and
//! every operation is a method on `&Canon` that returns fresh values.

mod data;
mod navigation;
mod ranges;
mod reference;
mod segments;
mod verse;

pub use ranges::{compare_ranges, filter_by_book, filter_by_book_chapter};
pub use verse::{Segment, VerseId, VerseRange, VerseRef};

use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;
use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Widest chapter or verse number the id packing can hold.
pub const MAX_COMPONENT: u32 = 999;

/// Old or New Testament.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Testament {
    /// Genesis through Malachi.
    Old,
    /// Matthew through Revelation.
    New,
}

impl Testament {
    /// Display name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Old => "Old Testament",
            Self::New => "New Testament",
        }
    }
}

/// One book of the canon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Position in the canon, starting at 1. Also the book's identity.
    pub order: u32,
    /// Canonical display name.
    pub name: String,
    /// Alternative names and abbreviations, matched case-insensitively.
    #[serde(default)]
    pub aliases: Vec<String>,
    /// Whether the book belongs to the New Testament.
    pub new_testament: bool,
    /// Verse count of each chapter, chapter 1 first.
    pub chapter_verses: Vec<u32>,
}

impl Book {
    /// Number of chapters.
    pub fn chapter_count(&self) -> u32 {
        self.chapter_verses.len() as u32
    }

    /// Which testament the book belongs to.
    pub const fn testament(&self) -> Testament {
        if self.new_testament {
            Testament::New
        } else {
            Testament::Old
        }
    }
}

lazy_static! {
    static ref STANDARD: Canon = Canon::build(
        data::STANDARD_BOOKS
            .iter()
            .zip(1..)
            .map(|(record, order)| Book {
                order,
                name: record.name.to_string(),
                aliases: record.aliases.iter().map(|a| (*a).to_string()).collect(),
                new_testament: record.new_testament,
                chapter_verses: record.chapter_verses.to_vec(),
            })
            .collect(),
    );
}

/// Immutable book/chapter/verse structure every computation runs against.
#[derive(Debug, Clone)]
pub struct Canon {
    books: Vec<Book>,
    book_totals: Vec<u32>,
    total: u32,
    names: HashMap<String, u32>,
}

/// Lookup key for book names: lowercase, whitespace removed.
fn name_key(name: &str) -> String {
    name.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

impl Canon {
    /// The built-in 66-book Protestant canon.
    pub fn standard() -> &'static Self {
        &STANDARD
    }

    /// Build a canon from an externally supplied book table.
    pub fn from_books(books: Vec<Book>) -> Result<Self> {
        if books.is_empty() {
            return Err(Error::canon("no books"));
        }
        if books.len() > MAX_COMPONENT as usize {
            return Err(Error::canon(format!("{} books, at most {MAX_COMPONENT} allowed", books.len())));
        }
        let mut seen = HashMap::new();
        for (book, expected) in books.iter().zip(1u32..) {
            if book.order != expected {
                return Err(Error::canon(format!(
                    "book {} has order {}, expected {expected}",
                    book.name, book.order
                )));
            }
            if book.name.trim().is_empty() {
                return Err(Error::canon(format!("book {expected} has no name")));
            }
            if book.chapter_verses.is_empty() || book.chapter_count() > MAX_COMPONENT {
                return Err(Error::canon(format!(
                    "{} has {} chapters",
                    book.name,
                    book.chapter_verses.len()
                )));
            }
            if let Some(chapter) = book
                .chapter_verses
                .iter()
                .position(|&n| n == 0 || n > MAX_COMPONENT)
            {
                return Err(Error::canon(format!(
                    "{} {} has {} verses",
                    book.name,
                    chapter + 1,
                    book.chapter_verses[chapter]
                )));
            }
            for name in std::iter::once(&book.name).chain(&book.aliases) {
                if let Some(other) = seen.insert(name_key(name), book.order) {
                    if other != book.order {
                        return Err(Error::canon(format!("name {name} is used by two books")));
                    }
                }
            }
        }
        Ok(Self::build(books))
    }

    /// Parse a JSON array of books and validate it.
    pub fn from_json(json: &str) -> Result<Self> {
        let books: Vec<Book> = serde_json::from_str(json)?;
        Self::from_books(books)
    }

    fn build(books: Vec<Book>) -> Self {
        let book_totals: Vec<u32> = books.iter().map(|b| b.chapter_verses.iter().sum()).collect();
        let total = book_totals.iter().sum();
        let mut names = HashMap::new();
        for book in &books {
            for name in std::iter::once(&book.name).chain(&book.aliases) {
                names.entry(name_key(name)).or_insert(book.order);
            }
        }
        Self { books, book_totals, total, names }
    }

    /// All books in canon order.
    pub fn books(&self) -> &[Book] {
        &self.books
    }

    /// Book by order, if it exists.
    pub fn book(&self, book: u32) -> Option<&Book> {
        let index = usize::try_from(book).ok()?.checked_sub(1)?;
        self.books.get(index)
    }

    /// Number of books.
    pub fn book_count(&self) -> u32 {
        self.books.len() as u32
    }

    /// Chapters in `book`, 0 when the book does not exist.
    pub fn chapter_count(&self, book: u32) -> u32 {
        self.book(book).map_or(0, Book::chapter_count)
    }

    /// Verses in `book` `chapter`, 0 when either does not exist.
    pub fn chapter_verse_count(&self, book: u32, chapter: u32) -> u32 {
        let Some(b) = self.book(book) else { return 0 };
        let Some(index) = usize::try_from(chapter).ok().and_then(|c| c.checked_sub(1)) else {
            return 0;
        };
        b.chapter_verses.get(index).copied().unwrap_or(0)
    }

    /// Verses in the whole book, 0 when it does not exist.
    pub fn book_verse_count(&self, book: u32) -> u32 {
        usize::try_from(book)
            .ok()
            .and_then(|b| b.checked_sub(1))
            .and_then(|b| self.book_totals.get(b))
            .copied()
            .unwrap_or(0)
    }

    /// Verses in the whole canon.
    pub const fn total_verse_count(&self) -> u32 {
        self.total
    }

    /// Canonical name of `book`, empty when it does not exist.
    pub fn book_name(&self, book: u32) -> &str {
        self.book(book).map_or("", |b| b.name.as_str())
    }

    /// Resolve a name or alias, ignoring case and whitespace.
    pub fn book_index(&self, name: &str) -> Option<u32> {
        self.names.get(&name_key(name)).copied()
    }

    /// Books of one testament, in canon order.
    pub fn testament_books(&self, testament: Testament) -> impl Iterator<Item = &Book> {
        self.books.iter().filter(move |b| b.testament() == testament)
    }

    /// Closest canonical book name to an unrecognised one.
    pub fn suggest_book(&self, name: &str) -> Option<&str> {
        let matcher = SkimMatcherV2::default();
        let query = name.trim();
        if query.is_empty() {
            return None;
        }
        self.books
            .iter()
            .filter_map(|book| {
                std::iter::once(&book.name)
                    .chain(&book.aliases)
                    .filter_map(|candidate| matcher.fuzzy_match(candidate, query))
                    .max()
                    .map(|score| (score, book))
            })
            .max_by_key(|(score, _)| *score)
            .map(|(_, book)| book.name.as_str())
    }
}
