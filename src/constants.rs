//! Application constants.
//!
//! Defaults and curated tables shared by the journal and the services.

/// Reading goal defaults.
pub mod goal {
    /// Verses per day that finishes the canon in roughly a year.
    pub const DEFAULT_DAILY_VERSE_GOAL: u32 = 86;
}

/// Recommendation tuning.
pub mod recommend {
    /// How many unread gaps to suggest.
    pub const UNREAD_GAP_LIMIT: usize = 3;

    /// Curated landmarks as (book, chapter, title, detail).
    pub const POPULAR_STARTING_POINTS: [(u32, u32, &str, &str); 5] = [
        (1, 1, "Genesis 1", "The beginning"),
        (40, 1, "Matthew 1", "Start of the New Testament"),
        (19, 1, "Psalm 1", "The Psalms"),
        (20, 1, "Proverbs 1", "Wisdom literature"),
        (43, 1, "John 1", "Gospel of John"),
    ];
}

/// Journal storage.
pub mod storage {
    /// Directory created under the platform data dir.
    pub const APP_DIR: &str = "versetrack";

    /// Journal file name inside [`APP_DIR`].
    pub const JOURNAL_FILE: &str = "journal.json";

    /// Date format used on the command line and in imports.
    pub const DATE_FORMAT: &str = "%Y-%m-%d";
}
