//! Deep links that open a chapter in an external reading app.
//!
//! Every per-target table is a `match`, so adding an app or a translation
//! fails to compile until each table covers it.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::bible::Canon;
use crate::error::{Error, Result};

/// Reading apps a link can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BibleApp {
    /// `YouVersion` mobile app.
    YouVersionApp,
    /// bible.com website.
    BibleCom,
    /// Blue Letter Bible website.
    BlueLetterBible,
    /// Bible Gateway website.
    #[default]
    BibleGateway,
    /// Olive Tree app.
    OliveTree,
}

impl BibleApp {
    /// Every app, in menu order.
    pub const ALL: [Self; 5] = [
        Self::YouVersionApp,
        Self::BibleCom,
        Self::BlueLetterBible,
        Self::BibleGateway,
        Self::OliveTree,
    ];

    /// Stable token, as stored in settings.
    pub const fn token(self) -> &'static str {
        match self {
            Self::YouVersionApp => "YOUVERSIONAPP",
            Self::BibleCom => "BIBLECOM",
            Self::BlueLetterBible => "BLUELETTERBIBLE",
            Self::BibleGateway => "BIBLEGATEWAY",
            Self::OliveTree => "OLIVETREE",
        }
    }

    /// Human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::YouVersionApp => "YouVersion App",
            Self::BibleCom => "Bible.com",
            Self::BlueLetterBible => "Blue Letter Bible",
            Self::BibleGateway => "Bible Gateway",
            Self::OliveTree => "Olive Tree",
        }
    }
}

/// Translations a link can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BibleVersion {
    /// Amplified Bible.
    Amp,
    /// King James Version.
    Kjv,
    /// New King James Version.
    Nkjv,
    /// New International Version.
    Niv,
    /// English Standard Version.
    Esv,
    /// New American Standard Bible, 1995 edition.
    Nasb1995,
    /// New American Standard Bible, 2020 edition.
    #[default]
    Nasb2020,
    /// New American Bible, Revised Edition.
    Nabre,
    /// New Living Translation.
    Nlt,
    /// The Passion Translation.
    Tpt,
    /// The Message.
    Msg,
}

impl BibleVersion {
    /// Every translation, in menu order.
    pub const ALL: [Self; 11] = [
        Self::Amp,
        Self::Kjv,
        Self::Nkjv,
        Self::Niv,
        Self::Esv,
        Self::Nasb1995,
        Self::Nasb2020,
        Self::Nabre,
        Self::Nlt,
        Self::Tpt,
        Self::Msg,
    ];

    /// Stable token, as stored in settings and used in `YouVersion` links.
    pub const fn token(self) -> &'static str {
        match self {
            Self::Amp => "AMP",
            Self::Kjv => "KJV",
            Self::Nkjv => "NKJV",
            Self::Niv => "NIV",
            Self::Esv => "ESV",
            Self::Nasb1995 => "NASB1995",
            Self::Nasb2020 => "NASB2020",
            Self::Nabre => "NABRE",
            Self::Nlt => "NLT",
            Self::Tpt => "TPT",
            Self::Msg => "MSG",
        }
    }

    /// Human-readable name.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Amp => "Amplified Bible",
            Self::Kjv => "King James Version",
            Self::Nkjv => "New King James Version",
            Self::Niv => "New International Version",
            Self::Esv => "English Standard Version",
            Self::Nasb1995 => "NASB 1995",
            Self::Nasb2020 => "NASB 2020",
            Self::Nabre => "New American Bible",
            Self::Nlt => "New Living Translation",
            Self::Tpt => "The Passion Translation",
            Self::Msg => "The Message",
        }
    }

    /// Numeric translation id on bible.com.
    const fn bible_com_id(self) -> u32 {
        match self {
            Self::Amp => 1588,
            Self::Kjv => 1,
            Self::Nkjv => 114,
            Self::Niv => 111,
            Self::Esv => 59,
            Self::Nasb1995 => 100,
            Self::Nasb2020 => 2692,
            Self::Nabre => 463,
            Self::Nlt => 116,
            Self::Tpt => 1849,
            Self::Msg => 97,
        }
    }

    /// Version slug on Blue Letter Bible, which lacks a few translations.
    const fn blue_letter_slug(self) -> &'static str {
        match self {
            Self::Amp => "amp",
            Self::Kjv => "kjv",
            Self::Nkjv => "nkjv",
            Self::Niv => "niv",
            Self::Esv => "esv",
            Self::Nasb1995 => "nasb95",
            Self::Nasb2020 | Self::Nabre => "nasb20",
            Self::Nlt | Self::Tpt | Self::Msg => "nlt",
        }
    }

    /// Version code on Bible Gateway.
    const fn gateway_code(self) -> &'static str {
        match self {
            Self::Amp => "AMP",
            Self::Kjv => "KJV",
            Self::Nkjv => "NKJV",
            Self::Niv => "NIV",
            Self::Esv => "ESV",
            Self::Nasb1995 => "NASB1995",
            Self::Nasb2020 => "NASB",
            Self::Nabre => "NABRE",
            Self::Nlt => "NLT",
            Self::Tpt | Self::Msg => "MSG",
        }
    }
}

macro_rules! token_parsing {
    ($ty:ty, $what:literal) => {
        impl FromStr for $ty {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self> {
                let wanted = s.trim();
                Self::ALL
                    .into_iter()
                    .find(|v| v.token().eq_ignore_ascii_case(wanted))
                    .ok_or_else(|| Error::Msg(format!("Unknown {}: {wanted}", $what)))
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }
    };
}

token_parsing!(BibleApp, "Bible app");
token_parsing!(BibleVersion, "Bible version");

/// Paratext-style three-letter book code, by canon order.
const fn osis_code(book: u32) -> Option<&'static str> {
    Some(match book {
        1 => "GEN",
        2 => "EXO",
        3 => "LEV",
        4 => "NUM",
        5 => "DEU",
        6 => "JOS",
        7 => "JDG",
        8 => "RUT",
        9 => "1SA",
        10 => "2SA",
        11 => "1KI",
        12 => "2KI",
        13 => "1CH",
        14 => "2CH",
        15 => "EZR",
        16 => "NEH",
        17 => "EST",
        18 => "JOB",
        19 => "PSA",
        20 => "PRO",
        21 => "ECC",
        22 => "SNG",
        23 => "ISA",
        24 => "JER",
        25 => "LAM",
        26 => "EZK",
        27 => "DAN",
        28 => "HOS",
        29 => "JOL",
        30 => "AMO",
        31 => "OBA",
        32 => "JON",
        33 => "MIC",
        34 => "NAM",
        35 => "HAB",
        36 => "ZEP",
        37 => "HAG",
        38 => "ZEC",
        39 => "MAL",
        40 => "MAT",
        41 => "MRK",
        42 => "LUK",
        43 => "JHN",
        44 => "ACT",
        45 => "ROM",
        46 => "1CO",
        47 => "2CO",
        48 => "GAL",
        49 => "EPH",
        50 => "PHP",
        51 => "COL",
        52 => "1TH",
        53 => "2TH",
        54 => "1TI",
        55 => "2TI",
        56 => "TIT",
        57 => "PHM",
        58 => "HEB",
        59 => "JAS",
        60 => "1PE",
        61 => "2PE",
        62 => "1JN",
        63 => "2JN",
        64 => "3JN",
        65 => "JUD",
        66 => "REV",
        _ => return None,
    })
}

/// Blue Letter Bible book code, by canon order.
const fn blue_letter_code(book: u32) -> Option<&'static str> {
    Some(match book {
        1 => "Gen",
        2 => "Exo",
        3 => "Lev",
        4 => "Num",
        5 => "Deu",
        6 => "Jos",
        7 => "Jdg",
        8 => "Rth",
        9 => "1Sa",
        10 => "2Sa",
        11 => "1Ki",
        12 => "2Ki",
        13 => "1Ch",
        14 => "2Ch",
        15 => "Ezr",
        16 => "Neh",
        17 => "Est",
        18 => "Job",
        19 => "Psa",
        20 => "Pro",
        21 => "Ecc",
        22 => "Sng",
        23 => "Isa",
        24 => "Jer",
        25 => "Lam",
        26 => "Eze",
        27 => "Dan",
        28 => "Hos",
        29 => "Joe",
        30 => "Amo",
        31 => "Oba",
        32 => "Jon",
        33 => "Mic",
        34 => "Nah",
        35 => "Hab",
        36 => "Zep",
        37 => "Hag",
        38 => "Zec",
        39 => "Mal",
        40 => "Mat",
        41 => "Mar",
        42 => "Luk",
        43 => "Jhn",
        44 => "Act",
        45 => "Rom",
        46 => "1Co",
        47 => "2Co",
        48 => "Gal",
        49 => "Eph",
        50 => "Phl",
        51 => "Col",
        52 => "1Th",
        53 => "2Th",
        54 => "1Ti",
        55 => "2Ti",
        56 => "Tit",
        57 => "Phm",
        58 => "Heb",
        59 => "Jas",
        60 => "1Pe",
        61 => "2Pe",
        62 => "1Jo",
        63 => "2Jo",
        64 => "3Jo",
        65 => "Jde",
        66 => "Rev",
        _ => return None,
    })
}

/// Link that opens `book` `chapter` in `app`.
///
/// `None` when the chapter is not in `canon`, or when the app needs a book
/// code that only exists for the standard 66 books.
pub fn reading_url(canon: &Canon, app: BibleApp, version: BibleVersion, book: u32, chapter: u32) -> Option<String> {
    if canon.chapter_verse_count(book, chapter) == 0 {
        return None;
    }
    let name = canon.book_name(book);
    let url = match app {
        BibleApp::YouVersionApp => {
            format!("youversion://bible?reference={}.{chapter}.{}", osis_code(book)?, version.token())
        }
        BibleApp::BibleCom => format!(
            "https://www.bible.com/bible/{}/{}.{chapter}.{}",
            version.bible_com_id(),
            osis_code(book)?,
            version.token()
        ),
        BibleApp::BlueLetterBible => format!(
            "https://www.blueletterbible.org/{}/{}/{chapter}/1",
            version.blue_letter_slug(),
            blue_letter_code(book)?
        ),
        BibleApp::OliveTree => format!("olivetree://bible/{book}.{chapter}.1"),
        BibleApp::BibleGateway => format!(
            "https://www.biblegateway.com/passage/?version={}&search={}%20{chapter}",
            version.gateway_code(),
            name.replace(' ', "%20")
        ),
    };
    Some(url)
}
