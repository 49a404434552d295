//! Bulk import of `date,reference` lines.
//!
//! Each line splits on its first comma only, since references may contain
//! commas of their own. Rows are classified independently; nothing is
//! written until the caller hands [`importable_entries`] to a store.

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;
use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use crate::bible::{Canon, VerseId, VerseRange};
use crate::constants::storage::DATE_FORMAT;
use crate::error::Error;
use crate::journal::{LogEntry, NewLogEntry};

#[allow(clippy::expect_used)]
static DATE_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}$").expect("valid regex: import date"));

/// Why a row cannot be imported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImportIssue {
    /// Nothing after the comma.
    MissingReference,
    /// Not `YYYY-MM-DD`, or not a real calendar day.
    InvalidDate,
    /// The reference has no recognisable shape.
    Unparsable,
    /// The reference names no known book.
    UnknownBook {
        /// Book name as written.
        name: String,
        /// Closest known name.
        suggestion: Option<String>,
    },
    /// The reference points at verses that do not exist.
    OutOfRange,
}

impl fmt::Display for ImportIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingReference => f.write_str("Missing verse range"),
            Self::InvalidDate => f.write_str("Invalid date format"),
            Self::Unparsable => f.write_str("Could not parse verse range"),
            Self::UnknownBook { name, suggestion: Some(s) } => write!(f, "Unknown book: {name} (did you mean {s}?)"),
            Self::UnknownBook { name, suggestion: None } => write!(f, "Unknown book: {name}"),
            Self::OutOfRange => f.write_str("Verse range does not exist"),
        }
    }
}

/// Outcome for one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ImportStatus {
    /// Ready to store.
    Valid,
    /// Same date and range as an existing entry or an earlier row.
    Duplicate,
    /// Rejected.
    Invalid(ImportIssue),
}

/// One classified input line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportRow {
    /// 1-based line number in the input text.
    pub line: usize,
    /// The line as read, trimmed.
    pub raw: String,
    /// Parsed date, when it was valid.
    pub date: Option<NaiveDate>,
    /// Parsed range, when the reference resolved.
    pub range: Option<VerseRange>,
    /// Classification.
    pub status: ImportStatus,
}

impl ImportRow {
    fn invalid(line: usize, raw: &str, date: Option<NaiveDate>, issue: ImportIssue) -> Self {
        Self {
            line,
            raw: raw.to_string(),
            date,
            range: None,
            status: ImportStatus::Invalid(issue),
        }
    }
}

/// Row counts per status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    /// Rows ready to store.
    pub valid: usize,
    /// Rows already logged.
    pub duplicate: usize,
    /// Rows rejected.
    pub invalid: usize,
}

fn parse_date(text: &str) -> Option<NaiveDate> {
    if !DATE_SHAPE.is_match(text) {
        return None;
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).ok()
}

/// Classify every non-blank line of `text` against the `existing` log.
pub fn classify(canon: &Canon, text: &str, existing: &[LogEntry]) -> Vec<ImportRow> {
    let mut seen: HashSet<(NaiveDate, VerseId, VerseId)> =
        existing.iter().map(|e| (e.date, e.start, e.end)).collect();

    let rows: Vec<ImportRow> = text
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            let line_no = index + 1;
            let raw = line.trim();
            let (date_text, reference) = raw
                .split_once(',')
                .map_or((raw, ""), |(d, r)| (d.trim(), r.trim()));

            if reference.is_empty() {
                return ImportRow::invalid(line_no, raw, None, ImportIssue::MissingReference);
            }
            let Some(date) = parse_date(date_text) else {
                return ImportRow::invalid(line_no, raw, None, ImportIssue::InvalidDate);
            };

            let range = match canon.parse_reference(reference) {
                Ok(Some(range)) => range,
                Ok(None) => return ImportRow::invalid(line_no, raw, Some(date), ImportIssue::Unparsable),
                Err(Error::UnknownBook { name, suggestion }) => {
                    return ImportRow::invalid(line_no, raw, Some(date), ImportIssue::UnknownBook { name, suggestion })
                }
                Err(Error::InvalidRange { .. }) => {
                    return ImportRow::invalid(line_no, raw, Some(date), ImportIssue::OutOfRange)
                }
                Err(err) => {
                    tracing::warn!("Line {line_no}: {err}");
                    return ImportRow::invalid(line_no, raw, Some(date), ImportIssue::Unparsable);
                }
            };

            let status = if seen.insert((date, range.start, range.end)) {
                ImportStatus::Valid
            } else {
                ImportStatus::Duplicate
            };
            ImportRow {
                line: line_no,
                raw: raw.to_string(),
                date: Some(date),
                range: Some(range),
                status,
            }
        })
        .collect();

    let summary = summarize(&rows);
    tracing::info!(
        "Classified {} import rows: {} valid, {} duplicate, {} invalid",
        rows.len(),
        summary.valid,
        summary.duplicate,
        summary.invalid
    );
    rows
}

/// Count rows per status.
pub fn summarize(rows: &[ImportRow]) -> ImportSummary {
    rows.iter().fold(ImportSummary::default(), |mut acc, row| {
        match row.status {
            ImportStatus::Valid => acc.valid += 1,
            ImportStatus::Duplicate => acc.duplicate += 1,
            ImportStatus::Invalid(_) => acc.invalid += 1,
        }
        acc
    })
}

/// Entries to store for the valid rows, in input order.
pub fn importable_entries(rows: &[ImportRow]) -> Vec<NewLogEntry> {
    rows.iter()
        .filter(|row| row.status == ImportStatus::Valid)
        .filter_map(|row| Some(NewLogEntry::new(row.date?, row.range?)))
        .collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::types::EntryId;
    use chrono::Utc;

    fn canon() -> &'static Canon {
        Canon::standard()
    }

    fn issue(row: &ImportRow) -> Option<&ImportIssue> {
        match &row.status {
            ImportStatus::Invalid(issue) => Some(issue),
            _ => None,
        }
    }

    #[test]
    fn classifies_each_problem() {
        let text = "2024-01-01,Genesis 1:1-5\n\
                    2024-01-02\n\
                    01/03/2024,Genesis 2\n\
                    2024-02-30,Genesis 2\n\
                    2024-01-04,hello world 1:2:3\n\
                    2024-01-05,Hezekiah 1:1\n\
                    2024-01-06,Genesis 51\n";
        let rows = classify(canon(), text, &[]);
        assert_eq!(rows.len(), 7);
        assert_eq!(rows[0].status, ImportStatus::Valid);
        assert_eq!(issue(&rows[1]), Some(&ImportIssue::MissingReference));
        assert_eq!(issue(&rows[2]), Some(&ImportIssue::InvalidDate));
        assert_eq!(issue(&rows[3]), Some(&ImportIssue::InvalidDate));
        assert_eq!(issue(&rows[4]), Some(&ImportIssue::Unparsable));
        assert!(matches!(issue(&rows[5]), Some(ImportIssue::UnknownBook { name, .. }) if name == "Hezekiah"));
        assert_eq!(issue(&rows[6]), Some(&ImportIssue::OutOfRange));
        assert_eq!(issue(&rows[1]).map(ToString::to_string).as_deref(), Some("Missing verse range"));
    }

    #[test]
    fn invalid_ranges_are_out_of_range() {
        let text = "2024-01-01,Genesis 1:5-1\n2024-01-01,Genesis 1:1000\n2024-01-01,Genesis 1:32\n";
        let rows = classify(canon(), text, &[]);
        assert!(rows.iter().all(|row| issue(row) == Some(&ImportIssue::OutOfRange)));
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn splits_on_first_comma_and_skips_blank_lines() {
        let text = "\r\n2024-01-01, Genesis 1:1-5 \r\n\n2024-01-02,Genesis 2, again\n";
        let rows = classify(canon(), text, &[]);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].line, 2);
        assert_eq!(rows[0].status, ImportStatus::Valid);
        // the second comma stays in the reference, which then has no shape
        assert_eq!(issue(&rows[1]), Some(&ImportIssue::Unparsable));
    }

    #[test]
    fn duplicates_against_log_and_batch() {
        let range = canon().parse_reference("Genesis 1:1-10").unwrap().unwrap();
        let now = Utc::now();
        let existing = [LogEntry {
            id: EntryId::generate(),
            date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            start: range.start,
            end: range.end,
            created_at: now,
            updated_at: now,
        }];
        let text = "2024-01-01,Genesis 1:1-10\n2024-01-02,Genesis 1:1-10\n2024-01-02,Gen 1:1-10\n";
        let rows = classify(canon(), text, &existing);
        let statuses: Vec<&ImportStatus> = rows.iter().map(|r| &r.status).collect();
        assert_eq!(statuses, vec![&ImportStatus::Duplicate, &ImportStatus::Valid, &ImportStatus::Duplicate]);

        let summary = summarize(&rows);
        assert_eq!(summary, ImportSummary { valid: 1, duplicate: 2, invalid: 0 });

        let entries = importable_entries(&rows);
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].date, NaiveDate::from_ymd_opt(2024, 1, 2).unwrap());
        assert_eq!(entries[0].range(), range);
    }
}
