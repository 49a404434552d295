//! Application configuration.
//!
//! Handles loading configuration from environment variables and .env files.

use chrono::{Local, NaiveDate};
use dotenv::dotenv;
use std::borrow::Cow;
use std::env;
use std::path::PathBuf;

use crate::bible::Canon;
use crate::constants::storage::{APP_DIR, DATE_FORMAT, JOURNAL_FILE};
use crate::error::{Error, Result};

/// Path to the journal file.
pub const DATA_VAR: &str = "VERSETRACK_DATA";
/// Optional path to a JSON canon table.
pub const CANON_VAR: &str = "VERSETRACK_CANON";
/// Optional fixed "today", as `YYYY-MM-DD`.
pub const TODAY_VAR: &str = "VERSETRACK_TODAY";

/// Configuration for the application.
#[derive(Debug, Clone)]
pub struct Config {
    /// The application name
    app_name: String,
    /// The application version
    app_version: String,
    /// Where the journal document lives
    pub journal_path: PathBuf,
    /// Replacement canon table, if any
    pub canon_path: Option<PathBuf>,
    /// Pinned date for reproducible runs
    pub today: Option<NaiveDate>,
}

impl Config {
    /// Get the application name.
    #[must_use]
    pub fn app_name(&self) -> &str {
        &self.app_name
    }

    /// Get the application version.
    #[must_use]
    pub fn app_version(&self) -> &str {
        &self.app_version
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: env!("CARGO_PKG_NAME").to_string(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
            journal_path: default_journal_path(),
            canon_path: None,
            today: None,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn load() -> Result<Self> {
        // Try to load .env file if present
        dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build configuration from any variable source.
    pub fn from_vars(var: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(path) = var(DATA_VAR).filter(|p| !p.trim().is_empty()) {
            config.journal_path = expand(&path);
        }

        config.canon_path = var(CANON_VAR).filter(|p| !p.trim().is_empty()).map(|p| expand(&p));

        if let Some(day) = var(TODAY_VAR).filter(|d| !d.trim().is_empty()) {
            let parsed = NaiveDate::parse_from_str(day.trim(), DATE_FORMAT).map_err(|_| {
                Error::config(format!("{TODAY_VAR}={day} is not a date"), "Use the YYYY-MM-DD format")
            })?;
            config.today = Some(parsed);
        }

        Ok(config)
    }

    /// The configured date, or the local calendar date.
    pub fn today(&self) -> NaiveDate {
        self.today.unwrap_or_else(|| Local::now().date_naive())
    }

    /// The canon to compute against: the built-in one unless a table is configured.
    pub fn canon(&self) -> Result<Cow<'static, Canon>> {
        let Some(path) = &self.canon_path else {
            return Ok(Cow::Borrowed(Canon::standard()));
        };
        let json = fs_err::read_to_string(path).map_err(|e| Error::io(e, path.clone()))?;
        let canon = Canon::from_json(&json).map_err(|e| {
            tracing::error!("Rejected canon table {}: {e}", path.display());
            e
        })?;
        tracing::info!("Loaded canon table with {} books from {}", canon.book_count(), path.display());
        Ok(Cow::Owned(canon))
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).to_string())
}

/// `<data dir>/versetrack/journal.json`, falling back to the working directory.
fn default_journal_path() -> PathBuf {
    dirs::data_dir()
        .map_or_else(|| PathBuf::from("."), |d| d.join(APP_DIR))
        .join(JOURNAL_FILE)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use std::collections::HashMap;

    fn vars(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_variables() {
        let config = Config::from_vars(vars(&[])).unwrap();
        assert!(config.journal_path.ends_with("versetrack/journal.json"));
        assert!(config.canon_path.is_none());
        assert!(config.today.is_none());
        assert_eq!(config.app_name(), "versetrack");
        assert_eq!(config.canon().unwrap().book_count(), 66);
    }

    #[test]
    fn reads_overrides() {
        let config = Config::from_vars(vars(&[
            (DATA_VAR, "/tmp/j.json"),
            (TODAY_VAR, "2024-03-05"),
        ]))
        .unwrap();
        assert_eq!(config.journal_path, PathBuf::from("/tmp/j.json"));
        assert_eq!(config.today(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
    }

    #[test]
    fn rejects_bad_date() {
        let err = Config::from_vars(vars(&[(TODAY_VAR, "March 5")])).unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
    }

    #[test]
    fn loads_custom_canon() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("canon.json");
        std::fs::write(
            &path,
            r#"[{"order": 1, "name": "Alpha", "new_testament": false, "chapter_verses": [3]}]"#,
        )
        .unwrap();
        let config = Config::from_vars(vars(&[(CANON_VAR, path.to_str().unwrap())])).unwrap();
        assert_eq!(config.canon().unwrap().total_verse_count(), 3);

        let missing = Config::from_vars(vars(&[(CANON_VAR, "/nonexistent/canon.json")])).unwrap();
        assert!(matches!(missing.canon(), Err(Error::Io { .. })));
    }
}
