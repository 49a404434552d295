//! `versetrack` - Bible reading progress tracker.
//!
//! The heart of the crate is [`bible`], a pure verse-range engine over an
//! immutable [`bible::Canon`]. The journal persists what was read, and the
//! services turn it into progress, statistics and suggestions.

pub mod bible;
pub mod config;
pub mod constants;
pub mod error;
pub mod journal;
pub mod services;
pub mod types;
