//! Reading statistics: daily totals, streaks, progress and forecasts.

use chrono::{Datelike, Days, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::bible::{Canon, Testament, VerseRange};
use crate::journal::LogEntry;

/// Verses logged per day, overlaps counted every time they are read.
pub fn daily_verse_counts(canon: &Canon, entries: &[LogEntry]) -> BTreeMap<NaiveDate, u32> {
    let mut counts = BTreeMap::new();
    for entry in entries {
        let range = entry.range();
        if canon.validate(&range) {
            *counts.entry(entry.date).or_insert(0) += canon.range_verse_count(&range);
        }
    }
    counts
}

/// Every day from the first logged one through `today`.
fn days_through(counts: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> Vec<NaiveDate> {
    let Some(&first) = counts.keys().next() else {
        return Vec::new();
    };
    first.iter_days().take_while(|d| *d <= today).collect()
}

fn count_on(counts: &BTreeMap<NaiveDate, u32>, day: NaiveDate) -> u32 {
    counts.get(&day).copied().unwrap_or(0)
}

/// Streak and consistency summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReadingStats {
    /// Consecutive reading days ending today.
    pub current_streak: u32,
    /// Longest run of consecutive reading days.
    pub longest_streak: u32,
    /// Days with at least one verse.
    pub days_with_reading: u32,
    /// Days from the first entry through today.
    pub total_days: u32,
    /// `days_with_reading / total_days`, as a rounded percentage.
    pub consistency_percent: u32,
}

/// Streaks and consistency over every day from the first entry to `today`.
pub fn reading_stats(counts: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> ReadingStats {
    let days = days_through(counts, today);
    if days.is_empty() {
        return ReadingStats::default();
    }

    let read: Vec<bool> = days.iter().map(|d| count_on(counts, *d) > 0).collect();
    let mut longest_streak = 0;
    let mut streak = 0;
    for &hit in &read {
        streak = if hit { streak + 1 } else { 0 };
        longest_streak = longest_streak.max(streak);
    }
    let current_streak = read.iter().rev().take_while(|hit| **hit).count() as u32;
    let days_with_reading = read.iter().filter(|hit| **hit).count() as u32;
    let total_days = days.len() as u32;

    ReadingStats {
        current_streak,
        longest_streak,
        days_with_reading,
        total_days,
        consistency_percent: rounded_ratio(days_with_reading * 100, total_days),
    }
}

/// `numerator / denominator`, rounded half up. 0 for an empty denominator.
const fn rounded_ratio(numerator: u32, denominator: u32) -> u32 {
    if denominator == 0 {
        0
    } else {
        (2 * numerator + denominator) / (2 * denominator)
    }
}

/// Average verses per day over one Sunday-to-Saturday week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct WeeklyAverage {
    /// Sunday the week starts on.
    pub week_start: NaiveDate,
    /// Rounded mean over the days of the week that fall in range.
    pub average: u32,
}

/// Per-week averages, oldest week first.
pub fn weekly_averages(counts: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> Vec<WeeklyAverage> {
    let mut weeks: BTreeMap<NaiveDate, (u32, u32)> = BTreeMap::new();
    for day in days_through(counts, today) {
        let back = u64::from(day.weekday().num_days_from_sunday());
        let sunday = day.checked_sub_days(Days::new(back)).unwrap_or(day);
        let (total, days) = weeks.entry(sunday).or_insert((0, 0));
        *total += count_on(counts, day);
        *days += 1;
    }
    weeks
        .into_iter()
        .map(|(week_start, (total, days))| WeeklyAverage { week_start, average: rounded_ratio(total, days) })
        .collect()
}

/// Verses logged in one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotal {
    /// Calendar year.
    pub year: i32,
    /// Month, 1 through 12.
    pub month: u32,
    /// Verses logged that month.
    pub total: u32,
}

/// Per-month totals, oldest month first.
pub fn monthly_totals(counts: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> Vec<MonthlyTotal> {
    let mut months: BTreeMap<(i32, u32), u32> = BTreeMap::new();
    for day in days_through(counts, today) {
        *months.entry((day.year(), day.month())).or_insert(0) += count_on(counts, day);
    }
    months
        .into_iter()
        .map(|((year, month), total)| MonthlyTotal { year, month, total })
        .collect()
}

/// Running total of verses, one point per day through `today`.
pub fn cumulative_counts(counts: &BTreeMap<NaiveDate, u32>, today: NaiveDate) -> Vec<(NaiveDate, u32)> {
    days_through(counts, today)
        .into_iter()
        .scan(0, |running, day| {
            *running += count_on(counts, day);
            Some((day, *running))
        })
        .collect()
}

/// Distinct verses read out of a total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Progress {
    /// Distinct verses read.
    pub read: u32,
    /// Verses available.
    pub total: u32,
}

impl Progress {
    /// Share read, 0 through 100.
    pub fn percent(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.read) / f64::from(self.total) * 100.0
        }
    }

    /// Verses still unread.
    pub const fn remaining(&self) -> u32 {
        self.total.saturating_sub(self.read)
    }
}

/// Progress through the whole canon.
pub fn overall_progress(canon: &Canon, ranges: &[VerseRange]) -> Progress {
    Progress {
        read: canon.count_unique_verses(ranges),
        total: canon.total_verse_count(),
    }
}

/// Progress through one testament.
pub fn testament_progress(canon: &Canon, testament: Testament, ranges: &[VerseRange]) -> Progress {
    canon.testament_books(testament).fold(Progress::default(), |acc, book| {
        let p = book_progress(canon, book.order, ranges);
        Progress { read: acc.read + p.read, total: acc.total + p.total }
    })
}

/// Progress through one book.
pub fn book_progress(canon: &Canon, book: u32, ranges: &[VerseRange]) -> Progress {
    Progress {
        read: canon.count_unique_book_verses(book, ranges),
        total: canon.book_verse_count(book),
    }
}

/// Progress through one chapter.
pub fn chapter_progress(canon: &Canon, book: u32, chapter: u32, ranges: &[VerseRange]) -> Progress {
    Progress {
        read: canon.count_unique_chapter_verses(book, chapter, ranges),
        total: canon.chapter_verse_count(book, chapter),
    }
}

/// Share of today's goal met, capped at 100. A zero goal is always met.
pub fn daily_goal_progress(today_count: u32, goal: u32) -> f64 {
    if goal == 0 {
        return 100.0;
    }
    (f64::from(today_count) / f64::from(goal) * 100.0).min(100.0)
}

/// When the canon will be finished at the current goal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Forecast {
    /// Distinct verses not yet read.
    pub remaining_verses: u32,
    /// Days of reading at the goal pace, 0 when the goal is 0.
    pub days_remaining: u32,
    /// `today` plus `days_remaining`, when the goal is non-zero.
    pub projected_completion: Option<NaiveDate>,
}

/// Forecast from overall progress and a daily goal.
pub fn forecast(progress: &Progress, goal: u32, today: NaiveDate) -> Forecast {
    let remaining_verses = progress.remaining();
    if goal == 0 {
        return Forecast { remaining_verses, days_remaining: 0, projected_completion: None };
    }
    let days_remaining = remaining_verses.div_ceil(goal);
    Forecast {
        remaining_verses,
        days_remaining,
        projected_completion: today.checked_add_days(Days::new(u64::from(days_remaining))),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;
    use crate::bible::VerseId;
    use crate::types::EntryId;
    use chrono::Utc;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    fn entry(date: NaiveDate, c: u32, v1: u32, v2: u32) -> LogEntry {
        let now = Utc::now();
        LogEntry {
            id: EntryId::generate(),
            date,
            start: VerseId::new(1, c, v1),
            end: VerseId::new(1, c, v2),
            created_at: now,
            updated_at: now,
        }
    }

    fn counts(pairs: &[(NaiveDate, u32)]) -> BTreeMap<NaiveDate, u32> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn daily_counts_keep_overlap() {
        let entries = [entry(day(1, 1), 1, 1, 10), entry(day(1, 1), 1, 8, 20), entry(day(1, 2), 2, 1, 99)];
        let result = daily_verse_counts(Canon::standard(), &entries);
        assert_eq!(result.get(&day(1, 1)), Some(&23));
        // invalid range contributes nothing
        assert_eq!(result.get(&day(1, 2)), None);
    }

    #[test]
    fn streaks_and_consistency() {
        // Jan 1-3 read, Jan 4 skipped, Jan 5-6 read; today is Jan 6
        let c = counts(&[(day(1, 1), 5), (day(1, 2), 5), (day(1, 3), 5), (day(1, 5), 5), (day(1, 6), 5)]);
        let stats = reading_stats(&c, day(1, 6));
        assert_eq!(stats.longest_streak, 3);
        assert_eq!(stats.current_streak, 2);
        assert_eq!(stats.days_with_reading, 5);
        assert_eq!(stats.total_days, 6);
        assert_eq!(stats.consistency_percent, 83);

        // nothing read today breaks the current streak
        assert_eq!(reading_stats(&c, day(1, 7)).current_streak, 0);
        assert_eq!(reading_stats(&BTreeMap::new(), day(1, 7)), ReadingStats::default());
    }

    #[test]
    fn weeks_start_on_sunday() {
        // 2024-01-06 is a Saturday, 2024-01-07 a Sunday
        let c = counts(&[(day(1, 6), 10), (day(1, 7), 3), (day(1, 8), 4)]);
        let weeks = weekly_averages(&c, day(1, 8));
        assert_eq!(
            weeks,
            vec![
                WeeklyAverage { week_start: day(12, 31).with_year(2023).unwrap(), average: 10 },
                WeeklyAverage { week_start: day(1, 7), average: 4 },
            ]
        );
    }

    #[test]
    fn monthly_and_cumulative() {
        let c = counts(&[(day(1, 30), 10), (day(2, 1), 5)]);
        let months = monthly_totals(&c, day(2, 2));
        assert_eq!(
            months,
            vec![
                MonthlyTotal { year: 2024, month: 1, total: 10 },
                MonthlyTotal { year: 2024, month: 2, total: 5 },
            ]
        );
        let running = cumulative_counts(&c, day(2, 2));
        assert_eq!(running.len(), 4);
        assert_eq!(running.last(), Some(&(day(2, 2), 15)));
        assert_eq!(running[1], (day(1, 31), 10));
    }

    #[test]
    fn progress_by_scope() {
        let canon = Canon::standard();
        let ranges = [canon.book_range(1), canon.chapter_range(40, 1)];
        let overall = overall_progress(canon, &ranges);
        assert_eq!(overall.read, 1_533 + 25);
        assert_eq!(overall.total, 31_102);

        let old = testament_progress(canon, Testament::Old, &ranges);
        assert_eq!(old.read, 1_533);
        let new = testament_progress(canon, Testament::New, &ranges);
        assert_eq!(new.read, 25);
        assert_eq!(old.total + new.total, 31_102);

        assert!((book_progress(canon, 1, &ranges).percent() - 100.0).abs() < f64::EPSILON);
        assert_eq!(chapter_progress(canon, 40, 2, &ranges).read, 0);
        assert!(Progress::default().percent().abs() < f64::EPSILON);
    }

    #[test]
    fn goal_and_forecast() {
        assert!((daily_goal_progress(43, 86) - 50.0).abs() < f64::EPSILON);
        assert!((daily_goal_progress(200, 86) - 100.0).abs() < f64::EPSILON);

        let progress = Progress { read: 31_102 - 87, total: 31_102 };
        let f = forecast(&progress, 86, day(1, 1));
        assert_eq!(f.remaining_verses, 87);
        assert_eq!(f.days_remaining, 2);
        assert_eq!(f.projected_completion, Some(day(1, 3)));

        let idle = forecast(&progress, 0, day(1, 1));
        assert_eq!(idle.days_remaining, 0);
        assert!(idle.projected_completion.is_none());
    }
}
