//! `versetrack` - log Bible reading and see what is left.
//!
//! Usage: versetrack <command> [args]

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use tracing_subscriber::EnvFilter;

use versetrack::bible::{Canon, Testament, VerseRange};
use versetrack::config::Config;
use versetrack::constants::recommend::UNREAD_GAP_LIMIT;
use versetrack::constants::storage::DATE_FORMAT;
use versetrack::journal::{entry_ranges, JsonStore, LogStore, NewLogEntry};
use versetrack::services::links::{reading_url, BibleApp, BibleVersion};
use versetrack::services::{import, recommendations, stats};
use versetrack::types::EntryId;

const USAGE: &str = "\
Usage: versetrack <command> [args]

Commands:
  log <date|today> <reference>   Log a reading, e.g. `log today John 3:1-21`
  list                           Show every logged reading
  delete <id>                    Remove a logged reading
  import <file> [--dry-run]      Import `date,reference` lines
  progress                       Overall and per-testament progress
  books                          Progress for every book
  book <name>                    Chapter-by-chapter progress for one book
  stats                          Streaks, consistency and monthly totals
  suggest                        What to read next
  goal <verses>                  Set the daily verse goal
  look-back <date|none>          Only count readings since a date
  app <name>                     Set the reading app for links
  version <name>                 Set the translation for links
  link <reference>               Link to the chapter in the reading app";

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    if let Err(err) = run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some((command, rest)) = args.split_first() else {
        println!("{USAGE}");
        return Ok(());
    };

    let config = Config::load().context("Failed to load configuration")?;
    let canon = config.canon().context("Failed to load canon table")?;
    let mut store = JsonStore::open(&config.journal_path, &canon)
        .with_context(|| format!("Failed to open journal at {}", config.journal_path.display()))?;
    tracing::debug!("{} {} using {}", config.app_name(), config.app_version(), config.journal_path.display());

    match command.as_str() {
        "log" => log(&canon, &mut store, &config, rest),
        "list" => list(&canon, &store),
        "delete" => {
            let id = rest.first().context("Missing entry id")?;
            store.delete(&EntryId::from(id.as_str()))?;
            println!("Deleted {id}");
            Ok(())
        }
        "import" => import_file(&canon, &mut store, rest),
        "progress" => progress(&canon, &store, &config),
        "books" => books(&canon, &store),
        "book" => book(&canon, &store, &rest.join(" ")),
        "stats" => reading_stats(&canon, &store, &config),
        "suggest" => suggest(&canon, &store),
        "goal" => {
            let goal: u32 = rest.first().context("Missing goal")?.parse().context("Goal must be a whole number")?;
            let mut settings = store.settings()?;
            settings.daily_verse_goal = goal;
            store.update_settings(settings)?;
            println!("Daily goal set to {goal} verses");
            Ok(())
        }
        "look-back" => {
            let value = rest.first().context("Missing date")?;
            let date = if value == "none" { None } else { Some(parse_date(value, &config)?) };
            let mut settings = store.settings()?;
            settings.look_back_date = date;
            store.update_settings(settings)?;
            match date {
                Some(d) => println!("Counting readings since {d}"),
                None => println!("Counting all readings"),
            }
            Ok(())
        }
        "app" => {
            let app: BibleApp = rest.join(" ").parse()?;
            let mut settings = store.settings()?;
            settings.bible_app = app;
            store.update_settings(settings)?;
            println!("Links open in {app}");
            Ok(())
        }
        "version" => {
            let version: BibleVersion = rest.join(" ").parse()?;
            let mut settings = store.settings()?;
            settings.bible_version = version;
            store.update_settings(settings)?;
            println!("Links ask for {version}");
            Ok(())
        }
        "link" => link(&canon, &store, &rest.join(" ")),
        other => {
            eprintln!("Unknown command: {other}\n");
            println!("{USAGE}");
            Ok(())
        }
    }
}

fn parse_date(text: &str, config: &Config) -> Result<NaiveDate> {
    if text == "today" {
        return Ok(config.today());
    }
    NaiveDate::parse_from_str(text, DATE_FORMAT).with_context(|| format!("{text} is not a YYYY-MM-DD date"))
}

fn parse_range(canon: &Canon, text: &str) -> Result<VerseRange> {
    match canon.parse_reference(text)? {
        Some(range) => Ok(range),
        None => bail!("Could not understand \"{text}\" as a reference"),
    }
}

fn log(canon: &Canon, store: &mut JsonStore<'_>, config: &Config, args: &[String]) -> Result<()> {
    let Some((date, reference)) = args.split_first() else {
        bail!("Usage: versetrack log <date|today> <reference>");
    };
    let date = parse_date(date, config)?;
    let range = parse_range(canon, &reference.join(" "))?;
    let entry = store.create(NewLogEntry::new(date, range))?;

    let today_count = stats::daily_verse_counts(canon, &store.entries_on(date)?)
        .get(&date)
        .copied()
        .unwrap_or(0);
    let goal = store.settings()?.daily_verse_goal;
    println!(
        "Logged {} ({} verses) on {date}. {today_count}/{goal} verses that day ({:.0}%)",
        canon.format_range(&range),
        canon.range_verse_count(&range),
        stats::daily_goal_progress(today_count, goal)
    );
    tracing::debug!("Created entry {}", entry.id);
    Ok(())
}

fn list(canon: &Canon, store: &JsonStore<'_>) -> Result<()> {
    let entries = store.entries()?;
    if entries.is_empty() {
        println!("Nothing logged yet");
    }
    for entry in &entries {
        println!(
            "{}  {:<28} {:>5} verses  {}",
            entry.date,
            canon.format_range(&entry.range()),
            canon.range_verse_count(&entry.range()),
            entry.id
        );
    }
    Ok(())
}

fn import_file(canon: &Canon, store: &mut JsonStore<'_>, args: &[String]) -> Result<()> {
    let path = args.iter().find(|a| !a.starts_with("--")).context("Missing file to import")?;
    let dry_run = args.iter().any(|a| a == "--dry-run");
    let text = fs_err::read_to_string(path)?;

    let rows = import::classify(canon, &text, &store.entries()?);
    for row in &rows {
        match &row.status {
            import::ImportStatus::Invalid(issue) => println!("line {:>4}: {issue}: {}", row.line, row.raw),
            import::ImportStatus::Duplicate => println!("line {:>4}: already logged: {}", row.line, row.raw),
            import::ImportStatus::Valid => {}
        }
    }
    let summary = import::summarize(&rows);
    if dry_run {
        println!(
            "Would import {} rows ({} duplicates, {} invalid)",
            summary.valid, summary.duplicate, summary.invalid
        );
        return Ok(());
    }
    let imported = store.bulk_create(import::importable_entries(&rows))?;
    println!(
        "Imported {imported} rows, skipped {} duplicates and {} invalid",
        summary.duplicate, summary.invalid
    );
    Ok(())
}

fn current_ranges(canon: &Canon, store: &JsonStore<'_>) -> Result<Vec<VerseRange>> {
    Ok(entry_ranges(canon, &store.current_entries()?))
}

#[allow(clippy::cast_precision_loss, clippy::cast_sign_loss)]
fn bar(progress: &stats::Progress) -> String {
    const WIDTH: usize = 30;
    let filled = ((progress.percent() / 100.0) * WIDTH as f64).round() as usize;
    format!("[{}{}]", "#".repeat(filled.min(WIDTH)), "-".repeat(WIDTH - filled.min(WIDTH)))
}

fn progress(canon: &Canon, store: &JsonStore<'_>, config: &Config) -> Result<()> {
    let ranges = current_ranges(canon, store)?;
    let overall = stats::overall_progress(canon, &ranges);
    println!("Bible          {} {:>6}/{:<6} {:5.1}%", bar(&overall), overall.read, overall.total, overall.percent());
    for testament in [Testament::Old, Testament::New] {
        let p = stats::testament_progress(canon, testament, &ranges);
        println!("{:<14} {} {:>6}/{:<6} {:5.1}%", testament.name(), bar(&p), p.read, p.total, p.percent());
    }

    let goal = store.settings()?.daily_verse_goal;
    let forecast = stats::forecast(&overall, goal, config.today());
    println!("\n{} verses remaining", forecast.remaining_verses);
    match forecast.projected_completion {
        Some(done) => println!("At {goal} verses a day: {} days, finishing around {done}", forecast.days_remaining),
        None => println!("Set a daily goal to see a finish date"),
    }
    Ok(())
}

fn books(canon: &Canon, store: &JsonStore<'_>) -> Result<()> {
    let ranges = current_ranges(canon, store)?;
    for book in canon.books() {
        let p = stats::book_progress(canon, book.order, &ranges);
        println!("{:<16} {} {:5.1}%", book.name, bar(&p), p.percent());
    }
    Ok(())
}

fn book(canon: &Canon, store: &JsonStore<'_>, name: &str) -> Result<()> {
    let order = canon.book_index(name).with_context(|| match canon.suggest_book(name) {
        Some(s) => format!("Unknown book: {name} (did you mean {s}?)"),
        None => format!("Unknown book: {name}"),
    })?;
    let ranges = current_ranges(canon, store)?;
    let p = stats::book_progress(canon, order, &ranges);
    println!("{} {} {}/{} verses", canon.book_name(order), bar(&p), p.read, p.total);

    for chapter in 1..=canon.chapter_count(order) {
        let c = stats::chapter_progress(canon, order, chapter, &ranges);
        let marks: String = canon
            .segment_book_chapter(order, chapter, &ranges)
            .iter()
            .map(|s| format!("{}{}", if s.is_read { "read " } else { "unread " }, s.verse_count))
            .collect::<Vec<_>>()
            .join(", ");
        println!("  {chapter:>3}  {:>3}/{:<3}  {marks}", c.read, c.total);
    }
    Ok(())
}

fn reading_stats(canon: &Canon, store: &JsonStore<'_>, config: &Config) -> Result<()> {
    let settings = store.settings()?;
    let entries = store.current_entries()?;
    let counts = stats::daily_verse_counts(canon, &entries);
    let today = config.today();
    let summary = stats::reading_stats(&counts, today);

    println!("Current streak   {} days", summary.current_streak);
    println!("Longest streak   {} days", summary.longest_streak);
    println!("Days read        {} of {}", summary.days_with_reading, summary.total_days);
    println!("Consistency      {}%", summary.consistency_percent);
    let today_count = counts.get(&today).copied().unwrap_or(0);
    println!(
        "Today            {today_count}/{} verses ({:.0}%)",
        settings.daily_verse_goal,
        stats::daily_goal_progress(today_count, settings.daily_verse_goal)
    );

    let weeks = stats::weekly_averages(&counts, today);
    if let Some(week) = weeks.last() {
        println!("This week        {} verses a day", week.average);
    }
    if let Some((_, total)) = stats::cumulative_counts(&counts, today).last() {
        println!("All counted      {total} verses");
    }
    for month in stats::monthly_totals(&counts, today) {
        println!("  {}-{:02}  {:>6} verses", month.year, month.month, month.total);
    }
    Ok(())
}

fn suggest(canon: &Canon, store: &JsonStore<'_>) -> Result<()> {
    let entries = store.current_entries()?;
    let ranges = entry_ranges(canon, &entries);
    let mut any = false;

    if let Some(next) = recommendations::continue_reading(canon, &entries, &ranges) {
        println!("{}: {}", next.title, next.detail);
        any = true;
    }
    for gap in recommendations::unread_gaps(canon, &ranges, UNREAD_GAP_LIMIT) {
        println!("{}: start with {}", gap.title, gap.detail);
        any = true;
    }
    if entries.is_empty() {
        for point in recommendations::popular_starting_points(canon, &ranges) {
            println!("{}: {}", point.title, point.detail);
            any = true;
        }
    }
    if !any {
        println!("Everything has been read");
    }
    Ok(())
}

fn link(canon: &Canon, store: &JsonStore<'_>, reference: &str) -> Result<()> {
    let range = parse_range(canon, reference)?;
    let settings = store.settings()?;
    let url = reading_url(canon, settings.bible_app, settings.bible_version, range.start.book(), range.start.chapter())
        .with_context(|| format!("{} has no link for {}", settings.bible_app, canon.format_range(&range)))?;
    println!("{url}");
    Ok(())
}
