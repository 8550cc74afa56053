//! Logcat line grammars (stage 1)
//!
//! Three line formats are tried in priority order; the first match wins.
//! Non-matching or blank lines are skipped without error. The absolute
//! timestamp is reconstructed against a reference "now", since two of the
//! three formats carry no year (or no date at all).

use chrono::{DateTime, Datelike, FixedOffset, Local, NaiveDate, NaiveTime, TimeZone};
use regex::Regex;
use std::sync::LazyLock;

/// One parsed log line, before any tag-specific extraction.
#[derive(Clone, Debug, PartialEq)]
pub struct LogcatEntry {
    /// Raw level token, resolved to a level only at point-assembly time.
    pub level: String,
    pub tag: String,
    pub pid: u32,
    pub tid: u32,
    /// Milliseconds since the Unix epoch, or -1 when the line carried no
    /// usable date/time (invalid but not rejected).
    pub timestamp: i64,
    pub message: String,
}

// YYYY-MM-DD HH:MM:SS.SSS +HHMM PID TID I TAG: message
static FULL_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{4}-\d{2}-\d{2})\s+(\d{2}:\d{2}:\d{2}\.\d{3})\s+([+-]\d{4})\s+(\d+)\s+(\d+)\s+([VDIWEF])\s+([^:]+):\s+(.*)$",
    )
    .unwrap()
});

// MM-DD HH:MM:SS.SSS PID TID I TAG: message
static SHORT_DATE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(\d{2}-\d{2})\s+(\d{2}:\d{2}:\d{2}\.\d{3})\s+(\d+)\s+(\d+)\s+([VDIWEF])\s+([^:]+):\s+(.*)$",
    )
    .unwrap()
});

// HH:MM:SS.SSS [thread] INFO TAG - message
static BRACKETED_THREAD: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{2}:\d{2}:\d{2}\.\d{3})\s+\[([^\]]+)\]\s+([A-Z]+)\s+([^-]+)\s+-\s+(.*)$")
        .unwrap()
});

/// Parse one log line against the known grammars.
pub fn parse(line: &str) -> Option<LogcatEntry> {
    parse_with_reference(line, Local::now())
}

/// Like [`parse`], with an explicit reference "now" for timestamp
/// reconstruction. Tests use this to stay deterministic.
pub fn parse_with_reference(line: &str, now: DateTime<Local>) -> Option<LogcatEntry> {
    if line.trim().is_empty() {
        return None;
    }

    if let Some(m) = FULL_DATE.captures(line) {
        return Some(entry(
            &m[4],
            &m[5],
            &m[6],
            &m[7],
            &m[8],
            full_date_timestamp(&m[1], &m[2], &m[3]),
        ));
    }

    if let Some(m) = SHORT_DATE.captures(line) {
        return Some(entry(
            &m[3],
            &m[4],
            &m[5],
            &m[6],
            &m[7],
            short_date_timestamp(&m[1], &m[2], now),
        ));
    }

    if let Some(m) = BRACKETED_THREAD.captures(line) {
        // No pid/tid in this format, only a thread name
        return Some(entry("0", "0", &m[3], &m[4], &m[5], time_only_timestamp(&m[1], now)));
    }

    None
}

fn entry(pid: &str, tid: &str, level: &str, tag: &str, message: &str, timestamp: i64) -> LogcatEntry {
    if timestamp <= 0 {
        tracing::debug!("logcat line carries an invalid timestamp ({timestamp}), keeping entry");
    }
    LogcatEntry {
        level: level.to_string(),
        tag: tag.to_string(),
        pid: pid.parse().unwrap_or(0),
        tid: tid.parse().unwrap_or(0),
        timestamp,
        message: message.to_string(),
    }
}

/// Full date and an embedded UTC offset: interpret the wall-clock time in that
/// offset directly.
fn full_date_timestamp(date: &str, time: &str, offset: &str) -> i64 {
    let parsed = (|| {
        let date = NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()?;
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.3f").ok()?;
        let offset = parse_utc_offset(offset)?;
        offset
            .from_local_datetime(&date.and_time(time))
            .single()
            .map(|dt| dt.timestamp_millis())
    })();
    parsed.unwrap_or(-1)
}

/// MM-DD with no year: borrow the year from the reference "now" and interpret
/// the result as local time.
fn short_date_timestamp(date: &str, time: &str, now: DateTime<Local>) -> i64 {
    let parsed = (|| {
        let (month, day) = date.split_once('-')?;
        let date = NaiveDate::from_ymd_opt(now.year(), month.parse().ok()?, day.parse().ok()?)?;
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.3f").ok()?;
        Local
            .from_local_datetime(&date.and_time(time))
            .earliest()
            .map(|dt| dt.timestamp_millis())
    })();
    parsed.unwrap_or(-1)
}

/// Time only: borrow the whole date from the reference "now".
fn time_only_timestamp(time: &str, now: DateTime<Local>) -> i64 {
    let parsed = (|| {
        let time = NaiveTime::parse_from_str(time, "%H:%M:%S%.3f").ok()?;
        Local
            .from_local_datetime(&now.date_naive().and_time(time))
            .earliest()
            .map(|dt| dt.timestamp_millis())
    })();
    parsed.unwrap_or(-1)
}

/// Parse a `±HHMM` offset into a fixed timezone.
fn parse_utc_offset(text: &str) -> Option<FixedOffset> {
    let (sign, digits) = text.split_at(1);
    let hours: i32 = digits.get(..2)?.parse().ok()?;
    let minutes: i32 = digits.get(2..4)?.parse().ok()?;
    let seconds = (hours * 60 + minutes) * 60;
    match sign {
        "+" => FixedOffset::east_opt(seconds),
        "-" => FixedOffset::west_opt(seconds),
        _ => None,
    }
}
