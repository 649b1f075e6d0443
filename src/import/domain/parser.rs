//! Free-text line parser producing import candidates.
//!
//! Accepted line shapes, most structured first:
//!
//! ```text
//! number<TAB>title text (URGENTE)<TAB>dd/mm/yyyy
//! number<TAB>title text
//! number  title text
//! title text
//! ```
//!
//! Parsing is deliberately lenient: each step is a best-effort extraction
//! over the remainder left by the previous one, so the order (trailing
//! date, then number split, then urgency marker) is load-bearing. Lines
//! that reduce to an empty title are skipped rather than rejected.

use super::ImportCandidate;
use crate::task::domain::{Priority, TaskNumber};
use chrono::NaiveDate;

/// Literal marker token that raises a line's priority to urgent.
const URGENCY_MARKER: &[u8] = b"(URGENTE)";

/// Returns a lazy, restartable iterator of candidates over pasted text,
/// preserving input order and skipping blank or titleless lines.
#[must_use]
pub fn candidates(text: &str) -> Candidates<'_> {
    Candidates {
        lines: text.lines(),
    }
}

/// Iterator over the parseable candidates of one pasted block.
#[derive(Debug, Clone)]
pub struct Candidates<'a> {
    lines: std::str::Lines<'a>,
}

impl Iterator for Candidates<'_> {
    type Item = ImportCandidate;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let line = self.lines.next()?;
            if let Some(candidate) = parse_line(line) {
                return Some(candidate);
            }
        }
    }
}

/// Parses one line; `None` for blank lines and lines without a title.
fn parse_line(line: &str) -> Option<ImportCandidate> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (without_date, occurred_on) = extract_trailing_date(trimmed);
    let (explicit_number, title_part) = split_number(&without_date);
    let (title_candidate, priority) = extract_urgency(title_part);

    let title = title_candidate.trim();
    if title.is_empty() {
        return None;
    }

    Some(ImportCandidate {
        explicit_number,
        title: title.to_owned(),
        priority,
        occurred_on,
    })
}

/// Extracts a trailing tab-separated date field, when the line has at
/// least two tab fields and the last one is a calendar-valid date. A field
/// that merely looks date-like but fails calendar validation stays in the
/// line.
fn extract_trailing_date(line: &str) -> (String, Option<NaiveDate>) {
    let fields: Vec<&str> = line.split('\t').collect();
    if fields.len() >= 2
        && let Some((last, rest)) = fields.split_last()
        && let Some(date) = parse_flexible_date(last)
    {
        return (rest.join("\t"), Some(date));
    }
    (line.to_owned(), None)
}

/// Parses `D[-/]M[-/]YYYY` (day-first) or `YYYY[-/]M[-/]D` (year-first);
/// separators may be mixed. Calendar-invalid values yield `None`.
fn parse_flexible_date(text: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = text.trim().split(['/', '-']).collect();
    let [first, second, third] = parts.as_slice() else {
        return None;
    };
    if first.len() == 4 {
        build_date(first, second, third)
    } else {
        build_date(third, second, first)
    }
}

fn build_date(year: &str, month: &str, day: &str) -> Option<NaiveDate> {
    if year.len() != 4 || month.is_empty() || month.len() > 2 || day.is_empty() || day.len() > 2 {
        return None;
    }
    if ![year, month, day]
        .iter()
        .all(|part| part.bytes().all(|byte| byte.is_ascii_digit()))
    {
        return None;
    }
    let y: i32 = year.parse().ok()?;
    let m: u32 = month.parse().ok()?;
    let d: u32 = day.parse().ok()?;
    NaiveDate::from_ymd_opt(y, m, d)
}

/// Splits off a leading explicit number.
///
/// Primary split: the first single tab or run of two or more whitespace
/// characters. Fallback for single-space lines: a leading digit run
/// followed by whitespace. An all-digit first part is consumed even when
/// it is out of range for a task number; a non-digit first part folds back
/// into the title.
fn split_number(line: &str) -> (Option<TaskNumber>, &str) {
    if let Some((first, rest)) = split_once_wide(line) {
        if is_all_digits(first) {
            return (parse_task_number(first), rest);
        }
        return (None, line);
    }
    if let Some((digits, rest)) = split_leading_digits(line) {
        return (parse_task_number(digits), rest);
    }
    (None, line)
}

/// Splits at the first single tab or maximal run of ≥2 whitespace
/// characters; the separator itself is dropped.
fn split_once_wide(line: &str) -> Option<(&str, &str)> {
    let mut chars = line.char_indices().peekable();
    while let Some((index, ch)) = chars.next() {
        if ch == '\t' {
            return Some((line.get(..index)?, line.get(index + 1..)?));
        }
        if ch.is_whitespace()
            && let Some((_, next_ch)) = chars.peek()
            && next_ch.is_whitespace()
        {
            let run = line.get(index..)?;
            let run_len = run
                .find(|c: char| !c.is_whitespace())
                .unwrap_or(run.len());
            return Some((line.get(..index)?, line.get(index + run_len..)?));
        }
    }
    None
}

/// Splits a leading digit run from the rest of the line across single
/// whitespace; both sides must be non-empty.
fn split_leading_digits(line: &str) -> Option<(&str, &str)> {
    let digits_len = line
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(line.len());
    if digits_len == 0 {
        return None;
    }
    let digits = line.get(..digits_len)?;
    let after = line.get(digits_len..)?;
    let rest = after.trim_start();
    if after.len() == rest.len() || rest.is_empty() {
        // No whitespace after the digits, or nothing behind it.
        return None;
    }
    Some((digits, rest))
}

fn is_all_digits(text: &str) -> bool {
    let trimmed = text.trim();
    !trimmed.is_empty() && trimmed.bytes().all(|byte| byte.is_ascii_digit())
}

fn parse_task_number(digits: &str) -> Option<TaskNumber> {
    let value: u32 = digits.trim().parse().ok()?;
    TaskNumber::new(value).ok()
}

/// Finds the urgency marker case-insensitively; everything from the
/// marker's start position onward is discarded from the title.
fn extract_urgency(title: &str) -> (&str, Priority) {
    let position = title
        .as_bytes()
        .windows(URGENCY_MARKER.len())
        .position(|window| window.eq_ignore_ascii_case(URGENCY_MARKER));
    position.map_or((title, Priority::default()), |index| {
        // The match starts at an ASCII byte, so the cut is a char boundary.
        (title.get(..index).unwrap_or(title), Priority::Urgent)
    })
}
