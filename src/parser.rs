//! HTML timetable page parsing into the intermediate grid.
//!
//! The page is a grid: a header row naming the working weekdays, then one
//! row per time slot with a leading time cell and one cell per weekday.
//! A cell stacks up to two lesson blocks that alternate by week parity.
//!
//! Text conventions inside a block are institution policy: the constants
//! and patterns below must be re-verified against the live page when the
//! institution changes its layout.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::{
    error::ParseError,
    types::{
        LESSON_TIMES, LessonKind, PartialDate, RawLesson, Recurrence, SLOT_COUNT, TimetableGrid,
        WEEKDAY_COUNT, WEEKDAY_NAMES,
    },
};

static TABLE_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());
static ROW_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td, th").unwrap());
static BLOCK_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("div.lesson").unwrap());

/// Bracketed explicit date list, e.g. "[04.09, 25.09]".
static DATE_LIST_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]*)\]").unwrap());
/// One date inside a list: DD.MM with an optional 2- or 4-digit year.
static DATE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})\.(\d{1,2})(?:\.(\d{2,4}))?$").unwrap());
/// Week-parity marker: "чет"/"неч" with an optional " нед." tail.
static PARITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(чет|неч(?:ет)?)\.?(?:\s*нед\.?)?$").unwrap());
/// Lesson kind abbreviation, full token only.
static KIND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(лек(?:ция)?|пр(?:ак(?:тика)?)?|лаб(?:а)?)\.?$").unwrap());
/// Room token: "N-NNN" building-room, optionally prefixed with "ауд.".
static ROOM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:ауд\.?\s*)?\d+[-/]\d{1,4}[а-яa-z]?$").unwrap());
/// Leading "HH:MM" of a row's time cell.
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,2}):(\d{2})").unwrap());

/// Parse a raw timetable page into the intermediate grid.
///
/// Fails only when no table with a recognizable weekday header exists;
/// individual malformed cells degrade into [`RawLesson::leftover`] instead.
pub fn parse(raw_html: &str) -> Result<TimetableGrid, ParseError> {
    let document = Html::parse_document(raw_html);
    let table = document
        .select(&TABLE_SEL)
        .find(|table| is_timetable(*table))
        .ok_or(ParseError::StructureNotFound)?;

    let mut grid = TimetableGrid::empty();
    let mut position = 0;
    for row in table.select(&ROW_SEL) {
        let cells: Vec<ElementRef> = row.select(&CELL_SEL).collect();
        if cells.is_empty() || is_header_row(&cells) {
            continue;
        }
        if cells.len() < 2 {
            continue;
        }

        let time_text = cell_text(cells[0]);
        let Some(slot) = slot_index(&time_text, position) else {
            tracing::warn!("Skipping unrecognized slot row at {:?}", time_text);
            continue;
        };
        position += 1;

        for (weekday, cell) in cells[1..].iter().take(WEEKDAY_COUNT).enumerate() {
            let blocks = lesson_blocks(*cell);
            if blocks.len() > 2 {
                tracing::warn!(
                    "Cell {}/{} holds {} lesson blocks, expected at most two",
                    weekday,
                    slot,
                    blocks.len()
                );
            }
            for block in blocks {
                grid.push_lesson(parse_lesson_text(&block, weekday, slot));
            }
        }
    }

    Ok(grid)
}

/// A table qualifies when its header mentions the first working weekday.
fn is_timetable(table: ElementRef) -> bool {
    table.text().any(|chunk| chunk.contains(WEEKDAY_NAMES[0]))
}

fn is_header_row(cells: &[ElementRef]) -> bool {
    cells.iter().any(|cell| {
        let text = cell_text(*cell);
        WEEKDAY_NAMES.iter().any(|name| text.contains(name))
    })
}

/// Element text with whitespace collapsed.
fn cell_text(element: ElementRef) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a row to its slot index by start time, by position as fallback.
fn slot_index(time_text: &str, position: usize) -> Option<usize> {
    if let Some(minutes) = start_minutes(time_text) {
        if let Some(found) = LESSON_TIMES.iter().position(|&(start, _)| start == minutes) {
            return Some(found);
        }
    }
    (position < SLOT_COUNT).then_some(position)
}

fn start_minutes(time_text: &str) -> Option<u32> {
    let caps = TIME_RE.captures(time_text)?;
    let hours: u32 = caps[1].parse().ok()?;
    let minutes: u32 = caps[2].parse().ok()?;
    (hours < 24 && minutes < 60).then_some(hours * 60 + minutes)
}

/// Lesson block texts of one cell, top to bottom.
///
/// Pages mark stacked blocks with `div.lesson`; a cell that inlines a
/// single lesson without markup contributes its own text as one block.
fn lesson_blocks(cell: ElementRef) -> Vec<String> {
    let blocks: Vec<String> = cell
        .select(&BLOCK_SEL)
        .map(cell_text)
        .filter(|text| !text.is_empty())
        .collect();
    if !blocks.is_empty() {
        return blocks;
    }
    let text = cell_text(cell);
    if text.is_empty() { Vec::new() } else { vec![text] }
}

/// Tokenize one lesson block's free text.
///
/// The leading token is the subject. Every further comma-separated token is
/// matched against the kind, parity, and room conventions; the first
/// unmatched token is the counterpart name. Whatever still fails to match
/// is kept verbatim in `leftover` so a degraded parse stays detectable.
fn parse_lesson_text(text: &str, weekday: usize, slot: usize) -> RawLesson {
    let mut leftover: Vec<String> = Vec::new();
    let mut recurrence = Recurrence::EveryWeek;

    let remaining = if let Some(caps) = DATE_LIST_RE.captures(text) {
        let mut dates = Vec::new();
        for token in caps[1]
            .split([',', ';'])
            .map(str::trim)
            .filter(|token| !token.is_empty())
        {
            match parse_partial_date(token) {
                Some(date) => dates.push(date),
                None => leftover.push(token.to_string()),
            }
        }
        if !dates.is_empty() {
            recurrence = Recurrence::Dates(dates);
        }
        DATE_LIST_RE.replace(text, "").into_owned()
    } else {
        text.to_string()
    };

    let mut subject = String::new();
    let mut kind = LessonKind::Other;
    let mut location = None;
    let mut counterpart = None;

    for token in remaining
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
    {
        if subject.is_empty() {
            subject = token.to_string();
        } else if KIND_RE.is_match(token) {
            if kind == LessonKind::Other {
                kind = classify_kind(token);
            } else {
                leftover.push(token.to_string());
            }
        } else if PARITY_RE.is_match(token) {
            if recurrence == Recurrence::EveryWeek {
                recurrence = classify_parity(token);
            } else {
                leftover.push(token.to_string());
            }
        } else if ROOM_RE.is_match(token) {
            if location.is_none() {
                location = Some(token.to_string());
            } else {
                leftover.push(token.to_string());
            }
        } else if counterpart.is_none() {
            counterpart = Some(token.to_string());
        } else {
            leftover.push(token.to_string());
        }
    }

    if !leftover.is_empty() {
        tracing::warn!(
            "Unparsed remainder in cell {}/{}: {:?}",
            weekday,
            slot,
            leftover
        );
    }

    RawLesson {
        subject,
        kind,
        location,
        counterpart,
        weekday,
        slot,
        recurrence,
        leftover: leftover.join("; "),
    }
}

fn classify_kind(token: &str) -> LessonKind {
    let lower = token.to_lowercase();
    if lower.starts_with("лек") {
        LessonKind::Lecture
    } else if lower.starts_with("лаб") {
        LessonKind::Lab
    } else {
        LessonKind::Practice
    }
}

fn classify_parity(token: &str) -> Recurrence {
    if token.to_lowercase().starts_with("неч") {
        Recurrence::OddWeek
    } else {
        Recurrence::EvenWeek
    }
}

fn parse_partial_date(token: &str) -> Option<PartialDate> {
    let caps = DATE_RE.captures(token)?;
    let day: u32 = caps[1].parse().ok()?;
    let month: u32 = caps[2].parse().ok()?;
    if day == 0 || day > 31 || month == 0 || month > 12 {
        return None;
    }
    let year = caps.get(3).and_then(|m| m.as_str().parse::<i32>().ok());
    Some(PartialDate { day, month, year })
}

#[cfg(test)]
mod tests;
