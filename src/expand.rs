//! Expansion of the intermediate grid into date-resolved events.
//!
//! Pure and I/O-free: a function of the grid and the semester bounds, so it
//! can be unit-tested against literal date ranges.

use chrono::{Datelike, Duration, NaiveDate};

use crate::{
    semester::SemesterBounds,
    types::{
        Event, LESSON_TIMES, Participant, PartialDate, RawLesson, Recurrence, TimetableGrid,
        localize,
    },
};

/// Expand every lesson of the grid into concrete events, ordered by start
/// datetime, then slot.
pub fn expand(grid: &TimetableGrid, participant: Participant, bounds: &SemesterBounds) -> Vec<Event> {
    let mut events = Vec::new();
    for day in &grid.days {
        for cell in &day.slots {
            for lesson in &cell.lessons {
                for date in dates_for(lesson, bounds) {
                    events.push(build_event(lesson, participant, date));
                }
            }
        }
    }
    events.sort_by_key(|event| (event.start, event.slot));
    events
}

/// Concrete dates a lesson occurs on within the bounds.
fn dates_for(lesson: &RawLesson, bounds: &SemesterBounds) -> Vec<NaiveDate> {
    match &lesson.recurrence {
        Recurrence::EveryWeek => weekday_dates(lesson.weekday, bounds, None),
        Recurrence::OddWeek => weekday_dates(lesson.weekday, bounds, Some(1)),
        Recurrence::EvenWeek => weekday_dates(lesson.weekday, bounds, Some(0)),
        Recurrence::Dates(listed) => listed
            .iter()
            .filter_map(|date| resolve_date(*date, bounds))
            // Source pages sometimes list dates spanning adjacent terms.
            .filter(|date| bounds.contains(*date))
            .collect(),
    }
}

/// Dates on `weekday` inside the bounds, optionally restricted to weeks of
/// the given parity (week 1 counts as odd).
fn weekday_dates(weekday: usize, bounds: &SemesterBounds, parity: Option<i64>) -> Vec<NaiveDate> {
    let start_weekday = i64::from(bounds.start.weekday().num_days_from_monday());
    let offset = (weekday as i64 - start_weekday).rem_euclid(7);
    let mut date = bounds.start + Duration::days(offset);

    let mut dates = Vec::new();
    while date <= bounds.end {
        if parity.is_none_or(|p| bounds.week_number(date) % 2 == p) {
            dates.push(date);
        }
        date += Duration::days(7);
    }
    dates
}

fn resolve_date(date: PartialDate, bounds: &SemesterBounds) -> Option<NaiveDate> {
    let year = bounds.resolve_year(date);
    let resolved = NaiveDate::from_ymd_opt(year, date.month, date.day);
    if resolved.is_none() {
        tracing::warn!("Dropping invalid override date {}.{}.{}", date.day, date.month, year);
    }
    resolved
}

fn build_event(lesson: &RawLesson, participant: Participant, date: NaiveDate) -> Event {
    let (start_minutes, end_minutes) = LESSON_TIMES[lesson.slot];
    Event {
        subject: lesson.subject.clone(),
        kind: lesson.kind,
        location: lesson.location.clone(),
        counterpart: lesson.counterpart.clone(),
        participant,
        start: localize(date, start_minutes),
        end: localize(date, end_minutes),
        slot: lesson.slot,
        leftover: if lesson.leftover.is_empty() {
            None
        } else {
            Some(lesson.leftover.clone())
        },
    }
}

/// A finite, restartable event sequence.
///
/// Each facade call builds an independent `Events`; consuming one partially
/// has no effect on later calls.
#[derive(Debug)]
pub struct Events {
    inner: std::vec::IntoIter<Event>,
}

impl Events {
    pub(crate) fn new(events: Vec<Event>) -> Self {
        Self {
            inner: events.into_iter(),
        }
    }
}

impl Iterator for Events {
    type Item = Event;

    fn next(&mut self) -> Option<Event> {
        self.inner.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.inner.size_hint()
    }
}

impl ExactSizeIterator for Events {}
