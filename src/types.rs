//! Core data model: participants, raw lessons, the intermediate grid, and
//! the public [`Event`] type.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone};
use serde::{Deserialize, Serialize};

/// Working weekdays on a timetable page.
pub const WEEKDAY_COUNT: usize = 6;

/// Time slots per day.
pub const SLOT_COUNT: usize = 10;

/// Weekday names as they appear in the page header.
pub const WEEKDAY_NAMES: [&str; 7] = [
    "Понедельник",
    "Вторник",
    "Среда",
    "Четверг",
    "Пятница",
    "Суббота",
    "Воскресенье",
];

/// Slot start/end in minutes from midnight, institution timetable.
pub const LESSON_TIMES: [(u32, u32); SLOT_COUNT] = [
    (8 * 60, 9 * 60 + 20),         // 1: 08:00-09:20
    (9 * 60 + 35, 10 * 60 + 55),   // 2: 09:35-10:55
    (11 * 60 + 35, 12 * 60 + 55),  // 3: 11:35-12:55
    (13 * 60 + 10, 14 * 60 + 30),  // 4: 13:10-14:30
    (15 * 60 + 10, 16 * 60 + 30),  // 5: 15:10-16:30
    (16 * 60 + 45, 18 * 60 + 5),   // 6: 16:45-18:05
    (18 * 60 + 20, 19 * 60 + 40),  // 7: 18:20-19:40
    (19 * 60 + 55, 21 * 60 + 15),  // 8: 19:55-21:15
    (21 * 60 + 25, 22 * 60 + 45),  // 9: 21:25-22:45
    (22 * 60 + 55, 23 * 60 + 55),  // 10: 22:55-23:55
];

/// Institution timezone (Asia/Yekaterinburg, UTC+5, no DST).
pub fn timezone() -> FixedOffset {
    FixedOffset::east_opt(5 * 3600).unwrap()
}

/// Localize a date plus minutes-from-midnight into the institution timezone.
pub(crate) fn localize(date: NaiveDate, minutes: u32) -> DateTime<FixedOffset> {
    let naive = date
        .and_hms_opt(minutes / 60, minutes % 60, 0)
        .expect("slot times stay within one day");
    timezone()
        .from_local_datetime(&naive)
        .single()
        .expect("fixed offset is unambiguous")
}

/// What kind of entity a schedule is requested for.
///
/// The discriminant is the endpoint's `WhatShow` query value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParticipantType {
    /// A student group.
    Group = 1,
    /// A teacher.
    Teacher = 2,
    /// A room.
    Room = 3,
}

impl ParticipantType {
    /// Value of the `WhatShow` query parameter.
    pub fn what_show(self) -> u8 {
        self as u8
    }

    /// Query key carrying the participant id for this type.
    pub fn id_query_key(self) -> &'static str {
        match self {
            Self::Group => "student_group_id",
            Self::Teacher => "teacher",
            Self::Room => "aud",
        }
    }
}

/// The schedule subject: a participant type plus its numeric id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Participant {
    /// Which endpoint/query shape to use.
    pub kind: ParticipantType,
    /// Remote identifier of the group, teacher, or room.
    pub id: u32,
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            ParticipantType::Group => "group",
            ParticipantType::Teacher => "teacher",
            ParticipantType::Room => "room",
        };
        write!(f, "{} {}", kind, self.id)
    }
}

/// Lesson kind decoded from the page's abbreviations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LessonKind {
    /// Лекция.
    Lecture,
    /// Практика.
    Practice,
    /// Лабораторная работа.
    Lab,
    /// No or unrecognized kind annotation.
    Other,
}

/// A day-of-month/month pair from a bracketed date override, year optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartialDate {
    /// Day of month, 1-31.
    pub day: u32,
    /// Month, 1-12.
    pub month: u32,
    /// Explicit year, if the page wrote one.
    pub year: Option<i32>,
}

/// How a lesson recurs over the semester.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recurrence {
    /// Every week of the semester.
    EveryWeek,
    /// Odd weeks only, week 1 being the week containing the semester start.
    OddWeek,
    /// Even weeks only.
    EvenWeek,
    /// Exactly the listed dates, intersected with the semester bounds.
    Dates(Vec<PartialDate>),
}

/// One parsed lesson block, prior to date resolution.
///
/// Lives only inside a single parse/expand cycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawLesson {
    /// Subject name, the block's leading token.
    pub subject: String,
    /// Lesson kind.
    pub kind: LessonKind,
    /// Room for a group/teacher query.
    pub location: Option<String>,
    /// Counterpart name: teacher for a group query, group for a teacher
    /// query, and so on.
    pub counterpart: Option<String>,
    /// Weekday column index, 0 = Monday.
    pub weekday: usize,
    /// Time slot index, 0-based.
    pub slot: usize,
    /// Recurrence annotation, defaults to every week.
    pub recurrence: Recurrence,
    /// Tokens that matched no known convention. Empty on a clean parse.
    pub leftover: String,
}

/// One timetable cell: up to two lesson blocks sharing a weekday/slot pair.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotCell {
    /// Lesson blocks found in the cell, top to bottom.
    pub lessons: Vec<RawLesson>,
}

/// One weekday column of the grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayColumn {
    /// Weekday index, 0 = Monday.
    pub weekday: usize,
    /// Exactly [`SLOT_COUNT`] cells, empty cells included.
    pub slots: Vec<SlotCell>,
}

/// The parsed-but-not-date-resolved grid representation of one page.
///
/// Always [`WEEKDAY_COUNT`] columns of [`SLOT_COUNT`] cells each.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimetableGrid {
    /// Weekday columns, Monday first.
    pub days: Vec<DayColumn>,
}

impl TimetableGrid {
    /// A grid of the full institutional shape with every cell empty.
    pub fn empty() -> Self {
        Self {
            days: (0..WEEKDAY_COUNT)
                .map(|weekday| DayColumn {
                    weekday,
                    slots: vec![SlotCell::default(); SLOT_COUNT],
                })
                .collect(),
        }
    }

    /// Place a lesson into its weekday/slot cell.
    pub fn push_lesson(&mut self, lesson: RawLesson) {
        let (weekday, slot) = (lesson.weekday, lesson.slot);
        self.days[weekday].slots[slot].lessons.push(lesson);
    }
}

impl Default for TimetableGrid {
    fn default() -> Self {
        Self::empty()
    }
}

/// A single date-resolved schedule event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Subject name.
    pub subject: String,
    /// Lesson kind.
    pub kind: LessonKind,
    /// Room or venue, when the page names one.
    pub location: Option<String>,
    /// Counterpart name: teacher for a group query, group for a teacher
    /// query, and so on.
    pub counterpart: Option<String>,
    /// Who the schedule was requested for.
    pub participant: Participant,
    /// Localized start of the event.
    pub start: DateTime<FixedOffset>,
    /// Localized end of the event.
    pub end: DateTime<FixedOffset>,
    /// Time slot index, 0-based.
    pub slot: usize,
    /// Unparsed remainder carried over from the source cell, if any.
    /// Lets consumers detect a degraded parse without aborting the page.
    pub leftover: Option<String>,
}

impl Event {
    /// Calendar date of the event.
    pub fn date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    /// Daily event sequence number, 1-based.
    pub fn daily_number(&self) -> usize {
        self.slot + 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_participant_display() {
        let p = Participant {
            kind: ParticipantType::Group,
            id: 2575,
        };
        assert_eq!(p.to_string(), "group 2575");

        let p = Participant {
            kind: ParticipantType::Room,
            id: 17,
        };
        assert_eq!(p.to_string(), "room 17");
    }

    #[test]
    fn test_id_query_keys() {
        assert_eq!(ParticipantType::Group.id_query_key(), "student_group_id");
        assert_eq!(ParticipantType::Teacher.id_query_key(), "teacher");
        assert_eq!(ParticipantType::Room.id_query_key(), "aud");
        assert_eq!(ParticipantType::Teacher.what_show(), 2);
    }

    #[test]
    fn test_empty_grid_shape() {
        let grid = TimetableGrid::empty();
        assert_eq!(grid.days.len(), WEEKDAY_COUNT);
        for (i, day) in grid.days.iter().enumerate() {
            assert_eq!(day.weekday, i);
            assert_eq!(day.slots.len(), SLOT_COUNT);
            assert!(day.slots.iter().all(|cell| cell.lessons.is_empty()));
        }
    }

    #[test]
    fn test_localize_keeps_wall_clock() {
        let date = NaiveDate::from_ymd_opt(2023, 9, 4).unwrap();
        let dt = localize(date, LESSON_TIMES[0].0);
        assert_eq!(dt.to_rfc3339(), "2023-09-04T08:00:00+05:00");
    }
}
