//! Semester types and academic-year date arithmetic.

use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::types::PartialDate;

/// Semester within an academic year.
///
/// The discriminant is the trailing digit of the endpoint's
/// `schedule_semestr_id` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SemesterType {
    /// Academic-year start through December 31.
    Autumn = 1,
    /// January 1 through the day before the next academic year starts.
    Spring = 2,
}

impl SemesterType {
    /// Trailing digit of the remote `schedule_semestr_id` parameter.
    pub fn semester_id_digit(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for SemesterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Autumn => write!(f, "autumn"),
            Self::Spring => write!(f, "spring"),
        }
    }
}

/// Start of the academic year: Monday of the week containing September 1.
pub fn academic_year_start(year: i32) -> NaiveDate {
    let first_september = NaiveDate::from_ymd_opt(year, 9, 1).unwrap();
    first_september
        - Duration::days(i64::from(first_september.weekday().num_days_from_monday()))
}

/// Which academic year and semester a calendar date falls in.
pub fn detect_semester(date: NaiveDate) -> (i32, SemesterType) {
    let year = date.year();
    if date >= academic_year_start(year) {
        (year, SemesterType::Autumn)
    } else {
        (year - 1, SemesterType::Spring)
    }
}

/// Concrete calendar boundaries of one semester.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SemesterBounds {
    /// Semester these bounds were computed for.
    pub semester: SemesterType,
    /// Academic year these bounds were computed for.
    pub academic_year: i32,
    /// First date of the semester, inclusive.
    pub start: NaiveDate,
    /// Last date of the semester, inclusive.
    pub end: NaiveDate,
    /// Monday of week 1, the week containing `start`. Anchors week parity.
    pub first_monday: NaiveDate,
}

impl SemesterBounds {
    /// Boundaries of `semester` within the academic year starting in
    /// September of `academic_year`.
    pub fn of(academic_year: i32, semester: SemesterType) -> Self {
        let (start, end) = match semester {
            SemesterType::Autumn => (
                academic_year_start(academic_year),
                NaiveDate::from_ymd_opt(academic_year, 12, 31).unwrap(),
            ),
            SemesterType::Spring => (
                NaiveDate::from_ymd_opt(academic_year + 1, 1, 1).unwrap(),
                academic_year_start(academic_year + 1) - Duration::days(1),
            ),
        };
        let first_monday =
            start - Duration::days(i64::from(start.weekday().num_days_from_monday()));
        Self {
            semester,
            academic_year,
            start,
            end,
            first_monday,
        }
    }

    /// Whether a date lies inside the semester, boundaries included.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// 1-based week number of a date relative to the semester's first week.
    pub fn week_number(&self, date: NaiveDate) -> i64 {
        let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
        (monday - self.first_monday).num_days() / 7 + 1
    }

    /// Resolve a partial date's year against the academic year: September
    /// through December belong to the starting year, the rest to the next.
    pub fn resolve_year(&self, date: PartialDate) -> i32 {
        match date.year {
            Some(year) if year < 100 => 2000 + year,
            Some(year) => year,
            None if date.month >= 9 => self.academic_year,
            None => self.academic_year + 1,
        }
    }
}
