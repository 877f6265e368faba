//! Error taxonomy for the extraction pipeline.

use thiserror::Error;

use crate::{semester::SemesterType, types::Participant};

/// Failures of the single outbound HTTP request.
#[derive(Error, Debug)]
pub enum FetchError {
    /// Transport-level failure reported by the HTTP client.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The request did not complete within the client timeout.
    #[error("network timeout")]
    Timeout,

    /// The endpoint answered with a non-success status code.
    #[error("unexpected HTTP status: {0}")]
    Status(reqwest::StatusCode),

    /// The endpoint answered 2xx with a blank document.
    #[error("response body is empty")]
    EmptyBody,
}

/// Failures of the timetable page parser.
///
/// A single malformed cell is never an error; the parser only fails when the
/// page's overall layout cannot be located at all.
#[derive(Error, Debug)]
pub enum ParseError {
    /// No table with a recognizable weekday header row exists in the page.
    #[error("timetable structure not found in page")]
    StructureNotFound,
}

/// Top-level error surfaced by [`crate::Schedule`].
///
/// Wraps the failing stage together with the participant identity and the
/// requested semester so a caller can tell which lookup went wrong.
#[derive(Error, Debug)]
pub enum Error {
    /// The HTTP fetch stage failed.
    #[error("fetching timetable for {participant} ({semester} {academic_year}): {source}")]
    Fetch {
        /// Identity the schedule was requested for.
        participant: Participant,
        /// Academic year bound at construction.
        academic_year: i32,
        /// Semester the failing call asked for.
        semester: SemesterType,
        /// Underlying fetch failure.
        source: FetchError,
    },

    /// The HTML parse stage failed.
    #[error("parsing timetable for {participant} ({semester} {academic_year}): {source}")]
    Parse {
        /// Identity the schedule was requested for.
        participant: Participant,
        /// Academic year bound at construction.
        academic_year: i32,
        /// Semester the failing call asked for.
        semester: SemesterType,
        /// Underlying parse failure.
        source: ParseError,
    },
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
