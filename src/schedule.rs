//! The public facade binding a participant identity to the pipeline.

use crate::{
    error::{Error, Result},
    expand::{self, Events},
    fetch::HttpFetcher,
    parser,
    semester::{SemesterBounds, SemesterType},
    types::{Participant, ParticipantType},
};

/// A schedule bound to one participant and academic year.
///
/// Stateless between calls: every [`Schedule::get_events`] re-fetches and
/// re-parses the page, so results are never stale and independent instances
/// can run concurrently without coordination.
pub struct Schedule {
    participant: Participant,
    academic_year: i32,
    fetcher: HttpFetcher,
}

impl Schedule {
    /// Bind a participant identity against the production endpoint.
    pub fn new(participant_type: ParticipantType, participant_id: u32, academic_year: i32) -> Self {
        Self::with_fetcher(
            participant_type,
            participant_id,
            academic_year,
            HttpFetcher::new(),
        )
    }

    /// Bind a participant identity with a custom fetcher, e.g. one pointed
    /// at a mirror.
    pub fn with_fetcher(
        participant_type: ParticipantType,
        participant_id: u32,
        academic_year: i32,
        fetcher: HttpFetcher,
    ) -> Self {
        Self {
            participant: Participant {
                kind: participant_type,
                id: participant_id,
            },
            academic_year,
            fetcher,
        }
    }

    /// The bound participant identity.
    pub fn participant(&self) -> Participant {
        self.participant
    }

    /// The bound academic year.
    pub fn academic_year(&self) -> i32 {
        self.academic_year
    }

    /// Fetch, parse, and expand the timetable for one semester.
    ///
    /// Performs exactly one outbound request. Any fetch or parse failure
    /// aborts the call and carries the participant identity and semester;
    /// a failed call yields an error, never a silently empty sequence.
    pub fn get_events(&self, semester: SemesterType) -> Result<Events> {
        let bounds = SemesterBounds::of(self.academic_year, semester);

        let html = self
            .fetcher
            .fetch(self.participant, self.academic_year, semester)
            .map_err(|source| Error::Fetch {
                participant: self.participant,
                academic_year: self.academic_year,
                semester,
                source,
            })?;

        let grid = parser::parse(&html).map_err(|source| Error::Parse {
            participant: self.participant,
            academic_year: self.academic_year,
            semester,
            source,
        })?;

        let events = expand::expand(&grid, self.participant, &bounds);
        tracing::info!(
            "Expanded {} events for {} ({} {})",
            events.len(),
            self.participant,
            semester,
            self.academic_year
        );
        Ok(Events::new(events))
    }
}
