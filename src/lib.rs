//! UUST Schedule Library
//!
//! This library retrieves the published UUST class timetable and exposes it
//! as structured, date-resolved calendar events: it resolves a participant
//! (group, teacher, or room) to the remote timetable resource, parses the
//! semi-structured HTML grid, and expands weekly and one-off lessons into an
//! ordered event sequence for a semester.
//!
//! ```no_run
//! use uust_schedule::{ParticipantType, Schedule, SemesterType};
//!
//! let schedule = Schedule::new(ParticipantType::Group, 2575, 2023);
//! for event in schedule.get_events(SemesterType::Autumn)? {
//!     println!("{} {}", event.date(), event.subject);
//! }
//! # Ok::<(), uust_schedule::Error>(())
//! ```

pub mod error;
pub mod expand;
pub mod fetch;
pub mod parser;
pub mod schedule;
pub mod semester;
pub mod types;

// Re-export the public surface
pub use error::{Error, FetchError, ParseError, Result};
pub use expand::Events;
pub use fetch::HttpFetcher;
pub use schedule::Schedule;
pub use semester::{SemesterBounds, SemesterType};
pub use types::*;

/// Commonly used items
pub mod prelude {
    pub use crate::{error::*, expand::Events, fetch::*, schedule::*, semester::*, types::*};
}
