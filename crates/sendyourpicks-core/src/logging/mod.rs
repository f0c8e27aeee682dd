//! Structured diagnostic logging.
//!
//! Every record renders to a single line:
//!
//! ```text
//! [CATEGORY] [2025-09-07T17:30:05.000Z] [EVENT] key="text" key={json} key=42
//! ```
//!
//! Each domain (auth, API, picks, week, user, data) has its own closed event
//! enum and detail struct; all of them go through [`Logger::emit`]. Events
//! whose names contain `ERROR`, `FAILURE`, `INVALID` or `EXPIRED` are
//! error-level. Output goes to a pluggable [`LogSink`].

pub mod events;
pub mod logger;
pub mod record;
pub mod sink;

pub use events::{
    ApiDetails, ApiEvent, AuthDetails, AuthEvent, DataDetails, DataEvent, LogEvent, PicksDetails,
    PicksEvent, UserDetails, UserEvent, WeekDetails, WeekEvent,
};
pub use logger::Logger;
pub use record::{Category, Details, LogLevel, LogRecord};
pub use sink::{LogSink, MemorySink, TracingSink, EVENT_TARGET};
