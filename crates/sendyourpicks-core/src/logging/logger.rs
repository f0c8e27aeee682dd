use std::fmt;
use std::sync::Arc;

use super::events::{
    ApiDetails, ApiEvent, AuthDetails, AuthEvent, DataDetails, DataEvent, LogEvent, PicksDetails,
    PicksEvent, UserDetails, UserEvent, WeekDetails, WeekEvent,
};
use super::record::{Category, Details, LogLevel, LogRecord};
use super::sink::{LogSink, TracingSink};

/// Structured event logger.
/// Clone is cheap - all clones share the same sink.
#[derive(Clone)]
pub struct Logger {
    sink: Arc<dyn LogSink>,
}

impl Logger {
    pub fn new(sink: Arc<dyn LogSink>) -> Self {
        Self { sink }
    }

    /// Logger that writes through `tracing`.
    pub fn tracing() -> Self {
        Self::new(Arc::new(TracingSink))
    }

    /// Format and emit one record. Never fails.
    pub fn log(&self, category: Category, event: &str, level: LogLevel, details: Details) {
        self.sink.emit(&LogRecord::new(category, event, level, details));
    }

    /// Emit a typed event at the level its name implies.
    pub fn emit<E: LogEvent>(&self, event: E, details: impl Into<Details>) {
        self.log(E::CATEGORY, event.name(), event.level(), details.into());
    }

    pub fn auth(&self, event: AuthEvent, entry: AuthDetails) {
        let mut record = LogRecord::new(Category::Auth, event.name(), event.level(), entry.details);
        record.email = entry.email;
        record.error = entry.error;
        self.sink.emit(&record);
    }

    pub fn api(&self, event: ApiEvent, details: ApiDetails) {
        self.emit(event, details);
    }

    pub fn picks(&self, event: PicksEvent, details: PicksDetails) {
        self.emit(event, details);
    }

    pub fn week(&self, event: WeekEvent, details: WeekDetails) {
        self.emit(event, details);
    }

    pub fn user(&self, event: UserEvent, details: UserDetails) {
        self.emit(event, details);
    }

    pub fn data(&self, event: DataEvent, details: DataDetails) {
        self.emit(event, details);
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::tracing()
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::MemorySink;

    fn capture() -> (Logger, MemorySink) {
        let sink = MemorySink::new();
        (Logger::new(Arc::new(sink.clone())), sink)
    }

    #[test]
    fn test_typed_events_pick_category_and_level() {
        let (logger, sink) = capture();
        logger.picks(
            PicksEvent::SubmitFailure,
            PicksDetails {
                week_id: Some("wk_01".to_string()),
                error: Some("Game already started".to_string()),
                ..Default::default()
            },
        );
        logger.data(DataEvent::StandingsLoadSuccess, DataDetails::default());

        let records = sink.records();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].category, Category::Picks);
        assert_eq!(records[0].level, LogLevel::Error);
        assert!(records[0]
            .render()
            .ends_with("[SUBMIT_FAILURE] weekId=\"wk_01\" error=\"Game already started\""));
        assert_eq!(records[1].level, LogLevel::Info);
        assert!(records[1].render().ends_with("[STANDINGS_LOAD_SUCCESS]"));
    }

    #[test]
    fn test_auth_entry_keeps_email_and_error() {
        let (logger, sink) = capture();
        logger.auth(
            AuthEvent::LoginFailure,
            AuthDetails {
                email: Some("pat@example.com".to_string()),
                error: Some("Invalid login credentials".to_string()),
                details: Details::new(),
            },
        );
        let line = &sink.lines()[0];
        assert!(line.starts_with("[AUTH] ["));
        assert!(line.ends_with(
            "[LOGIN_FAILURE] email=pat@example.com error=\"Invalid login credentials\""
        ));
    }

    #[test]
    fn test_explicit_warn_level() {
        let (logger, sink) = capture();
        logger.log(Category::Week, "STATE_TRANSITION", LogLevel::Warn, Details::new());
        assert_eq!(sink.records()[0].level, LogLevel::Warn);
    }
}
