use std::sync::Mutex;

use log::{Level, LevelFilter, Log, Metadata, Record};
use soliloquy_core::{update, AppState, Msg, RequestFailure};

/// Keeps every record so tests can inspect levels.
struct CaptureLogger {
    records: Mutex<Vec<(Level, String)>>,
}

impl Log for CaptureLogger {
    fn enabled(&self, _metadata: &Metadata) -> bool {
        true
    }

    fn log(&self, record: &Record) {
        self.records
            .lock()
            .unwrap()
            .push((record.level(), record.args().to_string()));
    }

    fn flush(&self) {}
}

static LOGGER: CaptureLogger = CaptureLogger {
    records: Mutex::new(Vec::new()),
};

#[test]
fn core_logs_failures_below_warn() {
    log::set_logger(&LOGGER).unwrap();
    log::set_max_level(LevelFilter::Trace);

    let (state, _) = update(AppState::new(), Msg::Submit("Dune".to_string()));
    let (_, _) = update(
        state,
        Msg::RecommendationFailed {
            request_id: 1,
            failure: RequestFailure::Server { status: 502 },
        },
    );

    let records = LOGGER.records.lock().unwrap();
    let failure = records
        .iter()
        .find(|(_, text)| text.contains("failed"))
        .expect("failure is logged");
    assert_eq!(failure.0, Level::Debug);
    assert!(records.iter().all(|(level, _)| *level > Level::Warn));
}
