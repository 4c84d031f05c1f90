use std::sync::{
    atomic::{AtomicU64, Ordering},
    Arc, Mutex,
};

use runtime::logging::{LineRunLogWriter, RunLogEvent, RunLogWriter};

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum StartRunError {
    RunIdOverflow,
}

type SharedRunLog = Arc<Mutex<Box<dyn RunLogWriter + Send>>>;

#[derive(Clone)]
pub struct AppState {
    next_run_id: Arc<AtomicU64>,
    run_log: SharedRunLog,
}

impl Default for AppState {
    fn default() -> Self {
        Self::with_run_log(Box::new(LineRunLogWriter::stderr()))
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_run_log(run_log: Box<dyn RunLogWriter + Send>) -> Self {
        Self {
            next_run_id: Arc::new(AtomicU64::new(0)),
            run_log: Arc::new(Mutex::new(run_log)),
        }
    }

    pub fn start_run(&self) -> Result<u64, StartRunError> {
        let previous = self
            .next_run_id
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |current| {
                current.checked_add(1)
            })
            .map_err(|_| StartRunError::RunIdOverflow)?;

        Ok(previous + 1)
    }

    /// Forwards events collected for one run, tagging each with its run id.
    pub fn forward_run_log(&self, run_id: u64, events: &[RunLogEvent]) {
        let mut sink = match self.run_log.lock() {
            Ok(sink) => sink,
            Err(poisoned) => poisoned.into_inner(),
        };
        for event in events {
            sink.write(event.clone().with_field("run_id", run_id));
        }
    }

    #[cfg(test)]
    pub(crate) fn with_next_run_id_for_test(next_run_id: u64) -> Self {
        let state = Self::with_run_log(Box::new(runtime::logging::InMemoryRunLogWriter::new()));
        state.next_run_id.store(next_run_id, Ordering::Relaxed);
        state
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use runtime::logging::{RunLogEvent, RunLogEventKind, RunLogWriter};

    use super::AppState;

    struct SharedLog(Arc<Mutex<Vec<RunLogEvent>>>);

    impl RunLogWriter for SharedLog {
        fn write(&mut self, event: RunLogEvent) {
            self.0.lock().unwrap().push(event);
        }
    }

    #[test]
    fn start_run_returns_overflow_error_at_u64_max() {
        let state = AppState::with_next_run_id_for_test(u64::MAX);

        assert!(state.start_run().is_err());
    }

    #[test]
    fn run_ids_are_sequential() {
        let state = AppState::with_next_run_id_for_test(0);

        assert_eq!(state.start_run(), Ok(1));
        assert_eq!(state.start_run(), Ok(2));
    }

    #[test]
    fn forwarded_events_carry_run_id() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let state = AppState::with_run_log(Box::new(SharedLog(Arc::clone(&events))));

        state.forward_run_log(
            7,
            &[RunLogEvent::new(3, RunLogEventKind::BacktestCompleted)],
        );

        let events = events.lock().unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].field("run_id"), Some("7"));
    }
}
