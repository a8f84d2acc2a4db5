use std::{
    fs::OpenOptions,
    io::Write,
    sync::{
        Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use crate::trace::trace::{TraceEvent, TraceKind};

pub struct TraceLogger {
    file: Option<Mutex<std::fs::File>>,
    step: AtomicU64,
}

impl TraceLogger {
    pub fn new(path: &str) -> Self {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path);

        match file {
            Ok(f) => Self {
                file: Some(Mutex::new(f)),
                step: AtomicU64::new(0),
            },
            Err(e) => {
                eprintln!("Warning: could not open trace file '{}': {}", path, e);
                Self::disabled()
            }
        }
    }

    /// A logger that drops every event.
    pub fn disabled() -> Self {
        Self {
            file: None,
            step: AtomicU64::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.file.is_some()
    }

    /// Start an event stamped with the next step number.
    pub fn event(&self, state: impl ToString, kind: TraceKind) -> TraceEvent {
        let step = self.step.fetch_add(1, Ordering::Relaxed) + 1;
        TraceEvent::now(step, state, kind)
    }

    /// Append one event as a JSON line. Failures only warn on stderr.
    pub fn log(&self, event: &TraceEvent) {
        let Some(file) = &self.file else {
            return;
        };

        let line = match serde_json::to_string(event) {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Warning: could not serialize {:?} trace event: {}", event.kind, e);
                return;
            }
        };

        match file.lock() {
            Ok(mut file) => {
                if let Err(e) = writeln!(file, "{}", line) {
                    eprintln!("Warning: could not append trace event: {}", e);
                }
            }
            Err(e) => eprintln!("Warning: trace file lock poisoned: {}", e),
        }
    }
}

impl Default for TraceLogger {
    fn default() -> Self {
        Self::disabled()
    }
}
