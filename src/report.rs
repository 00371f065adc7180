//! Progress reporting for the batch pipelines.
//!
//! The harvester and enricher never log directly; they hand every message to a
//! [`Reporter`]. The binary uses [`LogReporter`], which forwards to the `log`
//! facade, and tests use [`MemoryReporter`] to assert on what was reported.

use std::sync::Mutex;

/// Severity of a reported message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Debug,
    Info,
    Warn,
    Error,
}

impl From<Severity> for log::Level {
    fn from(s: Severity) -> Self {
        match s {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warn => log::Level::Warn,
            Severity::Error => log::Level::Error,
        }
    }
}

/// Receives progress and failure messages from the pipelines.
pub trait Reporter {
    fn report(&self, severity: Severity, message: &str);

    fn info(&self, message: &str) {
        self.report(Severity::Info, message);
    }

    fn warn(&self, message: &str) {
        self.report(Severity::Warn, message);
    }

    fn error(&self, message: &str) {
        self.report(Severity::Error, message);
    }
}

impl<R: Reporter + ?Sized> Reporter for &R {
    fn report(&self, severity: Severity, message: &str) {
        (**self).report(severity, message);
    }
}

/// Forwards messages to the `log` facade under a fixed target.
#[derive(Debug, Clone, Copy)]
pub struct LogReporter {
    target: &'static str,
}

impl LogReporter {
    pub fn new(target: &'static str) -> Self {
        LogReporter { target }
    }
}

impl Default for LogReporter {
    fn default() -> Self {
        LogReporter::new(module_path!())
    }
}

impl Reporter for LogReporter {
    fn report(&self, severity: Severity, message: &str) {
        log::log!(target: self.target, log::Level::from(severity), "{}", message);
    }
}

/// Keeps every message in memory.
#[derive(Debug, Default)]
pub struct MemoryReporter {
    messages: Mutex<Vec<(Severity, String)>>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// All messages reported so far, oldest first.
    pub fn messages(&self) -> Vec<(Severity, String)> {
        self.messages
            .lock()
            .map(|m| m.clone())
            .unwrap_or_default()
    }

    /// Messages of exactly `severity`.
    pub fn with_severity(&self, severity: Severity) -> Vec<String> {
        self.messages()
            .into_iter()
            .filter(|(s, _)| *s == severity)
            .map(|(_, m)| m)
            .collect()
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages().iter().any(|(_, m)| m.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn report(&self, severity: Severity, message: &str) {
        if let Ok(mut messages) = self.messages.lock() {
            messages.push((severity, message.to_string()));
        }
    }
}
