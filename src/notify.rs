use log::{info, warn};
use std::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Destructive,
}

/// A transient user-facing notice. Fire-and-forget: nothing in the core
/// waits on it or reads anything back.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn info(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notice {
            title: title.into(),
            description: description.into(),
            severity: Severity::Info,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notice {
            title: title.into(),
            description: description.into(),
            severity: Severity::Destructive,
        }
    }
}

pub trait Notifier: Send + Sync {
    fn display(&self, notice: Notice);
}

/// Prints notices to the terminal, the stand-in for the toast area.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn display(&self, notice: Notice) {
        match notice.severity {
            Severity::Info => {
                info!("notice: {}", notice.title);
                println!("[ok] {}: {}", notice.title, notice.description);
            }
            Severity::Destructive => {
                warn!("notice: {}", notice.title);
                println!("[!!] {}: {}", notice.title, notice.description);
            }
        }
    }
}

/// Test double that records every notice it is handed.
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().expect("notifier lock").clone()
    }

    pub fn titles(&self) -> Vec<String> {
        self.notices().into_iter().map(|n| n.title).collect()
    }
}

impl Notifier for RecordingNotifier {
    fn display(&self, notice: Notice) {
        self.notices.lock().expect("notifier lock").push(notice);
    }
}
