//! Transient user feedback.
//!
//! A notification is visible for the display period, then spends the exit
//! period in an exiting phase, then disappears. Phases are derived from the
//! clock when the list is read, so no timers run in the background.

use std::collections::VecDeque;
use std::fmt;
use std::time::Duration;

use marquee_config::NotificationConfig;
use parking_lot::Mutex;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationPhase {
    Visible,
    Exiting,
}

/// A notification as it should currently be shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub severity: Severity,
    pub created_at: Instant,
    pub phase: NotificationPhase,
}

#[derive(Debug)]
struct Entry {
    id: Uuid,
    title: String,
    message: String,
    severity: Severity,
    created_at: Instant,
    exit_at: Instant,
}

impl Entry {
    fn phase(&self, now: Instant, exit: Duration) -> Option<NotificationPhase> {
        if now < self.exit_at {
            Some(NotificationPhase::Visible)
        } else if now < self.exit_at + exit {
            Some(NotificationPhase::Exiting)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Timing {
    display: Duration,
    exit: Duration,
    capacity: usize,
}

/// Bottom-stacked list of transient notifications, oldest first.
///
/// The list is bounded: when full, the oldest exiting entry is evicted, or
/// the oldest entry when none is exiting. Identical messages are not merged.
#[derive(Debug)]
pub struct NotificationService {
    entries: Mutex<VecDeque<Entry>>,
    timing: Mutex<Timing>,
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new(&NotificationConfig::default())
    }
}

impl NotificationService {
    pub fn new(config: &NotificationConfig) -> Self {
        Self {
            entries: Mutex::new(VecDeque::with_capacity(config.capacity)),
            timing: Mutex::new(Timing::from(config)),
        }
    }

    /// Apply new timings and capacity; existing entries keep their schedule.
    pub fn reconfigure(&self, config: &NotificationConfig) {
        *self.timing.lock() = Timing::from(config);
    }

    pub fn notify(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
        severity: Severity,
    ) -> Uuid {
        let timing = *self.timing.lock();
        let now = Instant::now();
        let entry = Entry {
            id: Uuid::now_v7(),
            title: title.into(),
            message: message.into(),
            severity,
            created_at: now,
            exit_at: now + timing.display,
        };
        let id = entry.id;
        debug!(%id, %severity, title = %entry.title, "notification raised");

        let mut entries = self.entries.lock();
        purge(&mut entries, now, timing.exit);
        while entries.len() >= timing.capacity.max(1) {
            let victim = entries
                .iter()
                .position(|existing| {
                    existing.phase(now, timing.exit)
                        == Some(NotificationPhase::Exiting)
                })
                .unwrap_or(0);
            entries.remove(victim);
        }
        entries.push_back(entry);
        id
    }

    pub fn info(&self, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.notify(title, message, Severity::Info)
    }

    pub fn success(
        &self,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Uuid {
        self.notify(title, message, Severity::Success)
    }

    pub fn error(&self, title: impl Into<String>, message: impl Into<String>) -> Uuid {
        self.notify(title, message, Severity::Error)
    }

    /// Start the exit phase of a visible notification now.
    pub fn dismiss(&self, id: Uuid) -> bool {
        let now = Instant::now();
        let mut entries = self.entries.lock();
        match entries.iter_mut().find(|entry| entry.id == id) {
            Some(entry) if entry.exit_at > now => {
                entry.exit_at = now;
                true
            }
            _ => false,
        }
    }

    /// Notifications still on screen, oldest first.
    pub fn active(&self) -> Vec<Notification> {
        let exit = self.timing.lock().exit;
        let now = Instant::now();
        let mut entries = self.entries.lock();
        purge(&mut entries, now, exit);
        entries
            .iter()
            .filter_map(|entry| {
                entry.phase(now, exit).map(|phase| Notification {
                    id: entry.id,
                    title: entry.title.clone(),
                    message: entry.message.clone(),
                    severity: entry.severity,
                    created_at: entry.created_at,
                    phase,
                })
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.active().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl From<&NotificationConfig> for Timing {
    fn from(config: &NotificationConfig) -> Self {
        Self {
            display: config.display,
            exit: config.exit,
            capacity: config.capacity,
        }
    }
}

fn purge(entries: &mut VecDeque<Entry>, now: Instant, exit: Duration) {
    entries.retain(|entry| entry.phase(now, exit).is_some());
}
