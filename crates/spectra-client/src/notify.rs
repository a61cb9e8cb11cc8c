//! Transient user-facing notices.
//!
//! Failed or partially-completed operations push a typed notice here; a UI
//! drains them into toasts. Bounded ring buffer, oldest entries dropped.

use std::collections::VecDeque;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

/// Maximum number of notices retained.
const NOTICE_LOG_CAPACITY: usize = 100;

/// A transient notification surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    /// A mutating or fetch operation failed; optimistic state was rolled
    /// back and the original error logged.
    OperationFailed {
        operation: &'static str,
        message: String,
    },
    /// An add-channels request succeeded for some usernames only.
    PartiallyCompleted {
        operation: &'static str,
        failed: Vec<String>,
    },
}

/// A notice with the time it was raised.
#[derive(Debug, Clone)]
pub struct NoticeEntry {
    pub at: DateTime<Utc>,
    pub notice: Notice,
}

#[derive(Debug, Default)]
pub struct NoticeLog {
    entries: Mutex<VecDeque<NoticeEntry>>,
}

impl NoticeLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, notice: Notice) {
        let mut entries = self.entries.lock().expect("notice log poisoned");
        if entries.len() == NOTICE_LOG_CAPACITY {
            entries.pop_front();
        }
        entries.push_back(NoticeEntry {
            at: Utc::now(),
            notice,
        });
    }

    /// All retained notices, oldest first.
    pub fn recent(&self) -> Vec<NoticeEntry> {
        self.entries
            .lock()
            .expect("notice log poisoned")
            .iter()
            .cloned()
            .collect()
    }

    /// Remove and return all retained notices, oldest first.
    pub fn drain(&self) -> Vec<NoticeEntry> {
        self.entries
            .lock()
            .expect("notice log poisoned")
            .drain(..)
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().expect("notice log poisoned").is_empty()
    }
}
