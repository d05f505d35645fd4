use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;

/// Oldest notices are dropped once this many are queued.
const MAX_NOTICES: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A user-facing notification. Failures are reported this way and never abort
/// the session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

/// Shared FIFO of notices for one session, drained by the client.
#[derive(Debug, Clone, Default)]
pub struct Notices {
    queue: Arc<Mutex<VecDeque<Notice>>>,
}

impl Notices {
    pub fn info(&self, title: &str, description: impl Into<String>) {
        self.push(NoticeLevel::Info, title, description.into());
    }

    pub fn error(&self, title: &str, description: impl Into<String>) {
        self.push(NoticeLevel::Error, title, description.into());
    }

    pub fn drain(&self) -> Vec<Notice> {
        self.queue
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    fn push(&self, level: NoticeLevel, title: &str, description: String) {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);
        if queue.len() == MAX_NOTICES {
            queue.pop_front();
        }
        queue.push_back(Notice {
            level,
            title: title.to_string(),
            description,
        });
    }
}
