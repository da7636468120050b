//! User-visible notices (toast equivalents).
//!
//! Services push notices; a presentation shell drains and renders them.

use log::{error, info, warn};
use std::sync::{Mutex, PoisonError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Warning,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Sink for user-visible notices.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

/// Notifier that only writes notices to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Error => {
                error!("event=notice module=notify level=error message={}", notice.message)
            }
            NoticeLevel::Warning => {
                warn!("event=notice module=notify level=warning message={}", notice.message)
            }
            NoticeLevel::Success | NoticeLevel::Info => {
                info!("event=notice module=notify level=info message={}", notice.message)
            }
        }
    }
}

/// In-memory notice queue drained by the presentation shell.
#[derive(Debug, Default)]
pub struct NoticeQueue {
    notices: Mutex<Vec<Notice>>,
}

impl NoticeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes and returns every pending notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        let mut notices = self.notices.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *notices)
    }

    /// Returns pending notices without removing them.
    pub fn pending(&self) -> Vec<Notice> {
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Notifier for NoticeQueue {
    fn notify(&self, notice: Notice) {
        LogNotifier.notify(notice.clone());
        self.notices
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::{Notice, NoticeLevel, NoticeQueue, Notifier};

    #[test]
    fn queue_drains_in_order() {
        let queue = NoticeQueue::new();
        queue.notify(Notice::error("first"));
        queue.notify(Notice::success("second"));

        assert_eq!(queue.pending().len(), 2);
        let drained = queue.drain();
        assert_eq!(drained[0].level, NoticeLevel::Error);
        assert_eq!(drained[1].message, "second");
        assert!(queue.drain().is_empty());
    }
}
