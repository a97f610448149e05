//! Transient user notifications ("toasts").
//!
//! Handlers post notices to the shared [`NoticeBoard`]; the client drains
//! them through `GET /api/notices`.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use serde::{Serialize, Serializer};
use uuid::Uuid;

/// How long success notices stay visible.
pub const SUCCESS_DURATION: Duration = Duration::from_secs(3);

/// How long error notices stay visible.
pub const ERROR_DURATION: Duration = Duration::from_secs(4);

/// How long info notices stay visible.
pub const INFO_DURATION: Duration = Duration::from_secs(3);

/// Oldest notices are dropped beyond this many undrained entries.
const MAX_PENDING: usize = 100;

/// Notice category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeKind {
    Success,
    Error,
    Info,
    Loading,
}

/// A transient notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub id: Uuid,
    pub kind: NoticeKind,
    pub message: String,
    /// `None` means the notice stays until dismissed.
    #[serde(rename = "duration_ms", serialize_with = "serialize_duration_ms")]
    pub duration: Option<Duration>,
}

fn serialize_duration_ms<S: Serializer>(
    duration: &Option<Duration>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match duration {
        Some(d) => serializer.serialize_u64(u64::try_from(d.as_millis()).unwrap_or(u64::MAX)),
        None => serializer.serialize_none(),
    }
}

impl Notice {
    fn new(kind: NoticeKind, message: impl Into<String>, duration: Option<Duration>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            message: message.into(),
            duration,
        }
    }

    /// A success notice, shown for 3 seconds.
    pub fn success(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, message, Some(SUCCESS_DURATION))
    }

    /// An error notice, shown for 4 seconds.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Error, message, Some(ERROR_DURATION))
    }

    /// An info notice, shown for 3 seconds.
    pub fn info(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Info, message, Some(INFO_DURATION))
    }

    /// A loading notice, shown until dismissed.
    pub fn loading(message: impl Into<String>) -> Self {
        Self::new(NoticeKind::Loading, message, None)
    }

    /// Set a custom duration for this notice.
    #[must_use]
    pub const fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }
}

/// Queue of notices waiting to be shown.
#[derive(Debug, Default)]
pub struct NoticeBoard {
    pending: Mutex<VecDeque<Notice>>,
}

impl NoticeBoard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a notice and return its id.
    pub fn push(&self, notice: Notice) -> Uuid {
        let id = notice.id;
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if pending.len() >= MAX_PENDING {
            pending.pop_front();
        }
        pending.push_back(notice);
        id
    }

    /// Remove one notice (e.g. a finished loading notice).
    pub fn dismiss(&self, id: Uuid) -> bool {
        let mut pending = self
            .pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let before = pending.len();
        pending.retain(|n| n.id != id);
        pending.len() != before
    }

    /// Take every queued notice, oldest first.
    pub fn drain(&self) -> Vec<Notice> {
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .drain(..)
            .collect()
    }

    /// Number of queued notices.
    pub fn len(&self) -> usize {
        self.pending
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_default_durations() {
        assert_eq!(Notice::success("ok").duration, Some(Duration::from_secs(3)));
        assert_eq!(Notice::error("no").duration, Some(Duration::from_secs(4)));
        assert_eq!(Notice::info("fyi").duration, Some(Duration::from_secs(3)));
        assert_eq!(Notice::loading("wait").duration, None);
        assert_eq!(
            Notice::error("no").with_duration(Duration::from_secs(9)).duration,
            Some(Duration::from_secs(9))
        );
    }

    #[test]
    fn test_board_drains_in_order() {
        let board = NoticeBoard::new();
        board.push(Notice::info("first"));
        board.push(Notice::error("second"));
        assert_eq!(board.len(), 2);

        let drained = board.drain();
        assert_eq!(drained[0].message, "first");
        assert_eq!(drained[1].kind, NoticeKind::Error);
        assert!(board.is_empty());
    }

    #[test]
    fn test_dismiss_loading_notice() {
        let board = NoticeBoard::new();
        let id = board.push(Notice::loading("Saving merchant..."));
        board.push(Notice::success("Saved"));
        assert!(board.dismiss(id));
        assert!(!board.dismiss(id));
        assert_eq!(board.drain().len(), 1);
    }

    #[test]
    fn test_board_is_bounded() {
        let board = NoticeBoard::new();
        for i in 0..(MAX_PENDING + 5) {
            board.push(Notice::info(format!("n{i}")));
        }
        let drained = board.drain();
        assert_eq!(drained.len(), MAX_PENDING);
        assert_eq!(drained[0].message, "n5");
    }

    #[test]
    fn test_notice_json_shape() {
        let json = serde_json::to_value(Notice::error("Failed to load merchants")).unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["message"], "Failed to load merchants");
        assert_eq!(json["duration_ms"], 4000);

        let json = serde_json::to_value(Notice::loading("Loading")).unwrap();
        assert!(json["duration_ms"].is_null());
    }
}
