//! Transient, user-facing notifications.
//!
//! How a notice is shown (toast, stderr line, ...) belongs to the host; the
//! core only emits a classified title and description.

use std::fmt;

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Validation,
    Connection,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            description: description.into(),
        }
    }

    pub fn success(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self::new(NoticeKind::Success, title, description)
    }

    pub fn connection(description: impl Into<String>) -> Self {
        Self::new(NoticeKind::Connection, "Connection error", description)
    }

    pub fn validation(err: &ValidationError) -> Self {
        let title = match err {
            ValidationError::MissingFields => "Missing fields",
        };
        Self::new(NoticeKind::Validation, title, err.to_string())
    }

    pub fn is_error(&self) -> bool {
        self.kind != NoticeKind::Success
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Emits notices to the user.
pub trait Notifier {
    fn notify(&mut self, notice: Notice);
}

/// Collects notices in order; used by one-shot commands and tests.
impl Notifier for Vec<Notice> {
    fn notify(&mut self, notice: Notice) {
        self.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_notice_text() {
        let notice = Notice::validation(&ValidationError::MissingFields);
        assert_eq!(notice.kind, NoticeKind::Validation);
        assert_eq!(notice.title, "Missing fields");
        assert_eq!(notice.description, "Please fill in both issue and solution");
        assert!(notice.is_error());
    }

    #[test]
    fn test_connection_notice_title() {
        let notice = Notice::connection("Failed to add memory.");
        assert_eq!(notice.to_string(), "Connection error: Failed to add memory.");
    }

    #[test]
    fn test_vec_collects_in_order() {
        let mut notices: Vec<Notice> = Vec::new();
        notices.notify(Notice::success("a", "first"));
        notices.notify(Notice::connection("second"));
        assert_eq!(notices.len(), 2);
        assert!(!notices[0].is_error());
        assert_eq!(notices[1].description, "second");
    }
}
