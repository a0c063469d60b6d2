use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// A status message for the user, shown once and then dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub title: String,
    pub description: String,
}

impl Notice {
    pub fn info(title: &str, description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Info,
            title: title.to_owned(),
            description: description.into(),
        }
    }

    pub fn error(description: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            title: "Error".to_owned(),
            description: description.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.kind == NoticeKind::Error
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

#[derive(Debug, Default)]
pub struct Notices {
    pending: Vec<Notice>,
}

impl Notices {
    pub fn push(&mut self, notice: Notice) {
        self.pending.push(notice);
    }

    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.pending)
    }
}
