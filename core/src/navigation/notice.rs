use crate::guard::RuleId;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;

/// User-facing warning raised when an access gate redirects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Notice {
    SignInRequired,
    PermissionDenied,
}

impl Notice {
    /// Notice owed for the rule that decided a navigation. Containment and
    /// landing redirects are normalization, not errors, and stay silent.
    pub fn for_rule(rule: RuleId) -> Option<Self> {
        match rule {
            RuleId::AuthGate => Some(Notice::SignInRequired),
            RuleId::PrivilegeGate => Some(Notice::PermissionDenied),
            _ => None,
        }
    }

    pub const fn message(self) -> &'static str {
        match self {
            Notice::SignInRequired => "Please sign in first",
            Notice::PermissionDenied => "You do not have permission to access this page",
        }
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

/// Receives notices emitted while navigating.
pub trait NoticeSink {
    fn notify(&mut self, notice: Notice);
}

/// Keeps every notice, in order.
#[derive(Debug, Default, Clone)]
pub struct RecordingNotices {
    notices: Vec<Notice>,
}

impl RecordingNotices {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub fn take(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}

impl NoticeSink for RecordingNotices {
    fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}
