use crate::session::DEFAULT_ADMIN_ROLE_THRESHOLD;
use serde::Deserialize;
use serde::Serialize;

pub const DEFAULT_BYPASS_MARKER: &str = "fromAdmin";

/// Tunables for the access resolver, read from the `[guard]` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuardConfig {
    /// Query parameter that lets `/admin` re-enter itself without further
    /// rule evaluation.
    pub bypass_marker: String,
    /// Role level at or above which a session counts as admin.
    pub admin_role_threshold: i64,
    /// When set, the bypass marker is only honoured for signed-in sessions.
    pub bypass_requires_auth: bool,
}

impl Default for GuardConfig {
    fn default() -> Self {
        Self {
            bypass_marker: DEFAULT_BYPASS_MARKER.to_string(),
            admin_role_threshold: DEFAULT_ADMIN_ROLE_THRESHOLD,
            bypass_requires_auth: false,
        }
    }
}
