use crate::guard::request::Query;
use crate::guard::rules::RuleId;
use serde::Deserialize;
use serde::Serialize;

/// What the dispatcher should do with a navigation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum NavigationOutcome {
    /// Continue to the requested target unchanged.
    Proceed,
    /// Navigate to `path` with `query` instead.
    Redirect {
        path: String,
        #[serde(default, skip_serializing_if = "Query::is_empty")]
        query: Query,
    },
    /// Abort; the origin stays current.
    Cancel,
}

impl NavigationOutcome {
    pub fn redirect(path: impl Into<String>) -> Self {
        NavigationOutcome::Redirect {
            path: path.into(),
            query: Query::new(),
        }
    }

    pub fn redirect_with(path: impl Into<String>, query: Query) -> Self {
        NavigationOutcome::Redirect {
            path: path.into(),
            query,
        }
    }
}

/// Outcome plus the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub outcome: NavigationOutcome,
    pub rule: RuleId,
}
