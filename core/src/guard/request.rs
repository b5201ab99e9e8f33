use crate::route::RouteMeta;
use serde::Deserialize;
use serde::Serialize;
use std::collections::BTreeMap;

/// Query parameters of a location, ordered for stable output.
pub type Query = BTreeMap<String, String>;

/// One attempted route transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationRequest {
    pub target_path: String,
    #[serde(default)]
    pub target_query: Query,
    pub origin_path: String,
    #[serde(default)]
    pub origin_query: Query,
    /// Requirements of the target route; `None` when no route matched.
    #[serde(default)]
    pub route_meta: Option<RouteMeta>,
}

impl NavigationRequest {
    /// Request for `target_path` coming from `/` with no route metadata.
    pub fn new(target_path: impl Into<String>) -> Self {
        Self {
            target_path: target_path.into(),
            target_query: Query::new(),
            origin_path: "/".to_string(),
            origin_query: Query::new(),
            route_meta: None,
        }
    }

    pub fn with_query(mut self, query: Query) -> Self {
        self.target_query = query;
        self
    }

    pub fn with_origin(mut self, path: impl Into<String>, query: Query) -> Self {
        self.origin_path = path.into();
        self.origin_query = query;
        self
    }

    pub fn with_meta(mut self, meta: Option<RouteMeta>) -> Self {
        self.route_meta = meta;
        self
    }

    /// Metadata with unmatched routes treated as having no requirements.
    pub fn meta(&self) -> RouteMeta {
        self.route_meta.unwrap_or_default()
    }
}

/// A query flag counts as set only when it carries a non-empty value.
pub(crate) fn has_flag(query: &Query, key: &str) -> bool {
    query.get(key).is_some_and(|value| !value.is_empty())
}
