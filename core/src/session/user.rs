use serde::Deserialize;
use serde::Serialize;

/// User record as returned by the judge backend at sign-in.
///
/// Only `role` matters for navigation; everything the backend sends beyond
/// the known fields is kept in `extra` so it survives a reload untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: i64,
    pub username: String,
    /// Numeric role level: 0 student, 1 teacher, 2 admin.
    #[serde(default)]
    pub role: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<i64>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl UserRecord {
    pub fn new(id: i64, username: impl Into<String>, role: i64) -> Self {
        Self {
            id,
            username: username.into(),
            role,
            email: None,
            avatar: None,
            status: None,
            extra: serde_json::Map::new(),
        }
    }
}
