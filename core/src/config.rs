//! Client configuration read from `$OJ_HOME/config.toml`.
//!
//! ```toml
//! [guard]
//! bypass_marker = "fromAdmin"
//! admin_role_threshold = 2
//!
//! [client]
//! base_url = "http://judge.example.edu"
//! timeout_ms = 5000
//!
//! [routing]
//! fallback = "/login"
//! [[routing.routes]]
//! name = "Login"
//! path = "/login"
//! ```

use crate::client::ClientConfig;
use crate::guard::GuardConfig;
use crate::guard::RouteAccessResolver;
use crate::route::RouteTable;
use crate::session::FileStorage;
use crate::session::SessionError;
use crate::session::SessionStore;
use serde::Deserialize;
use serde::Serialize;
use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

pub const OJ_HOME_ENV: &str = "OJ_HOME";
pub const CONFIG_TOML_FILE: &str = "config.toml";
/// Directory under the home holding the persisted `user` and `token`.
pub const SESSION_DIR: &str = "session";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not determine home directory; set {OJ_HOME_ENV}")]
    NoHome,
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub guard: GuardConfig,
    pub client: ClientConfig,
    /// Replaces the built-in route table when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing: Option<RouteTable>,
}

impl Config {
    /// Loads `config.toml` from `home`. A missing file yields the defaults.
    pub fn load(home: &Path) -> Result<Self, ConfigError> {
        let path = home.join(CONFIG_TOML_FILE);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                return Ok(Self::default());
            }
            Err(source) => return Err(ConfigError::Read { path, source }),
        };
        toml::from_str(&text).map_err(|source| ConfigError::Parse { path, source })
    }

    pub fn route_table(&self) -> RouteTable {
        self.routing.clone().unwrap_or_default()
    }

    pub fn resolver(&self) -> RouteAccessResolver {
        RouteAccessResolver::new(self.guard.clone())
    }
}

/// Resolves the client home: `$OJ_HOME` when set and non-empty, otherwise
/// `~/.oj`.
pub fn find_oj_home() -> Result<PathBuf, ConfigError> {
    if let Some(home) = std::env::var_os(OJ_HOME_ENV).filter(|value| !value.is_empty()) {
        return Ok(PathBuf::from(home));
    }
    dirs::home_dir()
        .map(|home| home.join(".oj"))
        .ok_or(ConfigError::NoHome)
}

/// Restores the session persisted under `home`.
pub fn load_session(home: &Path) -> Result<SessionStore, SessionError> {
    SessionStore::load(Arc::new(FileStorage::new(home.join(SESSION_DIR))))
}
