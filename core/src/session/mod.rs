//! Session state: the signed-in user and bearer token.
//!
//! The two scalars are persisted independently (`user` as JSON, `token` as
//! plain text) so a reload restores the session. Navigation never reads the
//! store directly; it works on a [`SessionSnapshot`] captured under a single
//! lock.

mod storage;
mod user;

pub use storage::FileStorage;
pub use storage::MemoryStorage;
pub use storage::SessionStorage;
pub use user::UserRecord;

use serde::Serialize;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";

/// Role level at which a user is treated as an administrator.
pub const DEFAULT_ADMIN_ROLE_THRESHOLD: i64 = 2;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage error: {0}")]
    Io(#[from] std::io::Error),
    #[error("session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Read-only view of the session at the start of one navigation.
///
/// A role level is only ever present on an authenticated snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SessionSnapshot {
    is_authenticated: bool,
    role_level: Option<i64>,
}

impl SessionSnapshot {
    pub const fn anonymous() -> Self {
        Self {
            is_authenticated: false,
            role_level: None,
        }
    }

    pub const fn authenticated(role_level: i64) -> Self {
        Self {
            is_authenticated: true,
            role_level: Some(role_level),
        }
    }

    /// Signed in, but the user record is missing or unreadable.
    pub const fn authenticated_without_role() -> Self {
        Self {
            is_authenticated: true,
            role_level: None,
        }
    }

    pub const fn is_authenticated(&self) -> bool {
        self.is_authenticated
    }

    pub const fn role_level(&self) -> Option<i64> {
        self.role_level
    }

    pub fn is_admin(&self, threshold: i64) -> bool {
        self.role_level.is_some_and(|level| level >= threshold)
    }
}

/// Removes the line breaks that sometimes trail tokens copied from responses.
pub fn sanitize_token(token: &str) -> String {
    token.chars().filter(|c| !matches!(c, '\r' | '\n')).collect()
}

#[derive(Debug, Default)]
struct SessionState {
    user: Option<UserRecord>,
    token: String,
}

/// Shared handle over the persisted session.
#[derive(Debug, Clone)]
pub struct SessionStore {
    state: Arc<Mutex<SessionState>>,
    storage: Arc<dyn SessionStorage>,
}

impl SessionStore {
    /// Empty session that persists into `storage` without reading it.
    pub fn new(storage: Arc<dyn SessionStorage>) -> Self {
        Self {
            state: Arc::new(Mutex::new(SessionState::default())),
            storage,
        }
    }

    /// Session kept only in memory.
    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Restores a session from `storage`. A user record that no longer
    /// parses is dropped rather than failing the whole load.
    pub fn load(storage: Arc<dyn SessionStorage>) -> Result<Self, SessionError> {
        let user = match storage.read(USER_KEY)? {
            Some(text) => match serde_json::from_str::<Option<UserRecord>>(&text) {
                Ok(user) => user,
                Err(err) => {
                    warn!(error = %err, "discarding unreadable persisted user record");
                    None
                }
            },
            None => None,
        };
        let token = storage
            .read(TOKEN_KEY)?
            .map(|token| sanitize_token(&token))
            .unwrap_or_default();
        debug!(
            authenticated = !token.is_empty(),
            has_user = user.is_some(),
            "session restored"
        );
        Ok(Self {
            state: Arc::new(Mutex::new(SessionState { user, token })),
            storage,
        })
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn login(&self, user: UserRecord, token: &str) -> Result<(), SessionError> {
        self.set_user(user)?;
        self.set_token(token)?;
        Ok(())
    }

    pub fn set_user(&self, user: UserRecord) -> Result<(), SessionError> {
        let encoded = serde_json::to_string(&user)?;
        let mut state = self.lock();
        self.storage.write(USER_KEY, &encoded)?;
        state.user = Some(user);
        Ok(())
    }

    pub fn set_token(&self, token: &str) -> Result<(), SessionError> {
        let clean = sanitize_token(token);
        let mut state = self.lock();
        self.storage.write(TOKEN_KEY, &clean)?;
        state.token = clean;
        Ok(())
    }

    /// Clears both scalars. Returns `true` if anything was persisted.
    ///
    /// Both keys are removed even if one removal fails, and the in-memory
    /// session is cleared either way.
    pub fn logout(&self) -> Result<bool, SessionError> {
        let mut state = self.lock();
        let removed_user = self.storage.remove(USER_KEY);
        let removed_token = self.storage.remove(TOKEN_KEY);
        state.user = None;
        state.token.clear();
        Ok(removed_user? | removed_token?)
    }

    pub fn is_authenticated(&self) -> bool {
        !self.lock().token.is_empty()
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.lock().user.clone()
    }

    /// Token ready for an `Authorization: Bearer` header, `None` when signed out.
    pub fn bearer_token(&self) -> Option<String> {
        let state = self.lock();
        let token = sanitize_token(&state.token);
        (!token.is_empty()).then_some(token)
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.lock();
        if state.token.is_empty() {
            return SessionSnapshot::anonymous();
        }
        match &state.user {
            Some(user) => SessionSnapshot::authenticated(user.role),
            None => SessionSnapshot::authenticated_without_role(),
        }
    }
}
