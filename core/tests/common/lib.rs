//! Fixtures shared by the `oj-core` integration tests.

use oj_core::config::CONFIG_TOML_FILE;
use oj_core::config::Config;
use oj_core::config::load_session;
use oj_core::navigation::Navigator;
use oj_core::session::SessionStore;
use oj_core::session::UserRecord;
use serde_json::Value;
use tempfile::TempDir;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;
use wiremock::matchers::method;
use wiremock::matchers::path;

pub const STUDENT_ROLE: i64 = 0;
pub const ADMIN_ROLE: i64 = 2;

/// A throwaway `OJ_HOME` directory.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp home"),
        }
    }

    pub fn path(&self) -> &std::path::Path {
        self.dir.path()
    }

    pub fn write_config(&self, toml: &str) {
        std::fs::write(self.path().join(CONFIG_TOML_FILE), toml).expect("write config.toml");
    }

    pub fn config(&self) -> Config {
        Config::load(self.path()).expect("load config")
    }

    pub fn session(&self) -> SessionStore {
        load_session(self.path()).expect("load session")
    }

    /// Navigator wired exactly the way the CLI wires it.
    pub fn navigator(&self) -> Navigator {
        let config = self.config();
        Navigator::new(config.route_table(), config.resolver(), self.session())
    }
}

impl Default for TestHome {
    fn default() -> Self {
        Self::new()
    }
}

pub fn user(role: i64) -> UserRecord {
    let name = if role >= ADMIN_ROLE { "admin" } else { "student" };
    UserRecord::new(role + 1, name, role)
}

/// Signs `session` in with a user of `role`.
pub fn sign_in(session: &SessionStore, role: i64) {
    session
        .login(user(role), &format!("token-{role}"))
        .expect("sign in");
}

/// Answers `verb path` with `status` and a JSON body.
pub async fn mount_json(server: &MockServer, verb: &str, route: &str, status: u16, body: Value) {
    Mock::given(method(verb))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(body))
        .mount(server)
        .await;
}
