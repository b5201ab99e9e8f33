use crate::route::paths;
use crate::route::pattern::RoutePattern;
use serde::Deserialize;
use serde::Serialize;

/// Title used when a route does not declare its own.
pub const APP_TITLE: &str = "Online Judge";

/// Path every unmatched route falls back to.
pub const DEFAULT_FALLBACK: &str = "/login";

/// Access requirements declared on a route.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMeta {
    #[serde(default)]
    pub requires_auth: bool,
    #[serde(default)]
    pub requires_admin: bool,
}

impl RouteMeta {
    pub const PUBLIC: RouteMeta = RouteMeta {
        requires_auth: false,
        requires_admin: false,
    };
    pub const AUTH: RouteMeta = RouteMeta {
        requires_auth: true,
        requires_admin: false,
    };
    pub const ADMIN: RouteMeta = RouteMeta {
        requires_auth: true,
        requires_admin: true,
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRecord {
    pub name: String,
    #[serde(rename = "path")]
    pub pattern: RoutePattern,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(flatten)]
    pub meta: RouteMeta,
    /// Static redirect applied before any guard runs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect: Option<String>,
}

impl RouteRecord {
    pub fn new(name: &str, pattern: RoutePattern, title: &str, meta: RouteMeta) -> Self {
        Self {
            name: name.to_string(),
            pattern,
            title: Some(title.to_string()),
            meta,
            redirect: None,
        }
    }

    pub fn redirect(name: &str, pattern: RoutePattern, target: &str) -> Self {
        Self {
            name: name.to_string(),
            pattern,
            title: None,
            meta: RouteMeta::PUBLIC,
            redirect: Some(target.to_string()),
        }
    }
}

/// Declarative route set for the judge client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTable {
    routes: Vec<RouteRecord>,
    #[serde(default = "default_fallback")]
    fallback: String,
}

fn default_fallback() -> String {
    DEFAULT_FALLBACK.to_string()
}

impl RouteTable {
    pub fn new(routes: Vec<RouteRecord>) -> Self {
        Self {
            routes,
            fallback: default_fallback(),
        }
    }

    pub fn routes(&self) -> &[RouteRecord] {
        &self.routes
    }

    /// First record whose pattern matches `path`.
    pub fn find(&self, path: &str) -> Option<&RouteRecord> {
        self.routes.iter().find(|record| record.pattern.is_match(path))
    }

    /// Access requirements for `path`, `None` when no route matches.
    pub fn lookup(&self, path: &str) -> Option<RouteMeta> {
        self.find(path).map(|record| record.meta)
    }

    pub fn fallback_redirect(&self) -> &str {
        &self.fallback
    }

    pub fn title_for(&self, path: &str) -> &str {
        self.find(path)
            .and_then(|record| record.title.as_deref())
            .unwrap_or(APP_TITLE)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        let exact = RoutePattern::exact;
        Self::new(vec![
            RouteRecord::redirect("Root", RoutePattern::root(), paths::LOGIN),
            RouteRecord::new("Login", exact(paths::LOGIN), "Sign in", RouteMeta::PUBLIC),
            RouteRecord::new("Register", exact(paths::REGISTER), "Register", RouteMeta::PUBLIC),
            RouteRecord::new("AdminHome", exact(paths::ADMIN_ROOT), "Admin Center", RouteMeta::ADMIN),
            RouteRecord::new("UserHome", exact(paths::USER_ROOT), "Student Center", RouteMeta::AUTH),
            RouteRecord::new("Home", exact(paths::HOME), "Home", RouteMeta::AUTH),
            RouteRecord::new("Problems", exact(paths::PROBLEMS), "Problems", RouteMeta::AUTH),
            RouteRecord::new("ProblemDetail", paths::problem_detail(), "Problem", RouteMeta::AUTH),
            RouteRecord::new(
                "Submissions",
                exact(paths::SUBMISSIONS),
                "Submissions",
                RouteMeta::AUTH,
            ),
            RouteRecord::new(
                "Leaderboard",
                exact(paths::LEADERBOARD),
                "Leaderboard",
                RouteMeta::AUTH,
            ),
            RouteRecord::new(
                "AdminProblems",
                exact(paths::ADMIN_PROBLEMS),
                "Manage Problems",
                RouteMeta::ADMIN,
            ),
            RouteRecord::new(
                "AdminProblemCreate",
                exact(paths::ADMIN_PROBLEM_CREATE),
                "Create Problem",
                RouteMeta::ADMIN,
            ),
            RouteRecord::new(
                "AdminUsers",
                exact(paths::ADMIN_USERS),
                "Manage Users",
                RouteMeta::ADMIN,
            ),
            RouteRecord::new(
                "AdminSubmissions",
                exact(paths::ADMIN_SUBMISSIONS),
                "All Submissions",
                RouteMeta::ADMIN,
            ),
            RouteRecord::new(
                "AdminSettings",
                exact(paths::ADMIN_SETTINGS),
                "Settings",
                RouteMeta::ADMIN,
            ),
            RouteRecord::new(
                "AdminProblemEdit",
                paths::admin_problem_edit(),
                "Edit Problem",
                RouteMeta::ADMIN,
            ),
            RouteRecord::new(
                "AdminProblemTestcases",
                paths::admin_problem_testcases(),
                "Test Cases",
                RouteMeta::ADMIN,
            ),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn lookup_resolves_declared_requirements() {
        let table = RouteTable::default();
        assert_eq!(table.lookup("/login"), Some(RouteMeta::PUBLIC));
        assert_eq!(table.lookup("/user"), Some(RouteMeta::AUTH));
        assert_eq!(table.lookup("/home"), Some(RouteMeta::AUTH));
        assert_eq!(table.lookup("/admin"), Some(RouteMeta::ADMIN));
        assert_eq!(table.lookup("/problems/42"), Some(RouteMeta::AUTH));
        assert_eq!(
            table.lookup("/admin/problems/testcases/9"),
            Some(RouteMeta::ADMIN)
        );
    }

    #[test]
    fn unmatched_path_has_no_requirements() {
        let table = RouteTable::default();
        assert_eq!(table.lookup("/nowhere"), None);
        assert_eq!(table.lookup("/problems/abc"), None);
        assert_eq!(table.fallback_redirect(), "/login");
    }

    #[test]
    fn root_is_a_static_redirect() {
        let table = RouteTable::default();
        let record = table.find("/").unwrap();
        assert_eq!(record.redirect.as_deref(), Some("/login"));
    }

    #[test]
    fn titles_fall_back_to_app_title() {
        let table = RouteTable::default();
        assert_eq!(table.title_for("/admin"), "Admin Center");
        assert_eq!(table.title_for("/"), APP_TITLE);
        assert_eq!(table.title_for("/unknown"), APP_TITLE);
    }

    #[test]
    fn deserializes_from_toml() {
        let text = r#"
            fallback = "/welcome"

            [[routes]]
            name = "Welcome"
            path = "/welcome"
            title = "Welcome"

            [[routes]]
            name = "Contest"
            path = "/contests/:id(int)"
            requires_auth = true
        "#;
        let table: RouteTable = toml::from_str(text).unwrap();
        assert_eq!(table.fallback_redirect(), "/welcome");
        assert_eq!(table.lookup("/welcome"), Some(RouteMeta::PUBLIC));
        assert_eq!(table.lookup("/contests/3"), Some(RouteMeta::AUTH));
        assert_eq!(table.title_for("/contests/3"), APP_TITLE);
    }
}
