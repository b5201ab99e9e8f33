//! Well-known paths of the judge client.
//!
//! The route table and the access resolver both build their patterns from
//! this module so the two never disagree about what a path looks like.

use crate::route::pattern::RoutePattern;
use crate::route::pattern::Segment;

pub const LOGIN: &str = "/login";
pub const REGISTER: &str = "/register";
pub const HOME: &str = "/home";

/// Shell root hosting the admin sub-views.
pub const ADMIN_ROOT: &str = "/admin";
/// Shell root hosting the student sub-views.
pub const USER_ROOT: &str = "/user";

pub const PROBLEMS: &str = "/problems";
pub const SUBMISSIONS: &str = "/submissions";
pub const LEADERBOARD: &str = "/leaderboard";

pub const ADMIN_PROBLEMS: &str = "/admin/problems";
pub const ADMIN_PROBLEM_CREATE: &str = "/admin/problems/create";
pub const ADMIN_USERS: &str = "/admin/users";
pub const ADMIN_SUBMISSIONS: &str = "/admin/submissions";
pub const ADMIN_SETTINGS: &str = "/admin/settings";

/// Admin subroutes without parameters.
pub const ADMIN_STATIC_SUBROUTES: &[&str] = &[
    ADMIN_PROBLEMS,
    ADMIN_PROBLEM_CREATE,
    ADMIN_USERS,
    ADMIN_SUBMISSIONS,
    ADMIN_SETTINGS,
];

/// Name of the id parameter captured by the detail patterns.
pub const ID_PARAM: &str = "id";

/// `/problems/:id(int)`
pub fn problem_detail() -> RoutePattern {
    RoutePattern::new(vec![Segment::literal("problems"), Segment::int(ID_PARAM)])
}

/// `/admin/problems/edit/:id(int)`
pub fn admin_problem_edit() -> RoutePattern {
    RoutePattern::new(vec![
        Segment::literal("admin"),
        Segment::literal("problems"),
        Segment::literal("edit"),
        Segment::int(ID_PARAM),
    ])
}

/// `/admin/problems/testcases/:id(int)`
pub fn admin_problem_testcases() -> RoutePattern {
    RoutePattern::new(vec![
        Segment::literal("admin"),
        Segment::literal("problems"),
        Segment::literal("testcases"),
        Segment::int(ID_PARAM),
    ])
}

/// Shell root for a session, `/admin` for admins and `/user` otherwise.
pub fn shell_root(is_admin: bool) -> &'static str {
    if is_admin { ADMIN_ROOT } else { USER_ROOT }
}
