//! Ordered navigation rules.
//!
//! Each rule pairs a predicate with an outcome builder. The resolver walks
//! [`RULES`] top to bottom and returns the outcome of the first rule whose
//! predicate holds. The order is part of the contract:
//!
//! 1. `escape-hatch` and 2. `loop-breaker` stop redirect cycles and must run
//!    before anything that redirects.
//! 3. `admin-deep-link` and 4. `admin-containment` must run before
//!    5. `virtualize` so legitimate admin pages are not swallowed.
//! 6. `auth-gate`, 7. `privilege-gate` and 8. `landing` consult the session.
//! 9. `default` always matches.

use crate::guard::config::GuardConfig;
use crate::guard::outcome::NavigationOutcome;
use crate::guard::request::NavigationRequest;
use crate::guard::request::has_flag;
use crate::guard::view::EmbeddedView;
use crate::route::RoutePattern;
use crate::route::paths;
use crate::session::SessionSnapshot;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Identifier of a rule. The strings are stable so logs and CLI output can
/// rely on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RuleId {
    EscapeHatch,
    LoopBreaker,
    AdminDeepLink,
    AdminContainment,
    Virtualize,
    AuthGate,
    PrivilegeGate,
    Landing,
    Default,
}

impl RuleId {
    pub const fn as_str(self) -> &'static str {
        match self {
            RuleId::EscapeHatch => "escape-hatch",
            RuleId::LoopBreaker => "loop-breaker",
            RuleId::AdminDeepLink => "admin-deep-link",
            RuleId::AdminContainment => "admin-containment",
            RuleId::Virtualize => "virtualize",
            RuleId::AuthGate => "auth-gate",
            RuleId::PrivilegeGate => "privilege-gate",
            RuleId::Landing => "landing",
            RuleId::Default => "default",
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Everything a rule may look at.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub request: &'a NavigationRequest,
    pub session: SessionSnapshot,
    pub config: &'a GuardConfig,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        request: &'a NavigationRequest,
        session: SessionSnapshot,
        config: &'a GuardConfig,
    ) -> Self {
        Self {
            request,
            session,
            config,
        }
    }

    fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    fn is_admin(&self) -> bool {
        self.session.is_admin(self.config.admin_role_threshold)
    }

    fn authenticated_admin(&self) -> bool {
        self.is_authenticated() && self.is_admin()
    }

    fn target(&self) -> &str {
        &self.request.target_path
    }

    fn has_bypass_marker(&self) -> bool {
        has_flag(&self.request.target_query, &self.config.bypass_marker)
    }

    fn shell_root(&self) -> &'static str {
        paths::shell_root(self.is_admin())
    }
}

type Predicate = fn(&RuleContext<'_>) -> bool;
type OutcomeBuilder = fn(&RuleContext<'_>) -> NavigationOutcome;

pub struct Rule {
    pub id: RuleId,
    applies: Predicate,
    outcome: OutcomeBuilder,
}

impl Rule {
    pub fn applies(&self, ctx: &RuleContext<'_>) -> bool {
        (self.applies)(ctx)
    }

    /// Outcome of this rule alone, `None` when its predicate does not hold.
    pub fn evaluate(&self, ctx: &RuleContext<'_>) -> Option<NavigationOutcome> {
        self.applies(ctx).then(|| (self.outcome)(ctx))
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("id", &self.id).finish()
    }
}

pub static RULES: [Rule; 9] = [
    Rule {
        id: RuleId::EscapeHatch,
        applies: escape_hatch,
        outcome: proceed,
    },
    Rule {
        id: RuleId::LoopBreaker,
        applies: loop_breaker,
        outcome: cancel,
    },
    Rule {
        id: RuleId::AdminDeepLink,
        applies: admin_deep_link,
        outcome: proceed,
    },
    Rule {
        id: RuleId::AdminContainment,
        applies: admin_containment,
        outcome: redirect_to_admin_root,
    },
    Rule {
        id: RuleId::Virtualize,
        applies: virtualize,
        outcome: virtualized_shell,
    },
    Rule {
        id: RuleId::AuthGate,
        applies: auth_gate,
        outcome: redirect_to_login,
    },
    Rule {
        id: RuleId::PrivilegeGate,
        applies: privilege_gate,
        outcome: redirect_to_user_root,
    },
    Rule {
        id: RuleId::Landing,
        applies: landing,
        outcome: redirect_to_shell_root,
    },
    Rule {
        id: RuleId::Default,
        applies: always,
        outcome: proceed,
    },
];

struct AdminPatterns {
    root: RoutePattern,
    user_root: RoutePattern,
    deep_links: [RoutePattern; 2],
    static_subroutes: Vec<RoutePattern>,
    landing: [RoutePattern; 3],
}

static ADMIN: LazyLock<AdminPatterns> = LazyLock::new(|| AdminPatterns {
    root: RoutePattern::exact(paths::ADMIN_ROOT),
    user_root: RoutePattern::exact(paths::USER_ROOT),
    deep_links: [paths::admin_problem_edit(), paths::admin_problem_testcases()],
    static_subroutes: paths::ADMIN_STATIC_SUBROUTES
        .iter()
        .copied()
        .map(RoutePattern::exact)
        .collect(),
    landing: [
        RoutePattern::exact(paths::LOGIN),
        RoutePattern::exact(paths::REGISTER),
        RoutePattern::exact(paths::HOME),
    ],
});

fn is_admin_deep_link(path: &str) -> bool {
    ADMIN.deep_links.iter().any(|pattern| pattern.is_strict_match(path))
}

/// Admin subroutes the admin shell is allowed to navigate to directly.
pub fn is_allowed_admin_subroute(path: &str) -> bool {
    ADMIN
        .static_subroutes
        .iter()
        .any(|pattern| pattern.is_strict_match(path))
        || is_admin_deep_link(path)
}

/// True for raw paths under the `/admin/` prefix. `/admin/` itself counts,
/// so a trailing slash cannot slip past containment.
fn is_below_admin_root(path: &str) -> bool {
    path.strip_prefix(paths::ADMIN_ROOT)
        .is_some_and(|rest| rest.starts_with('/'))
}

fn escape_hatch(ctx: &RuleContext<'_>) -> bool {
    ADMIN.root.is_strict_match(ctx.target())
        && ctx.has_bypass_marker()
        && (!ctx.config.bypass_requires_auth || ctx.is_authenticated())
}

fn loop_breaker(ctx: &RuleContext<'_>) -> bool {
    let origin = &ctx.request.origin_path;
    if !ADMIN.root.is_strict_match(origin) && !ADMIN.user_root.is_strict_match(origin) {
        return false;
    }
    EmbeddedView::from_query(&ctx.request.origin_query).is_some_and(|view| {
        view.is_detail() && view.standalone_pattern().is_strict_match(ctx.target())
    })
}

fn admin_deep_link(ctx: &RuleContext<'_>) -> bool {
    ctx.authenticated_admin() && is_admin_deep_link(ctx.target())
}

fn admin_containment(ctx: &RuleContext<'_>) -> bool {
    ctx.authenticated_admin()
        && is_below_admin_root(ctx.target())
        && !ctx.has_bypass_marker()
        && !is_allowed_admin_subroute(ctx.target())
}

fn virtualize(ctx: &RuleContext<'_>) -> bool {
    ctx.is_authenticated() && EmbeddedView::from_standalone(ctx.target()).is_some()
}

fn auth_gate(ctx: &RuleContext<'_>) -> bool {
    ctx.request.meta().requires_auth && !ctx.is_authenticated()
}

fn privilege_gate(ctx: &RuleContext<'_>) -> bool {
    ctx.request.meta().requires_admin && !ctx.is_admin()
}

fn landing(ctx: &RuleContext<'_>) -> bool {
    ctx.is_authenticated()
        && ADMIN
            .landing
            .iter()
            .any(|pattern| pattern.is_strict_match(ctx.target()))
}

fn always(_: &RuleContext<'_>) -> bool {
    true
}

fn proceed(_: &RuleContext<'_>) -> NavigationOutcome {
    NavigationOutcome::Proceed
}

fn cancel(_: &RuleContext<'_>) -> NavigationOutcome {
    NavigationOutcome::Cancel
}

fn redirect_to_admin_root(_: &RuleContext<'_>) -> NavigationOutcome {
    NavigationOutcome::redirect(paths::ADMIN_ROOT)
}

fn redirect_to_login(_: &RuleContext<'_>) -> NavigationOutcome {
    NavigationOutcome::redirect(paths::LOGIN)
}

fn redirect_to_user_root(_: &RuleContext<'_>) -> NavigationOutcome {
    NavigationOutcome::redirect(paths::USER_ROOT)
}

fn redirect_to_shell_root(ctx: &RuleContext<'_>) -> NavigationOutcome {
    NavigationOutcome::redirect(ctx.shell_root())
}

fn virtualized_shell(ctx: &RuleContext<'_>) -> NavigationOutcome {
    match EmbeddedView::from_standalone(ctx.target()) {
        Some((view, params)) => {
            NavigationOutcome::redirect_with(ctx.shell_root(), view.shell_query(&params))
        }
        // Only reachable if the predicate and builder disagree.
        None => NavigationOutcome::redirect(ctx.shell_root()),
    }
}
