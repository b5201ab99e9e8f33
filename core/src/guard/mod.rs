//! Route access resolver.
//!
//! Maps `(target, origin, session)` to a [`NavigationOutcome`] by walking the
//! ordered [`RULES`] table; the first matching rule wins. The resolver is a
//! pure function of its inputs: it never reads ambient session state and
//! never performs I/O, so the dispatcher can call it synchronously on every
//! transition.

mod config;
mod outcome;
mod request;
mod rules;
mod view;

pub use config::DEFAULT_BYPASS_MARKER;
pub use config::GuardConfig;
pub use outcome::NavigationOutcome;
pub use outcome::Resolution;
pub use request::NavigationRequest;
pub use request::Query;
pub use rules::RULES;
pub use rules::Rule;
pub use rules::RuleContext;
pub use rules::RuleId;
pub use rules::is_allowed_admin_subroute;
pub use view::COMPONENT_KEY;
pub use view::EmbeddedView;
pub use view::PROBLEM_ID_KEY;

use crate::session::SessionSnapshot;
use tracing::debug;
use tracing::info;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteAccessResolver {
    config: GuardConfig,
}

impl RouteAccessResolver {
    pub fn new(config: GuardConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GuardConfig {
        &self.config
    }

    pub fn resolve(
        &self,
        request: &NavigationRequest,
        session: SessionSnapshot,
    ) -> NavigationOutcome {
        self.resolve_traced(request, session).outcome
    }

    /// Like [`Self::resolve`], also reporting which rule decided.
    pub fn resolve_traced(
        &self,
        request: &NavigationRequest,
        session: SessionSnapshot,
    ) -> Resolution {
        let ctx = RuleContext::new(request, session, &self.config);
        for rule in &RULES {
            let Some(outcome) = rule.evaluate(&ctx) else {
                continue;
            };
            match rule.id {
                RuleId::AuthGate | RuleId::PrivilegeGate => info!(
                    rule = %rule.id,
                    target = %request.target_path,
                    "navigation blocked by access gate"
                ),
                _ => debug!(
                    rule = %rule.id,
                    target = %request.target_path,
                    origin = %request.origin_path,
                    ?outcome,
                    "navigation rule matched"
                ),
            }
            return Resolution {
                outcome,
                rule: rule.id,
            };
        }
        // The last rule always matches; kept for totality.
        Resolution {
            outcome: NavigationOutcome::Proceed,
            rule: RuleId::Default,
        }
    }
}
