//! Navigation dispatcher.
//!
//! [`Navigator`] owns the current location and runs every transition through
//! the route table (static redirects and the catch-all fallback) and the
//! [`RouteAccessResolver`]. Redirects restart evaluation against the new
//! target while the origin stays put, the way a browser router re-enters its
//! guard.

mod location;
mod notice;

pub use location::Location;
pub use notice::Notice;
pub use notice::NoticeSink;
pub use notice::RecordingNotices;

use crate::guard::NavigationOutcome;
use crate::guard::NavigationRequest;
use crate::guard::RouteAccessResolver;
use crate::guard::RuleId;
use crate::route::RouteTable;
use crate::session::SessionStore;
use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use tracing::warn;

/// Upper bound on redirects followed for one navigation.
pub const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum NavigationError {
    #[error("navigation to '{target}' exceeded {limit} redirects")]
    RedirectLoop { target: String, limit: usize },
}

/// One step taken while settling a navigation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "via", rename_all = "kebab-case")]
pub enum Hop {
    /// Route table redirect, including the fallback for unmatched paths.
    Table { location: Location, redirect: String },
    /// Decision of the access resolver.
    Rule {
        location: Location,
        rule: RuleId,
        outcome: NavigationOutcome,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavigationReport {
    pub from: Location,
    /// Current location once the navigation settled.
    pub to: Location,
    pub committed: bool,
    pub cancelled: bool,
    pub hops: Vec<Hop>,
    pub notices: Vec<Notice>,
    /// Document title for `to`.
    pub title: String,
}

#[derive(Debug, Clone)]
pub struct Navigator {
    table: RouteTable,
    resolver: RouteAccessResolver,
    session: SessionStore,
    current: Location,
}

impl Navigator {
    pub fn new(table: RouteTable, resolver: RouteAccessResolver, session: SessionStore) -> Self {
        Self {
            table,
            resolver,
            session,
            current: Location::new("/"),
        }
    }

    /// Starts from `location` without running any guard.
    pub fn with_current(mut self, location: Location) -> Self {
        self.current = location;
        self
    }

    pub fn current(&self) -> &Location {
        &self.current
    }

    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    fn table_redirect(&self, path: &str) -> Option<String> {
        let redirect = match self.table.find(path) {
            Some(record) => record.redirect.as_deref()?,
            None => self.table.fallback_redirect(),
        };
        (redirect != path).then(|| redirect.to_string())
    }

    pub fn navigate(
        &mut self,
        target: Location,
        notices: &mut dyn NoticeSink,
    ) -> Result<NavigationReport, NavigationError> {
        let from = self.current.clone();
        let requested = target.to_string();
        let mut next = target;
        let mut hops = Vec::new();
        let mut raised = Vec::new();

        for _ in 0..=MAX_REDIRECTS {
            if let Some(redirect) = self.table_redirect(&next.path) {
                debug!(from = %next, to = %redirect, "route table redirect");
                hops.push(Hop::Table {
                    location: next,
                    redirect: redirect.clone(),
                });
                next = Location::new(redirect);
                continue;
            }

            // One snapshot per evaluation; a logout racing this navigation is
            // either fully seen or not at all.
            let session = self.session.snapshot();
            let request = NavigationRequest {
                target_path: next.path.clone(),
                target_query: next.query.clone(),
                origin_path: from.path.clone(),
                origin_query: from.query.clone(),
                route_meta: self.table.lookup(&next.path),
            };
            let resolution = self.resolver.resolve_traced(&request, session);
            if let Some(notice) = Notice::for_rule(resolution.rule) {
                notices.notify(notice);
                raised.push(notice);
            }
            hops.push(Hop::Rule {
                location: next.clone(),
                rule: resolution.rule,
                outcome: resolution.outcome.clone(),
            });

            match resolution.outcome {
                NavigationOutcome::Proceed => {
                    self.current = next;
                    return Ok(self.report(from, true, false, hops, raised));
                }
                NavigationOutcome::Cancel => {
                    return Ok(self.report(from, false, true, hops, raised));
                }
                NavigationOutcome::Redirect { path, query } => {
                    next = Location { path, query };
                }
            }
        }

        warn!(target = %requested, limit = MAX_REDIRECTS, "navigation redirect loop");
        Err(NavigationError::RedirectLoop {
            target: requested,
            limit: MAX_REDIRECTS,
        })
    }

    fn report(
        &self,
        from: Location,
        committed: bool,
        cancelled: bool,
        hops: Vec<Hop>,
        notices: Vec<Notice>,
    ) -> NavigationReport {
        NavigationReport {
            from,
            to: self.current.clone(),
            committed,
            cancelled,
            hops,
            notices,
            title: self.table.title_for(&self.current.path).to_string(),
        }
    }
}
