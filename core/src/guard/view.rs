use crate::guard::request::Query;
use crate::route::RouteParams;
use crate::route::RoutePattern;
use crate::route::paths;
use serde::Deserialize;
use serde::Serialize;
use std::fmt;
use std::sync::LazyLock;

/// Query key naming the sub-view a shell root renders inline.
pub const COMPONENT_KEY: &str = "component";
/// Query key carrying the problem id for the embedded detail view.
pub const PROBLEM_ID_KEY: &str = "problemId";

struct StandalonePatterns {
    problem_detail: RoutePattern,
    problems: RoutePattern,
    submissions: RoutePattern,
    leaderboard: RoutePattern,
}

static STANDALONE: LazyLock<StandalonePatterns> = LazyLock::new(|| StandalonePatterns {
    problem_detail: paths::problem_detail(),
    problems: RoutePattern::exact(paths::PROBLEMS),
    submissions: RoutePattern::exact(paths::SUBMISSIONS),
    leaderboard: RoutePattern::exact(paths::LEADERBOARD),
});

/// Sub-views the shell roots can host. The strings are the `component`
/// query values the shells understand, so they must stay stable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EmbeddedView {
    ProblemDetail,
    Problems,
    Submissions,
    Leaderboard,
}

impl EmbeddedView {
    pub const ALL: [EmbeddedView; 4] = [
        EmbeddedView::ProblemDetail,
        EmbeddedView::Problems,
        EmbeddedView::Submissions,
        EmbeddedView::Leaderboard,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            EmbeddedView::ProblemDetail => "problem-detail",
            EmbeddedView::Problems => "problems",
            EmbeddedView::Submissions => "submissions",
            EmbeddedView::Leaderboard => "leaderboard",
        }
    }

    pub fn from_component(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|view| view.as_str() == value)
    }

    /// View named by the `component` parameter of `query`, if any.
    pub fn from_query(query: &Query) -> Option<Self> {
        query
            .get(COMPONENT_KEY)
            .and_then(|value| Self::from_component(value))
    }

    /// Detail views render a single item and can bounce against their
    /// standalone path.
    pub const fn is_detail(self) -> bool {
        matches!(self, EmbeddedView::ProblemDetail)
    }

    /// Pattern of the standalone page this view replaces.
    pub fn standalone_pattern(self) -> &'static RoutePattern {
        let patterns = &*STANDALONE;
        match self {
            EmbeddedView::ProblemDetail => &patterns.problem_detail,
            EmbeddedView::Problems => &patterns.problems,
            EmbeddedView::Submissions => &patterns.submissions,
            EmbeddedView::Leaderboard => &patterns.leaderboard,
        }
    }

    /// View whose standalone page matches `path`, with the captured params.
    pub fn from_standalone(path: &str) -> Option<(Self, RouteParams)> {
        Self::ALL.into_iter().find_map(|view| {
            view.standalone_pattern()
                .matches_strict(path)
                .map(|params| (view, params))
        })
    }

    /// Shell query that renders this view inline.
    pub fn shell_query(self, params: &RouteParams) -> Query {
        let mut query = Query::new();
        query.insert(COMPONENT_KEY.to_string(), self.as_str().to_string());
        if self == EmbeddedView::ProblemDetail {
            if let Some(id) = params.get(paths::ID_PARAM) {
                query.insert(PROBLEM_ID_KEY.to_string(), id.to_string());
            }
        }
        query
    }
}

impl fmt::Display for EmbeddedView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
