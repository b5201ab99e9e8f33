use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use oj_core::config::Config;
use oj_core::config::load_session;
use oj_core::guard::NavigationRequest;
use oj_core::guard::Resolution;
use oj_core::navigation::Location;
use oj_core::session::SessionSnapshot;
use serde::Serialize;

use crate::print_json;

#[derive(Debug, Parser)]
pub struct ResolveCli {
    /// Location being navigated to, e.g. `/problems/42`.
    #[arg(value_name = "TARGET")]
    target: String,

    /// Location the navigation starts from.
    #[arg(long = "from", value_name = "LOCATION", default_value = "/")]
    from: String,

    /// Evaluate as a signed-in user with this role level.
    #[arg(long = "role", value_name = "N", conflicts_with = "anonymous")]
    role: Option<i64>,

    /// Evaluate as a signed-out visitor.
    #[arg(long = "anonymous")]
    anonymous: bool,
}

#[derive(Debug, Serialize)]
struct ResolveOutput {
    target: Location,
    from: Location,
    /// Name of the route record matching the target, if any.
    route: Option<String>,
    session: SessionSnapshot,
    #[serde(flatten)]
    resolution: Resolution,
}

pub fn run(cli: ResolveCli, home: &Path) -> Result<()> {
    let config = Config::load(home)?;
    let table = config.route_table();
    let session = if cli.anonymous {
        SessionSnapshot::anonymous()
    } else if let Some(role) = cli.role {
        SessionSnapshot::authenticated(role)
    } else {
        load_session(home)
            .context("failed to load stored session")?
            .snapshot()
    };

    let target = Location::parse(&cli.target);
    let from = Location::parse(&cli.from);
    let request = NavigationRequest {
        target_path: target.path.clone(),
        target_query: target.query.clone(),
        origin_path: from.path.clone(),
        origin_query: from.query.clone(),
        route_meta: table.lookup(&target.path),
    };
    let resolution = config.resolver().resolve_traced(&request, session);

    print_json(ResolveOutput {
        route: table.find(&target.path).map(|record| record.name.clone()),
        target,
        from,
        session,
        resolution,
    })
}
