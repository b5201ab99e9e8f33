use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use oj_core::config::Config;
use oj_core::config::load_session;
use oj_core::navigation::Location;
use oj_core::navigation::Navigator;
use oj_core::navigation::Notice;
use oj_core::navigation::NoticeSink;

use crate::print_json;

#[derive(Debug, Parser)]
pub struct NavigateCli {
    /// Location being navigated to.
    #[arg(value_name = "TARGET")]
    target: String,

    /// Current location before navigating. Defaults to `/`.
    #[arg(long = "from", value_name = "LOCATION")]
    from: Option<String>,
}

/// Prints notices to stderr as they are raised.
struct StderrNotices;

impl NoticeSink for StderrNotices {
    fn notify(&mut self, notice: Notice) {
        eprintln!("{notice}");
    }
}

pub fn run(cli: NavigateCli, home: &Path) -> Result<()> {
    let config = Config::load(home)?;
    let session = load_session(home).context("failed to load stored session")?;
    let mut navigator = Navigator::new(config.route_table(), config.resolver(), session);
    if let Some(from) = cli.from.as_deref() {
        navigator = navigator.with_current(Location::parse(from));
    }

    let report = navigator.navigate(Location::parse(&cli.target), &mut StderrNotices)?;
    print_json(report)
}
