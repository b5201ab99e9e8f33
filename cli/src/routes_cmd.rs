use std::path::Path;

use anyhow::Result;
use oj_core::config::Config;

use crate::print_json;

pub fn run(home: &Path) -> Result<()> {
    let config = Config::load(home)?;
    print_json(config.route_table())
}
