pub mod api_cmd;
pub mod navigate_cmd;
pub mod resolve_cmd;
pub mod routes_cmd;
pub mod session_cmd;

use anyhow::Result;
use serde::Serialize;

pub(crate) fn print_json<T: Serialize>(value: T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(&value)?;
    println!("{rendered}");
    Ok(())
}
