use std::path::PathBuf;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use oj_cli::api_cmd;
use oj_cli::api_cmd::ApiCli;
use oj_cli::navigate_cmd;
use oj_cli::navigate_cmd::NavigateCli;
use oj_cli::resolve_cmd;
use oj_cli::resolve_cmd::ResolveCli;
use oj_cli::routes_cmd;
use oj_cli::session_cmd;
use oj_cli::session_cmd::SessionCli;
use oj_core::config::find_oj_home;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Online judge client: route access checks, navigation and session tools.
#[derive(Debug, Parser)]
#[command(name = "oj", version)]
struct Cli {
    /// Directory holding `config.toml` and the persisted session.
    #[arg(long = "home", value_name = "DIR", env = "OJ_HOME", global = true)]
    home: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Evaluate the access rules for one navigation without changing state.
    Resolve(ResolveCli),
    /// Navigate with the stored session, following every redirect.
    Navigate(NavigateCli),
    /// Inspect or change the stored session.
    Session(SessionCli),
    /// Print the active route table.
    Routes,
    /// Send a single request to the judge backend.
    Api(ApiCli),
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let home = match cli.home {
        Some(home) => home,
        None => find_oj_home().context("failed to resolve OJ_HOME")?,
    };
    debug!(home = %home.display(), "using oj home");

    match cli.command {
        Command::Resolve(args) => resolve_cmd::run(args, &home),
        Command::Navigate(args) => navigate_cmd::run(args, &home),
        Command::Session(args) => session_cmd::run(args, &home),
        Command::Routes => routes_cmd::run(&home),
        Command::Api(args) => {
            let runtime = tokio::runtime::Runtime::new().context("failed to start runtime")?;
            runtime.block_on(api_cmd::run(args, &home))
        }
    }
}
