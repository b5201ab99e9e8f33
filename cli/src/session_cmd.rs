use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use clap::Subcommand;
use oj_core::config::Config;
use oj_core::config::load_session;
use oj_core::session::SessionSnapshot;
use oj_core::session::SessionStore;
use oj_core::session::UserRecord;
use serde::Serialize;

use crate::print_json;

#[derive(Debug, Parser)]
pub struct SessionCli {
    #[command(subcommand)]
    command: SessionSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum SessionSubcommand {
    /// Store a token and user record as the active session.
    Login {
        #[arg(long = "token", value_name = "TOKEN")]
        token: String,
        /// User record as returned by the backend, e.g. `{"id":1,"username":"a","role":0}`.
        #[arg(long = "user", value_name = "JSON")]
        user: String,
    },
    /// Clear the stored session.
    Logout,
    /// Print the stored session without the token.
    Show,
}

#[derive(Debug, Serialize)]
struct SessionView {
    authenticated: bool,
    is_admin: bool,
    snapshot: SessionSnapshot,
    user: Option<UserRecord>,
}

impl SessionView {
    fn new(store: &SessionStore, admin_role_threshold: i64) -> Self {
        let snapshot = store.snapshot();
        Self {
            authenticated: snapshot.is_authenticated(),
            is_admin: snapshot.is_admin(admin_role_threshold),
            snapshot,
            user: store.current_user(),
        }
    }
}

#[derive(Debug, Serialize)]
struct LogoutOutput {
    signed_out: bool,
}

pub fn run(cli: SessionCli, home: &Path) -> Result<()> {
    let config = Config::load(home)?;
    let store = load_session(home).context("failed to load stored session")?;
    let threshold = config.guard.admin_role_threshold;

    match cli.command {
        SessionSubcommand::Login { token, user } => {
            let user: UserRecord =
                serde_json::from_str(&user).context("--user must be a JSON user record")?;
            store.login(user, &token)?;
            print_json(SessionView::new(&store, threshold))
        }
        SessionSubcommand::Logout => {
            let signed_out = store.logout()?;
            print_json(LogoutOutput { signed_out })
        }
        SessionSubcommand::Show => print_json(SessionView::new(&store, threshold)),
    }
}
