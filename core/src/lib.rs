//! Route access control and session plumbing for the online judge client.
//!
//! The [`guard`] resolver decides every navigation from the target, the
//! origin, and a [`session::SessionSnapshot`]. [`navigation::Navigator`]
//! drives it against a [`route::RouteTable`], and [`client::JudgeClient`]
//! talks to the backend with the same session.

pub mod client;
pub mod config;
pub mod guard;
pub mod navigation;
pub mod route;
pub mod session;
