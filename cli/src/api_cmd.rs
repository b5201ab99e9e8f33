use std::path::Path;

use anyhow::Context;
use anyhow::Result;
use anyhow::anyhow;
use anyhow::bail;
use clap::Parser;
use clap::ValueEnum;
use oj_core::client::ApiError;
use oj_core::client::JudgeClient;
use oj_core::config::Config;
use oj_core::config::load_session;
use oj_core::navigation::Notice;
use serde_json::Value;

use crate::print_json;

#[derive(Debug, Parser)]
pub struct ApiCli {
    #[arg(value_enum, value_name = "METHOD")]
    method: ApiMethod,

    /// Request path relative to the configured base URL, e.g. `/api/problems`.
    #[arg(value_name = "PATH")]
    path: String,

    /// Query parameter as `KEY=VALUE`; may be repeated.
    #[arg(long = "query", value_name = "KEY=VALUE", value_parser = parse_pair)]
    query: Vec<(String, String)>,

    /// JSON request body for `post` and `put`.
    #[arg(long = "body", value_name = "JSON")]
    body: Option<String>,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ApiMethod {
    Get,
    Post,
    Put,
    Delete,
}

pub async fn run(cli: ApiCli, home: &Path) -> Result<()> {
    let config = Config::load(home)?;
    let session = load_session(home).context("failed to load stored session")?;
    let client = JudgeClient::new(&config.client, session)?;

    let body = match cli.body.as_deref() {
        Some(text) => serde_json::from_str(text).context("--body must be valid JSON")?,
        None => Value::Object(serde_json::Map::new()),
    };
    let query: Vec<(&str, &str)> = cli
        .query
        .iter()
        .map(|(key, value)| (key.as_str(), value.as_str()))
        .collect();

    let result = match cli.method {
        ApiMethod::Get => client.get(&cli.path, &query).await,
        ApiMethod::Post => client.post(&cli.path, &body).await,
        ApiMethod::Put => client.put(&cli.path, &body).await,
        ApiMethod::Delete => client.delete(&cli.path).await,
    };

    match result {
        Ok(envelope) => print_json(envelope),
        Err(ApiError::Unauthorized(message)) => {
            eprintln!("{}", Notice::SignInRequired);
            bail!("session cleared: {message}")
        }
        Err(err) => Err(anyhow!(err)),
    }
}

fn parse_pair(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((key, val)) if !key.is_empty() => Ok((key.to_string(), val.to_string())),
        _ => Err(format!("expected KEY=VALUE, got '{value}'")),
    }
}
