//! urichain-sim — drive one delegation-chain session against a scripted host.
//!
//! Usage: urichain-sim [--async] [--config PATH] <uri>...
//!
//! Prints one JSON line per uri.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use bytes::Bytes;
use serde::Serialize;
use tokio::sync::oneshot;

use urichain_core::config::UriChainConfig;
use urichain_core::RetCode;

mod host;

/// Upper bound on waiting for a single async answer.
const ASYNC_WAIT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "lowercase")]
enum Mode {
    Sync,
    Async,
}

#[derive(Serialize)]
struct Outcome<'a> {
    uri: &'a str,
    mode: Mode,
    ret_code: RetCode,
    content: String,
}

struct Args {
    mode: Mode,
    config: Option<PathBuf>,
    uris: Vec<String>,
}

fn parse_args() -> Result<Args> {
    let mut mode = Mode::Sync;
    let mut config = None;
    let mut uris = Vec::new();
    let mut args = std::env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--async" => mode = Mode::Async,
            "--config" => {
                let path = args.next().context("--config needs a path")?;
                config = Some(PathBuf::from(path));
            }
            flag if flag.starts_with("--") => bail!("unknown flag: {flag}"),
            _ => uris.push(arg),
        }
    }
    if uris.is_empty() {
        bail!("usage: urichain-sim [--async] [--config PATH] <uri>...");
    }
    Ok(Args { mode, config, uris })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = parse_args()?;

    let config = match &args.config {
        Some(path) => UriChainConfig::from_file(path)?,
        None => UriChainConfig::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "failed to load config, using defaults");
            UriChainConfig::default()
        }),
    };

    let sim = host::wire(&config, tokio::runtime::Handle::current());
    tracing::info!(
        session_id = %sim.session.id(),
        host_delegate = sim.session.delegate().has_external_delegate(),
        host_told = sim.host.core_registered(),
        loader = ?sim.session.loader().map(|l| l.names()),
        "session ready"
    );

    for uri in &args.uris {
        let (ret_code, content) = match args.mode {
            Mode::Sync => {
                let res = sim.session.request_sync(uri);
                (res.ret_code, res.content)
            }
            Mode::Async => resolve_async(&sim, uri).await?,
        };
        let line = Outcome {
            uri,
            mode: args.mode,
            ret_code,
            content: String::from_utf8_lossy(&content).into_owned(),
        };
        println!("{}", serde_json::to_string(&line)?);
    }

    sim.boundary.sessions().remove(sim.session.id());
    tracing::debug!(session_id = %sim.session.id(), "session closed");
    Ok(())
}

async fn resolve_async(sim: &host::Sim, uri: &str) -> Result<(RetCode, Bytes)> {
    let (tx, rx) = oneshot::channel();
    sim.session.request_async(uri, move |code, content| {
        let _ = tx.send((code, content));
    });
    tokio::time::timeout(ASYNC_WAIT, rx)
        .await
        .with_context(|| format!("no answer for {uri} within {ASYNC_WAIT:?}"))?
        .context("callback dropped without firing")
}
