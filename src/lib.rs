// src/lib.rs

pub mod cli;
pub mod config;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod manager;
pub mod types;

use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use serde::Serialize;
use tracing::debug;

use crate::cli::{CliArgs, Command};
use crate::config::load_or_default;
use crate::errors::Result;
use crate::exec::RealExecutor;
use crate::manager::{NodeManager, StatusReport};

/// How often the CLI re-checks an in-flight build it is waiting out.
const BUILD_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading
/// - the real command executor
/// - the node manager
/// then dispatches the requested operation and prints its JSON result.
pub async fn run(args: CliArgs) -> Result<()> {
    let cfg = load_or_default(args.config.as_deref().map(Path::new))?;
    debug!(compose_file = %cfg.manager.compose_file, "configuration loaded");

    let manager = NodeManager::new(cfg, Arc::new(RealExecutor::new()));

    match args.command {
        Command::Start { target } => {
            let outcome = manager.ensure_running(&target).await?;
            print_json(&outcome)?;
            // The build continues in a detached task; returning now would
            // shut the runtime down and kill it. Stay attached until the
            // workflow resolves, then report the final status.
            if outcome.building {
                let report = wait_for_resolution(&manager, &target).await?;
                print_json(&report)?;
            }
            Ok(())
        }
        Command::Stop { target } => {
            manager.stop(&target).await?;
            print_json(&Ack::default())
        }
        Command::Restart { target } => {
            manager.restart(&target).await?;
            print_json(&Ack::default())
        }
        Command::Status { target } => print_json(&manager.status(&target).await?),
        Command::Logs { target, lines } => print_json(&manager.logs(&target, lines).await?),
        Command::ChainInfo { target } => print_json(&manager.chain_info(&target).await?),
        Command::ConfigGet { target } => print_json(&manager.read_config(&target).await?),
        Command::ConfigSet { target, file } => {
            let content = read_content(&file)?;
            print_json(&manager.write_config(&target, &content).await?)
        }
    }
}

/// Plain success acknowledgement for operations with no payload.
#[derive(Serialize)]
struct Ack {
    success: bool,
}

impl Default for Ack {
    fn default() -> Self {
        Self { success: true }
    }
}

/// Poll until a detached build-and-start workflow reaches a terminal state.
async fn wait_for_resolution(manager: &NodeManager, target: &str) -> Result<StatusReport> {
    loop {
        let report = manager.status(target).await?;
        if !report.building {
            return Ok(report);
        }
        tokio::time::sleep(BUILD_POLL_INTERVAL).await;
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("serializing result")?;
    println!("{rendered}");
    Ok(())
}

/// New config content from a file, or from stdin when `file` is `-`.
fn read_content(file: &str) -> Result<String> {
    if file == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        Ok(std::fs::read_to_string(file)?)
    }
}
