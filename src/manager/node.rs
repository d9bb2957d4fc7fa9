// src/manager/node.rs

//! The build-start orchestrator and the synchronous pass-through operations.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, error, info, warn};

use crate::config::{ConfigFile, TargetSpec};
use crate::errors::{ManagerError, Result};
use crate::exec::{CommandError, CommandExecutor, CommandResult, DEFAULT_TIMEOUT};
use crate::manager::commands;
use crate::manager::state::{BuildGate, StateTable};
use crate::manager::{
    ChainInfo, ConfigText, ConfigWritten, LogsChunk, StartOutcome, StatusReport,
};
use crate::types::Target;

/// Extended bounded wait for starting an already-built image.
const START_TIMEOUT: Duration = Duration::from_secs(120);
/// Bounded wait for a container restart.
const RESTART_TIMEOUT: Duration = Duration::from_secs(60);

const MIN_LOG_LINES: u32 = 1;
const MAX_LOG_LINES: u32 = 10_000;

const BUILDING_MESSAGE: &str =
    "building node image (takes ~15-20 minutes); the container starts automatically when the build completes";
const STARTING_MESSAGE: &str = "build complete, starting container";

/// Orchestrates the lifecycle of the per-target node containers.
///
/// Cheap to clone; every operation takes `&self`, so an embedding server
/// can call into one instance from any number of concurrent tasks. The only
/// shared mutable state is the [`StateTable`].
#[derive(Clone)]
pub struct NodeManager {
    config: Arc<ConfigFile>,
    executor: Arc<dyn CommandExecutor>,
    states: Arc<StateTable>,
}

impl NodeManager {
    pub fn new(config: ConfigFile, executor: Arc<dyn CommandExecutor>) -> Self {
        Self {
            config: Arc::new(config),
            executor,
            states: Arc::new(StateTable::new()),
        }
    }

    /// Resolve a target name, rejecting anything outside the fixed set
    /// before any external invocation happens.
    fn resolve(&self, name: &str) -> Result<Target> {
        Target::from_str(name).map_err(ManagerError::InvalidTarget)
    }

    /// Make sure the target's container is running, building the image
    /// first if it is absent.
    ///
    /// With the image present this starts the container synchronously and
    /// reports the outcome directly. Otherwise the target transitions to
    /// `Building`, a detached build-and-start task is launched, and the
    /// call returns immediately; callers must not expect completion within
    /// the request lifetime and should poll [`NodeManager::status`].
    pub async fn ensure_running(&self, name: &str) -> Result<StartOutcome> {
        let target = self.resolve(name)?;

        // Re-detect an in-flight workflow before consulting the image: a
        // repeat trigger is a no-op that reports the existing status, never
        // a second invocation. The check-and-set below still decides
        // ownership for callers racing past this point.
        let state = self.states.snapshot(target);
        if state.phase.in_flight() {
            debug!(target = %target, "build already in flight, not launching another");
            return Ok(StartOutcome {
                accepted: true,
                building: true,
                message: state.message,
            });
        }

        let check = self
            .executor
            .execute(commands::image_check(&self.config.manager), DEFAULT_TIMEOUT)
            .await;
        // An inconclusive check (failure, timeout) reads as "absent": the
        // build path is the safe one, and it re-checks nothing.
        let image_exists = !check.stdout.trim().is_empty();

        if image_exists {
            return self.start_built(target).await;
        }

        info!(target = %target, "node image not found, launching background build");

        match self.states.try_begin_build(target, BUILDING_MESSAGE) {
            BuildGate::InFlight { message } => {
                debug!(target = %target, "build already in flight, not launching another");
                return Ok(StartOutcome {
                    accepted: true,
                    building: true,
                    message,
                });
            }
            BuildGate::Started => {}
        }

        self.spawn_build_task(target);

        Ok(StartOutcome {
            accepted: true,
            building: true,
            message: BUILDING_MESSAGE.to_string(),
        })
    }

    /// Synchronous start of an already-built image.
    async fn start_built(&self, target: Target) -> Result<StartOutcome> {
        let spec = self.config.spec(target);
        info!(target = %target, container = %spec.container, "starting node container");

        let result = self
            .executor
            .execute(commands::compose_up(&self.config.manager, spec), START_TIMEOUT)
            .await;

        if result.success {
            info!(target = %target, "node container started");
            self.states.resolve_idle(target);
            return Ok(StartOutcome {
                accepted: true,
                building: false,
                message: format!("{target} node started"),
            });
        }

        Err(command_failure(result))
    }

    /// Detach the build-and-start workflow.
    ///
    /// The triggering request returns as soon as this has spawned; the state
    /// transition to `Building` already happened synchronously. The outer
    /// task exists to convert a panic of the inner one into `Failed`, so the
    /// phase can never stick at `Building` and the host process never dies
    /// from a build task error.
    fn spawn_build_task(&self, target: Target) {
        let mgr = self.clone();
        tokio::spawn(async move {
            let inner = tokio::spawn({
                let mgr = mgr.clone();
                async move { mgr.build_and_start(target).await }
            });
            if let Err(err) = inner.await {
                error!(target = %target, error = %err, "build task aborted unexpectedly");
                mgr.states
                    .mark_failed(target, format!("build task aborted: {err}"));
            }
        });
    }

    /// Background workflow: build the image, then start the container.
    ///
    /// Every failure is folded into the state table; nothing propagates,
    /// since no caller is waiting.
    async fn build_and_start(&self, target: Target) {
        let spec = self.config.spec(target);
        info!(target = %target, service = %spec.service, "image build started");

        let build = self
            .executor
            .execute_streaming(
                commands::compose_build(&self.config.manager, spec),
                format!("build:{target}"),
            )
            .await;

        if !build.success {
            let detail = match build.exit_code {
                Some(code) => format!("build failed with exit code {code}"),
                None => format!("build failed: {}", build.failure_detail()),
            };
            error!(target = %target, "{detail}");
            self.states.mark_failed(target, detail);
            return;
        }

        info!(target = %target, "image build complete, starting container");
        self.states.mark_starting(target, STARTING_MESSAGE);

        let start = self
            .executor
            .execute(commands::compose_up(&self.config.manager, spec), START_TIMEOUT)
            .await;

        if start.success {
            info!(target = %target, "node container started after build");
            self.states.resolve_idle(target);
        } else {
            // The image exists now; a retry takes the fast synchronous path.
            let detail = format!("start failed: {}", start.failure_detail());
            error!(target = %target, "{detail}");
            self.states.mark_failed(target, detail);
        }
    }

    /// Report the target's status.
    ///
    /// An in-flight build/start wins over live container inspection: a
    /// stale or absent container mid-build must not read as "stopped".
    pub async fn status(&self, name: &str) -> Result<StatusReport> {
        let target = self.resolve(name)?;
        let spec = self.config.spec(target);
        let state = self.states.snapshot(target);

        if state.phase.in_flight() {
            return Ok(StatusReport {
                target,
                container: spec.container.clone(),
                running: false,
                building: true,
                message: Some(state.message),
            });
        }

        let running = self.inspect_running(spec).await;
        let message = (!state.message.is_empty()).then_some(state.message);

        Ok(StatusReport {
            target,
            container: spec.container.clone(),
            running,
            building: false,
            message,
        })
    }

    /// Inspect the live container. Any failure (absent container,
    /// unparsable output) reads as "not running" rather than "unknown".
    async fn inspect_running(&self, spec: &TargetSpec) -> bool {
        let result = self
            .executor
            .execute(commands::inspect(spec), DEFAULT_TIMEOUT)
            .await;

        if !result.success || result.stdout.trim().is_empty() {
            return false;
        }

        match serde_json::from_str::<serde_json::Value>(&result.stdout) {
            Ok(info) => info
                .pointer("/State/Running")
                .and_then(|v| v.as_bool())
                .unwrap_or(false),
            Err(err) => {
                warn!(container = %spec.container, error = %err, "unparsable inspect output");
                false
            }
        }
    }

    /// Stop and remove the target's container.
    pub async fn stop(&self, name: &str) -> Result<()> {
        let target = self.resolve(name)?;
        let spec = self.config.spec(target);
        info!(target = %target, container = %spec.container, "stopping node container");

        let stop = self
            .executor
            .execute(commands::stop(spec), DEFAULT_TIMEOUT)
            .await;

        // Removal is best-effort; failure usually means nothing to remove.
        let rm = self
            .executor
            .execute(commands::remove(spec), DEFAULT_TIMEOUT)
            .await;
        if !rm.success {
            debug!(
                container = %spec.container,
                detail = %rm.failure_detail(),
                "container removal skipped"
            );
        }

        if stop.success {
            info!(target = %target, "node container stopped");
            Ok(())
        } else {
            Err(command_failure(stop))
        }
    }

    /// Restart the target's container in place.
    pub async fn restart(&self, name: &str) -> Result<()> {
        let target = self.resolve(name)?;
        let spec = self.config.spec(target);
        info!(target = %target, container = %spec.container, "restarting node container");

        let result = self
            .executor
            .execute(commands::restart(spec), RESTART_TIMEOUT)
            .await;

        if result.success {
            info!(target = %target, "node container restarted");
            Ok(())
        } else {
            Err(command_failure(result))
        }
    }

    /// Tail the container's logs. `lines` outside 1..=10000 is rejected
    /// before any invocation.
    pub async fn logs(&self, name: &str, lines: u32) -> Result<LogsChunk> {
        let target = self.resolve(name)?;
        if !(MIN_LOG_LINES..=MAX_LOG_LINES).contains(&lines) {
            return Err(ManagerError::InvalidArgument(format!(
                "lines must be between {MIN_LOG_LINES} and {MAX_LOG_LINES} (got {lines})"
            )));
        }

        let spec = self.config.spec(target);
        let result = self
            .executor
            .execute(commands::logs(spec, lines), DEFAULT_TIMEOUT)
            .await;

        if !result.success {
            return Err(command_failure(result));
        }

        // The node writes to both streams; return them combined.
        Ok(LogsChunk {
            logs: format!("{}{}", result.stdout, result.stderr),
        })
    }

    /// Query the node's own blockchain status over RPC.
    pub async fn chain_info(&self, name: &str) -> Result<ChainInfo> {
        let target = self.resolve(name)?;
        let spec = self.config.spec(target);

        let result = self
            .executor
            .execute(
                commands::chain_info(&self.config.manager, spec, target),
                DEFAULT_TIMEOUT,
            )
            .await;

        if !result.success {
            return Err(ManagerError::UpstreamUnavailable(result.failure_detail()));
        }
        if result.stdout.trim().is_empty() {
            return Err(ManagerError::UpstreamUnavailable(
                "empty response from node".to_string(),
            ));
        }

        parse_chain_info(&result.stdout)
    }

    /// Read the node's configuration file out of the container.
    pub async fn read_config(&self, name: &str) -> Result<ConfigText> {
        let target = self.resolve(name)?;
        let spec = self.config.spec(target);

        let result = self
            .executor
            .execute(commands::read_config(spec), DEFAULT_TIMEOUT)
            .await;

        if !result.success {
            debug!(
                target = %target,
                detail = %result.failure_detail(),
                "node config not readable"
            );
            return Err(ManagerError::ConfigNotFound {
                path: spec.config_path.clone(),
            });
        }

        Ok(ConfigText {
            config: result.stdout,
            path: spec.config_path.clone(),
        })
    }

    /// Replace the node's configuration file inside the container.
    ///
    /// Takes effect on the next restart; this only writes the file.
    pub async fn write_config(&self, name: &str, content: &str) -> Result<ConfigWritten> {
        let target = self.resolve(name)?;
        if content.is_empty() {
            return Err(ManagerError::InvalidArgument(
                "config content is required".to_string(),
            ));
        }

        let spec = self.config.spec(target);
        info!(target = %target, path = %spec.config_path, "updating node config");

        let mkdir = self
            .executor
            .execute(commands::make_config_dir(spec), DEFAULT_TIMEOUT)
            .await;
        if !mkdir.success {
            debug!(
                target = %target,
                detail = %mkdir.failure_detail(),
                "config directory creation skipped"
            );
        }

        let result = self
            .executor
            .execute(commands::write_config(spec, content), DEFAULT_TIMEOUT)
            .await;

        if result.success {
            info!(target = %target, "node config updated");
            Ok(ConfigWritten {
                path: spec.config_path.clone(),
            })
        } else {
            Err(command_failure(result))
        }
    }
}

/// Map a failed invocation onto the error taxonomy, keeping the raw
/// diagnostic text.
fn command_failure(result: CommandResult) -> ManagerError {
    match result.error {
        Some(CommandError::Timeout { seconds }) => ManagerError::Timeout { seconds },
        Some(CommandError::Execution(msg)) => ManagerError::Execution(msg),
        None => ManagerError::Execution(result.failure_detail()),
    }
}

/// Strict view of `getblockchaininfo`: a missing or mistyped field means the
/// upstream response is unusable, never partially usable.
#[derive(Debug, Deserialize)]
struct RawChainInfo {
    blocks: u64,
    headers: u64,
    #[serde(rename = "verificationprogress")]
    verification_progress: f64,
    #[serde(rename = "initialblockdownload")]
    initial_block_download: bool,
    chain: String,
}

fn parse_chain_info(raw: &str) -> Result<ChainInfo> {
    let info: RawChainInfo = serde_json::from_str(raw).map_err(|err| {
        ManagerError::UpstreamUnavailable(format!("unparsable blockchain info: {err}"))
    })?;

    Ok(ChainInfo {
        blocks: info.blocks,
        headers: info.headers,
        verification_progress: info.verification_progress,
        initial_block_download: info.initial_block_download,
        chain: info.chain,
    })
}
