// src/manager/mod.rs

//! Build-start orchestration for containerized node targets.
//!
//! This module ties together:
//! - the shared per-target phase table ([`state`])
//! - the argument vectors sent to the container runtime ([`commands`])
//! - the [`NodeManager`] operations built on the command executor ([`node`])
//!
//! The orchestration core here is what an outer control surface (CLI today,
//! an HTTP layer if one is bolted on) calls into; it owns all lifecycle
//! semantics and all shared state.

pub mod commands;
pub mod node;
pub mod state;

pub use node::NodeManager;
pub use state::{BuildGate, BuildState, Phase, StateTable};

use serde::Serialize;

use crate::types::Target;

/// Immediate acknowledgement from [`NodeManager::ensure_running`].
///
/// When `building` is true the work continues in a detached task; callers
/// must not expect completion within the request lifetime and should poll
/// [`NodeManager::status`] instead.
#[derive(Debug, Clone, Serialize)]
pub struct StartOutcome {
    pub accepted: bool,
    pub building: bool,
    pub message: String,
}

/// Live status of one target.
#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub target: Target,
    pub container: String,
    pub running: bool,
    pub building: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Tail of a target's container logs.
#[derive(Debug, Clone, Serialize)]
pub struct LogsChunk {
    pub logs: String,
}

/// Blockchain sync status as reported by the node's own RPC.
#[derive(Debug, Clone, Serialize)]
pub struct ChainInfo {
    pub blocks: u64,
    pub headers: u64,
    pub verification_progress: f64,
    pub initial_block_download: bool,
    pub chain: String,
}

/// Contents of a target node's configuration file.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigText {
    pub config: String,
    pub path: String,
}

/// Acknowledgement of a configuration write.
#[derive(Debug, Clone, Serialize)]
pub struct ConfigWritten {
    pub path: String,
}
