// src/errors.rs

//! Crate-wide error taxonomy.
//!
//! Validation errors (`InvalidTarget`, `InvalidArgument`) are raised before
//! any external invocation. `Execution` and `Timeout` carry the raw
//! diagnostics of a failed invocation; the `Timeout` wording is deliberately
//! non-fatal, since a missing response can mean a long-running operation is
//! still in progress rather than a crash.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManagerError {
    #[error("invalid target: {0}")]
    InvalidTarget(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("command failed: {0}")]
    Execution(String),

    #[error(
        "command timed out after {seconds}s; a long-running operation may still be in progress"
    )]
    Timeout { seconds: u64 },

    #[error("node query unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("{path} not found; rebuild the node image to enable config file support")]
    ConfigNotFound { path: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ManagerError>;
