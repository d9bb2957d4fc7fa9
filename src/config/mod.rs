// src/config/mod.rs

//! Static configuration for the manager.
//!
//! Everything in here is immutable once loaded: the compose file and image
//! tag the build workflow operates on, the RPC credentials, and the
//! per-target container/service/profile mapping. Runtime state (build
//! phases) lives in `manager::state`, never here.
//!
//! - [`model`] holds the raw (TOML-facing) and validated shapes.
//! - [`loader`] reads the TOML file and applies defaults.
//! - [`validate`] runs the semantic checks.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_or_default};
pub use model::{ConfigFile, ManagerSection, RawConfigFile, TargetSpec};
