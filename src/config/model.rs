// src/config/model.rs

use serde::Deserialize;

use crate::config::validate::validate_config;
use crate::errors::ManagerError;
use crate::types::Target;

/// Top-level configuration as read from a TOML file.
///
/// Every field is optional; anything left out falls back to the stock
/// deployment's values, so an empty (or missing) file is a valid config:
///
/// ```toml
/// [manager]
/// compose_file = "/repo/miner-apps/jd-client/jd-gui/docker-compose.yml"
/// image_tag = "sv2-bitcoin-core-ipc:30.2"
///
/// [target.testnet]
/// container = "sv2-bitcoin-testnet"
/// config_path = "/home/bitcoin/.bitcoin/testnet4/bitcoin.conf"
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub manager: RawManagerSection,

    #[serde(default)]
    pub target: RawTargetTable,
}

/// `[manager]` section, pre-defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawManagerSection {
    pub compose_file: Option<String>,
    pub image_tag: Option<String>,
    pub rpc_user: Option<String>,
    pub rpc_password: Option<String>,
}

/// `[target.<name>]` sections, pre-defaults.
///
/// The keys are fixed: the target set is an enum, not an open table, so an
/// unknown `[target.regtest]` section is a TOML-level error rather than a
/// silently ignored one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawTargetTable {
    #[serde(default)]
    pub mainnet: RawTargetSection,

    #[serde(default)]
    pub testnet: RawTargetSection,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawTargetSection {
    pub container: Option<String>,
    pub service: Option<String>,
    pub profile: Option<String>,
    pub config_path: Option<String>,
    pub config_dir: Option<String>,
}

/// Validated runtime configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub manager: ManagerSection,
    mainnet: TargetSpec,
    testnet: TargetSpec,
}

/// Validated `[manager]` section.
#[derive(Debug, Clone)]
pub struct ManagerSection {
    /// Compose file the build/start tooling operates on.
    pub compose_file: String,
    /// Image tag whose presence gates build-vs-start.
    pub image_tag: String,
    pub rpc_user: String,
    pub rpc_password: String,
}

/// Static mapping from a target to its container, compose service/profile
/// and in-container node config location. Configuration, not runtime state.
#[derive(Debug, Clone)]
pub struct TargetSpec {
    pub container: String,
    pub service: String,
    pub profile: String,
    pub config_path: String,
    pub config_dir: String,
}

impl ConfigFile {
    /// The resolved spec for a target.
    pub fn spec(&self, target: Target) -> &TargetSpec {
        match target {
            Target::Mainnet => &self.mainnet,
            Target::Testnet => &self.testnet,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            manager: default_manager_section(),
            mainnet: default_spec(Target::Mainnet),
            testnet: default_spec(Target::Testnet),
        }
    }
}

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = ManagerError;

    fn try_from(raw: RawConfigFile) -> Result<Self, Self::Error> {
        let defaults = default_manager_section();
        let cfg = ConfigFile {
            manager: ManagerSection {
                compose_file: raw.manager.compose_file.unwrap_or(defaults.compose_file),
                image_tag: raw.manager.image_tag.unwrap_or(defaults.image_tag),
                rpc_user: raw.manager.rpc_user.unwrap_or(defaults.rpc_user),
                rpc_password: raw.manager.rpc_password.unwrap_or(defaults.rpc_password),
            },
            mainnet: merge_spec(raw.target.mainnet, default_spec(Target::Mainnet)),
            testnet: merge_spec(raw.target.testnet, default_spec(Target::Testnet)),
        };
        validate_config(&cfg)?;
        Ok(cfg)
    }
}

fn merge_spec(raw: RawTargetSection, defaults: TargetSpec) -> TargetSpec {
    TargetSpec {
        container: raw.container.unwrap_or(defaults.container),
        service: raw.service.unwrap_or(defaults.service),
        profile: raw.profile.unwrap_or(defaults.profile),
        config_path: raw.config_path.unwrap_or(defaults.config_path),
        config_dir: raw.config_dir.unwrap_or(defaults.config_dir),
    }
}

fn default_manager_section() -> ManagerSection {
    ManagerSection {
        compose_file: "/repo/miner-apps/jd-client/jd-gui/docker-compose.yml".to_string(),
        image_tag: "sv2-bitcoin-core-ipc:30.2".to_string(),
        rpc_user: "stratum".to_string(),
        rpc_password: "stratum123".to_string(),
    }
}

fn default_spec(target: Target) -> TargetSpec {
    match target {
        Target::Mainnet => TargetSpec {
            container: "sv2-bitcoin-mainnet".to_string(),
            service: "bitcoin-core-mainnet".to_string(),
            profile: "bitcoin-mainnet".to_string(),
            config_path: "/home/bitcoin/.bitcoin/bitcoin.conf".to_string(),
            config_dir: "/home/bitcoin/.bitcoin".to_string(),
        },
        Target::Testnet => TargetSpec {
            container: "sv2-bitcoin-testnet".to_string(),
            service: "bitcoin-core-testnet".to_string(),
            profile: "bitcoin-testnet".to_string(),
            config_path: "/home/bitcoin/.bitcoin/testnet4/bitcoin.conf".to_string(),
            config_dir: "/home/bitcoin/.bitcoin/testnet4".to_string(),
        },
    }
}
