// src/config/validate.rs

use crate::config::model::ConfigFile;
use crate::errors::{ManagerError, Result};
use crate::types::Target;

/// Run basic semantic validation against a resolved configuration.
///
/// This checks:
/// - `[manager]` fields are non-empty
/// - every target's container/service/profile names are non-empty
/// - in-container config paths are absolute
/// - container and service names are unique across targets
///
/// It does **not** check that the compose file exists or that the container
/// runtime knows the names; those are runtime concerns surfaced by the
/// executor when the commands actually run.
pub fn validate_config(cfg: &ConfigFile) -> Result<()> {
    ensure_manager_section(cfg)?;
    ensure_target_specs(cfg)?;
    ensure_unique_names(cfg)?;
    Ok(())
}

fn ensure_manager_section(cfg: &ConfigFile) -> Result<()> {
    if cfg.manager.compose_file.trim().is_empty() {
        return Err(ManagerError::Config(
            "[manager].compose_file must not be empty".to_string(),
        ));
    }
    if cfg.manager.image_tag.trim().is_empty() {
        return Err(ManagerError::Config(
            "[manager].image_tag must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn ensure_target_specs(cfg: &ConfigFile) -> Result<()> {
    for target in Target::ALL {
        let spec = cfg.spec(target);
        for (field, value) in [
            ("container", &spec.container),
            ("service", &spec.service),
            ("profile", &spec.profile),
        ] {
            if value.trim().is_empty() {
                return Err(ManagerError::Config(format!(
                    "[target.{target}].{field} must not be empty"
                )));
            }
        }
        for (field, value) in [
            ("config_path", &spec.config_path),
            ("config_dir", &spec.config_dir),
        ] {
            if !value.starts_with('/') {
                return Err(ManagerError::Config(format!(
                    "[target.{target}].{field} must be an absolute path (got '{value}')"
                )));
            }
        }
    }
    Ok(())
}

fn ensure_unique_names(cfg: &ConfigFile) -> Result<()> {
    let mainnet = cfg.spec(Target::Mainnet);
    let testnet = cfg.spec(Target::Testnet);

    if mainnet.container == testnet.container {
        return Err(ManagerError::Config(format!(
            "targets must use distinct containers (both use '{}')",
            mainnet.container
        )));
    }
    if mainnet.service == testnet.service {
        return Err(ManagerError::Config(format!(
            "targets must use distinct services (both use '{}')",
            mainnet.service
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::config::model::{ConfigFile, RawConfigFile};

    fn from_toml(toml: &str) -> crate::errors::Result<ConfigFile> {
        let raw: RawConfigFile = toml::from_str(toml).unwrap();
        ConfigFile::try_from(raw)
    }

    #[test]
    fn default_config_is_valid() {
        assert!(from_toml("").is_ok());
    }

    #[test]
    fn empty_container_name_is_rejected() {
        let err = from_toml(
            r#"
            [target.mainnet]
            container = ""
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("container"));
    }

    #[test]
    fn relative_config_path_is_rejected() {
        let err = from_toml(
            r#"
            [target.testnet]
            config_path = "bitcoin.conf"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("absolute"));
    }

    #[test]
    fn colliding_containers_are_rejected() {
        let err = from_toml(
            r#"
            [target.mainnet]
            container = "bitcoind"
            [target.testnet]
            container = "bitcoind"
            "#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("distinct containers"));
    }
}
