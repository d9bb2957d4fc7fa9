// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Load a configuration file from a given path and return the raw
/// `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** apply defaults
/// or run semantic validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path, apply defaults and validate.
///
/// This is the entry point for an explicitly named config file: the file
/// must exist and parse, and the resolved config must pass validation.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let raw = load_from_path(&path)?;
    let config = ConfigFile::try_from(raw)?;
    Ok(config)
}

/// Resolve the effective configuration.
///
/// - With an explicit path, the file must load (missing/broken is an error).
/// - Without one, `Nodeman.toml` in the current directory is used when
///   present, otherwise the compiled-in defaults apply.
pub fn load_or_default(explicit: Option<&Path>) -> Result<ConfigFile> {
    match explicit {
        Some(path) => load_and_validate(path),
        None => {
            let path = default_config_path();
            if path.exists() {
                load_and_validate(&path)
            } else {
                debug!("no config file found, using compiled-in defaults");
                Ok(ConfigFile::default())
            }
        }
    }
}

/// Default config path: `Nodeman.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("Nodeman.toml")
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;
    use crate::types::Target;

    #[test]
    fn loads_overrides_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
            [manager]
            image_tag = "bitcoin-core:31.0"

            [target.mainnet]
            container = "btc-main"
            "#
        )
        .unwrap();

        let cfg = load_and_validate(file.path()).unwrap();
        assert_eq!(cfg.manager.image_tag, "bitcoin-core:31.0");
        assert_eq!(cfg.spec(Target::Mainnet).container, "btc-main");
    }

    #[test]
    fn explicit_missing_file_is_an_error() {
        let err = load_or_default(Some(Path::new("/definitely/not/here.toml")));
        assert!(err.is_err());
    }

    #[test]
    fn invalid_toml_is_an_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "not = [valid").unwrap();
        assert!(load_and_validate(file.path()).is_err());
    }
}
