// src/types.rs

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A logical network profile with its own isolated node container.
///
/// The set of targets is fixed: each one maps to a static
/// container/service/profile triple in the configuration, never to anything
/// derived at runtime. Callers name targets as strings; parsing is the only
/// place an unknown name can be rejected, so every operation validates its
/// target before touching the container runtime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Target {
    Mainnet,
    Testnet,
}

impl Target {
    /// All known targets, in a stable order.
    pub const ALL: [Target; 2] = [Target::Mainnet, Target::Testnet];

    pub fn as_str(self) -> &'static str {
        match self {
            Target::Mainnet => "mainnet",
            Target::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mainnet" => Ok(Target::Mainnet),
            "testnet" => Ok(Target::Testnet),
            other => Err(format!("'{other}' (expected one of: mainnet, testnet)")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_targets_case_insensitively() {
        assert_eq!("mainnet".parse::<Target>().unwrap(), Target::Mainnet);
        assert_eq!(" Testnet ".parse::<Target>().unwrap(), Target::Testnet);
    }

    #[test]
    fn rejects_unknown_targets() {
        let err = "signet".parse::<Target>().unwrap_err();
        assert!(err.contains("signet"));
        assert!(err.contains("mainnet"));
    }

    #[test]
    fn serde_representation_is_lowercase() {
        assert_eq!(
            serde_json::to_string(&Target::Mainnet).unwrap(),
            "\"mainnet\""
        );
        let t: Target = serde_json::from_str("\"testnet\"").unwrap();
        assert_eq!(t, Target::Testnet);
    }
}
