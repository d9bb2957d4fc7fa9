#![allow(dead_code)]

pub use nodeman_test_utils::{init_tracing, with_timeout};

use std::sync::Arc;
use std::time::Duration;

use nodeman::config::ConfigFile;
use nodeman::manager::NodeManager;
use nodeman_test_utils::fake_executor::FakeExecutor;

/// Compose file of the stock configuration (used in argv prefixes below).
pub const COMPOSE_FILE: &str = "/repo/miner-apps/jd-client/jd-gui/docker-compose.yml";
pub const MAINNET_CONTAINER: &str = "sv2-bitcoin-mainnet";
pub const TESTNET_CONTAINER: &str = "sv2-bitcoin-testnet";

/// Manager wired to a fresh fake executor over the default configuration.
pub fn manager_with_fake() -> (NodeManager, FakeExecutor) {
    let fake = FakeExecutor::new();
    let manager = NodeManager::new(ConfigFile::default(), Arc::new(fake.clone()));
    (manager, fake)
}

pub fn image_prefix() -> Vec<&'static str> {
    vec!["docker", "images"]
}

pub fn build_prefix() -> Vec<&'static str> {
    vec!["docker", "compose", "-f", COMPOSE_FILE, "build"]
}

pub fn up_prefix() -> Vec<&'static str> {
    vec!["docker", "compose", "-f", COMPOSE_FILE, "--profile"]
}

pub fn inspect_prefix() -> Vec<&'static str> {
    vec!["docker", "inspect"]
}

/// Poll `status` until the build flag clears (the background task reached a
/// terminal state), failing the test after the shared timeout.
pub async fn wait_until_not_building(manager: &NodeManager, target: &str) {
    with_timeout(async {
        loop {
            let status = manager.status(target).await.expect("status query");
            if !status.building {
                return;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await;
}
