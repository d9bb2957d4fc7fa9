// tests/status.rs

//! Status reporting: in-flight precedence and live inspection fallbacks.

mod common;

use std::error::Error;
use std::time::Duration;

use nodeman_test_utils::builders::{failed, ok};

use crate::common::{
    build_prefix, init_tracing, inspect_prefix, manager_with_fake, wait_until_not_building,
};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn in_flight_build_wins_over_live_inspection() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.delay_prefix(&build_prefix(), Duration::from_millis(200));
    // Even a "running" inspection result must not leak through mid-build.
    fake.on_prefix(&inspect_prefix(), ok(r#"{"State":{"Running":true}}"#));

    manager.ensure_running("mainnet").await?;

    let status = manager.status("mainnet").await?;
    assert!(status.building);
    assert!(!status.running);
    assert!(status.message.unwrap().contains("15-20 minutes"));

    // The inspection is not even attempted while the build is in flight.
    assert_eq!(fake.calls_matching(&inspect_prefix()), 0);

    wait_until_not_building(&manager, "mainnet").await;
    Ok(())
}

#[tokio::test]
async fn running_container_is_reported_running() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.on_prefix(&inspect_prefix(), ok(r#"{"Id":"abc","State":{"Running":true}}"#));

    let status = manager.status("testnet").await?;
    assert!(status.running);
    assert!(!status.building);
    assert_eq!(status.container, crate::common::TESTNET_CONTAINER);

    Ok(())
}

#[tokio::test]
async fn stopped_container_is_reported_not_running() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.on_prefix(&inspect_prefix(), ok(r#"{"State":{"Running":false}}"#));

    let status = manager.status("testnet").await?;
    assert!(!status.running);

    Ok(())
}

#[tokio::test]
async fn inspect_failure_reads_as_not_running() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.on_prefix(
        &inspect_prefix(),
        failed(1, "Error: No such object: sv2-bitcoin-mainnet"),
    );

    let status = manager.status("mainnet").await?;
    assert!(!status.running);
    assert!(!status.building);

    Ok(())
}

#[tokio::test]
async fn unparsable_inspect_output_reads_as_not_running() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.on_prefix(&inspect_prefix(), ok("not json at all"));

    let status = manager.status("mainnet").await?;
    assert!(!status.running);

    Ok(())
}
