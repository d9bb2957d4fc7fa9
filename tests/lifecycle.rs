// tests/lifecycle.rs

//! End-to-end build/start workflows driven through a fake executor.

mod common;

use std::error::Error;
use std::time::Duration;

use nodeman::errors::ManagerError;
use nodeman_test_utils::builders::{failed, ok};

use crate::common::{
    build_prefix, image_prefix, init_tracing, inspect_prefix, manager_with_fake, up_prefix,
    wait_until_not_building,
};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn present_image_starts_synchronously_without_building() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.on_prefix(&image_prefix(), ok("8f14e45fceea\n"));

    let outcome = manager.ensure_running("mainnet").await?;
    assert!(outcome.accepted);
    assert!(!outcome.building);

    // The fast path never touches the build tooling.
    assert_eq!(fake.calls_matching(&build_prefix()), 0);
    assert_eq!(fake.calls_matching(&up_prefix()), 1);

    let status = manager.status("mainnet").await?;
    assert!(!status.building);

    Ok(())
}

#[tokio::test]
async fn absent_image_builds_then_starts_in_background() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    // Image check replies empty (absent) by default; inspection reports the
    // container up once the workflow resolves.
    fake.on_prefix(&inspect_prefix(), ok(r#"{"State":{"Running":true}}"#));

    let outcome = manager.ensure_running("mainnet").await?;
    assert!(outcome.accepted);
    assert!(outcome.building);
    assert!(outcome.message.contains("15-20 minutes"));

    wait_until_not_building(&manager, "mainnet").await;

    let status = manager.status("mainnet").await?;
    assert!(status.running);
    assert!(!status.building);
    assert_eq!(status.message, None);

    assert_eq!(fake.calls_matching(&build_prefix()), 1);
    assert_eq!(fake.calls_matching(&up_prefix()), 1);

    Ok(())
}

#[tokio::test]
async fn failed_build_reports_exit_code_and_does_not_start() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.on_prefix(&build_prefix(), failed(137, ""));

    let outcome = manager.ensure_running("testnet").await?;
    assert!(outcome.building);

    wait_until_not_building(&manager, "testnet").await;

    let status = manager.status("testnet").await?;
    assert!(!status.running);
    assert!(!status.building);
    assert!(status.message.unwrap().contains("137"));

    assert_eq!(fake.calls_matching(&up_prefix()), 0);

    Ok(())
}

#[tokio::test]
async fn failed_start_after_build_retries_on_the_fast_path() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.on_prefix(&up_prefix(), failed(1, "port is already allocated"));

    manager.ensure_running("mainnet").await?;
    wait_until_not_building(&manager, "mainnet").await;

    let status = manager.status("mainnet").await?;
    let message = status.message.unwrap();
    assert!(message.contains("start failed"));
    assert!(message.contains("port is already allocated"));

    // The image exists now; the retry starts synchronously and clears the
    // failure message.
    fake.on_prefix(&image_prefix(), ok("8f14e45fceea\n"));
    fake.on_prefix(&up_prefix(), ok(""));

    let outcome = manager.ensure_running("mainnet").await?;
    assert!(!outcome.building);
    assert_eq!(fake.calls_matching(&build_prefix()), 1);

    let status = manager.status("mainnet").await?;
    assert_eq!(status.message, None);

    Ok(())
}

#[tokio::test]
async fn concurrent_ensure_running_launches_exactly_one_build() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.delay_prefix(&build_prefix(), Duration::from_millis(150));

    let (a, b) = tokio::join!(
        manager.ensure_running("testnet"),
        manager.ensure_running("testnet")
    );
    assert!(a?.building);
    assert!(b?.building);

    wait_until_not_building(&manager, "testnet").await;

    // Both callers were told a build is underway, but only one was launched.
    assert_eq!(fake.calls_matching(&build_prefix()), 1);
    Ok(())
}

#[tokio::test]
async fn ensure_running_while_building_is_a_no_op() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.delay_prefix(&build_prefix(), Duration::from_millis(150));

    manager.ensure_running("mainnet").await?;
    let image_checks = fake.calls_matching(&image_prefix());

    // A repeat trigger re-detects the in-flight workflow and returns its
    // status without any further external invocation.
    let second = manager.ensure_running("mainnet").await?;
    assert!(second.building);
    assert!(second.message.contains("15-20 minutes"));
    assert_eq!(fake.calls_matching(&image_prefix()), image_checks);
    assert_eq!(fake.calls_matching(&build_prefix()), 1);

    wait_until_not_building(&manager, "mainnet").await;
    Ok(())
}

#[tokio::test]
async fn stop_surfaces_raw_stderr_on_failure() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.on_prefix(
        &["docker", "stop"],
        failed(1, "Error response from daemon: no such container"),
    );

    let err = manager.stop("mainnet").await.unwrap_err();
    match err {
        ManagerError::Execution(detail) => assert!(detail.contains("no such container")),
        other => panic!("expected Execution error, got {other:?}"),
    }

    Ok(())
}

#[tokio::test]
async fn stop_succeeds_even_if_removal_fails() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();
    fake.on_prefix(&["docker", "rm"], failed(1, "already removed"));

    manager.stop("mainnet").await?;
    assert_eq!(fake.calls_matching(&["docker", "stop"]), 1);
    assert_eq!(fake.calls_matching(&["docker", "rm"]), 1);

    Ok(())
}

#[tokio::test]
async fn restart_passes_through() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();

    manager.restart("testnet").await?;
    assert_eq!(fake.calls_matching(&["docker", "restart"]), 1);

    Ok(())
}
