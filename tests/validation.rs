// tests/validation.rs

//! Input validation must fail fast, before any external invocation.

mod common;

use std::error::Error;

use nodeman::errors::ManagerError;

use crate::common::{init_tracing, manager_with_fake};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn unknown_target_fails_every_operation_without_invocation() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();

    let errors = vec![
        manager.ensure_running("signet").await.unwrap_err(),
        manager.stop("signet").await.unwrap_err(),
        manager.restart("signet").await.unwrap_err(),
        manager.status("signet").await.unwrap_err(),
        manager.logs("signet", 100).await.unwrap_err(),
        manager.chain_info("signet").await.unwrap_err(),
        manager.read_config("signet").await.unwrap_err(),
        manager.write_config("signet", "rpcuser=x").await.unwrap_err(),
    ];

    for err in errors {
        assert!(matches!(err, ManagerError::InvalidTarget(_)), "got {err:?}");
    }
    assert!(fake.calls().is_empty());

    Ok(())
}

#[tokio::test]
async fn target_names_are_trimmed_and_case_insensitive() -> TestResult {
    init_tracing();
    let (manager, _fake) = manager_with_fake();

    let status = manager.status(" MainNet ").await?;
    assert_eq!(status.target.as_str(), "mainnet");

    Ok(())
}

#[tokio::test]
async fn log_line_count_is_bounded() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();

    for lines in [0, 10_001, u32::MAX] {
        let err = manager.logs("mainnet", lines).await.unwrap_err();
        assert!(matches!(err, ManagerError::InvalidArgument(_)), "got {err:?}");
    }
    assert!(fake.calls().is_empty());

    // The boundary values themselves pass through.
    manager.logs("mainnet", 1).await?;
    manager.logs("mainnet", 10_000).await?;
    assert_eq!(fake.calls_matching(&["docker", "logs"]), 2);

    Ok(())
}

#[tokio::test]
async fn empty_config_content_is_rejected() -> TestResult {
    init_tracing();
    let (manager, fake) = manager_with_fake();

    let err = manager.write_config("testnet", "").await.unwrap_err();
    assert!(matches!(err, ManagerError::InvalidArgument(_)));
    assert!(fake.calls().is_empty());

    Ok(())
}
