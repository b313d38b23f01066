//! Updater tests
//!
//! Tests cover:
//! - Fresh install into an empty directory
//! - Reusing an installed artifact without touching the network
//! - Replacing an artifact from an older required version
//! - Update, status and removal flows

mod common;

use common::*;
use hazetunnel_update::UpdateResult;
use tempfile::TempDir;
use tokio_util::sync::CancellationToken;
use wiremock::MockServer;

#[tokio::test]
async fn test_ensure_installed_into_empty_dir() {
    let server = MockServer::start().await;
    let releases = vec![
        ReleaseBuilder::new()
            .version(VERSION_2_0_0)
            .served_asset(&server, ARTIFACT_V2_0_0_ARM)
            .served_asset(&server, ARTIFACT_V2_0_0)
            .build(),
    ];
    mock_releases(&server, &releases).await;
    mock_download(&server, ARTIFACT_V2_0_0, FAKE_LIBRARY_CONTENT, 1).await;

    let tmp = TempDir::new().unwrap();
    let updater = test_updater(&server, tmp.path(), VERSION_2_0_0);
    let artifact = updater.ensure_installed(&CancellationToken::new()).await.unwrap();

    assert_eq!(artifact.file_name, ARTIFACT_V2_0_0);
    assert_eq!(updater.store().scan().unwrap(), vec![ARTIFACT_V2_0_0.to_string()]);
}

#[tokio::test]
async fn test_ensure_installed_reuses_existing_artifact() {
    let server = MockServer::start().await;
    mock_releases(&server, &[]).await;
    mock_download(&server, ARTIFACT_V2_0_0, FAKE_LIBRARY_CONTENT, 0).await;

    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), ARTIFACT_V2_0_0);

    let updater = test_updater(&server, tmp.path(), VERSION_2_0_0);
    let artifact = updater.ensure_installed(&CancellationToken::new()).await.unwrap();

    assert_eq!(artifact.file_name, ARTIFACT_V2_0_0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ensure_installed_replaces_older_major() {
    let server = MockServer::start().await;
    let releases = vec![
        ReleaseBuilder::new()
            .version(VERSION_2_0_0)
            .served_asset(&server, ARTIFACT_V2_0_0)
            .build(),
    ];
    mock_releases(&server, &releases).await;
    mock_download(&server, ARTIFACT_V2_0_0, FAKE_LIBRARY_CONTENT, 1).await;

    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), ARTIFACT_V1_0_0);

    let updater = test_updater(&server, tmp.path(), "2");
    let artifact = updater.ensure_installed(&CancellationToken::new()).await.unwrap();

    assert_eq!(artifact.file_name, ARTIFACT_V2_0_0);
    assert!(!tmp.path().join(ARTIFACT_V1_0_0).exists());
    assert_eq!(updater.store().scan().unwrap().len(), 1);
}

#[tokio::test]
async fn test_update_with_nothing_installed_installs() {
    let server = MockServer::start().await;
    let releases = vec![
        ReleaseBuilder::new()
            .version(VERSION_2_0_0)
            .served_asset(&server, ARTIFACT_V2_0_0)
            .build(),
    ];
    mock_releases(&server, &releases).await;
    mock_download(&server, ARTIFACT_V2_0_0, FAKE_LIBRARY_CONTENT, 1).await;

    let tmp = TempDir::new().unwrap();
    let updater = test_updater(&server, tmp.path(), VERSION_2_0_0);
    let result = updater.update(&CancellationToken::new()).await.unwrap();

    assert!(matches!(result, UpdateResult::Installed(_)));
    assert_eq!(result.current().file_name, ARTIFACT_V2_0_0);
}

#[tokio::test]
async fn test_update_when_up_to_date() {
    let server = MockServer::start().await;
    let releases = vec![
        ReleaseBuilder::new()
            .version(VERSION_1_0_0)
            .served_asset(&server, ARTIFACT_V1_0_0)
            .build(),
    ];
    mock_releases(&server, &releases).await;
    mock_download(&server, ARTIFACT_V1_0_0, FAKE_LIBRARY_CONTENT, 0).await;

    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), ARTIFACT_V1_0_0);

    let updater = test_updater(&server, tmp.path(), "1");
    let result = updater.update(&CancellationToken::new()).await.unwrap();

    assert!(matches!(result, UpdateResult::AlreadyUpToDate(_)));
    assert!(tmp.path().join(ARTIFACT_V1_0_0).exists());
}

#[tokio::test]
async fn test_update_replaces_older_artifact() {
    let server = MockServer::start().await;
    let releases = vec![
        ReleaseBuilder::new()
            .version(VERSION_1_2_0)
            .served_asset(&server, ARTIFACT_V1_2_0)
            .build(),
    ];
    mock_releases(&server, &releases).await;
    mock_download(&server, ARTIFACT_V1_2_0, FAKE_LIBRARY_CONTENT, 1).await;

    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), ARTIFACT_V1_0_0);

    let updater = test_updater(&server, tmp.path(), "1");
    let result = updater.update(&CancellationToken::new()).await.unwrap();

    match result {
        UpdateResult::Updated { from, to, stale_removed } => {
            assert_eq!(from.file_name, ARTIFACT_V1_0_0);
            assert_eq!(to.file_name, ARTIFACT_V1_2_0);
            assert!(stale_removed);
        }
        other => panic!("unexpected result: {other:?}"),
    }
    assert_eq!(updater.store().scan().unwrap(), vec![ARTIFACT_V1_2_0.to_string()]);
}

#[tokio::test]
async fn test_update_removes_every_superseded_artifact() {
    let server = MockServer::start().await;
    let releases = vec![
        ReleaseBuilder::new()
            .version(VERSION_1_2_0)
            .served_asset(&server, ARTIFACT_V1_2_0)
            .build(),
    ];
    mock_releases(&server, &releases).await;
    mock_download(&server, ARTIFACT_V1_2_0, FAKE_LIBRARY_CONTENT, 1).await;

    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), ARTIFACT_V1_0_0);
    touch(tmp.path(), ARTIFACT_V1_1_0);
    touch(tmp.path(), ARTIFACT_V2_0_0_MAC);

    let updater = test_updater(&server, tmp.path(), "1");
    let result = updater.update(&CancellationToken::new()).await.unwrap();

    match result {
        UpdateResult::Updated { from, to, stale_removed } => {
            assert_eq!(from.file_name, ARTIFACT_V1_1_0);
            assert_eq!(to.file_name, ARTIFACT_V1_2_0);
            assert!(stale_removed);
        }
        other => panic!("unexpected result: {other:?}"),
    }

    let remaining: Vec<String> = updater
        .store()
        .scan()
        .unwrap()
        .into_iter()
        .filter(|name| name.ends_with(".so"))
        .collect();
    assert_eq!(remaining, vec![ARTIFACT_V1_2_0.to_string()]);
    assert!(tmp.path().join(ARTIFACT_V2_0_0_MAC).exists());
}

#[tokio::test]
async fn test_update_when_up_to_date_prunes_older_copies() {
    let server = MockServer::start().await;
    let releases = vec![
        ReleaseBuilder::new()
            .version(VERSION_1_2_0)
            .served_asset(&server, ARTIFACT_V1_2_0)
            .build(),
    ];
    mock_releases(&server, &releases).await;
    mock_download(&server, ARTIFACT_V1_2_0, FAKE_LIBRARY_CONTENT, 0).await;

    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), ARTIFACT_V1_0_0);
    touch(tmp.path(), ARTIFACT_V1_2_0);

    let updater = test_updater(&server, tmp.path(), "1");
    let result = updater.update(&CancellationToken::new()).await.unwrap();

    assert!(matches!(result, UpdateResult::AlreadyUpToDate(ref a) if a.file_name == ARTIFACT_V1_2_0));
    assert_eq!(updater.store().scan().unwrap(), vec![ARTIFACT_V1_2_0.to_string()]);
}

#[tokio::test]
async fn test_update_across_required_versions() {
    let server = MockServer::start().await;
    let releases = vec![
        ReleaseBuilder::new()
            .version(VERSION_2_0_0)
            .served_asset(&server, ARTIFACT_V2_0_0)
            .build(),
        ReleaseBuilder::new()
            .version(VERSION_1_0_0)
            .served_asset(&server, ARTIFACT_V1_0_0)
            .build(),
    ];
    mock_releases(&server, &releases).await;
    mock_download(&server, ARTIFACT_V2_0_0, FAKE_LIBRARY_CONTENT, 1).await;

    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), ARTIFACT_V1_0_0);

    let updater = test_updater(&server, tmp.path(), VERSION_2_0_0);
    let result = updater.update(&CancellationToken::new()).await.unwrap();

    assert!(matches!(result, UpdateResult::Updated { stale_removed: true, .. }));
    assert_eq!(updater.store().scan().unwrap(), vec![ARTIFACT_V2_0_0.to_string()]);
}

#[tokio::test]
async fn test_status_reports_installed_and_latest() {
    let server = MockServer::start().await;
    let releases = vec![
        ReleaseBuilder::new()
            .version(VERSION_1_2_0)
            .served_asset(&server, ARTIFACT_V1_2_0)
            .build(),
    ];
    mock_releases(&server, &releases).await;

    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), ARTIFACT_V1_0_0);

    let updater = test_updater(&server, tmp.path(), "1");
    let status = updater.status().await.unwrap();

    assert_eq!(status.installed.as_ref().map(|a| a.version.to_string()), Some(VERSION_1_0_0.to_string()));
    assert_eq!(status.latest.map(|v| v.to_string()), Some(VERSION_1_2_0.to_string()));
}

#[tokio::test]
async fn test_status_without_install_skips_network() {
    let server = MockServer::start().await;

    let tmp = TempDir::new().unwrap();
    let updater = test_updater(&server, tmp.path(), VERSION_2_0_0);
    let status = updater.status().await.unwrap();

    assert!(status.installed.is_none());
    assert!(status.latest.is_none());
    assert!(!status.update_available());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_remove_clears_directory() {
    let server = MockServer::start().await;

    let tmp = TempDir::new().unwrap();
    touch(tmp.path(), ARTIFACT_V2_0_0);
    touch(tmp.path(), "cert.pem");
    touch(tmp.path(), "key.pem");

    let updater = test_updater(&server, tmp.path(), VERSION_2_0_0);
    let report = updater.remove().unwrap();

    assert_eq!(report.artifacts.len(), 1);
    assert_eq!(report.key_material.len(), 2);
    assert!(std::fs::read_dir(tmp.path()).unwrap().next().is_none());
}
