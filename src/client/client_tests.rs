// Copyright 2026 chaos-canary Contributors
// SPDX-License-Identifier: Apache-2.0

//! Tests for the lifecycle client against a scripted resource API.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio_util::sync::CancellationToken;

use super::mock::MockResourceApi;
use super::*;
use crate::error::{ApiError, ChaosError};

fn handle() -> ExperimentHandle {
    ExperimentHandle {
        namespace: "default".to_string(),
        name: "canary-pod-kill".to_string(),
        kind: "PodChaos".to_string(),
    }
}

fn status_update(status: serde_json::Value) -> WatchEvent {
    WatchEvent::Updated(json!({
        "apiVersion": "chaos-mesh.org/v1alpha1",
        "kind": "PodChaos",
        "metadata": {"name": "canary-pod-kill", "namespace": "default"},
        "status": status,
    }))
}

fn finished_ok() -> WatchEvent {
    status_update(json!({
        "experiment": {"phase": "Finished"},
        "conditions": [
            {"type": "AllInjected", "status": "True"},
            {"type": "AllRecovered", "status": "True"},
        ],
    }))
}

async fn watch_with(
    api: MockResourceApi,
    timeout: Duration,
) -> Result<bool, ChaosError> {
    let client = LifecycleClient::new(Arc::new(api));
    let cancel = CancellationToken::new();
    client.watch(&handle(), timeout, &cancel).await
}

// ============================================================================
// Create
// ============================================================================

#[tokio::test]
async fn create_defaults_namespace_and_reads_name() {
    let api = Arc::new(MockResourceApi::idle());
    let client = LifecycleClient::new(api.clone());
    let template = ExperimentTemplate::parse(
        "kind: PodChaos\nmetadata:\n  name: canary-pod-kill\nspec:\n  action: pod-kill\n",
    )
    .unwrap();

    let handle = client.create(&template).await.unwrap();
    assert_eq!(handle.namespace, "default");
    assert_eq!(handle.name, "canary-pod-kill");
    assert_eq!(handle.kind, "PodChaos");

    let created = api.created.lock().unwrap();
    let (coords, namespace, _) = &created[0];
    assert_eq!(coords.resource, "podchaos");
    assert_eq!(namespace, "default");
}

#[tokio::test]
async fn create_rejects_unknown_kind_before_any_api_call() {
    let api = Arc::new(MockResourceApi::idle());
    let client = LifecycleClient::new(api.clone());
    let template = ExperimentTemplate::parse(
        "kind: UnsupportedChaos\nmetadata:\n  name: x\nspec: {}\n",
    )
    .unwrap();

    assert!(matches!(
        client.create(&template).await,
        Err(ChaosError::UnsupportedKind(_))
    ));
    assert!(api.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn create_surfaces_api_rejection() {
    let api = MockResourceApi::idle().fail_create(ApiError::Rejected("quota".to_string()));
    let client = LifecycleClient::new(Arc::new(api));
    let template =
        ExperimentTemplate::parse("kind: PodChaos\nmetadata:\n  name: x\nspec: {}\n").unwrap();

    assert!(matches!(
        client.create(&template).await,
        Err(ChaosError::Creation(ApiError::Rejected(_)))
    ));
}

// ============================================================================
// Watch
// ============================================================================

#[tokio::test]
async fn watch_returns_success_on_finished_phase() {
    let api = MockResourceApi::scripted(vec![
        status_update(json!({"experiment": {"phase": "Running"}})),
        finished_ok(),
    ]);
    let success = watch_with(api, Duration::from_secs(60)).await.unwrap();
    assert!(success);
}

#[tokio::test]
async fn watch_flags_disqualifying_condition() {
    let api = MockResourceApi::scripted(vec![status_update(json!({
        "experiment": {"phase": "Finished"},
        "conditions": [{"type": "AllInjected", "status": "False"}],
    }))]);
    let success = watch_with(api, Duration::from_secs(60)).await.unwrap();
    assert!(!success);
}

#[tokio::test]
async fn watch_skips_malformed_status_updates() {
    let api = MockResourceApi::scripted(vec![
        status_update(json!("bogus")),
        status_update(json!({"experiment": "Finished"})),
        finished_ok(),
    ]);
    let success = watch_with(api, Duration::from_secs(60)).await.unwrap();
    assert!(success);
}

#[tokio::test]
async fn watch_ignores_updates_without_status() {
    let api = MockResourceApi::scripted(vec![
        WatchEvent::Updated(json!({"metadata": {"name": "canary-pod-kill"}})),
        finished_ok(),
    ]);
    let success = watch_with(api, Duration::from_secs(60)).await.unwrap();
    assert!(success);
}

#[tokio::test(start_paused = true)]
async fn watch_times_out_when_no_terminal_phase_arrives() {
    let api = MockResourceApi::scripted(vec![status_update(
        json!({"experiment": {"phase": "Running"}}),
    )]);
    assert!(matches!(
        watch_with(api, Duration::from_secs(5)).await,
        Err(ChaosError::WatchTimeout)
    ));
}

#[tokio::test(start_paused = true)]
async fn watch_unknown_phase_is_bounded_only_by_deadline() {
    let api = MockResourceApi::scripted(vec![status_update(
        json!({"experiment": {"phase": "SomeFuturePhase"}}),
    )]);
    assert!(matches!(
        watch_with(api, Duration::from_secs(5)).await,
        Err(ChaosError::WatchTimeout)
    ));
}

#[tokio::test]
async fn watch_errors_when_stream_closes_early() {
    let api = MockResourceApi::closing(vec![status_update(
        json!({"experiment": {"phase": "Running"}}),
    )]);
    assert!(matches!(
        watch_with(api, Duration::from_secs(60)).await,
        Err(ChaosError::WatchChannelClosed)
    ));
}

#[tokio::test]
async fn watch_surfaces_stream_error_events() {
    let api =
        MockResourceApi::scripted(vec![WatchEvent::Failed("etcd unavailable".to_string())]);
    assert!(matches!(
        watch_with(api, Duration::from_secs(60)).await,
        Err(ChaosError::WatchFailed(message)) if message == "etcd unavailable"
    ));
}

#[tokio::test]
async fn watch_honors_cancellation() {
    let client = LifecycleClient::new(Arc::new(MockResourceApi::idle()));
    let cancel = CancellationToken::new();
    cancel.cancel();
    assert!(matches!(
        client
            .watch(&handle(), Duration::from_secs(60), &cancel)
            .await,
        Err(ChaosError::Canceled)
    ));
}

// ============================================================================
// Delete
// ============================================================================

#[tokio::test]
async fn delete_succeeds() {
    let api = Arc::new(MockResourceApi::idle());
    let client = LifecycleClient::new(api.clone());
    client.delete(&handle()).await.unwrap();

    let deleted = api.deleted.lock().unwrap();
    assert_eq!(
        deleted[0],
        (
            "podchaos".to_string(),
            "default".to_string(),
            "canary-pod-kill".to_string()
        )
    );
}

#[tokio::test]
async fn delete_treats_absent_resource_as_success() {
    let api = MockResourceApi::idle().fail_delete(ApiError::NotFound);
    let client = LifecycleClient::new(Arc::new(api));
    assert!(client.delete(&handle()).await.is_ok());
}

#[tokio::test]
async fn delete_propagates_other_failures() {
    let api = MockResourceApi::idle().fail_delete(ApiError::Transport("down".to_string()));
    let client = LifecycleClient::new(Arc::new(api));
    assert!(matches!(
        client.delete(&handle()).await,
        Err(ChaosError::Deletion(_))
    ));
}
