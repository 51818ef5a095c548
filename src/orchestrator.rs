// Copyright 2026 chaos-canary Contributors
// SPDX-License-Identifier: Apache-2.0

//! One full experiment lifecycle per invocation.
//!
//! `run` sequences validate → inject → create → watch → cleanup → report.
//! Cleanup after a decided outcome is always best effort: its failures are
//! logged at warn level and never change what gets reported. `terminate`
//! covers the out-of-band abort path, `resume` exists only to satisfy the
//! host's lifecycle surface (chaos experiments have nothing to resume).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::client::{ExperimentHandle, LifecycleClient};
use crate::config::ExperimentConfig;
use crate::error::ChaosError;
use crate::template::ExperimentTemplate;

/// Identity metadata of one created experiment, reported to the host and
/// handed back on terminate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentIdentity {
    #[serde(default)]
    pub experiment_name: String,
    #[serde(default)]
    pub experiment_namespace: String,
    #[serde(default)]
    pub experiment_kind: String,
    /// Human-readable `key=value` form of the target selector.
    #[serde(default)]
    pub target_selector: String,
}

impl ExperimentIdentity {
    fn from_handle(handle: &ExperimentHandle, target_selector: String) -> Self {
        Self {
            experiment_name: handle.name.clone(),
            experiment_namespace: handle.namespace.clone(),
            experiment_kind: handle.kind.clone(),
            target_selector,
        }
    }

    fn to_handle(&self) -> ExperimentHandle {
        ExperimentHandle {
            namespace: self.experiment_namespace.clone(),
            name: self.experiment_name.clone(),
            kind: self.experiment_kind.clone(),
        }
    }
}

/// Final report of one invocation.
///
/// A failed invocation still produces a report: `success` is false and
/// `error` carries the reason. Identity is present once create succeeded.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentReport {
    pub success: bool,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub identity: Option<ExperimentIdentity>,
}

/// Drives create → watch → cleanup → report for single invocations.
pub struct Orchestrator {
    client: LifecycleClient,
}

impl Orchestrator {
    pub fn new(client: LifecycleClient) -> Self {
        Self { client }
    }

    /// Execute one experiment invocation to completion.
    ///
    /// Never returns an error: every terminal failure flows into the
    /// report with `success = false` and a descriptive reason. The
    /// cancellation token propagates a parent-invocation abort into the
    /// watch step, the only suspension point.
    pub async fn run(
        &self,
        config: &ExperimentConfig,
        cancel: &CancellationToken,
    ) -> ExperimentReport {
        let started_at = Utc::now();

        if let Err(e) = config.validate() {
            return failed(started_at, e, None);
        }
        // Validation guarantees these cannot fail past this point.
        let timeout = match config.timeout_duration() {
            Ok(timeout) => timeout,
            Err(e) => return failed(started_at, e, None),
        };
        let selector = match config.target_selector() {
            Ok(selector) => selector,
            Err(e) => return failed(started_at, e, None),
        };

        let mut template = match ExperimentTemplate::parse(&config.experiment_template) {
            Ok(template) => template,
            Err(e) => return failed(started_at, e, None),
        };
        if let Err(e) = template.inject_selector(&selector) {
            return failed(started_at, e, None);
        }

        let handle = match self.client.create(&template).await {
            Ok(handle) => handle,
            Err(e) => return failed(started_at, e, None),
        };
        let identity = ExperimentIdentity::from_handle(&handle, selector.to_string());

        match self.client.watch(&handle, timeout, cancel).await {
            Ok(success) => {
                if config.cleanup_on_finish {
                    self.cleanup(&handle).await;
                }
                ExperimentReport {
                    success,
                    started_at,
                    finished_at: Utc::now(),
                    error: None,
                    identity: Some(identity),
                }
            }
            Err(e) => {
                // Best effort; the watch error stays the reported reason.
                if config.cleanup_on_finish {
                    self.cleanup(&handle).await;
                }
                failed(started_at, e, Some(identity))
            }
        }
    }

    /// Abort an in-flight invocation from its recorded identity metadata.
    ///
    /// Missing metadata, metadata that does not parse, or an empty
    /// experiment name are all no-ops, not errors. The delete itself is
    /// best effort.
    pub async fn terminate(&self, metadata: Option<&Value>) {
        let Some(metadata) = metadata else {
            debug!("no experiment metadata recorded, nothing to terminate");
            return;
        };
        let identity: ExperimentIdentity = match serde_json::from_value(metadata.clone()) {
            Ok(identity) => identity,
            Err(e) => {
                warn!(error = %e, "unreadable experiment metadata, skipping termination cleanup");
                return;
            }
        };
        if identity.experiment_name.is_empty() {
            debug!("no experiment name recorded, nothing to terminate");
            return;
        }

        let handle = identity.to_handle();
        match self.client.delete(&handle).await {
            Ok(()) => info!(
                namespace = %handle.namespace,
                name = %handle.name,
                "cleaned up chaos experiment during termination"
            ),
            Err(e) => warn!(
                namespace = %handle.namespace,
                name = %handle.name,
                error = %e,
                "failed to clean up chaos experiment during termination"
            ),
        }
    }

    /// Chaos experiments have no paused state to resume from.
    pub fn resume(&self, report: ExperimentReport) -> ExperimentReport {
        debug!("resume is a no-op for chaos experiments");
        report
    }

    async fn cleanup(&self, handle: &ExperimentHandle) {
        match self.client.delete(handle).await {
            Ok(()) => info!(
                namespace = %handle.namespace,
                name = %handle.name,
                "cleaned up chaos experiment"
            ),
            Err(e) => warn!(
                namespace = %handle.namespace,
                name = %handle.name,
                error = %e,
                "failed to clean up chaos experiment"
            ),
        }
    }
}

fn failed(
    started_at: DateTime<Utc>,
    error: ChaosError,
    identity: Option<ExperimentIdentity>,
) -> ExperimentReport {
    error!(error = %error, "chaos experiment invocation failed");
    ExperimentReport {
        success: false,
        started_at,
        finished_at: Utc::now(),
        error: Some(error.to_string()),
        identity,
    }
}

#[cfg(test)]
#[path = "orchestrator_tests.rs"]
mod tests;
