// Copyright 2026 chaos-canary Contributors
// SPDX-License-Identifier: Apache-2.0

//! Lifecycle operations against the cluster resource API.
//!
//! Create submits an injected template and yields a handle; watch consumes
//! the status stream until a terminal outcome, the deadline, or
//! cancellation; delete is idempotent. Each watch subscribes to one
//! uniquely named resource, so clients can be shared freely across
//! independent invocations.

pub mod api;

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use serde_json::Value;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::coords::KindRegistry;
use crate::error::{ApiError, ChaosError};
use crate::status::interpret;
use crate::template::ExperimentTemplate;

pub use api::{ResourceApi, WatchEvent, WatchStream};

/// Identity of one created experiment instance, consumed by watch and
/// delete and discarded at the end of the invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentHandle {
    pub namespace: String,
    pub name: String,
    pub kind: String,
}

/// Create / watch / delete against one cluster connection.
pub struct LifecycleClient {
    api: Arc<dyn ResourceApi>,
    registry: KindRegistry,
}

impl LifecycleClient {
    /// Client over the given API with the built-in kind table.
    pub fn new(api: Arc<dyn ResourceApi>) -> Self {
        Self::with_registry(api, KindRegistry::builtin())
    }

    /// Client with a caller-extended kind table.
    pub fn with_registry(api: Arc<dyn ResourceApi>, registry: KindRegistry) -> Self {
        Self { api, registry }
    }

    /// Submit an (already injected) experiment template.
    ///
    /// The namespace falls back to `default` when the template names none.
    /// The handle's name is taken from the created resource as the server
    /// recorded it, so generated names are picked up.
    ///
    /// # Errors
    /// `ChaosError::UnsupportedKind` for unknown kinds,
    /// `ChaosError::Creation` when the cluster rejects the call.
    pub async fn create(
        &self,
        template: &ExperimentTemplate,
    ) -> Result<ExperimentHandle, ChaosError> {
        let kind = template.kind().to_string();
        let coordinates = self.registry.resolve(&kind)?;
        let namespace = template.namespace().to_string();

        info!(
            namespace = %namespace,
            name = template.name().unwrap_or("<generated>"),
            kind = %kind,
            "creating chaos experiment"
        );

        let created = self
            .api
            .create(&coordinates, &namespace, template.to_document())
            .await
            .map_err(ChaosError::Creation)?;

        let name = created
            .pointer("/metadata/name")
            .and_then(Value::as_str)
            .or_else(|| template.name())
            .ok_or(ChaosError::MissingSection("metadata.name"))?
            .to_string();

        Ok(ExperimentHandle {
            namespace,
            name,
            kind,
        })
    }

    /// Block until the experiment reaches a terminal state, returning its
    /// success, or until the deadline or cancellation cuts the watch short.
    ///
    /// Update events whose status cannot be parsed are logged and skipped;
    /// they never terminate the watch on their own.
    ///
    /// # Errors
    /// `ChaosError::WatchTimeout` when the deadline elapses,
    /// `ChaosError::Canceled` on cooperative cancellation,
    /// `ChaosError::WatchChannelClosed` when the stream ends early, and
    /// `ChaosError::WatchFailed` for stream-level error events. All of
    /// them drop the stream, canceling the underlying subscription.
    pub async fn watch(
        &self,
        handle: &ExperimentHandle,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> Result<bool, ChaosError> {
        let coordinates = self.registry.resolve(&handle.kind)?;

        info!(
            namespace = %handle.namespace,
            name = %handle.name,
            timeout = ?timeout,
            "watching chaos experiment"
        );

        let mut stream = self
            .api
            .watch(&coordinates, &handle.namespace, &handle.name)
            .await
            .map_err(ChaosError::Watch)?;

        let deadline = tokio::time::sleep(timeout);
        tokio::pin!(deadline);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    debug!(name = %handle.name, "watch canceled by caller");
                    return Err(ChaosError::Canceled);
                }
                () = &mut deadline => {
                    return Err(ChaosError::WatchTimeout);
                }
                event = stream.next() => match event {
                    None => return Err(ChaosError::WatchChannelClosed),
                    Some(WatchEvent::Failed(message)) => {
                        return Err(ChaosError::WatchFailed(message));
                    }
                    Some(WatchEvent::Updated(document)) => {
                        match interpret(document.get("status")) {
                            Ok(outcome) if outcome.finished => {
                                info!(
                                    namespace = %handle.namespace,
                                    name = %handle.name,
                                    success = outcome.success,
                                    "chaos experiment finished"
                                );
                                return Ok(outcome.success);
                            }
                            Ok(_) => {}
                            Err(error) => {
                                warn!(
                                    name = %handle.name,
                                    error = %error,
                                    "skipping malformed status update"
                                );
                            }
                        }
                    }
                },
            }
        }
    }

    /// Delete the experiment. An already absent resource is success.
    ///
    /// # Errors
    /// `ChaosError::Deletion` for any other API failure.
    pub async fn delete(&self, handle: &ExperimentHandle) -> Result<(), ChaosError> {
        let coordinates = self.registry.resolve(&handle.kind)?;

        info!(
            namespace = %handle.namespace,
            name = %handle.name,
            "deleting chaos experiment"
        );

        match self
            .api
            .delete(&coordinates, &handle.namespace, &handle.name)
            .await
        {
            Ok(()) | Err(ApiError::NotFound) => Ok(()),
            Err(error) => Err(ChaosError::Deletion(error)),
        }
    }
}

#[cfg(test)]
pub(crate) mod mock;

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
