// Copyright 2026 chaos-canary Contributors
// SPDX-License-Identifier: Apache-2.0

//! The consumed cluster resource API.
//!
//! One trait, three operations, all addressing resources by coordinates,
//! namespace and name. Concrete transports (and the credential handling
//! they need) live in the host; the controller only depends on this seam,
//! which also keeps every component testable against a scripted
//! implementation.

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde_json::Value;

use crate::coords::ResourceCoordinates;
use crate::error::ApiError;

/// One event observed on a watch subscription.
#[derive(Debug, Clone)]
pub enum WatchEvent {
    /// The watched resource was created or mutated; carries the full
    /// document including its current `status` subtree.
    Updated(Value),
    /// The stream itself failed. Terminal for the subscription.
    Failed(String),
}

/// Stream of watch events. Dropping the stream cancels the subscription.
pub type WatchStream = BoxStream<'static, WatchEvent>;

/// Generic structured-resource cluster API.
///
/// Implementations must be safe for concurrent reuse across independent
/// invocations; the controller itself never shares a watch between
/// invocations.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// Submit a document, returning the created resource as the server
    /// recorded it.
    async fn create(
        &self,
        coordinates: &ResourceCoordinates,
        namespace: &str,
        document: Value,
    ) -> Result<Value, ApiError>;

    /// Open an event stream filtered to the single named resource.
    async fn watch(
        &self,
        coordinates: &ResourceCoordinates,
        namespace: &str,
        name: &str,
    ) -> Result<WatchStream, ApiError>;

    /// Delete the named resource. Returns `ApiError::NotFound` when it is
    /// already absent; callers decide whether that is an error.
    async fn delete(
        &self,
        coordinates: &ResourceCoordinates,
        namespace: &str,
        name: &str,
    ) -> Result<(), ApiError>;
}
