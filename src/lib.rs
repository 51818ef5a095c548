// Copyright 2026 chaos-canary Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chaos experiment lifecycle controller for automated canary analysis.
//!
//! The controller parameterizes a generic Chaos Mesh experiment template
//! with a dynamic target selector, submits it to the cluster resource API,
//! watches the externally mutated status until a terminal phase or a
//! deadline, interprets that status into a binary outcome, and tears the
//! resource down.
//!
//! The cluster transport is abstracted behind [`client::ResourceApi`];
//! hosts supply an implementation together with whatever credentials it
//! needs, then drive invocations through [`orchestrator::Orchestrator`].

pub mod client;
pub mod config;
pub mod coords;
pub mod error;
pub mod orchestrator;
pub mod status;
pub mod template;

pub use client::{ExperimentHandle, LifecycleClient, ResourceApi, WatchEvent, WatchStream};
pub use config::{ExperimentConfig, DEFAULT_TIMEOUT};
pub use coords::{KindRegistry, ResourceCoordinates};
pub use error::{ApiError, ChaosError};
pub use orchestrator::{ExperimentIdentity, ExperimentReport, Orchestrator};
pub use status::{interpret, ExperimentStatus, Outcome};
pub use template::{ExperimentTemplate, TargetSelector, DEFAULT_NAMESPACE};
