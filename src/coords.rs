// Copyright 2026 chaos-canary Contributors
// SPDX-License-Identifier: Apache-2.0

//! Mapping from experiment kind names to API resource coordinates.
//!
//! The registry is a data-driven lookup table: new experiment kinds are a
//! `register` call, not a code change.

use std::collections::HashMap;

use crate::error::ChaosError;

/// API group of every Chaos Mesh experiment resource.
pub const CHAOS_MESH_GROUP: &str = "chaos-mesh.org";

/// API version of every Chaos Mesh experiment resource.
pub const CHAOS_MESH_VERSION: &str = "v1alpha1";

/// The experiment kinds known out of the box. Each maps to the fixed
/// group/version above with a resource name equal to the lowercased kind.
const BUILTIN_KINDS: [&str; 8] = [
    "PodChaos",
    "NetworkChaos",
    "StressChaos",
    "IOChaos",
    "TimeChaos",
    "KernelChaos",
    "DNSChaos",
    "HTTPChaos",
];

/// (group, version, resource) triple identifying a resource type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceCoordinates {
    pub group: String,
    pub version: String,
    pub resource: String,
}

impl ResourceCoordinates {
    /// Coordinates of a built-in Chaos Mesh kind.
    fn chaos_mesh(kind: &str) -> Self {
        Self {
            group: CHAOS_MESH_GROUP.to_string(),
            version: CHAOS_MESH_VERSION.to_string(),
            resource: kind.to_lowercase(),
        }
    }
}

/// Lookup table from kind name to resource coordinates.
#[derive(Debug, Clone)]
pub struct KindRegistry {
    entries: HashMap<String, ResourceCoordinates>,
}

impl KindRegistry {
    /// Registry seeded with the built-in Chaos Mesh experiment kinds.
    pub fn builtin() -> Self {
        let entries = BUILTIN_KINDS
            .iter()
            .map(|kind| (kind.to_string(), ResourceCoordinates::chaos_mesh(kind)))
            .collect();
        Self { entries }
    }

    /// Add or replace the coordinates for a kind.
    pub fn register(&mut self, kind: impl Into<String>, coordinates: ResourceCoordinates) {
        self.entries.insert(kind.into(), coordinates);
    }

    /// Resolve a kind name to its coordinates.
    ///
    /// # Errors
    /// Returns `ChaosError::UnsupportedKind` for kinds not in the table.
    /// This is a terminal condition; nothing in the controller retries it.
    pub fn resolve(&self, kind: &str) -> Result<ResourceCoordinates, ChaosError> {
        self.entries
            .get(kind)
            .cloned()
            .ok_or_else(|| ChaosError::UnsupportedKind(kind.to_string()))
    }
}

impl Default for KindRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
#[path = "coords_tests.rs"]
mod tests;
