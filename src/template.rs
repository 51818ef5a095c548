// Copyright 2026 chaos-canary Contributors
// SPDX-License-Identifier: Apache-2.0

//! Experiment template parsing and target selector injection.
//!
//! A template is caller-supplied YAML describing one experiment resource.
//! The controller only reads `kind`, `metadata.name`, `metadata.namespace`
//! and writes `spec.selector.labelSelectors`; every other field is opaque
//! passthrough to the cluster API.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::{Map, Value};

use crate::error::ChaosError;

/// Namespace used when the template does not name one.
pub const DEFAULT_NAMESPACE: &str = "default";

/// Non-empty set of label key/value pairs identifying the instances an
/// experiment should affect. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSelector {
    labels: BTreeMap<String, String>,
}

impl TargetSelector {
    /// Selector with a single label pair.
    ///
    /// # Errors
    /// Returns `ChaosError::Config` if the key or value is empty.
    pub fn new(key: &str, value: &str) -> Result<Self, ChaosError> {
        let mut labels = BTreeMap::new();
        labels.insert(key.to_string(), value.to_string());
        Self::from_labels(labels)
    }

    /// Selector from an arbitrary label map.
    ///
    /// # Errors
    /// Returns `ChaosError::Config` if the map is empty or any key or
    /// value is empty.
    pub fn from_labels(labels: BTreeMap<String, String>) -> Result<Self, ChaosError> {
        if labels.is_empty() {
            return Err(ChaosError::Config(
                "target selector must contain at least one label".to_string(),
            ));
        }
        for (key, value) in &labels {
            if key.is_empty() || value.is_empty() {
                return Err(ChaosError::Config(
                    "target selector labels must have non-empty keys and values".to_string(),
                ));
            }
        }
        Ok(Self { labels })
    }

    pub fn labels(&self) -> &BTreeMap<String, String> {
        &self.labels
    }
}

impl fmt::Display for TargetSelector {
    /// Formats as `key=value`, comma-separated, in key order.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in &self.labels {
            if !first {
                write!(f, ",")?;
            }
            write!(f, "{}={}", key, value)?;
            first = false;
        }
        Ok(())
    }
}

/// One parsed experiment document, owned for a single invocation.
#[derive(Debug, Clone)]
pub struct ExperimentTemplate {
    root: Map<String, Value>,
}

impl ExperimentTemplate {
    /// Parse template text into a document tree.
    ///
    /// Requires a YAML mapping with a non-empty `kind` string and a
    /// `metadata` mapping. Presence of `spec` is checked at injection
    /// time, so a structurally bad template never reaches the cluster.
    ///
    /// # Errors
    /// `ChaosError::Template` for unparsable text, `ChaosError::MissingSection`
    /// for absent required sections.
    pub fn parse(text: &str) -> Result<Self, ChaosError> {
        if text.trim().is_empty() {
            return Err(ChaosError::Template("template text is empty".to_string()));
        }

        let root: Value =
            serde_yaml::from_str(text).map_err(|e| ChaosError::Template(e.to_string()))?;
        let Value::Object(root) = root else {
            return Err(ChaosError::Template(
                "template is not a mapping".to_string(),
            ));
        };

        let template = Self { root };
        if template.kind().is_empty() {
            return Err(ChaosError::MissingSection("kind"));
        }
        if !matches!(template.root.get("metadata"), Some(Value::Object(_))) {
            return Err(ChaosError::MissingSection("metadata"));
        }
        Ok(template)
    }

    /// Declared experiment kind, or `""` when absent.
    pub fn kind(&self) -> &str {
        self.root
            .get("kind")
            .and_then(Value::as_str)
            .unwrap_or_default()
    }

    /// `metadata.name`, when the template supplies one.
    pub fn name(&self) -> Option<&str> {
        self.root
            .get("metadata")
            .and_then(|m| m.get("name"))
            .and_then(Value::as_str)
    }

    /// `metadata.namespace`, falling back to [`DEFAULT_NAMESPACE`].
    pub fn namespace(&self) -> &str {
        self.root
            .get("metadata")
            .and_then(|m| m.get("namespace"))
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_NAMESPACE)
    }

    /// Overwrite `spec.selector.labelSelectors` with exactly the entries
    /// of `target`, creating `spec.selector` when absent.
    ///
    /// Sibling selector fields (`namespaces`, `fieldSelectors`, ...) are
    /// left untouched. Idempotent: re-injecting the same selector yields a
    /// structurally identical document.
    ///
    /// # Errors
    /// `ChaosError::MissingSection` when the template has no `spec`
    /// mapping, `ChaosError::Template` when `spec.selector` exists but is
    /// not a mapping.
    pub fn inject_selector(&mut self, target: &TargetSelector) -> Result<(), ChaosError> {
        let spec = self
            .root
            .get_mut("spec")
            .and_then(Value::as_object_mut)
            .ok_or(ChaosError::MissingSection("spec"))?;

        let selector = spec
            .entry("selector")
            .or_insert_with(|| Value::Object(Map::new()));
        let selector = selector.as_object_mut().ok_or_else(|| {
            ChaosError::Template("`spec.selector` is not a mapping".to_string())
        })?;

        let labels: Map<String, Value> = target
            .labels()
            .iter()
            .map(|(key, value)| (key.clone(), Value::String(value.clone())))
            .collect();
        selector.insert("labelSelectors".to_string(), Value::Object(labels));
        Ok(())
    }

    /// The document to submit to the cluster API.
    pub fn to_document(&self) -> Value {
        Value::Object(self.root.clone())
    }
}

#[cfg(test)]
#[path = "template_tests.rs"]
mod tests;
