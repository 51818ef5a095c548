// Copyright 2026 chaos-canary Contributors
// SPDX-License-Identifier: Apache-2.0

//! Host-facing invocation configuration.
//!
//! Deserialized from the JSON the host hands to one invocation. Validation
//! runs before any cluster interaction.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ChaosError;
use crate::template::TargetSelector;

/// Watch deadline used when the host supplies no timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Configuration for one experiment invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentConfig {
    /// YAML text of the experiment resource to submit.
    pub experiment_template: String,

    /// Label key identifying the target instances.
    pub target_label: String,

    /// Label value identifying the target instances.
    pub target_value: String,

    /// Watch deadline as duration text ("30s", "5m"). Empty or absent
    /// means [`DEFAULT_TIMEOUT`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<String>,

    /// Delete the experiment once the invocation is decided.
    #[serde(default = "default_cleanup")]
    pub cleanup_on_finish: bool,
}

fn default_cleanup() -> bool {
    true
}

impl ExperimentConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    /// `ChaosError::Config` when the template is empty, either target
    /// label part is empty, or the timeout text does not parse to a
    /// positive duration.
    pub fn validate(&self) -> Result<(), ChaosError> {
        if self.experiment_template.trim().is_empty() {
            return Err(ChaosError::Config(
                "experimentTemplate is required".to_string(),
            ));
        }
        if self.target_label.is_empty() {
            return Err(ChaosError::Config("targetLabel is required".to_string()));
        }
        if self.target_value.is_empty() {
            return Err(ChaosError::Config("targetValue is required".to_string()));
        }
        self.timeout_duration()?;
        Ok(())
    }

    /// The effective watch deadline.
    ///
    /// # Errors
    /// `ChaosError::Config` for unparsable or non-positive timeout text.
    pub fn timeout_duration(&self) -> Result<Duration, ChaosError> {
        match self.timeout.as_deref() {
            None | Some("") => Ok(DEFAULT_TIMEOUT),
            Some(text) => {
                let timeout = humantime::parse_duration(text).map_err(|e| {
                    ChaosError::Config(format!("invalid timeout {text:?}: {e}"))
                })?;
                if timeout.is_zero() {
                    return Err(ChaosError::Config(format!(
                        "timeout {text:?} must be positive"
                    )));
                }
                Ok(timeout)
            }
        }
    }

    /// The target selector built from the configured label pair.
    ///
    /// # Errors
    /// `ChaosError::Config` when either part is empty.
    pub fn target_selector(&self) -> Result<TargetSelector, ChaosError> {
        TargetSelector::new(&self.target_label, &self.target_value)
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
