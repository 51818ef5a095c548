// Copyright 2026 chaos-canary Contributors
// SPDX-License-Identifier: Apache-2.0

//! Interpretation of a remote experiment status into a binary outcome.
//!
//! The interpreter is a pure function over the `status` subtree of the
//! watched resource. Phases outside {Running, Finished, Failed, Error} are
//! deliberately treated as still in progress: only the caller-supplied
//! deadline bounds them. This keeps the controller forward compatible with
//! phase names introduced by newer control planes.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Phase after which success is evaluated from conditions.
pub const PHASE_FINISHED: &str = "Finished";

/// Condition types that disqualify a finished experiment when not "True".
const DISQUALIFYING_CONDITIONS: [&str; 2] = ["AllInjected", "AllRecovered"];

/// A single status update could not be read as a structured status.
///
/// Non-fatal: the watch loop logs it and keeps consuming events.
#[derive(Debug, Error)]
#[error("malformed experiment status: {0}")]
pub struct StatusParseError(String);

/// Mirror of the remote resource's `status` subtree.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperimentStatus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment: Option<PhaseRecord>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
}

/// The `status.experiment` record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub desired_phase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// A named sub-status refining success beyond the coarse phase.
///
/// Entries missing `type` or `status` are tolerated and never disqualify.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub condition_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Binary result of interpreting one status update.
///
/// Both fields are always meaningful together; `success` is only
/// significant when `finished` is true.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Outcome {
    pub finished: bool,
    pub success: bool,
}

impl Outcome {
    /// The experiment has not reached a terminal phase yet.
    pub const IN_PROGRESS: Self = Self {
        finished: false,
        success: false,
    };

    const fn finished(success: bool) -> Self {
        Self {
            finished: true,
            success,
        }
    }
}

/// Interpret the raw `status` subtree of a watched resource.
///
/// An absent subtree means the experiment is still starting. A present
/// subtree that cannot be read as [`ExperimentStatus`] is an error the
/// caller should log and skip.
///
/// # Errors
/// `StatusParseError` when the subtree is structurally malformed.
pub fn interpret(status: Option<&Value>) -> Result<Outcome, StatusParseError> {
    let Some(raw) = status else {
        return Ok(Outcome::IN_PROGRESS);
    };
    let status: ExperimentStatus = serde_json::from_value(raw.clone())
        .map_err(|e| StatusParseError(e.to_string()))?;
    Ok(evaluate(&status))
}

/// Pure phase/condition evaluation on an already-parsed status.
pub fn evaluate(status: &ExperimentStatus) -> Outcome {
    let phase = status.experiment.as_ref().and_then(|e| e.phase.as_deref());
    match phase {
        Some(PHASE_FINISHED) => {
            let success = !status.conditions.iter().any(disqualifies);
            Outcome::finished(success)
        }
        Some("Failed") | Some("Error") => Outcome::finished(false),
        // "Running", unknown phases, or no phase recorded yet.
        _ => Outcome::IN_PROGRESS,
    }
}

/// Any disqualifier flips success to false; order is irrelevant.
fn disqualifies(condition: &Condition) -> bool {
    let (Some(condition_type), Some(status)) = (&condition.condition_type, &condition.status)
    else {
        return false;
    };
    DISQUALIFYING_CONDITIONS.contains(&condition_type.as_str()) && status != "True"
}

#[cfg(test)]
#[path = "status_tests.rs"]
mod tests;
